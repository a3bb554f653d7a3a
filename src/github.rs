//! # Remote Listing Client
//!
//! Enumerates every repository of a GitHub organization through the
//! `GET /orgs/{org}/repos` endpoint.
//!
//! ## Design
//!
//! Fetching a single page is behind the [`RepositoryLister`] trait so the
//! pagination loop in [`list_all_repositories`] can be driven by a mock in
//! tests. [`GitHubClient`] is the real implementation and talks to the API
//! with a blocking `reqwest` client; the pipeline is strictly sequential, so
//! nothing is gained from an async runtime here.
//!
//! ## Pagination
//!
//! Pages of up to [`PER_PAGE`] items are requested starting at page 1. The
//! loop stops only when a page comes back empty, never on a short page, so a
//! listing of `N` repositories always costs `ceil(N / 100) + 1` requests. Any
//! failed request aborts the whole listing and no partial list is returned.

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults::{PER_PAGE, USER_AGENT};
use crate::error::{Error, Result};

/// A repository as returned by the organization listing endpoint.
///
/// Only `html_url` is required; it is the canonical URL the rest of the
/// pipeline works with. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub html_url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub clone_url: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub fork: bool,
}

/// Fetches one page of an organization's repositories - allows mocking in tests
pub trait RepositoryLister {
    /// Returns the repositories on `page` (1-based), at most `per_page` of them.
    /// An empty vector means there are no further pages.
    fn list_page(&self, organization: &str, page: u32, per_page: u32)
        -> Result<Vec<RemoteRepository>>;
}

/// Collect the canonical URL of every repository in `organization`.
///
/// Requests pages until one comes back empty. The first failing request is
/// returned as the error; nothing is accumulated past it.
pub fn list_all_repositories(
    lister: &dyn RepositoryLister,
    organization: &str,
) -> Result<Vec<String>> {
    let mut urls = Vec::new();
    let mut page = 1;

    loop {
        let repos = lister.list_page(organization, page, PER_PAGE)?;
        info!("Page {}: {} records", page, repos.len());
        if repos.is_empty() {
            break;
        }
        for repo in repos {
            debug!("{}", repo.html_url);
            urls.push(repo.html_url);
        }
        page += 1;
    }

    info!("Total repository count for '{}': {}", organization, urls.len());
    Ok(urls)
}

/// Client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    base_url: Url,
    client: Client,
}

impl GitHubClient {
    /// Create a client for the API at `base_url`, authenticating with `token`
    /// when one is given.
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self> {
        let mut base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config {
                message: format!("API URL '{}' cannot be used as a base URL", base_url),
                hint: Some("Use an http(s) URL such as https://api.github.com".to_string()),
            });
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                Error::Config {
                    message: "authentication token contains invalid characters".to_string(),
                    hint: None,
                }
            })?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Network {
                url: base_url.to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self { base_url, client })
    }

    /// URL of one listing page.
    pub fn page_url(&self, organization: &str, page: u32, per_page: u32) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config {
                message: format!("API URL '{}' cannot be used as a base URL", self.base_url),
                hint: None,
            })?
            .pop_if_empty()
            .extend(["orgs", organization, "repos"]);
        url.query_pairs_mut()
            .append_pair("type", "all")
            .append_pair("per_page", &per_page.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }
}

impl RepositoryLister for GitHubClient {
    fn list_page(
        &self,
        organization: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RemoteRepository>> {
        let url = self.page_url(organization, page, per_page)?;
        debug!("GET {}", url);

        let network_error = |e: reqwest::Error| Error::Network {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(network_error)?;
        let status = response.status();
        let body = response.text().map_err(network_error)?;

        if !status.is_success() {
            return Err(Error::Api {
                url: url.to_string(),
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        parse_page(&body)
    }
}

/// Parse the JSON body of a listing page.
pub fn parse_page(body: &str) -> Result<Vec<RemoteRepository>> {
    Ok(serde_json::from_str(body)?)
}

/// Extract the `message` field GitHub puts in error bodies, falling back to
/// the raw body.
fn api_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ApiError {
        message: String,
    }

    match serde_json::from_str::<ApiError>(body) {
        Ok(err) => err.message,
        Err(_) => body.trim().to_string(),
    }
}
