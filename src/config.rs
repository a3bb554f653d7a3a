//! # Configuration
//!
//! Settings come from layered sources. Each source is parsed into a
//! [`ConfigLayer`] whose fields are all optional, and the layers are applied on
//! top of [`Config::default`] in increasing order of precedence:
//!
//! 1.  Built-in defaults (see [`crate::defaults`]).
//! 2.  The YAML configuration file (`repo-harvest.yaml`).
//! 3.  Environment variables and command-line flags (merged by the CLI).
//!
//! ## File Format
//!
//! ```yaml
//! organization: acme
//! pattern: "-service$"
//! api_url: https://api.github.com
//! lists_dir: lists
//! repos_dir: repos
//! archives_dir: archives
//! archive: true
//! compression_level: 9
//! ```
//!
//! The authentication token may also be set in the file (`token:`), although
//! the `GIT_AUTH_TOKEN` environment variable is the usual place for it.

use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::defaults;
use crate::error::{Error, Result};
use crate::partition::compile_pattern;

/// One source of settings. `None` leaves the value underneath unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigLayer {
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub lists_dir: Option<PathBuf>,
    #[serde(default)]
    pub repos_dir: Option<PathBuf>,
    #[serde(default)]
    pub archives_dir: Option<PathBuf>,
    #[serde(default)]
    pub archive: Option<bool>,
    #[serde(default)]
    pub compression_level: Option<u8>,
}

/// Resolved settings for a pipeline run.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// Organization whose repositories are listed.
    pub organization: Option<String>,
    /// Credential for the listing API.
    pub token: Option<String>,
    /// Regular expression selecting repository URLs.
    pub pattern: Option<String>,
    pub api_url: String,
    pub lists_dir: PathBuf,
    pub repos_dir: PathBuf,
    pub archives_dir: PathBuf,
    /// Whether `run` ends with the archive stage.
    pub archive: bool,
    pub compression_level: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization: None,
            token: None,
            pattern: None,
            api_url: defaults::API_URL.to_string(),
            lists_dir: defaults::lists_dir(),
            repos_dir: defaults::repos_dir(),
            archives_dir: defaults::archives_dir(),
            archive: true,
            compression_level: defaults::COMPRESSION_LEVEL,
        }
    }
}

// Hand-written so the token never ends up in debug logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("organization", &self.organization)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("pattern", &self.pattern)
            .field("api_url", &self.api_url)
            .field("lists_dir", &self.lists_dir)
            .field("repos_dir", &self.repos_dir)
            .field("archives_dir", &self.archives_dir)
            .field("archive", &self.archive)
            .field("compression_level", &self.compression_level)
            .finish()
    }
}

impl Config {
    /// Apply `layer` on top of the current values.
    pub fn apply(mut self, layer: ConfigLayer) -> Self {
        if layer.organization.is_some() {
            self.organization = layer.organization;
        }
        if layer.token.is_some() {
            self.token = layer.token;
        }
        if layer.pattern.is_some() {
            self.pattern = layer.pattern;
        }
        if let Some(api_url) = layer.api_url {
            self.api_url = api_url;
        }
        if let Some(dir) = layer.lists_dir {
            self.lists_dir = dir;
        }
        if let Some(dir) = layer.repos_dir {
            self.repos_dir = dir;
        }
        if let Some(dir) = layer.archives_dir {
            self.archives_dir = dir;
        }
        if let Some(archive) = layer.archive {
            self.archive = archive;
        }
        if let Some(level) = layer.compression_level {
            self.compression_level = level;
        }
        self
    }

    /// Check the settings every stage depends on.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api_url).map_err(|e| Error::Config {
            message: format!("invalid API URL '{}': {}", self.api_url, e),
            hint: Some("Use a full URL such as https://api.github.com".to_string()),
        })?;

        if self.compression_level > 9 {
            return Err(Error::Config {
                message: format!(
                    "compression level {} is out of range",
                    self.compression_level
                ),
                hint: Some("Use a level between 0 and 9".to_string()),
            });
        }

        Ok(())
    }

    /// The organization to list, required by the listing stage.
    pub fn require_organization(&self) -> Result<&str> {
        match self.organization.as_deref() {
            Some(org) if !org.trim().is_empty() => Ok(org),
            _ => Err(Error::Config {
                message: "no organization configured".to_string(),
                hint: Some(
                    "Set GIT_ORG, pass --org, or add 'organization:' to repo-harvest.yaml"
                        .to_string(),
                ),
            }),
        }
    }

    /// The compiled partition pattern, required by the filter stage.
    ///
    /// An empty pattern is accepted and selects every repository.
    pub fn compile_pattern(&self) -> Result<Regex> {
        match self.pattern.as_deref() {
            Some(pattern) => compile_pattern(pattern),
            None => Err(Error::Config {
                message: "no partition pattern configured".to_string(),
                hint: Some(
                    "Set REPO_FILTER_REGEX, pass --pattern, or add 'pattern:' to repo-harvest.yaml"
                        .to_string(),
                ),
            }),
        }
    }
}

/// Parse a YAML configuration document.
pub fn parse(yaml: &str) -> Result<ConfigLayer> {
    if yaml.trim().is_empty() {
        return Ok(ConfigLayer::default());
    }
    Ok(serde_yaml::from_str(yaml)?)
}

/// Read and parse a YAML configuration file.
pub fn from_file(path: &Path) -> Result<ConfigLayer> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert_eq!(config.lists_dir, PathBuf::from("lists"));
        assert_eq!(config.repos_dir, PathBuf::from("repos"));
        assert_eq!(config.archives_dir, PathBuf::from("archives"));
        assert!(config.archive);
        assert_eq!(config.compression_level, 9);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_file() {
        let layer = parse(
            r#"
organization: acme
pattern: "-service$"
api_url: https://ghe.example.com/api/v3
lists_dir: state/lists
repos_dir: /data/repos
archives_dir: /data/archives
archive: false
compression_level: 6
"#,
        )
        .unwrap();

        assert_eq!(layer.organization.as_deref(), Some("acme"));
        assert_eq!(layer.pattern.as_deref(), Some("-service$"));
        assert_eq!(layer.repos_dir, Some(PathBuf::from("/data/repos")));
        assert_eq!(layer.archive, Some(false));
        assert_eq!(layer.compression_level, Some(6));
        assert_eq!(layer.token, None);
    }

    #[test]
    fn test_parse_empty_file() {
        assert_eq!(parse("").unwrap(), ConfigLayer::default());
        assert_eq!(parse("  \n").unwrap(), ConfigLayer::default());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        let err = parse("organisation: acme").unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn test_later_layers_win() {
        let file = ConfigLayer {
            organization: Some("from-file".to_string()),
            pattern: Some("file".to_string()),
            archive: Some(false),
            ..Default::default()
        };
        let cli = ConfigLayer {
            organization: Some("from-cli".to_string()),
            ..Default::default()
        };

        let config = Config::default().apply(file).apply(cli);

        assert_eq!(config.organization.as_deref(), Some("from-cli"));
        assert_eq!(config.pattern.as_deref(), Some("file"));
        assert!(!config.archive);
        assert_eq!(config.repos_dir, PathBuf::from("repos"));
    }

    #[test]
    fn test_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("repo-harvest.yaml");
        fs::write(&path, "organization: acme\n").unwrap();
        let layer = from_file(&path).unwrap();
        assert_eq!(layer.organization.as_deref(), Some("acme"));

        assert!(matches!(
            from_file(&temp.path().join("missing.yaml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            api_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));

        let config = Config {
            compression_level: 10,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_require_organization() {
        assert!(Config::default().require_organization().is_err());

        let blank = Config {
            organization: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(blank.require_organization().is_err());

        let config = Config {
            organization: Some("acme".to_string()),
            ..Default::default()
        };
        assert_eq!(config.require_organization().unwrap(), "acme");
    }

    #[test]
    fn test_compile_pattern() {
        assert!(matches!(
            Config::default().compile_pattern(),
            Err(Error::Config { .. })
        ));

        let invalid = Config {
            pattern: Some("([".to_string()),
            ..Default::default()
        };
        assert!(matches!(invalid.compile_pattern(), Err(Error::Regex(_))));

        let empty = Config {
            pattern: Some(String::new()),
            ..Default::default()
        };
        assert!(empty.compile_pattern().unwrap().is_match("anything"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = Config {
            token: Some("ghp_secret".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
