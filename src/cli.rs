//! CLI argument parsing and command dispatch

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use repo_harvest::config::{self, Config, ConfigLayer};
use repo_harvest::defaults;
use repo_harvest::output::OutputConfig;

use crate::commands;

/// Repo Harvest - Clone and archive the repositories of a GitHub organization
#[derive(Parser, Debug)]
#[command(name = "repo-harvest")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    settings: SettingsArgs,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

/// Settings shared by every stage; flags override the config file.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Path to config file (defaults to ./repo-harvest.yaml when present)
    #[arg(long, global = true, value_name = "PATH", env = "REPO_HARVEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// GitHub organization to enumerate
    #[arg(long, global = true, value_name = "NAME", env = "GIT_ORG")]
    pub org: Option<String>,

    /// Token used to authenticate against the GitHub API
    #[arg(
        long,
        global = true,
        value_name = "TOKEN",
        env = "GIT_AUTH_TOKEN",
        hide_env_values = true
    )]
    pub token: Option<String>,

    /// Regular expression selecting repository URLs to clone
    #[arg(long, global = true, value_name = "REGEX", env = "REPO_FILTER_REGEX")]
    pub pattern: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long, global = true, value_name = "URL", env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Directory holding the checkpoint lists
    #[arg(long, global = true, value_name = "PATH")]
    pub lists_dir: Option<PathBuf>,

    /// Directory receiving the clones
    #[arg(long, global = true, value_name = "PATH")]
    pub repos_dir: Option<PathBuf>,

    /// Directory receiving the archives
    #[arg(long, global = true, value_name = "PATH")]
    pub archives_dir: Option<PathBuf>,
}

impl SettingsArgs {
    /// Resolve defaults, the config file and these flags into a `Config`.
    pub fn load(&self) -> Result<Config> {
        let file_layer = match &self.config {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Configuration file not found: {}", path.display());
                }
                load_file(path)?
            }
            None => {
                let default_path = Path::new(defaults::CONFIG_FILE);
                if default_path.exists() {
                    load_file(default_path)?
                } else {
                    ConfigLayer::default()
                }
            }
        };

        let cli_layer = ConfigLayer {
            organization: self.org.clone(),
            token: self.token.clone(),
            pattern: self.pattern.clone(),
            api_url: self.api_url.clone(),
            lists_dir: self.lists_dir.clone(),
            repos_dir: self.repos_dir.clone(),
            archives_dir: self.archives_dir.clone(),
            archive: None,
            compression_level: None,
        };

        let config = Config::default().apply(file_layer).apply(cli_layer);
        config.validate()?;
        log::debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }
}

fn load_file(path: &Path) -> Result<ConfigLayer> {
    config::from_file(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run every stage: list, filter, clone and (unless disabled) archive
    Run(commands::run::RunArgs),

    /// List the organization's repositories into the full checkpoint
    List(commands::list::ListArgs),

    /// Split the full checkpoint into selected and leftover lists
    Filter(commands::filter::FilterArgs),

    /// Clone every repository in the selected checkpoint
    Clone(commands::clone::CloneArgs),

    /// Zip every cloned repository
    Archive(commands::archive::ArchiveArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);
        let output = OutputConfig::from_env_and_flag(&self.color);

        match self.command {
            Commands::Run(args) => commands::run::execute(args, &self.settings, &output),
            Commands::List(args) => commands::list::execute(args, &self.settings, &output),
            Commands::Filter(args) => commands::filter::execute(args, &self.settings, &output),
            Commands::Clone(args) => commands::clone::execute(args, &self.settings, &output),
            Commands::Archive(args) => commands::archive::execute(args, &self.settings, &output),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Log to stderr at `level` unless `RUST_LOG` says otherwise.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // A logger may already be installed when running under a test harness
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
