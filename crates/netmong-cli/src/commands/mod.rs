//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod comment;
pub mod config;
pub mod member;
pub mod post;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use netmong_core::comment::CommentTreeService;
use netmong_core::config::Config;
use netmong_core::post::{LikeService, PostService, ReportService};
use netmong_storage::Store;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// netmong - posts and threaded comments from the terminal
#[derive(Debug, Parser)]
#[command(name = "netmong")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Data file holding posts and comments
    #[arg(long, global = true, env = "NETMONG_DATA")]
    pub data: Option<PathBuf>,

    /// Member to act as
    #[arg(long = "as", global = true, env = "NETMONG_USER", value_name = "USERNAME")]
    pub actor: Option<String>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage members
    #[command(subcommand)]
    Member(member::MemberCommand),

    /// Publish, browse and react to posts
    #[command(subcommand)]
    Post(post::PostCommand),

    /// Comment on posts and reply to comments
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    setup_logging(cli.verbose);

    // Handle color output
    if cli.no_color {
        colored::control::set_override(false);
    }

    let config_path = cli.config.clone().unwrap_or_else(config::default_config_path);

    match cli.command {
        Commands::Config(cmd) => config::execute(cmd, &config_path, cli.json),
        Commands::Member(cmd) => {
            let app = App::open(&config_path, cli.data, cli.actor, cli.json)?;
            member::execute(cmd, &app)
        }
        Commands::Post(cmd) => {
            let app = App::open(&config_path, cli.data, cli.actor, cli.json)?;
            post::execute(cmd, &app)
        }
        Commands::Comment(cmd) => {
            let app = App::open(&config_path, cli.data, cli.actor, cli.json)?;
            comment::execute(cmd, &app)
        }
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Opened store and settings shared by the data commands
pub struct App {
    pub config: Config,
    pub store: Arc<Store>,
    pub json: bool,
    actor: Option<String>,
}

impl App {
    fn open(
        config_path: &std::path::Path,
        data: Option<PathBuf>,
        actor: Option<String>,
        json: bool,
    ) -> Result<Self> {
        let config = Config::load(config_path)
            .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

        let data_file = data
            .or_else(|| config.storage.data_file.clone())
            .unwrap_or_else(netmong_storage::default_data_file);
        debug!("Using data file {:?}", data_file);
        let store = Store::open(&data_file)
            .with_context(|| format!("Failed to open data file {}", data_file.display()))?;

        Ok(Self {
            config,
            store: Arc::new(store),
            json,
            actor,
        })
    }

    /// Username given with --as
    pub fn actor(&self) -> Result<&str> {
        self.actor
            .as_deref()
            .context("No acting member; pass --as <USERNAME> or set NETMONG_USER")
    }

    pub fn comments(&self) -> CommentTreeService {
        CommentTreeService::with_config(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            &self.config.comment,
        )
    }

    pub fn posts(&self) -> PostService {
        PostService::new(
            self.store.clone(),
            self.store.clone(),
            self.store.clone(),
            self.config.post.clone(),
        )
    }

    pub fn likes(&self) -> LikeService {
        LikeService::new(self.store.clone(), self.store.clone(), self.store.clone())
    }

    pub fn reports(&self) -> ReportService {
        ReportService::new(self.store.clone(), self.store.clone(), self.store.clone())
    }

    /// Print a value as pretty JSON
    pub fn print_json<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_help_text() {
        let cmd = Cli::command();
        assert!(cmd.get_about().is_some());
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "netmong", "comment", "add", "1", "hello", "--as", "alice", "--json",
        ])
        .unwrap();
        assert_eq!(cli.actor.as_deref(), Some("alice"));
        assert!(cli.json);
    }
}
