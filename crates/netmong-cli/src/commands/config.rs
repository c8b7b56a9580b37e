//! Config command
//!
//! Show and create the netmong configuration file.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use netmong_core::config::Config;
use std::fs;
use std::path::{Path, PathBuf};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_path: &Path, as_json: bool) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(config_path, as_json),
        ConfigCommand::Init { force } => init_config(config_path, force),
    }
}

/// Project-local configuration file
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".netmong/config.toml")
}

fn show_config(config_path: &Path, as_json: bool) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path.display()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if config_path.exists() {
        println!("{}", config_path.display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no configuration file)".dimmed());
    }
    println!();
    println!("{}", config.to_toml_string()?);

    Ok(())
}

fn init_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        eprintln!(
            "{} Configuration already exists at {}. Use {} to overwrite.",
            "⚠".yellow(),
            config_path.display(),
            "--force".cyan()
        );
        return Ok(());
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = format!("# netmong configuration\n\n{}", Config::default().to_toml_string()?);
    fs::write(config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!(
        "{} Created configuration at {}",
        "✓".green(),
        config_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_loadable_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        init_config(&path, false).unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.post.page_size, 5);
    }

    #[test]
    fn test_init_keeps_existing_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[post]\npage_size = 9\n").unwrap();

        init_config(&path, false).unwrap();
        assert_eq!(Config::load(&path).unwrap().post.page_size, 9);

        init_config(&path, true).unwrap();
        assert_eq!(Config::load(&path).unwrap().post.page_size, 5);
    }
}
