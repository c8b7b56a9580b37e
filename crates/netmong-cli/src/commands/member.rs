//! Member command
//!
//! Register members.

use super::App;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use netmong_core::post::MemberRepository;

/// Member subcommands
#[derive(Debug, Subcommand)]
pub enum MemberCommand {
    /// Register a new member
    Add {
        /// Unique username
        username: String,
    },
}

/// Execute the member command
pub fn execute(cmd: MemberCommand, app: &App) -> Result<()> {
    match cmd {
        MemberCommand::Add { username } => add_member(app, &username),
    }
}

fn add_member(app: &App, username: &str) -> Result<()> {
    let member = app
        .store
        .insert_member(username)
        .with_context(|| format!("Failed to register '{}'", username))?;

    if app.json {
        return app.print_json(&member);
    }

    println!(
        "{} Registered member {} (#{})",
        "✓".green(),
        member.username.green(),
        member.id
    );
    Ok(())
}
