//! Comment command
//!
//! Comment on posts, reply to comments and read threads.

use super::App;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use netmong_core::comment::{Comment, CommentView};
use netmong_core::types::{CommentId, PostId};

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Comment on a post
    Add {
        /// Post ID
        post_id: PostId,
        content: String,
    },

    /// Show every comment thread of a post
    List {
        /// Post ID
        post_id: PostId,
    },

    /// Edit a comment
    Update {
        /// Comment ID
        id: CommentId,
        content: String,
    },

    /// Delete a comment; its replies stay visible
    Delete {
        /// Comment ID
        id: CommentId,
    },

    /// Reply to a comment
    Reply {
        /// ID of the comment being answered
        parent_id: CommentId,
        content: String,
    },

    /// List the direct replies of a comment
    Replies {
        /// Comment ID
        parent_id: CommentId,
    },

    /// Edit a reply
    UpdateReply {
        /// Reply ID
        id: CommentId,
        content: String,
    },
}

/// Execute the comment command
pub fn execute(cmd: CommentCommand, app: &App) -> Result<()> {
    match cmd {
        CommentCommand::Add { post_id, content } => add_comment(app, post_id, &content),
        CommentCommand::List { post_id } => list_comments(app, post_id),
        CommentCommand::Update { id, content } => update_comment(app, id, &content, false),
        CommentCommand::Delete { id } => delete_comment(app, id),
        CommentCommand::Reply { parent_id, content } => add_reply(app, parent_id, &content),
        CommentCommand::Replies { parent_id } => list_replies(app, parent_id),
        CommentCommand::UpdateReply { id, content } => update_comment(app, id, &content, true),
    }
}

fn add_comment(app: &App, post_id: PostId, content: &str) -> Result<()> {
    let actor = app.actor()?;
    let view = app
        .comments()
        .add_comment(post_id, actor, content)
        .with_context(|| format!("Failed to comment on post #{}", post_id))?;

    if app.json {
        return app.print_json(&view);
    }

    println!("{} Added comment #{} to post #{}", "✓".green(), view.id, post_id);
    Ok(())
}

fn list_comments(app: &App, post_id: PostId) -> Result<()> {
    let threads = app.comments().get_comments_of_post(post_id)?;

    if app.json {
        return app.print_json(&threads);
    }

    if threads.is_empty() {
        println!("No comments on post #{}.", post_id);
        return Ok(());
    }

    println!("{}", format!("Comments on post #{}", post_id).bold().underline());
    for thread in &threads {
        print_thread(thread);
    }
    Ok(())
}

/// Print a comment tree, one indented line per comment
fn print_thread(root: &CommentView) {
    let mut stack = vec![(root, 1usize)];
    while let Some((view, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        let id = format!("#{}", view.id).dimmed();
        if view.is_deleted {
            println!("{}{} {}", indent, id, "[deleted]".dimmed().italic());
        } else {
            println!(
                "{}{} {}: {}",
                indent,
                id,
                view.author_username.green(),
                view.content
            );
        }
        for child in view.children.iter().rev() {
            stack.push((child, depth + 1));
        }
    }
}

fn update_comment(app: &App, id: CommentId, content: &str, reply: bool) -> Result<()> {
    let actor = app.actor()?;
    let service = app.comments();
    let comment = if reply {
        service.update_reply(actor, id, content)
    } else {
        service.update_comment(actor, id, content)
    }
    .with_context(|| format!("Failed to update comment #{}", id))?;

    if app.json {
        return app.print_json(&comment);
    }

    println!("{} Updated comment #{}", "✓".green(), comment.id());
    Ok(())
}

fn delete_comment(app: &App, id: CommentId) -> Result<()> {
    let actor = app.actor()?;
    app.comments()
        .delete_comment(actor, id)
        .with_context(|| format!("Failed to delete comment #{}", id))?;

    println!("{} Comment #{} deleted.", "✓".green(), id);
    Ok(())
}

fn add_reply(app: &App, parent_id: CommentId, content: &str) -> Result<()> {
    let actor = app.actor()?;
    let reply = app
        .comments()
        .add_reply_to_comment(parent_id, actor, content)
        .with_context(|| format!("Failed to reply to comment #{}", parent_id))?;

    if app.json {
        return app.print_json(&reply);
    }

    println!(
        "{} Added reply #{} to comment #{}",
        "✓".green(),
        reply.id(),
        parent_id
    );
    Ok(())
}

fn list_replies(app: &App, parent_id: CommentId) -> Result<()> {
    let replies: Vec<Comment> = app.comments().get_replies_of_comment(parent_id)?;

    if app.json {
        return app.print_json(&replies);
    }

    if replies.is_empty() {
        println!("No replies to comment #{}.", parent_id);
        return Ok(());
    }

    for reply in &replies {
        let id = format!("#{}", reply.id()).dimmed();
        if reply.is_deleted() {
            println!("  {} {}", id, "[deleted]".dimmed().italic());
        } else {
            println!(
                "  {} {}: {}",
                id,
                reply.author_username().green(),
                reply.content()
            );
        }
    }
    Ok(())
}
