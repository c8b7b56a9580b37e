//! Post command
//!
//! Publish, browse, edit and react to posts.

use super::App;
use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use netmong_core::post::{Post, PostRequest};
use netmong_core::types::{Page, PostId};

/// Post subcommands
#[derive(Debug, Subcommand)]
pub enum PostCommand {
    /// Publish a new post
    Upload {
        title: String,
        content: String,

        /// File name of an attached image
        #[arg(long)]
        image: Option<String>,
    },

    /// Show a post with its like count
    Show {
        /// Post ID
        id: PostId,
    },

    /// List posts, newest first
    List {
        /// Page number, starting at 1
        #[arg(long, short, default_value = "1")]
        page: usize,

        /// Only posts written by this member
        #[arg(long)]
        member: Option<String>,
    },

    /// Search posts by writer or content
    Search {
        /// Category: writer or content
        category: String,

        /// Word to look for
        word: String,

        /// Page number, starting at 1
        #[arg(long, short, default_value = "1")]
        page: usize,
    },

    /// Edit one of your posts
    Update {
        /// Post ID
        id: PostId,
        title: String,
        content: String,

        /// File name of a replacement image
        #[arg(long)]
        image: Option<String>,
    },

    /// Delete one of your posts
    Delete {
        /// Post ID
        id: PostId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Like a post
    Like {
        /// Post ID
        id: PostId,
    },

    /// Withdraw a like
    Unlike {
        /// Post ID
        id: PostId,
    },

    /// Report a post
    Report {
        /// Post ID
        id: PostId,

        /// Why the post is reported
        #[arg(long)]
        reason: Option<String>,
    },
}

/// Execute the post command
pub fn execute(cmd: PostCommand, app: &App) -> Result<()> {
    match cmd {
        PostCommand::Upload {
            title,
            content,
            image,
        } => upload_post(app, request(title, content, image)),
        PostCommand::Show { id } => show_post(app, id),
        PostCommand::List { page, member } => list_posts(app, page, member.as_deref()),
        PostCommand::Search {
            category,
            word,
            page,
        } => search_posts(app, &category, &word, page),
        PostCommand::Update {
            id,
            title,
            content,
            image,
        } => update_post(app, id, request(title, content, image)),
        PostCommand::Delete { id, yes } => delete_post(app, id, yes),
        PostCommand::Like { id } => like_post(app, id, true),
        PostCommand::Unlike { id } => like_post(app, id, false),
        PostCommand::Report { id, reason } => report_post(app, id, reason.as_deref()),
    }
}

fn request(title: String, content: String, image: Option<String>) -> PostRequest {
    let request = PostRequest::new(title, content);
    match image {
        Some(name) => request.with_image(name),
        None => request,
    }
}

fn upload_post(app: &App, request: PostRequest) -> Result<()> {
    let actor = app.actor()?;
    let post = app
        .posts()
        .upload_post(actor, request)
        .context("Failed to upload post")?;

    if app.json {
        return app.print_json(&post);
    }

    println!("{} Published post #{}", "✓".green(), post.id);
    Ok(())
}

fn show_post(app: &App, id: PostId) -> Result<()> {
    let viewer = app.actor().ok();
    let detail = app
        .posts()
        .get_detail(id, viewer)
        .with_context(|| format!("Post #{} not found", id))?;

    if app.json {
        return app.print_json(&detail);
    }

    let post = &detail.post;
    println!("{}", post.title.bold().underline());
    println!(
        "  #{} by {} on {}",
        post.id,
        post.writer.green(),
        post.created_at
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    );
    println!();
    println!("  {}", post.content);
    if let Some(url) = &post.image_url {
        println!("  {}", url.cyan());
    }
    println!();

    let likes = format!("♥ {}", detail.like_count);
    if detail.is_liked {
        println!("  {} (you like this)", likes.red());
    } else {
        println!("  {}", likes);
    }
    Ok(())
}

fn list_posts(app: &App, page: usize, member: Option<&str>) -> Result<()> {
    let posts = app.posts();
    let request = posts.page(page);
    let page = match member {
        Some(username) => posts.view_member_posts(username, request)?,
        None => posts.view_posts(request)?,
    };
    print_page(app, &page)
}

fn search_posts(app: &App, category: &str, word: &str, page: usize) -> Result<()> {
    let posts = app.posts();
    let page = posts.search_posts(category, word, posts.page(page))?;
    print_page(app, &page)
}

fn print_page(app: &App, page: &Page<Post>) -> Result<()> {
    if app.json {
        return app.print_json(page);
    }

    if page.is_empty() {
        println!("No posts found.");
        return Ok(());
    }

    for post in &page.items {
        println!(
            "  {} {} {}",
            format!("#{}", post.id).dimmed(),
            post.title.bold(),
            format!("by {}", post.writer).green()
        );
    }
    println!(
        "\n  Page {} of {} ({} posts)",
        page.page + 1,
        page.total_pages().max(1),
        page.total
    );
    Ok(())
}

fn update_post(app: &App, id: PostId, request: PostRequest) -> Result<()> {
    let actor = app.actor()?;
    let post = app
        .posts()
        .update_post(actor, id, request)
        .with_context(|| format!("Failed to update post #{}", id))?;

    if app.json {
        return app.print_json(&post);
    }

    println!("{} Updated post #{}", "✓".green(), post.id);
    Ok(())
}

fn delete_post(app: &App, id: PostId, yes: bool) -> Result<()> {
    let actor = app.actor()?;
    let posts = app.posts();
    let detail = posts
        .get_detail(id, Some(actor))
        .with_context(|| format!("Post #{} not found", id))?;

    if !yes {
        use dialoguer::Confirm;

        println!("Post: {}", detail.post.title.green());
        println!("  {} likes", detail.like_count);

        let confirmed = Confirm::new()
            .with_prompt("Delete this post?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    posts
        .delete_post(actor, id)
        .with_context(|| format!("Failed to delete post #{}", id))?;
    println!("{} Post #{} deleted.", "✓".green(), id);
    Ok(())
}

fn like_post(app: &App, id: PostId, like: bool) -> Result<()> {
    let actor = app.actor()?;
    let likes = app.likes();
    let count = if like {
        likes.add_like(id, actor)
    } else {
        likes.remove_like(id, actor)
    }
    .with_context(|| format!("Failed to update like on post #{}", id))?;

    if app.json {
        return app.print_json(&serde_json::json!({ "post_id": id, "like_count": count }));
    }

    println!("{} Post #{} has {} likes", "✓".green(), id, count);
    Ok(())
}

fn report_post(app: &App, id: PostId, reason: Option<&str>) -> Result<()> {
    let actor = app.actor()?;
    app.reports()
        .report_post(id, actor, reason)
        .with_context(|| format!("Failed to report post #{}", id))?;

    println!("{} Reported post #{}", "✓".green(), id);
    Ok(())
}
