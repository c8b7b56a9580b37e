//! Post, member, like and report models

use crate::types::{MemberId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn new(id: MemberId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            created_at: Utc::now(),
        }
    }
}

/// A published post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    /// Username of the member who wrote the post
    pub writer: String,
    pub member_id: MemberId,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Check whether `username` wrote this post
    pub fn is_written_by(&self, username: &str) -> bool {
        self.writer == username
    }

    /// Replace the editable fields and refresh updated_at
    pub fn update(&mut self, title: impl Into<String>, content: impl Into<String>, image_url: Option<String>) {
        self.title = title.into();
        self.content = content.into();
        if image_url.is_some() {
            self.image_url = image_url;
        }
        self.updated_at = Utc::now();
    }
}

/// A post that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub writer: String,
    pub member_id: MemberId,
    pub image_url: Option<String>,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, writer: &Member) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            writer: writer.username.clone(),
            member_id: writer.id,
            image_url: None,
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Turn into a stored post under the id the store assigned
    pub fn assign(self, id: PostId) -> Post {
        let now = Utc::now();
        Post {
            id,
            title: self.title,
            writer: self.writer,
            member_id: self.member_id,
            content: self.content,
            image_url: self.image_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller input for creating or editing a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub content: String,
    /// Original file name of an attached image
    #[serde(default)]
    pub image_name: Option<String>,
}

impl PostRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            image_name: None,
        }
    }

    pub fn with_image(mut self, image_name: impl Into<String>) -> Self {
        self.image_name = Some(image_name.into());
        self
    }
}

/// A post as shown on its detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub like_count: usize,
    /// Whether the viewing member liked the post
    pub is_liked: bool,
}

/// A member's like on a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub post_id: PostId,
    pub member_id: MemberId,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn new(post_id: PostId, member_id: MemberId) -> Self {
        Self {
            post_id,
            member_id,
            created_at: Utc::now(),
        }
    }
}

/// A member's report against a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub post_id: PostId,
    pub reporter_id: MemberId,
    #[serde(default)]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(post_id: PostId, reporter_id: MemberId, reason: Option<String>) -> Self {
        Self {
            post_id,
            reporter_id,
            reason,
            created_at: Utc::now(),
        }
    }
}
