//! Comment data models

use crate::types::{CommentId, PostId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on a post, either at the top level or as a reply to another comment.
///
/// Placement (`post_id`, `parent_id`) and authorship are fixed when the comment is
/// created and have no setters; only the content and the deletion flag change
/// afterwards. A stored comment can therefore never be re-parented into a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    id: CommentId,
    post_id: PostId,
    #[serde(default)]
    parent_id: Option<CommentId>,
    author_username: String,
    content: String,
    #[serde(default)]
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn id(&self) -> CommentId {
        self.id
    }

    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Parent comment, `None` for a root comment
    pub fn parent_id(&self) -> Option<CommentId> {
        self.parent_id
    }

    pub fn author_username(&self) -> &str {
        &self.author_username
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replace the content and refresh updated_at
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.updated_at = Utc::now();
    }

    /// Flag the comment as deleted. Returns false if it already was.
    pub fn mark_deleted(&mut self) -> bool {
        if self.is_deleted {
            return false;
        }
        self.is_deleted = true;
        self.updated_at = Utc::now();
        true
    }

    /// Copy the mutable fields of `other` onto this comment
    pub(crate) fn absorb_changes(&mut self, other: &Comment) {
        self.content.clone_from(&other.content);
        self.is_deleted = other.is_deleted;
        self.updated_at = other.updated_at;
    }
}

/// A comment that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub post_id: PostId,
    pub parent_id: Option<CommentId>,
    pub author_username: String,
    pub content: String,
}

impl NewComment {
    /// A top-level comment on a post
    pub fn root(post_id: PostId, author_username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            post_id,
            parent_id: None,
            author_username: author_username.into(),
            content: content.into(),
        }
    }

    /// A reply placed under `parent`, on the parent's post
    pub fn reply(parent: &Comment, author_username: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            post_id: parent.post_id,
            parent_id: Some(parent.id),
            author_username: author_username.into(),
            content: content.into(),
        }
    }

    /// Turn into a stored comment under the id the store assigned
    pub fn assign(self, id: CommentId) -> Comment {
        let now = Utc::now();
        Comment {
            id,
            post_id: self.post_id,
            parent_id: self.parent_id,
            author_username: self.author_username,
            content: self.content,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A comment together with its whole reply subtree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentView {
    pub id: CommentId,
    pub content: String,
    pub is_deleted: bool,
    pub author_username: String,
    pub parent_id: Option<CommentId>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub children: Vec<CommentView>,
}

impl CommentView {
    /// View of a single comment without children
    pub fn leaf(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            is_deleted: comment.is_deleted,
            author_username: comment.author_username.clone(),
            parent_id: comment.parent_id,
            created_at: comment.created_at,
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(view) = stack.pop() {
            count += 1;
            stack.extend(view.children.iter());
        }
        count
    }

    /// Depth of the subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((view, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(view.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Find a node anywhere in this subtree
    pub fn find(&self, id: CommentId) -> Option<&CommentView> {
        let mut stack = vec![self];
        while let Some(view) = stack.pop() {
            if view.id == id {
                return Some(view);
            }
            stack.extend(view.children.iter());
        }
        None
    }
}
