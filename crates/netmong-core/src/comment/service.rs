//! Comment tree service
//!
//! Creation, edits, soft deletion and reply handling for post comments. Every
//! public operation runs inside one store transaction, so a failure part-way
//! through leaves nothing behind.

use super::model::{Comment, CommentView, NewComment};
use super::store::{CommentStore, CommentTransaction};
use super::validator::CommentValidator;
use super::view;
use crate::config::{AuthorizationPolicy, CommentConfig};
use crate::error::{Entity, NetmongError, Result};
use crate::post::{Member, MemberLookup, PostLookup};
use crate::types::{CommentId, PostId};
use std::sync::Arc;
use tracing::debug;

/// Service for threaded comments on posts
///
/// Concurrent edits of one comment are last-writer-wins: each call runs in
/// its own transaction and there is no version check between read and write.
pub struct CommentTreeService {
    store: Arc<dyn CommentStore>,
    posts: Arc<dyn PostLookup>,
    members: Arc<dyn MemberLookup>,
    validator: CommentValidator,
    policy: AuthorizationPolicy,
}

impl CommentTreeService {
    /// Create a service with the default comment configuration
    pub fn new(
        store: Arc<dyn CommentStore>,
        posts: Arc<dyn PostLookup>,
        members: Arc<dyn MemberLookup>,
    ) -> Self {
        Self::with_config(store, posts, members, &CommentConfig::default())
    }

    /// Create a service with explicit configuration
    pub fn with_config(
        store: Arc<dyn CommentStore>,
        posts: Arc<dyn PostLookup>,
        members: Arc<dyn MemberLookup>,
        config: &CommentConfig,
    ) -> Self {
        Self {
            store,
            posts,
            members,
            validator: CommentValidator::from_config(config),
            policy: config.authorization,
        }
    }

    /// Active authorization policy
    pub fn policy(&self) -> AuthorizationPolicy {
        self.policy
    }

    /// Add a top-level comment to a post
    pub fn add_comment(
        &self,
        post_id: PostId,
        author_username: &str,
        content: &str,
    ) -> Result<CommentView> {
        self.validator.validate_content(content)?;

        let mut tx = self.store.begin()?;
        if self.posts.find_post(post_id)?.is_none() {
            return Err(NetmongError::not_found(Entity::Post, post_id));
        }
        let member = self.find_member(author_username)?;

        let id = tx.insert(NewComment::root(post_id, member.username, content))?;
        let comment = tx.get(id)?;
        let view = view::assemble(&*tx, comment)?;
        tx.commit()?;

        debug!("Added comment {} to post {}", id, post_id);
        Ok(view)
    }

    /// Replace the content of a comment
    pub fn update_comment(&self, actor: &str, comment_id: CommentId, content: &str) -> Result<Comment> {
        let comment = self.edit(actor, comment_id, content)?;
        debug!("Updated comment {}", comment_id);
        Ok(comment)
    }

    /// Soft-delete a comment. Deleting an already deleted comment succeeds.
    pub fn delete_comment(&self, actor: &str, comment_id: CommentId) -> Result<()> {
        let mut tx = self.store.begin()?;
        let comment = tx.get(comment_id)?;
        self.authorize(actor, &comment, "delete")?;

        if comment.is_deleted() {
            debug!("Comment {} already deleted", comment_id);
            return Ok(());
        }

        tx.mark_deleted(comment_id)?;
        tx.commit()?;

        debug!("Deleted comment {}", comment_id);
        Ok(())
    }

    /// All root comments of a post, each with its full reply subtree
    pub fn get_comments_of_post(&self, post_id: PostId) -> Result<Vec<CommentView>> {
        let tx = self.store.begin()?;
        let roots = tx.roots_of_post(post_id)?;
        view::assemble_all(&*tx, roots)
    }

    /// Add a reply under an existing comment
    pub fn add_reply_to_comment(
        &self,
        parent_id: CommentId,
        author_username: &str,
        content: &str,
    ) -> Result<Comment> {
        self.validator.validate_content(content)?;

        let mut tx = self.store.begin()?;
        let parent = tx.get(parent_id).map_err(as_parent_error)?;
        let member = self.find_member(author_username)?;

        let id = tx.insert(NewComment::reply(&parent, member.username, content))?;
        let reply = tx.get(id)?;
        tx.commit()?;

        debug!("Added reply {} under comment {}", id, parent_id);
        Ok(reply)
    }

    /// Direct replies of a comment
    pub fn get_replies_of_comment(&self, parent_id: CommentId) -> Result<Vec<Comment>> {
        let tx = self.store.begin()?;
        tx.get(parent_id).map_err(as_parent_error)?;
        tx.children_of(parent_id)
    }

    /// Replace the content of a reply; works on any comment in the tree
    pub fn update_reply(&self, actor: &str, reply_id: CommentId, content: &str) -> Result<Comment> {
        let reply = self.edit(actor, reply_id, content)?;
        debug!("Updated reply {}", reply_id);
        Ok(reply)
    }

    fn edit(&self, actor: &str, id: CommentId, content: &str) -> Result<Comment> {
        self.validator.validate_content(content)?;

        let mut tx = self.store.begin()?;
        let mut comment = tx.get(id)?;
        self.authorize(actor, &comment, "edit")?;

        comment.set_content(content);
        tx.update(&comment)?;
        tx.commit()?;
        Ok(comment)
    }

    fn find_member(&self, username: &str) -> Result<Member> {
        self.members
            .find_member_by_username(username)?
            .ok_or_else(|| NetmongError::not_found(Entity::Member, username))
    }

    fn authorize(&self, actor: &str, comment: &Comment, action: &str) -> Result<()> {
        match self.policy {
            AuthorizationPolicy::Open => Ok(()),
            AuthorizationPolicy::AuthorOnly if comment.author_username() == actor => Ok(()),
            AuthorizationPolicy::AuthorOnly => Err(NetmongError::PermissionDenied(format!(
                "{} may not {} comment {} written by {}",
                actor,
                action,
                comment.id(),
                comment.author_username()
            ))),
        }
    }
}

fn as_parent_error(err: NetmongError) -> NetmongError {
    match err {
        NetmongError::NotFound {
            entity: Entity::Comment,
            id,
        } => NetmongError::NotFound {
            entity: Entity::ParentComment,
            id,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::store::memory::MemoryCommentStore;
    use crate::post::repository::memory::MemoryDirectory;
    use crate::post::{MemberRepository, NewPost, PostRepository};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct Fixture {
        service: CommentTreeService,
        store: Arc<MemoryCommentStore>,
        post_id: PostId,
    }

    fn fixture_with(config: CommentConfig) -> Fixture {
        let store = Arc::new(MemoryCommentStore::new());
        let directory = Arc::new(MemoryDirectory::new());
        directory.insert_member("alice").unwrap();
        directory.insert_member("bob").unwrap();
        let owner = directory.find_member_by_username("alice").unwrap().unwrap();
        let post = directory
            .insert_post(NewPost::new("walk", "park day", &owner))
            .unwrap();

        let service = CommentTreeService::with_config(
            store.clone(),
            directory.clone(),
            directory,
            &config,
        );
        Fixture {
            service,
            store,
            post_id: post.id,
        }
    }

    fn fixture() -> Fixture {
        fixture_with(CommentConfig::default())
    }

    fn is_not_found(err: &NetmongError, expected: Entity) -> bool {
        matches!(err, NetmongError::NotFound { entity, .. } if *entity == expected)
    }

    #[test]
    fn test_add_comment_creates_root() {
        let f = fixture();
        let view = f.service.add_comment(f.post_id, "alice", "hello").unwrap();

        assert_eq!(view.content, "hello");
        assert_eq!(view.parent_id, None);
        assert!(!view.is_deleted);
        assert!(view.children.is_empty());

        let comments = f.service.get_comments_of_post(f.post_id).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].id, view.id);
    }

    /// Post lookup that remembers whether the comment store was held during the call
    struct LockAwarePosts {
        store: Arc<MemoryCommentStore>,
        inner: Arc<MemoryDirectory>,
        held: AtomicBool,
    }

    impl PostLookup for LockAwarePosts {
        fn find_post(&self, id: PostId) -> Result<Option<crate::post::Post>> {
            self.held.store(self.store.is_locked(), Ordering::SeqCst);
            self.inner.find_post(id)
        }
    }

    #[test]
    fn test_add_comment_checks_post_inside_transaction() {
        let store = Arc::new(MemoryCommentStore::new());
        let directory = Arc::new(MemoryDirectory::new());
        let owner = directory.insert_member("alice").unwrap();
        let post = directory
            .insert_post(NewPost::new("walk", "park day", &owner))
            .unwrap();
        let posts = Arc::new(LockAwarePosts {
            store: store.clone(),
            inner: directory.clone(),
            held: AtomicBool::new(false),
        });
        let service = CommentTreeService::new(store.clone(), posts.clone(), directory);

        service.add_comment(post.id, "alice", "hello").unwrap();
        assert!(posts.held.load(Ordering::SeqCst));
        assert!(!store.is_locked());

        posts.held.store(false, Ordering::SeqCst);
        assert!(service.add_comment(PostId(99), "alice", "hello").is_err());
        assert!(posts.held.load(Ordering::SeqCst));
        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_add_comment_unknown_post() {
        let f = fixture();
        let err = f.service.add_comment(PostId(99), "alice", "hello").unwrap_err();
        assert!(is_not_found(&err, Entity::Post));
        assert_eq!(f.store.count(), 0);
    }

    #[test]
    fn test_add_comment_unknown_member() {
        let f = fixture();
        let err = f.service.add_comment(f.post_id, "mallory", "hello").unwrap_err();
        assert!(is_not_found(&err, Entity::Member));
        assert_eq!(f.store.count(), 0);
    }

    #[test]
    fn test_add_comment_rejects_blank_content() {
        let f = fixture();
        let err = f.service.add_comment(f.post_id, "alice", "   ").unwrap_err();
        assert!(matches!(err, NetmongError::Validation(_)));
    }

    #[test]
    fn test_scenario_reply_and_soft_delete() {
        let f = fixture();
        let c1 = f.service.add_comment(f.post_id, "alice", "hello").unwrap();
        let r1 = f
            .service
            .add_reply_to_comment(c1.id, "bob", "hi back")
            .unwrap();

        let replies = f.service.get_replies_of_comment(c1.id).unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].content(), "hi back");
        assert_eq!(replies[0].author_username(), "bob");

        let comments = f.service.get_comments_of_post(f.post_id).unwrap();
        assert_eq!(comments[0].children.len(), 1);
        assert_eq!(comments[0].children[0].id, r1.id());

        f.service.delete_comment("alice", c1.id).unwrap();
        let comments = f.service.get_comments_of_post(f.post_id).unwrap();
        assert_eq!(comments.len(), 1);
        assert!(comments[0].is_deleted);
        assert_eq!(comments[0].children.len(), 1);
        assert_eq!(comments[0].children[0].content, "hi back");
        assert!(!comments[0].children[0].is_deleted);
    }

    #[test]
    fn test_reply_stores_plain_username() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "hello").unwrap();
        let reply = f.service.add_reply_to_comment(root.id, "bob", "hi").unwrap();

        assert_eq!(reply.author_username(), "bob");
        assert_eq!(reply.post_id(), f.post_id);
        assert_eq!(reply.parent_id(), Some(root.id));
    }

    #[test]
    fn test_replies_in_creation_order() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "root").unwrap();
        for content in ["one", "two", "three"] {
            f.service.add_reply_to_comment(root.id, "bob", content).unwrap();
        }

        let replies = f.service.get_replies_of_comment(root.id).unwrap();
        let contents: Vec<_> = replies.iter().map(|r| r.content()).collect();
        assert_eq!(contents, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_reply_to_unknown_parent() {
        let f = fixture();
        let err = f
            .service
            .add_reply_to_comment(CommentId(42), "bob", "hi")
            .unwrap_err();
        assert!(is_not_found(&err, Entity::ParentComment));

        let err = f.service.get_replies_of_comment(CommentId(42)).unwrap_err();
        assert!(is_not_found(&err, Entity::ParentComment));
    }

    #[test]
    fn test_reply_by_unknown_member_persists_nothing() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "root").unwrap();

        let err = f
            .service
            .add_reply_to_comment(root.id, "mallory", "hi")
            .unwrap_err();
        assert!(is_not_found(&err, Entity::Member));
        assert_eq!(f.store.count(), 1);
        assert!(f.service.get_replies_of_comment(root.id).unwrap().is_empty());
    }

    #[test]
    fn test_reply_under_deleted_comment() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "root").unwrap();
        f.service.delete_comment("alice", root.id).unwrap();

        f.service.add_reply_to_comment(root.id, "bob", "late").unwrap();
        assert_eq!(f.service.get_replies_of_comment(root.id).unwrap().len(), 1);
    }

    #[test]
    fn test_update_comment() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "Original").unwrap();

        let updated = f.service.update_comment("alice", root.id, "Updated").unwrap();
        assert_eq!(updated.content(), "Updated");
        assert!(!updated.is_deleted());

        let comments = f.service.get_comments_of_post(f.post_id).unwrap();
        assert_eq!(comments[0].content, "Updated");
    }

    #[test]
    fn test_update_unknown_comment() {
        let f = fixture();
        f.service.add_comment(f.post_id, "alice", "keep").unwrap();

        let err = f
            .service
            .update_comment("alice", CommentId(77), "nope")
            .unwrap_err();
        assert!(is_not_found(&err, Entity::Comment));
        assert_eq!(f.service.get_comments_of_post(f.post_id).unwrap()[0].content, "keep");
    }

    #[test]
    fn test_update_keeps_deleted_flag() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "x").unwrap();
        f.service.delete_comment("alice", root.id).unwrap();

        let updated = f.service.update_comment("alice", root.id, "y").unwrap();
        assert!(updated.is_deleted());
        assert_eq!(updated.parent_id(), None);
    }

    #[test]
    fn test_update_reply_anywhere_in_tree() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "root").unwrap();
        let reply = f.service.add_reply_to_comment(root.id, "bob", "reply").unwrap();

        let updated = f.service.update_reply("bob", reply.id(), "edited").unwrap();
        assert_eq!(updated.content(), "edited");
        assert_eq!(updated.parent_id(), Some(root.id));

        // Not restricted to replies
        let updated_root = f.service.update_reply("alice", root.id, "root edited").unwrap();
        assert_eq!(updated_root.content(), "root edited");
    }

    #[test]
    fn test_delete_is_idempotent() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "x").unwrap();

        f.service.delete_comment("alice", root.id).unwrap();
        f.service.delete_comment("alice", root.id).unwrap();

        let err = f.service.delete_comment("alice", CommentId(5)).unwrap_err();
        assert!(is_not_found(&err, Entity::Comment));
    }

    #[test]
    fn test_author_only_policy() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "mine").unwrap();

        let err = f.service.update_comment("bob", root.id, "yours").unwrap_err();
        assert!(matches!(err, NetmongError::PermissionDenied(_)));
        let err = f.service.delete_comment("bob", root.id).unwrap_err();
        assert!(matches!(err, NetmongError::PermissionDenied(_)));

        let comments = f.service.get_comments_of_post(f.post_id).unwrap();
        assert_eq!(comments[0].content, "mine");
        assert!(!comments[0].is_deleted);
    }

    #[test]
    fn test_open_policy() {
        let f = fixture_with(CommentConfig {
            authorization: AuthorizationPolicy::Open,
            ..Default::default()
        });
        assert_eq!(f.service.policy(), AuthorizationPolicy::Open);

        let root = f.service.add_comment(f.post_id, "alice", "mine").unwrap();
        f.service.update_comment("bob", root.id, "edited by bob").unwrap();
        f.service.delete_comment("bob", root.id).unwrap();

        let comments = f.service.get_comments_of_post(f.post_id).unwrap();
        assert_eq!(comments[0].content, "edited by bob");
        assert!(comments[0].is_deleted);
    }

    #[test]
    fn test_view_node_count_matches_descendants() {
        let f = fixture();
        let root = f.service.add_comment(f.post_id, "alice", "0").unwrap();

        let mut parent = root.id;
        for depth in 1..=10 {
            parent = f
                .service
                .add_reply_to_comment(parent, "bob", &depth.to_string())
                .unwrap()
                .id();
        }
        f.service.add_reply_to_comment(root.id, "alice", "side").unwrap();

        let comments = f.service.get_comments_of_post(f.post_id).unwrap();
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].node_count(), 12);
        assert_eq!(comments[0].depth(), 11);
    }

    #[test]
    fn test_comments_of_unknown_post_is_empty() {
        let f = fixture();
        assert!(f.service.get_comments_of_post(PostId(404)).unwrap().is_empty());
    }
}
