//! Comment storage trait and abstractions

use super::model::{Comment, NewComment};
use super::table::CommentTable;
use crate::error::{Entity, NetmongError, Result};
use crate::types::{CommentId, PostId};
use std::ops::DerefMut;

/// Trait for comment storage implementations.
///
/// Every read and write goes through a transaction. A transaction that is dropped
/// without [`CommentTransaction::commit`] leaves the store exactly as it found it.
pub trait CommentStore: Send + Sync {
    /// Open an exclusive transaction
    fn begin(&self) -> Result<Box<dyn CommentTransaction + '_>>;
}

/// Operations available inside a comment transaction
pub trait CommentTransaction {
    /// Store a new comment and return its assigned id
    fn insert(&mut self, comment: NewComment) -> Result<CommentId>;

    /// Load a comment by ID
    fn get(&self, id: CommentId) -> Result<Comment>;

    /// Top-level comments of a post, in creation order
    fn roots_of_post(&self, post_id: PostId) -> Result<Vec<Comment>>;

    /// Direct replies of a comment, in creation order
    fn children_of(&self, parent_id: CommentId) -> Result<Vec<Comment>>;

    /// Persist the mutable fields of an existing comment
    fn update(&mut self, comment: &Comment) -> Result<()>;

    /// Soft-delete a comment
    fn mark_deleted(&mut self, id: CommentId) -> Result<()> {
        let mut comment = self.get(id)?;
        comment.mark_deleted();
        self.update(&comment)
    }

    /// Make every staged write visible
    fn commit(self: Box<Self>) -> Result<()>;
}

/// Copy-on-write transaction over a locked [`CommentTable`].
///
/// Reads see the base table until the first write, which clones it; commit swaps
/// the clone in. Stores wrap this with their own locking and persistence.
pub struct StagedTable<G> {
    base: G,
    staged: Option<CommentTable>,
}

impl<G> StagedTable<G>
where
    G: DerefMut<Target = CommentTable>,
{
    /// Start staging on top of a locked table
    pub fn new(base: G) -> Self {
        Self { base, staged: None }
    }

    /// The table as this transaction sees it
    pub fn current(&self) -> &CommentTable {
        self.staged.as_ref().unwrap_or(&*self.base)
    }

    fn staged_mut(&mut self) -> &mut CommentTable {
        let base: &CommentTable = &self.base;
        self.staged.get_or_insert_with(|| base.clone())
    }

    /// Hand the staged table to `persist`, then make it the base table.
    ///
    /// If `persist` fails the base table is left untouched.
    pub fn commit_with(mut self, persist: impl FnOnce(&CommentTable) -> Result<()>) -> Result<()> {
        if let Some(staged) = self.staged.take() {
            persist(&staged)?;
            *self.base = staged;
        }
        Ok(())
    }
}

impl<G> CommentTransaction for StagedTable<G>
where
    G: DerefMut<Target = CommentTable>,
{
    fn insert(&mut self, comment: NewComment) -> Result<CommentId> {
        self.staged_mut().insert(comment)
    }

    fn get(&self, id: CommentId) -> Result<Comment> {
        self.current()
            .get(id)
            .cloned()
            .ok_or_else(|| NetmongError::not_found(Entity::Comment, id))
    }

    fn roots_of_post(&self, post_id: PostId) -> Result<Vec<Comment>> {
        Ok(self
            .current()
            .roots_of_post(post_id)
            .into_iter()
            .cloned()
            .collect())
    }

    fn children_of(&self, parent_id: CommentId) -> Result<Vec<Comment>> {
        Ok(self
            .current()
            .children_of(parent_id)
            .into_iter()
            .cloned()
            .collect())
    }

    fn update(&mut self, comment: &Comment) -> Result<()> {
        if self.current().get(comment.id()).is_none() {
            return Err(NetmongError::not_found(Entity::Comment, comment.id()));
        }
        self.staged_mut().update(comment)
    }

    fn mark_deleted(&mut self, id: CommentId) -> Result<()> {
        if self.current().get(id).is_none() {
            return Err(NetmongError::not_found(Entity::Comment, id));
        }
        self.staged_mut().mark_deleted(id)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        (*self).commit_with(|_| Ok(()))
    }
}

/// In-memory storage for testing
#[cfg(test)]
pub mod memory {
    use super::*;
    use std::sync::Mutex;

    /// In-memory comment storage for testing
    #[derive(Default)]
    pub struct MemoryCommentStore {
        table: Mutex<CommentTable>,
    }

    impl MemoryCommentStore {
        /// Create a new in-memory storage
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored comments, outside of any transaction
        pub fn count(&self) -> usize {
            self.table.lock().unwrap().count()
        }

        /// Whether a transaction currently holds the table
        pub fn is_locked(&self) -> bool {
            self.table.try_lock().is_err()
        }
    }

    impl CommentStore for MemoryCommentStore {
        fn begin(&self) -> Result<Box<dyn CommentTransaction + '_>> {
            let guard = self.table.lock().unwrap();
            Ok(Box::new(StagedTable::new(guard)))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_commit_makes_writes_visible() {
            let store = MemoryCommentStore::new();

            let mut tx = store.begin().unwrap();
            let id = tx.insert(NewComment::root(PostId(1), "alice", "hello")).unwrap();
            tx.commit().unwrap();

            let tx = store.begin().unwrap();
            assert_eq!(tx.get(id).unwrap().content(), "hello");
        }

        #[test]
        fn test_drop_rolls_back() {
            let store = MemoryCommentStore::new();

            {
                let mut tx = store.begin().unwrap();
                tx.insert(NewComment::root(PostId(1), "alice", "hello")).unwrap();
                assert_eq!(tx.roots_of_post(PostId(1)).unwrap().len(), 1);
            }

            assert_eq!(store.count(), 0);
        }

        #[test]
        fn test_staged_reads_see_own_writes() {
            let store = MemoryCommentStore::new();
            let mut tx = store.begin().unwrap();
            let root = tx.insert(NewComment::root(PostId(1), "alice", "root")).unwrap();
            let parent = tx.get(root).unwrap();
            tx.insert(NewComment::reply(&parent, "bob", "reply")).unwrap();

            let children = tx.children_of(root).unwrap();
            assert_eq!(children.len(), 1);
            assert_eq!(children[0].author_username(), "bob");
        }

        #[test]
        fn test_update_unknown_leaves_table_clean() {
            let store = MemoryCommentStore::new();
            let ghost = NewComment::root(PostId(1), "a", "ghost").assign(CommentId(3));

            let mut tx = store.begin().unwrap();
            assert!(tx.update(&ghost).is_err());
            assert!(tx.mark_deleted(CommentId(3)).is_err());
        }

        #[test]
        fn test_failed_persist_keeps_base() {
            let mut table = CommentTable::new();
            let mut staged = StagedTable::new(&mut table);
            staged.insert(NewComment::root(PostId(1), "a", "x")).unwrap();
            assert_eq!(staged.current().count(), 1);

            let result = staged.commit_with(|_| Err(NetmongError::Storage("disk full".into())));
            assert!(result.is_err());
            assert!(table.is_empty());
        }
    }
}
