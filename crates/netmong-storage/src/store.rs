//! Store implementing every netmong repository

use crate::records::Records;
use crate::snapshot::SnapshotFile;
use netmong_core::comment::{
    Comment, CommentStore, CommentTable, CommentTransaction, NewComment, StagedTable,
};
use netmong_core::error::{NetmongError, Result};
use netmong_core::post::{
    Like, LikeRepository, Member, MemberLookup, MemberRepository, NewPost, Post, PostLookup,
    PostRepository, Report, ReportRepository,
};
use netmong_core::types::{CommentId, MemberId, Page, PageRequest, PostId};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Default snapshot location (platform data dir, or ~/.netmong)
pub fn default_data_file() -> PathBuf {
    directories::ProjectDirs::from("com", "netmong", "netmong")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".netmong")
        })
        .join("data.json")
}

/// In-memory tables, optionally mirrored to a snapshot file.
///
/// Locks are always taken comments first, records second. Comment writes are
/// serialised by the comment lock but carry no version, so the last committed
/// edit of a comment wins.
pub struct Store {
    comments: RwLock<CommentTable>,
    records: RwLock<Records>,
    snapshot: Option<SnapshotFile>,
}

impl Store {
    /// A store that lives only in memory
    pub fn in_memory() -> Self {
        Self {
            comments: RwLock::new(CommentTable::new()),
            records: RwLock::new(Records::new()),
            snapshot: None,
        }
    }

    /// Open a snapshot-backed store, starting empty if the file does not exist
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let snapshot = SnapshotFile::new(path);
        let (comments, records) = match snapshot.load()? {
            Some(tables) => tables,
            None => {
                debug!("No snapshot at {:?}, starting empty", snapshot.path());
                (CommentTable::new(), Records::new())
            }
        };

        Ok(Self {
            comments: RwLock::new(comments),
            records: RwLock::new(records),
            snapshot: Some(snapshot),
        })
    }

    /// Snapshot file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.snapshot.as_ref().map(|s| s.path())
    }

    /// Number of stored comments
    pub fn comment_count(&self) -> Result<usize> {
        Ok(self.comments.read().map_err(poisoned)?.count())
    }

    fn read_records(&self) -> Result<RwLockReadGuard<'_, Records>> {
        self.records.read().map_err(poisoned)
    }

    /// Apply `change` to a copy of the records, persist, then swap it in
    fn write_records<T>(&self, change: impl FnOnce(&mut Records) -> Result<T>) -> Result<T> {
        let comments = self.comments.read().map_err(poisoned)?;
        let mut records = self.records.write().map_err(poisoned)?;

        let mut staged = records.clone();
        let value = change(&mut staged)?;
        if let Some(snapshot) = &self.snapshot {
            snapshot.write(&comments, &staged)?;
        }
        *records = staged;
        Ok(value)
    }

    /// Persist a comment table that is about to be committed
    fn persist_comments(&self, comments: &CommentTable) -> Result<()> {
        match &self.snapshot {
            Some(snapshot) => {
                let records = self.read_records()?;
                snapshot.write(comments, &records)
            }
            None => Ok(()),
        }
    }
}

fn poisoned<T>(_: PoisonError<T>) -> NetmongError {
    NetmongError::Storage("Store lock poisoned".to_string())
}

/// Comment transaction holding the store's comment lock
struct StoreTransaction<'a> {
    table: StagedTable<RwLockWriteGuard<'a, CommentTable>>,
    store: &'a Store,
}

impl CommentTransaction for StoreTransaction<'_> {
    fn insert(&mut self, comment: NewComment) -> Result<CommentId> {
        self.table.insert(comment)
    }

    fn get(&self, id: CommentId) -> Result<Comment> {
        self.table.get(id)
    }

    fn roots_of_post(&self, post_id: PostId) -> Result<Vec<Comment>> {
        self.table.roots_of_post(post_id)
    }

    fn children_of(&self, parent_id: CommentId) -> Result<Vec<Comment>> {
        self.table.children_of(parent_id)
    }

    fn update(&mut self, comment: &Comment) -> Result<()> {
        self.table.update(comment)
    }

    fn mark_deleted(&mut self, id: CommentId) -> Result<()> {
        self.table.mark_deleted(id)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let StoreTransaction { table, store } = *self;
        table.commit_with(|staged| store.persist_comments(staged))
    }
}

impl CommentStore for Store {
    fn begin(&self) -> Result<Box<dyn CommentTransaction + '_>> {
        let guard = self.comments.write().map_err(poisoned)?;
        Ok(Box::new(StoreTransaction {
            table: StagedTable::new(guard),
            store: self,
        }))
    }
}

impl PostLookup for Store {
    fn find_post(&self, id: PostId) -> Result<Option<Post>> {
        Ok(self.read_records()?.post(id).cloned())
    }
}

impl MemberLookup for Store {
    fn find_member_by_username(&self, username: &str) -> Result<Option<Member>> {
        Ok(self.read_records()?.member_by_username(username).cloned())
    }
}

impl PostRepository for Store {
    fn insert_post(&self, post: NewPost) -> Result<Post> {
        self.write_records(|records| records.insert_post(post))
    }

    fn save_post(&self, post: &Post) -> Result<()> {
        self.write_records(|records| records.save_post(post))
    }

    // Comments of the post stay in place
    fn delete_post(&self, id: PostId) -> Result<()> {
        self.write_records(|records| {
            records.delete_post(id);
            Ok(())
        })
    }

    fn list_posts(&self, page: PageRequest) -> Result<Page<Post>> {
        Ok(self.read_records()?.posts_where(|_| true, page))
    }

    fn find_by_writer_containing(&self, word: &str, page: PageRequest) -> Result<Page<Post>> {
        Ok(self
            .read_records()?
            .posts_where(|p| p.writer.contains(word), page))
    }

    fn find_by_content_containing(&self, word: &str, page: PageRequest) -> Result<Page<Post>> {
        Ok(self
            .read_records()?
            .posts_where(|p| p.content.contains(word), page))
    }

    fn posts_of_member(&self, member_id: MemberId, page: PageRequest) -> Result<Page<Post>> {
        Ok(self
            .read_records()?
            .posts_where(|p| p.member_id == member_id, page))
    }
}

impl MemberRepository for Store {
    fn insert_member(&self, username: &str) -> Result<Member> {
        let member = self.write_records(|records| records.insert_member(username))?;
        debug!("Registered member {} ({})", member.username, member.id);
        Ok(member)
    }
}

impl LikeRepository for Store {
    fn insert_like(&self, like: Like) -> Result<()> {
        self.write_records(|records| records.insert_like(like))
    }

    fn delete_like(&self, post_id: PostId, member_id: MemberId) -> Result<bool> {
        if !self.exists_like(post_id, member_id)? {
            return Ok(false);
        }
        self.write_records(|records| Ok(records.delete_like(post_id, member_id)))
    }

    fn exists_like(&self, post_id: PostId, member_id: MemberId) -> Result<bool> {
        Ok(self.read_records()?.has_like(post_id, member_id))
    }

    fn count_likes(&self, post_id: PostId) -> Result<usize> {
        Ok(self.read_records()?.like_count(post_id))
    }
}

impl ReportRepository for Store {
    fn insert_report(&self, report: Report) -> Result<()> {
        self.write_records(|records| records.insert_report(report))
    }

    fn exists_report(&self, reporter_id: MemberId, post_id: PostId) -> Result<bool> {
        Ok(self.read_records()?.has_report(reporter_id, post_id))
    }

    fn count_reports(&self, post_id: PostId) -> Result<usize> {
        Ok(self.read_records()?.report_count(post_id))
    }
}
