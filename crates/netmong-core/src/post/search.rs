//! Category-based post search

use super::model::Post;
use super::repository::PostRepository;
use crate::error::Result;
use crate::types::{Page, PageRequest};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Query run for one search category
pub type SearchStrategy = fn(&dyn PostRepository, &str, PageRequest) -> Result<Page<Post>>;

/// Field a post search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    /// Writer username contains the word
    Writer,
    /// Post content contains the word
    Content,
}

impl SearchCategory {
    /// Parse a category label. Korean labels are accepted as well.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "writer" | "author" | "작성자" => Some(SearchCategory::Writer),
            "content" | "내용" => Some(SearchCategory::Content),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SearchCategory::Writer => "writer",
            SearchCategory::Content => "content",
        }
    }

    /// Repository query backing this category
    pub fn strategy(&self) -> SearchStrategy {
        match self {
            SearchCategory::Writer => by_writer,
            SearchCategory::Content => by_content,
        }
    }
}

fn by_writer(posts: &dyn PostRepository, word: &str, page: PageRequest) -> Result<Page<Post>> {
    posts.find_by_writer_containing(word, page)
}

fn by_content(posts: &dyn PostRepository, word: &str, page: PageRequest) -> Result<Page<Post>> {
    posts.find_by_content_containing(word, page)
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Search posts under a category label.
///
/// An unrecognised label matches nothing and returns an empty page.
pub fn search_posts(
    posts: &dyn PostRepository,
    label: &str,
    word: &str,
    page: PageRequest,
) -> Result<Page<Post>> {
    match SearchCategory::from_label(label) {
        Some(category) => (category.strategy())(posts, word, page),
        None => Ok(Page::empty(page)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::post::model::NewPost;
    use crate::post::repository::memory::MemoryDirectory;
    use crate::post::repository::MemberRepository;

    fn directory() -> MemoryDirectory {
        let directory = MemoryDirectory::new();
        let alice = directory.insert_member("alice").unwrap();
        let bob = directory.insert_member("bob").unwrap();
        directory
            .insert_post(NewPost::new("a", "walk in the park", &alice))
            .unwrap();
        directory
            .insert_post(NewPost::new("b", "rainy park", &bob))
            .unwrap();
        directory
            .insert_post(NewPost::new("c", "new toy", &bob))
            .unwrap();
        directory
    }

    #[test]
    fn test_from_label() {
        assert_eq!(SearchCategory::from_label("writer"), Some(SearchCategory::Writer));
        assert_eq!(SearchCategory::from_label("작성자"), Some(SearchCategory::Writer));
        assert_eq!(SearchCategory::from_label(" Content "), Some(SearchCategory::Content));
        assert_eq!(SearchCategory::from_label("내용"), Some(SearchCategory::Content));
        assert_eq!(SearchCategory::from_label("title"), None);
    }

    #[test]
    fn test_search_by_writer() {
        let directory = directory();
        let page = search_posts(&directory, "writer", "bo", PageRequest::new(0, 5)).unwrap();
        assert_eq!(page.total, 2);
        assert!(page.items.iter().all(|p| p.writer == "bob"));
    }

    #[test]
    fn test_search_by_content_newest_first() {
        let directory = directory();
        let page = search_posts(&directory, "content", "park", PageRequest::new(0, 5)).unwrap();
        let titles: Vec<_> = page.items.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a"]);
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let directory = directory();
        let page = search_posts(&directory, "title", "park", PageRequest::new(0, 5)).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.total, 0);
    }
}
