//! Assembly of nested comment views

use super::model::{Comment, CommentView};
use super::store::CommentTransaction;
use crate::error::Result;
use crate::types::CommentId;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::warn;

/// Expand `root` into a view holding its whole reply subtree.
///
/// Works breadth-first without recursion. A comment reached a second time is
/// not expanded again, so a corrupted parent chain cannot loop forever.
pub fn assemble(tx: &dyn CommentTransaction, root: Comment) -> Result<CommentView> {
    let mut seen = HashSet::from([root.id()]);
    let mut queue = VecDeque::new();

    let root_children = enqueue_children(tx, &root, &mut seen, &mut queue)?;

    let mut visited: Vec<(Comment, Vec<CommentId>)> = Vec::new();
    while let Some(comment) = queue.pop_front() {
        let child_ids = enqueue_children(tx, &comment, &mut seen, &mut queue)?;
        visited.push((comment, child_ids));
    }

    // Children are visited after their parent, so building in reverse visit
    // order always finds the child views ready.
    let mut built: HashMap<CommentId, CommentView> = HashMap::with_capacity(visited.len());
    for (comment, child_ids) in visited.into_iter().rev() {
        let view = build_view(&comment, &child_ids, &mut built);
        built.insert(comment.id(), view);
    }

    Ok(build_view(&root, &root_children, &mut built))
}

/// Assemble every comment of `roots`, keeping their order
pub fn assemble_all(tx: &dyn CommentTransaction, roots: Vec<Comment>) -> Result<Vec<CommentView>> {
    roots.into_iter().map(|root| assemble(tx, root)).collect()
}

fn enqueue_children(
    tx: &dyn CommentTransaction,
    comment: &Comment,
    seen: &mut HashSet<CommentId>,
    queue: &mut VecDeque<Comment>,
) -> Result<Vec<CommentId>> {
    let mut child_ids = Vec::new();
    for child in tx.children_of(comment.id())? {
        if seen.insert(child.id()) {
            child_ids.push(child.id());
            queue.push_back(child);
        } else {
            warn!(
                "Comment {} reached twice under {}, not expanding it again",
                child.id(),
                comment.id()
            );
        }
    }
    Ok(child_ids)
}

fn build_view(
    comment: &Comment,
    child_ids: &[CommentId],
    built: &mut HashMap<CommentId, CommentView>,
) -> CommentView {
    let mut view = CommentView::leaf(comment);
    view.children = child_ids.iter().filter_map(|id| built.remove(id)).collect();
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comment::model::NewComment;
    use crate::comment::store::memory::MemoryCommentStore;
    use crate::comment::store::CommentStore;
    use crate::types::PostId;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assemble_two_levels() {
        let store = MemoryCommentStore::new();
        let mut tx = store.begin().unwrap();
        let root_id = tx.insert(NewComment::root(PostId(1), "alice", "hello")).unwrap();
        let root = tx.get(root_id).unwrap();
        tx.insert(NewComment::reply(&root, "bob", "hi back")).unwrap();
        tx.insert(NewComment::reply(&root, "carol", "hey")).unwrap();

        let view = assemble(tx.as_ref(), root).unwrap();
        let replies: Vec<_> = view.children.iter().map(|c| c.content.as_str()).collect();
        assert_eq!(replies, vec!["hi back", "hey"]);
        assert_eq!(view.node_count(), 3);
        assert!(view.children.iter().all(|c| c.parent_id == Some(root_id)));
    }

    #[test]
    fn test_assemble_deep_chain() {
        let store = MemoryCommentStore::new();
        let mut tx = store.begin().unwrap();
        let root_id = tx.insert(NewComment::root(PostId(1), "alice", "0")).unwrap();

        let mut parent = tx.get(root_id).unwrap();
        for depth in 1..200 {
            let id = tx
                .insert(NewComment::reply(&parent, "bob", depth.to_string()))
                .unwrap();
            parent = tx.get(id).unwrap();
        }

        let view = assemble(tx.as_ref(), tx.get(root_id).unwrap()).unwrap();
        assert_eq!(view.node_count(), 200);
        assert_eq!(view.depth(), 200);
    }

    #[test]
    fn test_assemble_all_keeps_order() {
        let store = MemoryCommentStore::new();
        let mut tx = store.begin().unwrap();
        for content in ["first", "second", "third"] {
            tx.insert(NewComment::root(PostId(1), "alice", content)).unwrap();
        }

        let roots = tx.roots_of_post(PostId(1)).unwrap();
        let views = assemble_all(tx.as_ref(), roots).unwrap();
        let contents: Vec<_> = views.iter().map(|v| v.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }
}
