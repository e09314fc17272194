//! Comment threading rules.
//!
//! Threads are materialised one level deep: a top-level comment plus its
//! direct replies. Deeper replies stay in storage but are never expanded here.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::entities::{CommentRecord, CommentThread};
use super::error::DomainError;

/// Check that a declared parent belongs to the post the new comment targets.
pub fn ensure_parent_in_post(parent: &CommentRecord, post_id: Uuid) -> Result<(), DomainError> {
    if parent.post_id != post_id {
        return Err(DomainError::validation(
            "parent_id",
            "parent comment belongs to a different post",
        ));
    }
    Ok(())
}

/// Assemble top-level comments and their direct replies into threads.
///
/// Output is oldest first at both levels regardless of the order rows arrive
/// in. Replies whose parent is not among `top_level` are dropped.
pub fn assemble_threads(
    mut top_level: Vec<CommentRecord>,
    replies: Vec<CommentRecord>,
) -> Vec<CommentThread> {
    top_level.retain(CommentRecord::is_top_level);
    sort_chronologically(&mut top_level);

    let parents: HashSet<Uuid> = top_level.iter().map(|comment| comment.id).collect();
    let mut grouped: HashMap<Uuid, Vec<CommentRecord>> = HashMap::new();
    for reply in replies {
        if let Some(parent_id) = reply.parent_id
            && parents.contains(&parent_id)
        {
            grouped.entry(parent_id).or_default().push(reply);
        }
    }

    top_level
        .into_iter()
        .map(|comment| {
            let mut replies = grouped.remove(&comment.id).unwrap_or_default();
            sort_chronologically(&mut replies);
            CommentThread { comment, replies }
        })
        .collect()
}

fn sort_chronologically(comments: &mut [CommentRecord]) {
    comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}
