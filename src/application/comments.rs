use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::repos::{CommentsRepo, CreateCommentParams, PostsRepo, RepoError};
use crate::domain::comments::{assemble_threads, ensure_parent_in_post};
use crate::domain::entities::CommentThread;
use crate::domain::error::DomainError;
use crate::domain::posts::ensure_non_blank;

#[derive(Debug, Error)]
pub enum CommentError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct CreateCommentCommand {
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
}

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentsRepo>,
    posts: Arc<dyn PostsRepo>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentsRepo>, posts: Arc<dyn PostsRepo>) -> Self {
        Self { comments, posts }
    }

    /// Top-level comments oldest first, each with its direct replies.
    ///
    /// A post without comments, or one that does not exist, yields an empty list.
    pub async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentThread>, CommentError> {
        let top_level = self.comments.list_top_level_comments(post_id).await?;
        if top_level.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = top_level.iter().map(|comment| comment.id).collect();
        let replies = self.comments.list_replies(&ids).await?;
        Ok(assemble_threads(top_level, replies))
    }

    pub async fn create(
        &self,
        principal: Principal,
        cmd: CreateCommentCommand,
    ) -> Result<CommentThread, CommentError> {
        ensure_non_blank("content", &cmd.content)?;

        if self.posts.find_post(cmd.post_id).await?.is_none() {
            return Err(DomainError::not_found("post").into());
        }

        if let Some(parent_id) = cmd.parent_id {
            let parent = self.comments.find_comment(parent_id).await?.ok_or_else(|| {
                DomainError::validation("parent_id", "parent comment does not exist")
            })?;
            ensure_parent_in_post(&parent, cmd.post_id)?;
        }

        let created = self
            .comments
            .create_comment(CreateCommentParams {
                post_id: cmd.post_id,
                author_id: principal.user_id,
                parent_id: cmd.parent_id,
                content: cmd.content,
            })
            .await?;

        info!(
            target = "application::comments::create",
            comment_id = %created.id,
            post_id = %created.post_id,
            reply = !created.is_top_level(),
            "comment created"
        );

        self.hydrate(created.id).await
    }

    /// Re-read a comment with its author and direct replies attached.
    async fn hydrate(&self, id: Uuid) -> Result<CommentThread, CommentError> {
        let comment = self
            .comments
            .find_comment(id)
            .await?
            .ok_or_else(|| DomainError::invariant(format!("comment {id} vanished after insert")))?;
        let replies = self.comments.list_replies(&[id]).await?;
        Ok(CommentThread { comment, replies })
    }
}
