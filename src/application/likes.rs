use std::sync::Arc;

use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::repos::{CommentsRepo, LikesRepo, NewLikeParams, PostsRepo, RepoError};
use crate::domain::error::DomainError;
use crate::domain::types::LikeTarget;

#[derive(Debug, Error)]
pub enum LikeError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeOutcome {
    /// False when the principal had already liked the target.
    pub created: bool,
}

#[derive(Clone)]
pub struct LikeService {
    likes: Arc<dyn LikesRepo>,
    posts: Arc<dyn PostsRepo>,
    comments: Arc<dyn CommentsRepo>,
}

impl LikeService {
    pub fn new(
        likes: Arc<dyn LikesRepo>,
        posts: Arc<dyn PostsRepo>,
        comments: Arc<dyn CommentsRepo>,
    ) -> Self {
        Self {
            likes,
            posts,
            comments,
        }
    }

    /// Idempotent: repeating a like succeeds without writing a second row.
    pub async fn like(
        &self,
        principal: Principal,
        target_id: Uuid,
        target_type: LikeTarget,
    ) -> Result<LikeOutcome, LikeError> {
        self.ensure_target_exists(target_id, target_type).await?;

        let created = self
            .likes
            .insert_like(NewLikeParams {
                user_id: principal.user_id,
                target_id,
                target_type,
            })
            .await?;

        debug!(
            target = "application::likes::like",
            user_id = %principal.user_id,
            %target_id,
            target_type = target_type.as_str(),
            created,
            "like recorded"
        );
        Ok(LikeOutcome { created })
    }

    pub async fn count(&self, target_id: Uuid, target_type: LikeTarget) -> Result<u64, LikeError> {
        Ok(self.likes.count_likes(target_id, target_type).await?)
    }

    pub async fn has_liked(
        &self,
        principal: Principal,
        target_id: Uuid,
        target_type: LikeTarget,
    ) -> Result<bool, LikeError> {
        Ok(self
            .likes
            .has_liked(principal.user_id, target_id, target_type)
            .await?)
    }

    async fn ensure_target_exists(
        &self,
        target_id: Uuid,
        target_type: LikeTarget,
    ) -> Result<(), LikeError> {
        let exists = match target_type {
            LikeTarget::Post => self.posts.find_post(target_id).await?.is_some(),
            LikeTarget::Comment => self.comments.find_comment(target_id).await?.is_some(),
        };
        if !exists {
            return Err(DomainError::not_found(target_type.as_str()).into());
        }
        Ok(())
    }
}
