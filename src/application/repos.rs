//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{CommentRecord, PostRecord, TagRecord, UserRecord};
use crate::domain::posts::PostPatch;
use crate::domain::types::LikeTarget;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub is_draft: bool,
    pub is_top: bool,
    pub is_recommend: bool,
    /// Already normalised; missing tags are created alongside the post.
    pub tag_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CreateCommentParams {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub content: String,
}

#[derive(Debug, Clone, Copy)]
pub struct NewLikeParams {
    pub user_id: Uuid,
    pub target_id: Uuid,
    pub target_type: LikeTarget,
}

#[async_trait]
pub trait UsersRepo: Send + Sync {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserRecord, RepoError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepoError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError>;
}

/// Read side for posts. Every query excludes tombstoned rows.
#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Newest first, with author and tags attached.
    async fn list_posts(&self, offset: u64, limit: u32) -> Result<Vec<PostRecord>, RepoError>;

    async fn find_post(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError>;

    async fn list_posts_for_tag(&self, tag_id: Uuid) -> Result<Vec<PostRecord>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    /// Insert the post, find-or-create its tags and link them atomically.
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    /// Merge `patch` into a live post. `RepoError::NotFound` when absent or tombstoned.
    async fn update_post(&self, id: Uuid, patch: &PostPatch) -> Result<PostRecord, RepoError>;

    /// Tombstone a live post. `RepoError::NotFound` when absent or already tombstoned.
    async fn soft_delete_post(&self, id: Uuid) -> Result<(), RepoError>;
}

#[async_trait]
pub trait TagsRepo: Send + Sync {
    async fn find_tag_by_name(&self, name: &str) -> Result<Option<TagRecord>, RepoError>;
}

#[async_trait]
pub trait CommentsRepo: Send + Sync {
    async fn create_comment(&self, params: CreateCommentParams)
    -> Result<CommentRecord, RepoError>;

    async fn find_comment(&self, id: Uuid) -> Result<Option<CommentRecord>, RepoError>;

    /// Comments of `post_id` without a parent, oldest first.
    async fn list_top_level_comments(&self, post_id: Uuid)
    -> Result<Vec<CommentRecord>, RepoError>;

    /// Direct replies to any of `parent_ids`, oldest first.
    async fn list_replies(&self, parent_ids: &[Uuid]) -> Result<Vec<CommentRecord>, RepoError>;
}

#[async_trait]
pub trait LikesRepo: Send + Sync {
    /// Insert unless a live like already exists; returns whether a row was written.
    async fn insert_like(&self, params: NewLikeParams) -> Result<bool, RepoError>;

    async fn count_likes(&self, target_id: Uuid, target_type: LikeTarget)
    -> Result<u64, RepoError>;

    async fn has_liked(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        target_type: LikeTarget,
    ) -> Result<bool, RepoError>;
}

#[async_trait]
pub trait HealthRepo: Send + Sync {
    async fn ping(&self) -> Result<(), RepoError>;
}
