use std::sync::Arc;

use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::application::auth::Principal;
use crate::application::listing::{ListingService, PostWrite};
use crate::application::repos::{CreatePostParams, PostsRepo, PostsWriteRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::error::DomainError;
use crate::domain::posts::{PostPatch, ensure_non_blank, ensure_title, normalize_tag_names};

#[derive(Debug, Error)]
pub enum PostError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("post not found")]
    NotFound,
    #[error("only the author may modify this post")]
    Forbidden,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for PostError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => PostError::NotFound,
            other => PostError::Repo(other),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CreatePostCommand {
    pub title: String,
    pub content: String,
    pub is_draft: bool,
    pub is_top: bool,
    pub is_recommend: bool,
    pub tags: Vec<String>,
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    listing: ListingService,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        listing: ListingService,
    ) -> Self {
        Self {
            reader,
            writer,
            listing,
        }
    }

    pub async fn create(
        &self,
        principal: Principal,
        cmd: CreatePostCommand,
    ) -> Result<PostRecord, PostError> {
        ensure_title(&cmd.title)?;
        ensure_non_blank("content", &cmd.content)?;
        let tag_names = normalize_tag_names(&cmd.tags)?;

        let post = self
            .writer
            .create_post(CreatePostParams {
                author_id: principal.user_id,
                title: cmd.title,
                content: cmd.content,
                is_draft: cmd.is_draft,
                is_top: cmd.is_top,
                is_recommend: cmd.is_recommend,
                tag_names,
            })
            .await?;

        self.listing.post_written(PostWrite::Created).await;
        info!(
            target = "application::posts::create",
            post_id = %post.id,
            author_id = %principal.user_id,
            tags = post.tags.len(),
            "post created"
        );
        Ok(post)
    }

    pub async fn get(&self, id: Uuid) -> Result<PostRecord, PostError> {
        self.reader.find_post(id).await?.ok_or(PostError::NotFound)
    }

    /// Apply `patch` to a post owned by `principal`. An empty patch returns the post unchanged.
    pub async fn update(
        &self,
        principal: Principal,
        id: Uuid,
        patch: PostPatch,
    ) -> Result<PostRecord, PostError> {
        patch.validate()?;
        let current = self.owned_post(principal, id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let post = self.writer.update_post(id, &patch).await?;
        self.listing.post_written(PostWrite::Updated).await;
        info!(
            target = "application::posts::update",
            post_id = %id,
            "post updated"
        );
        Ok(post)
    }

    pub async fn delete(&self, principal: Principal, id: Uuid) -> Result<(), PostError> {
        self.owned_post(principal, id).await?;
        self.writer.soft_delete_post(id).await?;
        self.listing.post_written(PostWrite::Deleted).await;
        info!(
            target = "application::posts::delete",
            post_id = %id,
            "post deleted"
        );
        Ok(())
    }

    async fn owned_post(&self, principal: Principal, id: Uuid) -> Result<PostRecord, PostError> {
        let post = self.get(id).await?;
        if !principal.owns(post.author.id) {
            return Err(PostError::Forbidden);
        }
        Ok(post)
    }
}
