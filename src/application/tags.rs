use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{PostsRepo, RepoError, TagsRepo};
use crate::domain::entities::{PostRecord, TagRecord};
use crate::domain::error::DomainError;
use crate::domain::posts::ensure_non_blank;

#[derive(Debug, Error)]
pub enum TagError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct TaggedPosts {
    pub tag: TagRecord,
    pub posts: Vec<PostRecord>,
}

#[derive(Clone)]
pub struct TagService {
    tags: Arc<dyn TagsRepo>,
    posts: Arc<dyn PostsRepo>,
}

impl TagService {
    pub fn new(tags: Arc<dyn TagsRepo>, posts: Arc<dyn PostsRepo>) -> Self {
        Self { tags, posts }
    }

    /// Live posts under the tag called `name`, newest first.
    pub async fn posts_by_tag(&self, name: &str) -> Result<TaggedPosts, TagError> {
        let name = name.trim();
        ensure_non_blank("name", name)?;
        let tag = self
            .tags
            .find_tag_by_name(name)
            .await?
            .ok_or_else(|| DomainError::not_found("tag"))?;
        let posts = self.posts.list_posts_for_tag(tag.id).await?;
        Ok(TaggedPosts { tag, posts })
    }
}
