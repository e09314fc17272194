use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{CommentThread, PostRecord, TagRecord};

#[derive(Debug, Deserialize, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_draft: bool,
    #[serde(default)]
    pub is_top: bool,
    #[serde(default)]
    pub is_recommend: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreateCommentRequest {
    pub post_id: Uuid,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
    pub content: String,
}

/// `target_type` stays a string so an unknown kind is a validation error
/// rather than a body rejection.
#[derive(Debug, Deserialize, Serialize)]
pub struct LikeRequest {
    pub target_id: Uuid,
    pub target_type: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CommentsQuery {
    pub post_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LikeTargetQuery {
    pub target_id: Option<String>,
    pub target_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisteredResponse {
    pub message: &'static str,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub post: PostRecord,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub message: &'static str,
    pub comment: CommentThread,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<CommentThread>,
}

#[derive(Debug, Serialize)]
pub struct TaggedPostsResponse {
    pub tag: TagRecord,
    pub posts: Vec<PostRecord>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub created: bool,
}

#[derive(Debug, Serialize)]
pub struct LikeCountResponse {
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct LikeCheckResponse {
    pub liked: bool,
}
