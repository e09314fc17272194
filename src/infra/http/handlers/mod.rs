//! JSON endpoint handlers.

mod accounts;
mod comments;
mod health;
mod likes;
mod posts;
mod tags;

pub use accounts::{login, register};
pub use comments::{create_comment, list_comments};
pub use health::healthz;
pub use likes::{check_like, count_likes, like};
pub use posts::{create_post, delete_post, get_post, list_posts, update_post};
pub use tags::posts_by_tag;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::types::LikeTarget;

use super::error::ApiError;
use super::models::LikeTargetQuery;

/// Unwrap a JSON body, turning extractor rejections into `bad_request`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request("Invalid request body", Some(rejection.body_text())))
}

fn parse_uuid(field: &'static str, raw: Option<&str>) -> Result<Uuid, DomainError> {
    let raw = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DomainError::validation(field, "is required"))?;
    Uuid::parse_str(raw).map_err(|_| DomainError::validation(field, format!("`{raw}` is not a valid id")))
}

fn parse_like_target(query: &LikeTargetQuery) -> Result<(Uuid, LikeTarget), DomainError> {
    let target_id = parse_uuid("target_id", query.target_id.as_deref())?;
    let target_type = query
        .target_type
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DomainError::validation("target_type", "is required"))?
        .parse()?;
    Ok((target_id, target_type))
}
