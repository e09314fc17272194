use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::auth::Principal;
use crate::domain::types::LikeTarget;
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{
    LikeCheckResponse, LikeCountResponse, LikeRequest, LikeResponse, LikeTargetQuery,
};
use crate::infra::http::state::AppState;

use super::{json_body, parse_like_target};

/// `201` for a new like, `200` when the caller had already liked the target.
pub async fn like(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let target_type: LikeTarget = payload.target_type.trim().parse()?;
    let outcome = state
        .likes
        .like(principal, payload.target_id, target_type)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(LikeResponse {
            liked: true,
            created: outcome.created,
        }),
    ))
}

pub async fn count_likes(
    State(state): State<AppState>,
    Query(query): Query<LikeTargetQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (target_id, target_type) = parse_like_target(&query)?;
    let count = state.likes.count(target_id, target_type).await?;
    Ok(Json(LikeCountResponse { count }))
}

pub async fn check_like(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<LikeTargetQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let (target_id, target_type) = parse_like_target(&query)?;
    let liked = state
        .likes
        .has_liked(principal, target_id, target_type)
        .await?;
    Ok(Json(LikeCheckResponse { liked }))
}
