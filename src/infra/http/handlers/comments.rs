use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::auth::Principal;
use crate::application::comments::CreateCommentCommand;
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{
    CommentResponse, CommentsQuery, CommentsResponse, CreateCommentRequest,
};
use crate::infra::http::state::AppState;

use super::{json_body, parse_uuid};

pub async fn list_comments(
    State(state): State<AppState>,
    Query(query): Query<CommentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let post_id = parse_uuid("post_id", query.post_id.as_deref())?;
    let threads = state.comments.list_for_post(post_id).await?;
    Ok(Json(CommentsResponse { comments: threads }))
}

pub async fn create_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CreateCommentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let comment = state
        .comments
        .create(
            principal,
            CreateCommentCommand {
                post_id: payload.post_id,
                parent_id: payload.parent_id,
                content: payload.content,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CommentResponse {
            message: "created",
            comment,
        }),
    ))
}
