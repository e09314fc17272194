use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use crate::application::auth::Principal;
use crate::application::pagination::PageParams;
use crate::application::posts::CreatePostCommand;
use crate::domain::posts::PostPatch;
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{CreatePostRequest, ListPostsQuery, MessageResponse, PostResponse};
use crate::infra::http::state::AppState;

use super::{json_body, parse_uuid};

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<ListPostsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let params = PageParams::resolve(
        query.page.as_deref(),
        query.limit.as_deref(),
        state.listing_settings.default_page_size.get(),
        state.listing_settings.max_page_size.get(),
    )?;
    let listing = state.listing.list(params).await?;
    Ok(Json(listing))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid("id", Some(&id))?;
    let post = state.posts.get(id).await?;
    Ok(Json(PostResponse {
        message: None,
        post,
    }))
}

pub async fn create_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    payload: Result<Json<CreatePostRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let post = state
        .posts
        .create(
            principal,
            CreatePostCommand {
                title: payload.title,
                content: payload.content,
                is_draft: payload.is_draft,
                is_top: payload.is_top,
                is_recommend: payload.is_recommend,
                tags: payload.tags,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            message: Some("created"),
            post,
        }),
    ))
}

pub async fn update_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    payload: Result<Json<PostPatch>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid("id", Some(&id))?;
    let patch = json_body(payload)?;
    let post = state.posts.update(principal, id, patch).await?;
    Ok(Json(PostResponse {
        message: Some("updated"),
        post,
    }))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_uuid("id", Some(&id))?;
    state.posts.delete(principal, id).await?;
    Ok(Json(MessageResponse { message: "deleted" }))
}
