use axum::Json;
use axum::extract::{Path, State};
use axum::response::IntoResponse;

use crate::infra::http::error::ApiError;
use crate::infra::http::models::TaggedPostsResponse;
use crate::infra::http::state::AppState;

pub async fn posts_by_tag(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let tagged = state.tags.posts_by_tag(&name).await?;
    Ok(Json(TaggedPostsResponse {
        count: tagged.posts.len(),
        tag: tagged.tag,
        posts: tagged.posts,
    }))
}
