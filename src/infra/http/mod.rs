//! JSON API surface.

pub mod error;
mod handlers;
pub mod middleware;
pub mod models;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::http::StatusCode;
use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::timeout::TimeoutLayer;

use crate::config::ServerSettings;

use self::middleware::{log_responses, require_principal, set_request_context};

/// Assemble the API router.
///
/// Read endpoints are public; writes and `likes/check` sit behind the bearer
/// token gate. Routes are mounted under `server.base_path` when it is set.
pub fn build_router(state: AppState, server: &ServerSettings) -> Router {
    let public = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/posts", get(handlers::list_posts))
        .route("/posts/{id}", get(handlers::get_post))
        .route("/tags/{name}/posts", get(handlers::posts_by_tag))
        .route("/comments", get(handlers::list_comments))
        .route("/likes/count", get(handlers::count_likes));

    let protected = Router::new()
        .route("/posts", post(handlers::create_post))
        .route(
            "/posts/{id}",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        .route("/comments", post(handlers::create_comment))
        .route("/likes", post(handlers::like))
        .route("/likes/check", get(handlers::check_like))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_principal,
        ));

    let api = public.merge(protected);
    let api = if server.base_path.is_empty() {
        api
    } else {
        Router::new().nest(&server.base_path, api)
    };

    api.route("/healthz", get(handlers::healthz))
        .with_state(state)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            server.request_timeout,
        ))
        .layer(axum_middleware::from_fn(log_responses))
        .layer(axum_middleware::from_fn(set_request_context))
}
