use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::accounts::{LoginCommand, RegisterCommand};
use crate::infra::http::error::ApiError;
use crate::infra::http::models::{LoginRequest, RegisterRequest, RegisteredResponse, TokenResponse};
use crate::infra::http::state::AppState;

use super::json_body;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let user = state
        .accounts
        .register(RegisterCommand {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisteredResponse {
            message: "registered",
            id: user.id,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = json_body(payload)?;
    let issued = state
        .accounts
        .login(LoginCommand {
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok(Json(TokenResponse {
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}
