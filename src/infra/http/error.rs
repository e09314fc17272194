use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::accounts::AccountError;
use crate::application::auth::AuthError;
use crate::application::comments::CommentError;
use crate::application::error::ErrorReport;
use crate::application::likes::LikeError;
use crate::application::listing::ListingError;
use crate::application::posts::PostError;
use crate::application::repos::RepoError;
use crate::application::tags::TagError;
use crate::domain::error::DomainError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const BAD_REQUEST: &str = "bad_request";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const FORBIDDEN: &str = "forbidden";
    pub const NOT_FOUND: &str = "not_found";
    pub const CONFLICT: &str = "conflict";
    pub const INTERNAL: &str = "internal";
    pub const UNAVAILABLE: &str = "unavailable";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Boundary error for every JSON endpoint.
///
/// `detail` is only logged; `hint` is shown to the caller.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    hint: Option<String>,
    detail: Option<String>,
}

impl ApiError {
    pub fn new(
        status: StatusCode,
        code: &'static str,
        message: impl Into<String>,
        hint: Option<String>,
    ) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            hint,
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    pub fn bad_request(message: impl Into<String>, hint: Option<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, codes::BAD_REQUEST, message, hint)
    }

    pub fn unauthorized() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            codes::UNAUTHORIZED,
            "Authentication required",
            None,
        )
    }

    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            codes::FORBIDDEN,
            "Not allowed to modify this resource",
            None,
        )
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, codes::NOT_FOUND, message, None)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, codes::CONFLICT, message, None)
    }

    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "Internal server error",
            None,
        )
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::UNAVAILABLE,
            message,
            None,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = self
            .detail
            .clone()
            .or_else(|| self.hint.clone())
            .unwrap_or_else(|| self.message.clone());
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message,
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        ErrorReport::from_message(
            "infra::http::error",
            self.status,
            format!("{}: {detail}", self.code),
        )
        .attach(&mut response);
        response
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { .. } => ApiError::bad_request(err.to_string(), None),
            DomainError::NotFound { entity } => ApiError::not_found(format!("{entity} not found")),
            DomainError::Invariant { .. } => ApiError::internal().with_detail(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => ApiError::not_found("Resource not found"),
            RepoError::Duplicate { ref constraint } => {
                ApiError::conflict("Duplicate record").with_detail(constraint.clone())
            }
            RepoError::InvalidInput { message } => {
                ApiError::bad_request("Invalid input", Some(message))
            }
            RepoError::Timeout => {
                ApiError::unavailable("Database timeout").with_detail(err.to_string())
            }
            RepoError::Integrity { .. } | RepoError::Persistence(_) => {
                ApiError::internal().with_detail(err.to_string())
            }
        }
    }
}

/// Credential failures never reveal why the token was rejected.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Signing(_) => ApiError::internal().with_detail(err.to_string()),
            AuthError::Missing | AuthError::Malformed | AuthError::Invalid | AuthError::Expired => {
                ApiError::unauthorized().with_detail(err.to_string())
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(inner) => inner.into(),
            AccountError::Duplicate { field } => {
                ApiError::conflict(format!("{field} is already taken"))
            }
            AccountError::InvalidCredentials => ApiError::new(
                StatusCode::UNAUTHORIZED,
                codes::UNAUTHORIZED,
                "Invalid email or password",
                None,
            ),
            AccountError::Password(inner) => ApiError::internal().with_detail(inner.to_string()),
            AccountError::Token(inner) => inner.into(),
            AccountError::Repo(inner) => inner.into(),
        }
    }
}

impl From<PostError> for ApiError {
    fn from(err: PostError) -> Self {
        match err {
            PostError::Domain(inner) => inner.into(),
            PostError::NotFound => ApiError::not_found("Post not found"),
            PostError::Forbidden => ApiError::forbidden(),
            PostError::Repo(inner) => inner.into(),
        }
    }
}

impl From<CommentError> for ApiError {
    fn from(err: CommentError) -> Self {
        match err {
            CommentError::Domain(inner) => inner.into(),
            CommentError::Repo(inner) => inner.into(),
        }
    }
}

impl From<LikeError> for ApiError {
    fn from(err: LikeError) -> Self {
        match err {
            LikeError::Domain(inner) => inner.into(),
            LikeError::Repo(inner) => inner.into(),
        }
    }
}

impl From<TagError> for ApiError {
    fn from(err: TagError) -> Self {
        match err {
            TagError::Domain(inner) => inner.into(),
            TagError::Repo(inner) => inner.into(),
        }
    }
}

/// Listing failures expose the store message to operators.
impl From<ListingError> for ApiError {
    fn from(err: ListingError) -> Self {
        let hint = Some(err.to_string());
        match err {
            ListingError::Repo(RepoError::Timeout) => ApiError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::UNAVAILABLE,
                "Failed to load posts",
                hint,
            ),
            ListingError::Repo(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::INTERNAL,
                "Failed to load posts",
                hint,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expired_token_is_plain_unauthorized() {
        let err = ApiError::from(AuthError::Expired);
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
        assert!(err.hint.is_none());
        assert_eq!(err.message, "Authentication required");
    }

    #[test]
    fn forbidden_and_unauthorized_are_distinct() {
        let forbidden = ApiError::from(PostError::Forbidden);
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(forbidden.code(), codes::FORBIDDEN);
        assert!(forbidden.hint.is_none());
    }

    #[test]
    fn validation_maps_to_bad_request_with_field() {
        let err = ApiError::from(DomainError::validation("title", "must not be blank"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.message.contains("title"));
    }

    #[test]
    fn listing_failure_carries_backend_hint() {
        let err = ApiError::from(ListingError::Repo(RepoError::Persistence(
            "connection reset".into(),
        )));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.hint.as_deref().unwrap_or_default().contains("connection reset"));
    }

    #[test]
    fn store_failure_hides_detail_from_body() {
        let err = ApiError::from(RepoError::Persistence("password=hunter2".into()));
        assert_eq!(err.code(), codes::INTERNAL);
        assert!(err.hint.is_none());
        assert!(!err.message.contains("hunter2"));
    }

    #[test]
    fn duplicate_account_field_is_conflict() {
        let err = ApiError::from(AccountError::Duplicate { field: "email" });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message, "email is already taken");
    }
}
