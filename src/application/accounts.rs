use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::auth::{AuthError, AuthService, IssuedToken};
use crate::application::repos::{CreateUserParams, RepoError, UsersRepo};
use crate::domain::accounts::{validate_email, validate_password, validate_username};
use crate::domain::entities::UserRecord;
use crate::domain::error::DomainError;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(pub String);

/// One-way password digests.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordError>;

    fn verify(&self, password: &str, digest: &str) -> Result<bool, PasswordError>;
}

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] DomainError),
    #[error("{field} is already taken")]
    Duplicate { field: &'static str },
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] AuthError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UsersRepo>,
    hasher: Arc<dyn PasswordHasher>,
    auth: Arc<AuthService>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UsersRepo>,
        hasher: Arc<dyn PasswordHasher>,
        auth: Arc<AuthService>,
    ) -> Self {
        Self {
            users,
            hasher,
            auth,
        }
    }

    pub async fn register(&self, cmd: RegisterCommand) -> Result<UserRecord, AccountError> {
        let username = cmd.username.trim().to_string();
        let email = cmd.email.trim().to_string();
        validate_username(&username)?;
        validate_email(&email)?;
        validate_password(&cmd.password)?;

        let password_hash = self.hash_password(cmd.password).await?;
        let user = self
            .users
            .create_user(CreateUserParams {
                username,
                email,
                password_hash,
            })
            .await
            .map_err(|err| match err {
                RepoError::Duplicate { constraint } => AccountError::Duplicate {
                    field: duplicate_field(&constraint),
                },
                other => AccountError::Repo(other),
            })?;

        info!(
            target = "application::accounts::register",
            user_id = %user.id,
            "account registered"
        );
        Ok(user)
    }

    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, cmd: LoginCommand) -> Result<IssuedToken, AccountError> {
        let user = self
            .users
            .find_user_by_email(cmd.email.trim())
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        if !self
            .verify_password(cmd.password, user.password_hash.clone())
            .await?
        {
            return Err(AccountError::InvalidCredentials);
        }

        Ok(self.auth.issue(user.id)?)
    }

    async fn hash_password(&self, password: String) -> Result<String, AccountError> {
        let hasher = self.hasher.clone();
        let digest = tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| PasswordError(err.to_string()))??;
        Ok(digest)
    }

    async fn verify_password(&self, password: String, digest: String) -> Result<bool, AccountError> {
        let hasher = self.hasher.clone();
        let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|err| PasswordError(err.to_string()))??;
        Ok(verified)
    }
}

fn duplicate_field(constraint: &str) -> &'static str {
    match constraint {
        USERNAME_CONSTRAINT => "username",
        EMAIL_CONSTRAINT => "email",
        _ => "account",
    }
}
