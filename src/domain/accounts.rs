//! Account registration rules.

use super::error::DomainError;

pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MAX_USERNAME_CHARS: usize = 64;

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("username", "must not be empty"));
    }
    if trimmed.chars().count() > MAX_USERNAME_CHARS {
        return Err(DomainError::validation(
            "username",
            format!("must be at most {MAX_USERNAME_CHARS} characters"),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed = email.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !trimmed.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(DomainError::validation("email", "must be a valid address"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), DomainError> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(DomainError::validation(
            "password",
            format!("must be at least {MIN_PASSWORD_CHARS} characters"),
        ));
    }
    Ok(())
}
