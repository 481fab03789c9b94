// src/application/error.rs
use crate::domain::errors::DomainError;
use thiserror::Error;

pub type ApplicationResult<T> = Result<T, ApplicationError>;

/// Authentication failures. The display text is the fixed message returned to
/// callers, so it must not vary with the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid clientId.")]
    InvalidClient,
    #[error("Username is not found.")]
    UserNotFound,
    #[error("Invalid password.")]
    InvalidPassword,
    #[error("User is deactivated.")]
    AccountDisabled,
    #[error("Invalid code.")]
    InvalidCode,
    #[error("Invalid token.")]
    InvalidToken,
    #[error("Refresh token has already been used.")]
    TokenReuse,
    #[error("Unauthorized.")]
    Unauthorized,
}

impl AuthError {
    /// True for failures that mean "who are you" (401) rather than "not allowed" (403).
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidToken | AuthError::TokenReuse | AuthError::Unauthorized
        )
    }
}

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("{0}")]
    Validation(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("infrastructure failure: {0}")]
    Infrastructure(String),
}

impl ApplicationError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Validation failure naming the first missing request field.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation(format!("\"{field}\" is required"))
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn infrastructure(msg: impl Into<String>) -> Self {
        Self::Infrastructure(msg.into())
    }

    pub fn auth_kind(&self) -> Option<AuthError> {
        match self {
            ApplicationError::Auth(kind) => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_quotes_the_field_name() {
        let err = ApplicationError::missing_field("username");
        assert_eq!(err.to_string(), "\"username\" is required");
    }

    #[test]
    fn auth_errors_split_into_401_and_403_groups() {
        assert!(AuthError::TokenReuse.is_unauthenticated());
        assert!(AuthError::InvalidToken.is_unauthenticated());
        assert!(!AuthError::InvalidCode.is_unauthenticated());
        assert!(!AuthError::InvalidClient.is_unauthenticated());
    }
}
