//! Auth Error Types
//!
//! Auth-specific error variants plus the mapping onto the unified
//! `kernel::error::AppError` used at the HTTP boundary.

use axum::response::{IntoResponse, Response};
use kernel::error::app_error::AppError;
use platform::password::PasswordHashError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// What went wrong, independent of where.
///
/// Callers branch on this, never on the error text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    InvalidCredentials,
    UserExists,
    /// Repository-to-service signal only; never returned by login
    UserNotFound,
    Storage,
    Hashing,
    Signing,
    Cancelled,
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown email or wrong password; the two are never told apart
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email already registered
    #[error("User already exists: {email}")]
    UserExists { email: String },

    /// No record for the looked-up email
    #[error("User not found")]
    UserNotFound,

    /// Opaque repository failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Password hashing primitive failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),

    /// Token signing failed
    #[error("Token signing failed: {0}")]
    Signing(String),

    /// The caller's cancellation token fired
    #[error("Operation cancelled")]
    Cancelled,

    /// Annotation with the operation the error passed through
    #[error("{op}: {source}")]
    Operation {
        op: &'static str,
        #[source]
        source: Box<AuthError>,
    },
}

impl AuthError {
    /// Classification, looking through any operation annotations
    pub fn kind(&self) -> AuthErrorKind {
        match self {
            AuthError::InvalidCredentials => AuthErrorKind::InvalidCredentials,
            AuthError::UserExists { .. } => AuthErrorKind::UserExists,
            AuthError::UserNotFound => AuthErrorKind::UserNotFound,
            AuthError::Storage(_) => AuthErrorKind::Storage,
            AuthError::Hashing(_) => AuthErrorKind::Hashing,
            AuthError::Signing(_) => AuthErrorKind::Signing,
            AuthError::Cancelled => AuthErrorKind::Cancelled,
            AuthError::Operation { source, .. } => source.kind(),
        }
    }

    /// Annotate with the operation name
    pub fn with_op(self, op: &'static str) -> Self {
        AuthError::Operation {
            op,
            source: Box::new(self),
        }
    }

    /// Outermost operation annotation, if any
    pub fn op(&self) -> Option<&'static str> {
        match self {
            AuthError::Operation { op, .. } => Some(*op),
            _ => None,
        }
    }

    /// Collapse anything that is not already a storage failure or a
    /// cancellation into [`AuthError::Storage`].
    ///
    /// Used on repository results whose state is indeterminate.
    pub fn into_storage(self) -> Self {
        match self.kind() {
            AuthErrorKind::Storage | AuthErrorKind::Cancelled => self,
            _ => AuthError::Storage(self.to_string()),
        }
    }

    /// Convert to AppError.
    ///
    /// Server-side failures collapse to a fixed message so repository or
    /// primitive error text never reaches the caller.
    pub fn to_app_error(&self) -> AppError {
        match self.kind() {
            AuthErrorKind::InvalidCredentials => AppError::unauthorized("invalid credentials"),
            AuthErrorKind::UserExists => AppError::conflict("user already exists"),
            AuthErrorKind::Cancelled => AppError::request_timeout("request cancelled"),
            AuthErrorKind::UserNotFound
            | AuthErrorKind::Storage
            | AuthErrorKind::Hashing
            | AuthErrorKind::Signing => AppError::internal("internal error"),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self.kind() {
            AuthErrorKind::Storage | AuthErrorKind::Hashing | AuthErrorKind::Signing => {
                tracing::error!(error = %self, "Auth internal error");
            }
            AuthErrorKind::UserNotFound => {
                tracing::error!(error = %self, "User lookup signal leaked to transport");
            }
            AuthErrorKind::InvalidCredentials | AuthErrorKind::UserExists => {
                tracing::debug!(error = %self, "Auth request rejected");
            }
            AuthErrorKind::Cancelled => {
                tracing::debug!(error = %self, "Auth request cancelled");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error().with_source(err)
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(err: sqlx::Error) -> Self {
        AuthError::Storage(err.to_string())
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        match err {
            PasswordHashError::Mismatch | PasswordHashError::InvalidHashFormat => {
                AuthError::InvalidCredentials
            }
            PasswordHashError::HashingFailed(msg) | PasswordHashError::InvalidPolicy(msg) => {
                AuthError::Hashing(msg)
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        AuthError::Signing(err.to_string())
    }
}
