//! HTTP Handlers

use std::future::Future;
use std::time::Duration;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use kernel::error::app_error::{AppError, AppResult};
use tokio_util::sync::CancellationToken;

use crate::application::service::AuthService;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

/// Shared state for auth handlers
pub struct AuthAppState<R> {
    pub service: AuthService<R>,
    /// Deadline for one request; expiry cancels the in-flight call
    pub request_timeout: Duration,
}

impl<R> Clone for AuthAppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            request_timeout: self.request_timeout,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>>
where
    R: UserRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    validate_credentials(&req.email, &req.password)?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let token = with_deadline(
        state.request_timeout,
        &cancel,
        state.service.login(&cancel, &req.email, &req.password),
    )
    .await?;

    Ok(Json(LoginResponse { token }))
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)>
where
    R: UserRepository + Send + Sync + 'static,
{
    let Json(req) = payload?;
    validate_credentials(&req.email, &req.password)?;

    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let user_id = with_deadline(
        state.request_timeout,
        &cancel,
        state.service.register(&cancel, &req.email, &req.password),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Presence checks only; the auth core accepts any string.
fn validate_credentials(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() {
        return Err(AppError::bad_request("email is required"));
    }
    if password.is_empty() {
        return Err(AppError::bad_request("password is required"));
    }
    Ok(())
}

/// Await `fut`, cancelling `cancel` and failing with
/// [`AuthError::Cancelled`] once `timeout` elapses.
async fn with_deadline<T>(
    timeout: Duration,
    cancel: &CancellationToken,
    fut: impl Future<Output = AuthResult<T>>,
) -> AuthResult<T> {
    match tokio::time::timeout(timeout, fut).await {
        Ok(res) => res,
        Err(_) => {
            cancel.cancel();
            tracing::warn!(timeout_ms = timeout.as_millis() as u64, "request deadline exceeded");
            Err(AuthError::Cancelled)
        }
    }
}
