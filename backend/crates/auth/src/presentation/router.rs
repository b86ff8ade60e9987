//! Auth Router

use std::time::Duration;

use axum::{Router, routing::post};

use crate::application::service::AuthService;
use crate::domain::repository::UserRepository;
use crate::presentation::handlers::{self, AuthAppState};

/// Create the Auth router for any repository implementation
///
/// Routes are relative; mount under `/api/auth`.
pub fn auth_router<R>(service: AuthService<R>, request_timeout: Duration) -> Router
where
    R: UserRepository + Send + Sync + 'static,
{
    let state = AuthAppState {
        service,
        request_timeout,
    };

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route("/register", post(handlers::register::<R>))
        .with_state(state)
}
