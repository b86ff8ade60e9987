//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Login and registration use cases, token issuance
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Registration with email + password
//! - Login returning a stateless HS256 access token
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, verified in constant time
//! - Unknown email and wrong password are indistinguishable, including in
//!   the amount of hashing work performed
//! - Storage error detail never reaches the client

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, SigningSecret, TokenConfig};
pub use application::service::AuthService;
pub use application::token::{Claims, TokenIssuer};
pub use domain::repository::{LocalUserRepository, UserRepository};
pub use error::{AuthError, AuthErrorKind, AuthResult};
pub use infra::{memory::InMemoryUserRepository, postgres::PgUserRepository};
pub use presentation::router::auth_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
