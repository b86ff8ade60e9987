//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod login;
pub mod register;
pub mod service;
pub mod token;

// Re-exports
pub use config::{AuthConfig, SigningSecret, TokenConfig};
pub use service::AuthService;
pub use token::{Claims, TokenIssuer};
