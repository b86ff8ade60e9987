//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the smallest shared vocabulary of the service:
//! - The transport-facing error classification ([`error::kind::ErrorKind`])
//! - The unified application error ([`error::app_error::AppError`])
//! - Conversions from framework errors into [`error::app_error::AppError`]
//!
//! Domain crates keep their own error enums and map into these types at the
//! transport boundary.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
