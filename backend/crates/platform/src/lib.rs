//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (secure random bytes, Base64)
//! - Password hashing (Argon2id with a configurable work policy)

pub mod crypto;
pub mod password;
