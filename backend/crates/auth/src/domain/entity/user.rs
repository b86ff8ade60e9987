//! User Entity
//!
//! A persisted identity record. Created by registration and read-only
//! afterwards.

use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, user_id::UserId};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Repository-assigned opaque identifier
    pub user_id: UserId,
    /// Unique email, case preserved as stored
    pub email: Email,
    /// Argon2id PHC string, never the plaintext
    pub password_hash: HashedPassword,
}

impl User {
    pub fn new(user_id: UserId, email: Email, password_hash: HashedPassword) -> Self {
        Self {
            user_id,
            email,
            password_hash,
        }
    }
}
