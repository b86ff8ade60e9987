//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use std::future::Future;

use platform::password::HashedPassword;
use tokio_util::sync::CancellationToken;

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// User repository trait
///
/// Implementations honour `cancel` and return [`AuthError::Cancelled`] once it
/// fires. The repository is the sole authority on email uniqueness.
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Look up a user by exact email.
    ///
    /// `Ok(None)` means no such user. Returning `Err(AuthError::UserNotFound)`
    /// instead is tolerated and treated the same way by the service.
    async fn find_by_email(
        &self,
        email: &Email,
        cancel: &CancellationToken,
    ) -> AuthResult<Option<User>>;

    /// Persist a new user and return its freshly assigned id.
    ///
    /// Fails with [`AuthError::UserExists`] when the email is already taken.
    async fn save(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
        cancel: &CancellationToken,
    ) -> AuthResult<UserId>;
}

/// Race `fut` against `cancel`, preferring cancellation when both are ready.
pub async fn with_cancel<T, F>(cancel: &CancellationToken, fut: F) -> AuthResult<T>
where
    F: Future<Output = AuthResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AuthError::Cancelled),
        res = fut => res,
    }
}
