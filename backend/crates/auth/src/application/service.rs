//! Auth Service
//!
//! Owns the collaborators shared by the login and registration use cases.
//! All state is immutable after construction, so one instance serves any
//! number of concurrent calls.

use std::sync::Arc;

use platform::password::{ClearTextPassword, HashedPassword, PasswordHashError, PasswordHasher};
use tokio_util::sync::CancellationToken;
use tracing::Span;

use crate::application::config::AuthConfig;
use crate::application::token::TokenIssuer;
use crate::domain::entity::user::User;
use crate::domain::repository::{UserRepository, with_cancel};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthErrorKind, AuthResult};

/// Login and registration over a [`UserRepository`]
pub struct AuthService<R> {
    pub(crate) repo: Arc<R>,
    pub(crate) hasher: Arc<PasswordHasher>,
    pub(crate) tokens: TokenIssuer,
    /// Parent of every per-call span
    pub(crate) span: Span,
}

impl<R> Clone for AuthService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
            hasher: Arc::clone(&self.hasher),
            tokens: self.tokens.clone(),
            span: self.span.clone(),
        }
    }
}

impl<R> std::fmt::Debug for AuthService<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("hasher", &self.hasher)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl<R: UserRepository> AuthService<R> {
    /// Build the service.
    ///
    /// Fails with [`AuthError::Hashing`] when the hashing policy is rejected
    /// by Argon2.
    pub fn new(repo: Arc<R>, config: AuthConfig) -> AuthResult<Self> {
        let hasher = PasswordHasher::new(config.hashing)?;
        Ok(Self {
            repo,
            hasher: Arc::new(hasher),
            tokens: TokenIssuer::new(config.token),
            span: tracing::info_span!("auth"),
        })
    }

    /// Replace the parent span that per-call spans attach to.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Lookup with absence folded into `None`.
    pub(crate) async fn lookup(
        &self,
        email: &Email,
        cancel: &CancellationToken,
    ) -> AuthResult<Option<User>> {
        match with_cancel(cancel, self.repo.find_by_email(email, cancel)).await {
            Ok(user) => Ok(user),
            Err(err) if err.kind() == AuthErrorKind::UserNotFound => Ok(None),
            Err(err) => Err(err.into_storage()),
        }
    }

    pub(crate) async fn hash_password(
        &self,
        password: ClearTextPassword,
        cancel: &CancellationToken,
    ) -> AuthResult<HashedPassword> {
        self.blocking(cancel, move |hasher| Ok(hasher.hash(&password)?))
            .await
    }

    /// `Ok` only when the password re-derives the stored hash.
    pub(crate) async fn verify_password(
        &self,
        hashed: HashedPassword,
        password: ClearTextPassword,
        cancel: &CancellationToken,
    ) -> AuthResult<()> {
        self.blocking(cancel, move |hasher| match hasher.verify(&hashed, &password) {
            Ok(()) => Ok(()),
            Err(PasswordHashError::InvalidHashFormat) => {
                tracing::warn!("stored password hash is malformed");
                Err(AuthError::InvalidCredentials)
            }
            Err(err) => Err(err.into()),
        })
        .await
    }

    /// One verification against the precomputed dummy hash.
    pub(crate) async fn verify_dummy(
        &self,
        password: ClearTextPassword,
        cancel: &CancellationToken,
    ) -> AuthResult<()> {
        self.blocking(cancel, move |hasher| {
            hasher.verify_dummy(&password);
            Ok(())
        })
        .await
    }

    /// Run Argon2 work on the blocking pool. Cancellation abandons the wait;
    /// the job itself runs to completion detached.
    async fn blocking<T, F>(&self, cancel: &CancellationToken, job: F) -> AuthResult<T>
    where
        F: FnOnce(&PasswordHasher) -> AuthResult<T> + Send + 'static,
        T: Send + 'static,
    {
        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }

        let hasher = Arc::clone(&self.hasher);
        let span = Span::current();
        let handle = tokio::task::spawn_blocking(move || span.in_scope(|| job(&hasher)));

        with_cancel(cancel, async move {
            match handle.await {
                Ok(res) => res,
                Err(err) => Err(AuthError::Hashing(format!("hashing task failed: {err}"))),
            }
        })
        .await
    }
}
