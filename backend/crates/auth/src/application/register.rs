//! Register Use Case
//!
//! Creates a user with a freshly hashed password. No token is issued.

use platform::password::ClearTextPassword;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::application::login::log_failure;
use crate::application::service::AuthService;
use crate::domain::repository::{UserRepository, with_cancel};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthErrorKind, AuthResult};

const OP: &str = "auth.register";

impl<R: UserRepository> AuthService<R> {
    /// Register a new user and return the id the repository assigned.
    ///
    /// Fails with [`AuthError::UserExists`] when the email is taken, whether
    /// detected by the up-front lookup or by the repository on save.
    pub async fn register(
        &self,
        cancel: &CancellationToken,
        email: &str,
        password: &str,
    ) -> AuthResult<UserId> {
        let span = tracing::info_span!(parent: &self.span, "auth.register", email = %email);
        let email = Email::new(email);
        let password = ClearTextPassword::new(password);

        self.register_inner(cancel, email, password)
            .instrument(span)
            .await
            .map_err(|err| err.with_op(OP))
    }

    async fn register_inner(
        &self,
        cancel: &CancellationToken,
        email: Email,
        password: ClearTextPassword,
    ) -> AuthResult<UserId> {
        tracing::info!("registering user");

        match self.lookup(&email, cancel).await {
            Ok(None) => {}
            Ok(Some(_)) => {
                tracing::warn!("user already exists");
                return Err(AuthError::UserExists {
                    email: email.into_db(),
                });
            }
            Err(err) => {
                log_failure(&err, "failed to check existing user");
                return Err(err);
            }
        }

        let hash = self
            .hash_password(password, cancel)
            .await
            .inspect_err(|err| log_failure(err, "failed to generate password hash"))?;

        let saved = with_cancel(cancel, self.repo.save(&email, &hash, cancel))
            .await
            .map_err(|err| match err.kind() {
                AuthErrorKind::UserExists => err,
                _ => err.into_storage(),
            });

        match saved {
            Ok(user_id) => {
                tracing::info!(user_id = %user_id, "user registered");
                Ok(user_id)
            }
            Err(err) if err.kind() == AuthErrorKind::UserExists => {
                tracing::warn!("user already exists");
                Err(err)
            }
            Err(err) => {
                log_failure(&err, "failed to save user");
                Err(err)
            }
        }
    }
}
