//! Login Use Case
//!
//! Verifies credentials and issues an access token.

use platform::password::ClearTextPassword;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::application::service::AuthService;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthErrorKind, AuthResult};

const OP: &str = "auth.login";

impl<R: UserRepository> AuthService<R> {
    /// Authenticate by email and password and return a signed access token.
    ///
    /// An unknown email and a wrong password both fail with
    /// [`AuthError::InvalidCredentials`] after the same amount of hashing
    /// work. Empty strings are ordinary (failing) credentials.
    pub async fn login(
        &self,
        cancel: &CancellationToken,
        email: &str,
        password: &str,
    ) -> AuthResult<String> {
        let span = tracing::info_span!(parent: &self.span, "auth.login", email = %email);
        let email = Email::new(email);
        let password = ClearTextPassword::new(password);

        self.login_inner(cancel, email, password)
            .instrument(span)
            .await
            .map_err(|err| err.with_op(OP))
    }

    async fn login_inner(
        &self,
        cancel: &CancellationToken,
        email: Email,
        password: ClearTextPassword,
    ) -> AuthResult<String> {
        tracing::info!("attempting to login user");

        let user = match self.lookup(&email, cancel).await {
            Ok(user) => user,
            Err(err) => {
                log_failure(&err, "failed to get user");
                return Err(err);
            }
        };

        let Some(user) = user else {
            self.verify_dummy(password, cancel).await?;
            tracing::warn!("user not found");
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(err) = self
            .verify_password(user.password_hash.clone(), password, cancel)
            .await
        {
            match err.kind() {
                AuthErrorKind::InvalidCredentials => tracing::warn!("invalid credentials"),
                _ => log_failure(&err, "failed to verify password"),
            }
            return Err(err);
        }

        let token = self
            .tokens
            .issue(&user.user_id, user.email.as_str())
            .inspect_err(|err| tracing::error!(error = %err, "failed to generate token"))?;

        tracing::info!(user_id = %user.user_id, "user logged in successfully");
        Ok(token)
    }
}

pub(crate) fn log_failure(err: &AuthError, message: &'static str) {
    if err.kind() == AuthErrorKind::Cancelled {
        tracing::debug!(error = %err, "{message}");
    } else {
        tracing::error!(error = %err, "{message}");
    }
}
