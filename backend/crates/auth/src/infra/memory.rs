//! In-Memory Repository Implementation
//!
//! Process-local store for tests and debug runs without a database.

use std::collections::HashMap;
use std::sync::Mutex;

use platform::password::HashedPassword;
use tokio_util::sync::CancellationToken;

use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// Users keyed by exact email
///
/// The check-and-insert in [`save`](UserRepository::save) happens under a
/// single lock acquisition, so duplicate registrations cannot both succeed.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Email, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> AuthResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> AuthResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> AuthResult<std::sync::MutexGuard<'_, HashMap<Email, User>>> {
        self.users
            .lock()
            .map_err(|_| AuthError::Storage("user store lock poisoned".to_string()))
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(
        &self,
        email: &Email,
        cancel: &CancellationToken,
    ) -> AuthResult<Option<User>> {
        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }
        Ok(self.lock()?.get(email).cloned())
    }

    async fn save(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
        cancel: &CancellationToken,
    ) -> AuthResult<UserId> {
        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }

        let mut users = self.lock()?;
        if users.contains_key(email) {
            return Err(AuthError::UserExists {
                email: email.to_string(),
            });
        }

        let user_id = UserId::generate();
        users.insert(
            email.clone(),
            User::new(user_id.clone(), email.clone(), password_hash.clone()),
        );
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuthErrorKind;

    fn hash() -> HashedPassword {
        HashedPassword::from_db("$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA")
    }

    #[tokio::test]
    async fn test_save_then_find() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        let email = Email::new("a@x.com");

        let id = repo.save(&email, &hash(), &cancel).await.unwrap();
        let user = repo.find_by_email(&email, &cancel).await.unwrap().unwrap();
        assert_eq!(user.user_id, id);
        assert_eq!(user.email, email);
        assert_eq!(repo.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_missing_is_none() {
        let repo = InMemoryUserRepository::new();
        let found = repo
            .find_by_email(&Email::new("nobody@x.com"), &CancellationToken::new())
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_save_rejected() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        let email = Email::new("dup@x.com");

        repo.save(&email, &hash(), &cancel).await.unwrap();
        let err = repo.save(&email, &hash(), &cancel).await.unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::UserExists);
        assert_eq!(repo.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lookup_is_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        repo.save(&Email::new("Case@x.com"), &hash(), &cancel)
            .await
            .unwrap();

        let found = repo
            .find_by_email(&Email::new("case@x.com"), &cancel)
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_cancelled_token() {
        let repo = InMemoryUserRepository::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = repo
            .save(&Email::new("a@x.com"), &hash(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::Cancelled);
        assert!(repo.is_empty().unwrap());
    }

    #[test]
    fn test_poisoned_lock_is_storage_error() {
        let repo = std::sync::Arc::new(InMemoryUserRepository::new());
        let poisoner = std::sync::Arc::clone(&repo);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.users.lock().unwrap();
            panic!("poison the user store");
        })
        .join();

        assert_eq!(repo.len().unwrap_err().kind(), AuthErrorKind::Storage);
        assert_eq!(repo.is_empty().unwrap_err().kind(), AuthErrorKind::Storage);
    }
}
