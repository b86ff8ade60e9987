//! PostgreSQL Repository Implementation

use platform::password::HashedPassword;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::entity::user::User;
use crate::domain::repository::{UserRepository, with_cancel};
use crate::domain::value_object::{email::Email, user_id::UserId};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed user repository
///
/// Uniqueness is enforced by the `users.email` unique constraint, so
/// concurrent inserts of the same email resolve inside the database.
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserRepository for PgUserRepository {
    async fn find_by_email(
        &self,
        email: &Email,
        cancel: &CancellationToken,
    ) -> AuthResult<Option<User>> {
        let query = async {
            let row = sqlx::query_as::<_, UserRow>(
                r#"
                SELECT
                    user_id,
                    email,
                    password_hash
                FROM users
                WHERE email = $1
                "#,
            )
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

            Ok::<_, AuthError>(row.map(UserRow::into_user))
        };

        with_cancel(cancel, query).await
    }

    async fn save(
        &self,
        email: &Email,
        password_hash: &HashedPassword,
        cancel: &CancellationToken,
    ) -> AuthResult<UserId> {
        let query = async {
            let user_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO users (
                    user_id,
                    email,
                    password_hash
                ) VALUES ($1, $2, $3)
                RETURNING user_id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(email.as_str())
            .bind(password_hash.as_phc_string())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => AuthError::UserExists {
                    email: email.to_string(),
                },
                other => AuthError::from(other),
            })?;

            Ok::<_, AuthError>(UserId::from(user_id))
        };

        with_cancel(cancel, query).await
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: Uuid,
    email: String,
    password_hash: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User::new(
            UserId::from(self.user_id),
            Email::from_db(self.email),
            HashedPassword::from_db(self.password_hash),
        )
    }
}
