use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::users::repo_types::{NewUser, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The unique constraint on `users.email` rejected the write.
    #[error("email already exists")]
    EmailTaken,

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Persistence contract for user rows.
///
/// `update` and `delete` report a missing row as `Ok(None)` / `Ok(false)`
/// rather than an error, leaving the HTTP mapping to the caller.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;
    async fn create(&self, new_user: &NewUser) -> Result<User, StoreError>;
    async fn update(&self, id: i64, changes: &NewUser) -> Result<Option<User>, StoreError>;
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .map(|db_err| db_err.is_unique_violation())
        .unwrap_or(false)
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(user)
    }

    async fn create(&self, new_user: &NewUser) -> Result<User, StoreError> {
        let mut tx = self.db.begin().await?;
        let inserted = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email)
            VALUES ($1, $2)
            RETURNING id, name, email
            "#,
        )
        .bind(&new_user.name)
        .bind(&new_user.email)
        .fetch_one(&mut *tx)
        .await;

        match inserted {
            Ok(user) => {
                tx.commit().await?;
                debug!(user_id = user.id, "user inserted");
                Ok(user)
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                warn!(email = %new_user.email, "insert rejected: email taken");
                Err(StoreError::EmailTaken)
            }
            // Dropping `tx` rolls it back.
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, id: i64, changes: &NewUser) -> Result<Option<User>, StoreError> {
        let mut tx = self.db.begin().await?;
        let updated = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
               SET name = $1, email = $2
             WHERE id = $3
            RETURNING id, name, email
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await;

        match updated {
            Ok(row) => {
                tx.commit().await?;
                Ok(row)
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                warn!(user_id = id, email = %changes.email, "update rejected: email taken");
                Err(StoreError::EmailTaken)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let mut tx = self.db.begin().await?;
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
