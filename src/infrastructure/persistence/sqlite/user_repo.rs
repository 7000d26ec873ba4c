//! SQLite User Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{
    NewUser, RepositoryError, UserChanges, UserRecord, UserRepositoryPort,
};

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password: String,
    created_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

/// 唯一约束冲突翻译为 Duplicate, 不向上层泄露存储细节
fn map_sqlx_error(e: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db) = &e {
        if db.kind() == sqlx::error::ErrorKind::UniqueViolation {
            return RepositoryError::Duplicate("username or email already in use".to_string());
        }
    }
    RepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn create(&self, user: &NewUser) -> Result<i64, RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, email, password, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, email, password, created_at FROM users WHERE id = ? LIMIT 1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, username, email, password, created_at FROM users WHERE email = ? LIMIT 1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_all(&self) -> Result<Vec<UserRecord>, RepositoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(
            "SELECT id, username, email, password, created_at FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(UserRecord::try_from).collect()
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<(), RepositoryError> {
        // COALESCE 保留未提供的字段
        let result = sqlx::query(
            r#"
            UPDATE users SET
                username = COALESCE(?1, username),
                email = COALESCE(?2, email),
                password = COALESCE(?3, password)
            WHERE id = ?4
            "#,
        )
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("user {}", id)));
        }
        Ok(())
    }

    async fn exists(
        &self,
        username: Option<&str>,
        email: Option<&str>,
        exclude_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM users
                WHERE ((?1 IS NOT NULL AND username = ?1)
                    OR (?2 IS NOT NULL AND email = ?2))
                  AND (?3 IS NULL OR id <> ?3)
            )
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(found)
    }
}
