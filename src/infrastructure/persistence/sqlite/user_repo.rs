//! SQLite User Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::DatabaseError;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{RepositoryError, UserRepositoryPort};
use crate::domain::User;

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
    id: String,
    username: String,
    name: Option<String>,
    password_hash: String,
    is_enabled: i64,
    is_system_admin: i64,
    is_locked: i64,
    create_time: String,
    last_modified_time: Option<String>,
    is_deleted: i64,
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            username: row.username,
            name: row.name,
            password_hash: row.password_hash,
            is_enabled: row.is_enabled != 0,
            is_system_admin: row.is_system_admin != 0,
            is_locked: row.is_locked != 0,
            create_time: parse_time(&row.create_time)?,
            last_modified_time: row
                .last_modified_time
                .as_deref()
                .map(parse_time)
                .transpose()?,
            is_deleted: row.is_deleted != 0,
        })
    }
}

const USER_COLUMNS: &str = "id, username, name, password_hash, is_enabled, is_system_admin, is_locked, create_time, last_modified_time, is_deleted";

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn get(&self, id: &str) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {} FROM users WHERE username = ?",
            USER_COLUMNS
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn add(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, name, password_hash, is_enabled, is_system_admin, is_locked, create_time, last_modified_time, is_deleted)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.is_enabled as i64)
        .bind(user.is_system_admin as i64)
        .bind(user.is_locked as i64)
        .bind(user.create_time.to_rfc3339())
        .bind(user.last_modified_time.map(|t| t.to_rfc3339()))
        .bind(user.is_deleted as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(user.username.clone())
            }
            other => RepositoryError::DatabaseError(other.to_string()),
        })?;

        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE users
            SET name = ?, password_hash = ?, is_enabled = ?, is_system_admin = ?, is_locked = ?, last_modified_time = ?, is_deleted = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.is_enabled as i64)
        .bind(user.is_system_admin as i64)
        .bind(user.is_locked as i64)
        .bind(Utc::now().to_rfc3339())
        .bind(user.is_deleted as i64)
        .bind(&user.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
