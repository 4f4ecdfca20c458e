//! SQLite Contract Repository
//!
//! 软删除语义: delete(soft=true) 仅置位 is_deleted,
//! 查询面在 include_deleted=false 时过滤这些行

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::error::DatabaseError;
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{ContractRepositoryPort, RepositoryError};
use crate::domain::Contract;

/// SQLite Contract Repository
pub struct SqliteContractRepository {
    pool: DbPool,
}

impl SqliteContractRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ContractRow {
    id: String,
    author: String,
    name: String,
    description: String,
    created: String,
    updated: Option<String>,
    created_by: Option<String>,
    last_modified_by: Option<String>,
    create_time: String,
    last_modified_time: Option<String>,
    is_deleted: i64,
}

fn parse_time(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

impl TryFrom<ContractRow> for Contract {
    type Error = RepositoryError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        Ok(Contract {
            id: row.id,
            author: row.author,
            name: row.name,
            description: row.description,
            created: parse_time(&row.created)?,
            updated: row.updated.as_deref().map(parse_time).transpose()?,
            created_by: row.created_by,
            last_modified_by: row.last_modified_by,
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

const CONTRACT_COLUMNS: &str = "id, author, name, description, created, updated, created_by, last_modified_by, create_time, last_modified_time, is_deleted";

#[async_trait]
impl ContractRepositoryPort for SqliteContractRepository {
    async fn get(&self, id: &str, include_deleted: bool) -> Result<Option<Contract>, RepositoryError> {
        let query = if include_deleted {
            format!("SELECT {} FROM contracts WHERE id = ?", CONTRACT_COLUMNS)
        } else {
            format!(
                "SELECT {} FROM contracts WHERE id = ? AND is_deleted = 0",
                CONTRACT_COLUMNS
            )
        };

        let row: Option<ContractRow> = sqlx::query_as(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(Contract::try_from).transpose()
    }

    async fn get_all(&self, include_deleted: bool) -> Result<Vec<Contract>, RepositoryError> {
        let query = if include_deleted {
            format!(
                "SELECT {} FROM contracts ORDER BY create_time DESC",
                CONTRACT_COLUMNS
            )
        } else {
            format!(
                "SELECT {} FROM contracts WHERE is_deleted = 0 ORDER BY create_time DESC",
                CONTRACT_COLUMNS
            )
        };

        let rows: Vec<ContractRow> = sqlx::query_as(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Contract::try_from).collect()
    }

    async fn paged(
        &self,
        page_number: u32,
        page_size: u32,
        include_deleted: bool,
    ) -> Result<(Vec<Contract>, u64), RepositoryError> {
        let deleted = i64::from(include_deleted);

        let (total,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM contracts WHERE is_deleted = ?")
                .bind(deleted)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let offset = i64::from(page_number.saturating_sub(1)) * i64::from(page_size);
        let rows: Vec<ContractRow> = sqlx::query_as(&format!(
            "SELECT {} FROM contracts WHERE is_deleted = ? ORDER BY create_time DESC LIMIT ? OFFSET ?",
            CONTRACT_COLUMNS
        ))
        .bind(deleted)
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let contracts = rows
            .into_iter()
            .map(Contract::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((contracts, total as u64))
    }

    async fn add(&self, contract: &Contract) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO contracts (id, author, name, description, created, updated, created_by, last_modified_by, create_time, last_modified_time, is_deleted)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&contract.id)
        .bind(&contract.author)
        .bind(&contract.name)
        .bind(&contract.description)
        .bind(contract.created.to_rfc3339())
        .bind(contract.updated.map(|t| t.to_rfc3339()))
        .bind(&contract.created_by)
        .bind(&contract.last_modified_by)
        .bind(contract.create_time.to_rfc3339())
        .bind(contract.last_modified_time.map(|t| t.to_rfc3339()))
        .bind(contract.is_deleted as i64)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(contract.id.clone())
            }
            other => RepositoryError::DatabaseError(other.to_string()),
        })?;

        Ok(())
    }

    async fn update(&self, contract: &Contract) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            UPDATE contracts
            SET author = ?, name = ?, description = ?, created = ?, updated = ?, last_modified_by = ?, last_modified_time = ?
            WHERE id = ?
            "#,
        )
        .bind(&contract.author)
        .bind(&contract.name)
        .bind(&contract.description)
        .bind(contract.created.to_rfc3339())
        .bind(contract.updated.map(|t| t.to_rfc3339()))
        .bind(&contract.last_modified_by)
        .bind(Utc::now().to_rfc3339())
        .bind(&contract.id)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, id: &str, soft: bool) -> Result<(), RepositoryError> {
        if soft {
            sqlx::query("UPDATE contracts SET is_deleted = 1, last_modified_time = ? WHERE id = ?")
                .bind(Utc::now().to_rfc3339())
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        } else {
            sqlx::query("DELETE FROM contracts WHERE id = ?")
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        Ok(())
    }
}
