//! SQLite Attachment Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::DbPool;
use crate::application::ports::{AttachmentRepositoryPort, RepositoryError};
use crate::domain::Attachment;

/// SQLite Attachment Repository
pub struct SqliteAttachmentRepository {
    pool: DbPool,
}

impl SqliteAttachmentRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AttachmentRow {
    id: String,
    contract_id: String,
    file_name: String,
    content_type: String,
    size: i64,
    stored_path: String,
    create_time: String,
}

impl TryFrom<AttachmentRow> for Attachment {
    type Error = RepositoryError;

    fn try_from(row: AttachmentRow) -> Result<Self, Self::Error> {
        Ok(Attachment {
            id: row.id,
            contract_id: row.contract_id,
            file_name: row.file_name,
            content_type: row.content_type,
            size: row.size as u64,
            stored_path: row.stored_path,
            create_time: DateTime::parse_from_rfc3339(&row.create_time)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl AttachmentRepositoryPort for SqliteAttachmentRepository {
    async fn get(&self, id: &str) -> Result<Option<Attachment>, RepositoryError> {
        let row: Option<AttachmentRow> = sqlx::query_as(
            "SELECT id, contract_id, file_name, content_type, size, stored_path, create_time FROM attachments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(Attachment::try_from).transpose()
    }

    async fn find_by_contract(&self, contract_id: &str) -> Result<Vec<Attachment>, RepositoryError> {
        let rows: Vec<AttachmentRow> = sqlx::query_as(
            "SELECT id, contract_id, file_name, content_type, size, stored_path, create_time FROM attachments WHERE contract_id = ? ORDER BY create_time",
        )
        .bind(contract_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Attachment::try_from).collect()
    }

    async fn add(&self, attachment: &Attachment) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO attachments (id, contract_id, file_name, content_type, size, stored_path, create_time)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&attachment.id)
        .bind(&attachment.contract_id)
        .bind(&attachment.file_name)
        .bind(&attachment.content_type)
        .bind(attachment.size as i64)
        .bind(&attachment.stored_path)
        .bind(attachment.create_time.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete_by_contract(&self, contract_id: &str) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM attachments WHERE contract_id = ?")
            .bind(contract_id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
