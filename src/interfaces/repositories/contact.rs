use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    entities::contact::{ContactMessage, ContactMessageInsert, ContactMessageRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxContactRepo,
};

const CONTACT_COLUMNS: &str = "id, name, email, subject, message, locale, is_read, created_at";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContactRepository: Send + Sync {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError>;
    async fn list_contact_messages(&self, page: u32, per_page: u32) -> Result<Vec<ContactMessage>, AppError>;
    async fn count_contact_messages(&self) -> Result<i64, AppError>;
    async fn count_unread_messages(&self) -> Result<i64, AppError>;
    async fn mark_read(&self, id: &Uuid) -> Result<ContactMessage, AppError>;
    async fn soft_delete_contact_message(&self, id: &Uuid) -> Result<(), AppError>;
    /// Permanently removes messages created before `cutoff`. Returns the count.
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError>;
}

impl SqlxContactRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxContactRepo { pool }
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepo {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO contact_messages (id, name, email, subject, message, locale)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&msg.name)
        .bind(&msg.email)
        .bind(&msg.subject)
        .bind(&msg.message)
        .bind(msg.locale.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_contact_messages(&self, page: u32, per_page: u32) -> Result<Vec<ContactMessage>, AppError> {
        let sql = format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_messages WHERE deleted_at IS NULL \
             ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        );
        let offset = (page.saturating_sub(1) as i64) * (per_page as i64);

        let messages = sqlx::query_as::<_, ContactMessageRow>(&sql)
            .bind(per_page as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(ContactMessage::from)
            .collect();

        Ok(messages)
    }

    async fn count_contact_messages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM contact_messages WHERE deleted_at IS NULL")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_unread_messages(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM contact_messages WHERE deleted_at IS NULL AND is_read = FALSE",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn mark_read(&self, id: &Uuid) -> Result<ContactMessage, AppError> {
        let sql = format!(
            "UPDATE contact_messages SET is_read = TRUE WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {CONTACT_COLUMNS}"
        );

        let row = sqlx::query_as::<_, ContactMessageRow>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn soft_delete_contact_message(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE contact_messages SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact message not found".into()));
        }
        Ok(())
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
