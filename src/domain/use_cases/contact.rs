use std::sync::Arc;

use chrono::{Duration, Utc};
use validator::Validate;

use crate::{
    entities::{
        contact::{ContactForm, ContactListResponse, ContactMessage, ContactMessageInsert, ContactResponse},
        locale::Locale,
    },
    errors::AppError,
    repositories::contact::ContactRepository,
    utils::key_kind::valid_uuid,
};

pub struct ContactHandler {
    pub contact_repo: Arc<dyn ContactRepository>,
}

impl ContactHandler {
    pub fn new(contact_repo: Arc<dyn ContactRepository>) -> Self {
        ContactHandler { contact_repo }
    }

    /// Stores a visitor message and acknowledges it in the visitor's language.
    pub async fn submit(&self, form: ContactForm) -> Result<ContactResponse, AppError> {
        form.validate()?;

        let msg = ContactMessageInsert::from(form);
        let id = self.contact_repo.create_contact_message(&msg).await?;

        let message = match msg.locale {
            Locale::Tr => "Mesajınız alındı.",
            Locale::En => "Your message has been received.",
        };

        Ok(ContactResponse { id, message: message.to_string() })
    }

    pub async fn list_messages(&self, page: u32, per_page: u32) -> Result<ContactListResponse, AppError> {
        let messages = self.contact_repo.list_contact_messages(page, per_page).await?;
        let total = self.contact_repo.count_contact_messages().await?;
        let unread = self.contact_repo.count_unread_messages().await?;

        Ok(ContactListResponse { messages, total, unread })
    }

    pub async fn mark_read(&self, id: &str) -> Result<ContactMessage, AppError> {
        let valid_id = valid_uuid(id)?;

        self.contact_repo.mark_read(&valid_id).await.map_err(|e| match e {
            AppError::NotFound(_) => AppError::NotFound("Contact message not found".to_string()),
            _ => e,
        })
    }

    pub async fn delete_message(&self, id: &str) -> Result<(), AppError> {
        let valid_id = valid_uuid(id)?;
        self.contact_repo.soft_delete_contact_message(&valid_id).await
    }

    /// Drops messages older than `retention_days`.
    pub async fn purge_expired(&self, retention_days: i64) -> Result<u64, AppError> {
        let cutoff = Utc::now() - Duration::days(retention_days);
        self.contact_repo.purge_older_than(cutoff).await
    }
}
