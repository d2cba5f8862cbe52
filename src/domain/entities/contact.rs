use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{entities::locale::Locale, utils::markdown::strip_html};

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ContactForm {
    #[validate(length(min = 2, max = 100))]
    pub name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(max = 150))]
    pub subject: Option<String>,

    #[validate(length(min = 10, max = 5000))]
    pub message: String,

    #[serde(default)]
    pub locale: Locale,
}

/// Sanitized form, ready to store.
#[derive(Debug, Clone)]
pub struct ContactMessageInsert {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub locale: Locale,
}

impl From<ContactForm> for ContactMessageInsert {
    fn from(form: ContactForm) -> Self {
        ContactMessageInsert {
            name: strip_html(form.name.trim()),
            email: form.email.trim().to_lowercase(),
            subject: form
                .subject
                .map(|s| strip_html(s.trim()))
                .filter(|s| !s.is_empty()),
            message: strip_html(form.message.trim()),
            locale: form.locale,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ContactMessageRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub locale: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
    pub locale: Locale,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<ContactMessageRow> for ContactMessage {
    fn from(row: ContactMessageRow) -> Self {
        ContactMessage {
            id: row.id,
            name: row.name,
            email: row.email,
            subject: row.subject,
            message: row.message,
            // Unknown locales in old rows are shown as the default language.
            locale: row.locale.parse().unwrap_or_default(),
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactResponse {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListResponse {
    pub messages: Vec<ContactMessage>,
    pub total: i64,
    pub unread: i64,
}
