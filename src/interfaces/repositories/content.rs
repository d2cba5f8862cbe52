use async_trait::async_trait;
use sqlx::{types::Json, PgPool};

use crate::{
    entities::{
        locale::Locale,
        site_content::{SectionKind, SiteContent, SiteContentRow, SiteSection},
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxContentRepo,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ContentRepository: Sync + Send {
    async fn get_section(&self, section: SectionKind, locale: Locale) -> Result<Option<SiteContent>, AppError>;
    async fn upsert_section(&self, locale: Locale, content: &SiteSection) -> Result<SiteContent, AppError>;
}

impl SqlxContentRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxContentRepo { pool }
    }
}

#[async_trait]
impl ContentRepository for SqlxContentRepo {
    async fn get_section(&self, section: SectionKind, locale: Locale) -> Result<Option<SiteContent>, AppError> {
        sqlx::query_as::<_, SiteContentRow>(
            "SELECT section, locale, content, updated_at FROM site_content WHERE section = $1 AND locale = $2",
        )
        .bind(section.as_str())
        .bind(locale.as_str())
        .fetch_optional(&self.pool)
        .await?
        .map(SiteContent::try_from)
        .transpose()
    }

    async fn upsert_section(&self, locale: Locale, content: &SiteSection) -> Result<SiteContent, AppError> {
        let row = sqlx::query_as::<_, SiteContentRow>(
            r#"
            INSERT INTO site_content (section, locale, content, updated_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (section, locale)
            DO UPDATE SET content = EXCLUDED.content, updated_at = NOW()
            RETURNING section, locale, content, updated_at
            "#,
        )
        .bind(content.kind().as_str())
        .bind(locale.as_str())
        .bind(Json(content))
        .fetch_one(&self.pool)
        .await?;

        SiteContent::try_from(row)
    }
}
