use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    entities::{
        locale::Locale,
        site_content::{SectionKind, SiteContentResponse, SiteSection},
    },
    errors::AppError,
    repositories::content::ContentRepository,
};

pub struct ContentHandler {
    pub content_repo: Arc<dyn ContentRepository>,
}

impl ContentHandler {
    pub fn new(content_repo: Arc<dyn ContentRepository>) -> Self {
        ContentHandler { content_repo }
    }

    /// The section in `locale`, or the other locale's copy flagged as a
    /// fallback when it has not been translated yet.
    pub async fn get_section(&self, locale: Locale, section: &str) -> Result<SiteContentResponse, AppError> {
        let kind: SectionKind = section.parse()?;

        if let Some(stored) = self.content_repo.get_section(kind, locale).await? {
            return Ok(SiteContentResponse::new(locale, stored));
        }

        match self.content_repo.get_section(kind, locale.other()).await? {
            Some(stored) => {
                debug!(%kind, %locale, "Serving section from the other locale");
                Ok(SiteContentResponse::new(locale, stored))
            }
            None => Err(AppError::NotFound(format!("Section '{}' has no content", kind))),
        }
    }

    pub async fn upsert_section(&self, locale: Locale, section: SiteSection) -> Result<SiteContentResponse, AppError> {
        section.validate_section()?;

        let saved = self.content_repo.upsert_section(locale, &section).await?;
        info!(section = %saved.content.kind(), %locale, "Site content saved");

        Ok(SiteContentResponse::new(locale, saved))
    }
}
