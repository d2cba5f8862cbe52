use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::{Validate, ValidationErrors};

use crate::{
    entities::{locale::Locale, seo::validate_image_ref},
    errors::AppError,
    utils::markdown::safe_markdown_to_html,
};

// ───── Section kinds ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Hero,
    About,
    Skills,
    Footer,
    Navigation,
}

impl SectionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SectionKind::Hero => "hero",
            SectionKind::About => "about",
            SectionKind::Skills => "skills",
            SectionKind::Footer => "footer",
            SectionKind::Navigation => "navigation",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hero" => Ok(SectionKind::Hero),
            "about" => Ok(SectionKind::About),
            "skills" => Ok(SectionKind::Skills),
            "footer" => Ok(SectionKind::Footer),
            "navigation" | "nav" => Ok(SectionKind::Navigation),
            other => Err(AppError::NotFound(format!("Unknown content section '{}'", other))),
        }
    }
}

// ───── Section bodies ────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct HeroContent {
    #[validate(length(min = 1, max = 120))]
    pub title: String,
    #[validate(length(max = 300))]
    #[serde(default)]
    pub subtitle: String,
    #[validate(length(max = 40))]
    pub cta_label: Option<String>,
    #[validate(custom(function = "validate_href"))]
    pub cta_href: Option<String>,
    #[validate(custom(function = "validate_image_ref"))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AboutContent {
    #[validate(length(min = 1, max = 120))]
    pub heading: String,
    #[validate(length(max = 20_000))]
    #[serde(default)]
    pub body_markdown: String,
    #[validate(custom(function = "validate_image_ref"))]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SkillGroup {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    #[validate(length(max = 50))]
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SkillsContent {
    #[validate(length(min = 1, max = 120))]
    pub heading: String,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub groups: Vec<SkillGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LinkItem {
    #[validate(length(min = 1, max = 60))]
    pub label: String,
    #[validate(custom(function = "validate_href"))]
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    #[validate(length(min = 1, max = 40))]
    pub platform: String,
    #[validate(url)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    #[validate(length(max = 300))]
    #[serde(default)]
    pub text: String,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub links: Vec<LinkItem>,
    #[validate(length(max = 20))]
    #[serde(default)]
    pub socials: Vec<SocialLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NavigationContent {
    #[validate(length(max = 20))]
    #[serde(default)]
    pub items: Vec<LinkItem>,
}

/// A site content section, tagged by `section`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "section", rename_all = "lowercase")]
pub enum SiteSection {
    Hero(HeroContent),
    About(AboutContent),
    Skills(SkillsContent),
    Footer(FooterContent),
    Navigation(NavigationContent),
}

impl SiteSection {
    pub fn kind(&self) -> SectionKind {
        match self {
            SiteSection::Hero(_) => SectionKind::Hero,
            SiteSection::About(_) => SectionKind::About,
            SiteSection::Skills(_) => SectionKind::Skills,
            SiteSection::Footer(_) => SectionKind::Footer,
            SiteSection::Navigation(_) => SectionKind::Navigation,
        }
    }

    /// Validates the body, including every nested list entry.
    pub fn validate_section(&self) -> Result<(), ValidationErrors> {
        match self {
            SiteSection::Hero(c) => c.validate(),
            SiteSection::About(c) => c.validate(),
            SiteSection::Skills(c) => {
                c.validate()?;
                c.groups.iter().try_for_each(|g| {
                    g.validate()?;
                    validate_items(&g.items)
                })
            }
            SiteSection::Footer(c) => {
                c.validate()?;
                c.links.iter().try_for_each(Validate::validate)?;
                c.socials.iter().try_for_each(Validate::validate)
            }
            SiteSection::Navigation(c) => {
                c.validate()?;
                c.items.iter().try_for_each(Validate::validate)
            }
        }
    }
}

fn validate_items(items: &[String]) -> Result<(), ValidationErrors> {
    if items.iter().any(|i| i.trim().is_empty() || i.chars().count() > 60) {
        let mut errors = ValidationErrors::new();
        let mut err = validator::ValidationError::new("invalid_skill_item");
        err.message = Some("Skill items must be 1-60 characters".into());
        errors.add("items", err);
        return Err(errors);
    }
    Ok(())
}

/// Links may be site-relative paths, in-page anchors, mailto or http(s).
pub fn validate_href(href: &str) -> Result<(), validator::ValidationError> {
    let ok = (href.starts_with('/') && !href.starts_with("//"))
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || url::Url::parse(href).is_ok_and(|u| u.scheme() == "http" || u.scheme() == "https");

    if ok {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("invalid_href");
        err.message = Some("Link must be a relative path, anchor, mailto or http(s) URL".into());
        Err(err)
    }
}

// ───── Storage & responses ───────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct SiteContentRow {
    pub section: String,
    pub locale: String,
    pub content: Json<SiteSection>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub locale: Locale,
    pub content: SiteSection,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SiteContentRow> for SiteContent {
    type Error = AppError;

    fn try_from(row: SiteContentRow) -> Result<Self, Self::Error> {
        let locale = row
            .locale
            .parse::<Locale>()
            .map_err(|_| AppError::InternalError(format!("Stored section has unknown locale '{}'", row.locale)))?;

        if row.content.0.kind().as_str() != row.section {
            return Err(AppError::InternalError(format!(
                "Stored section '{}' holds a '{}' body",
                row.section,
                row.content.0.kind()
            )));
        }

        Ok(SiteContent {
            locale,
            content: row.content.0,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContentResponse {
    /// Locale the caller asked for.
    pub locale: Locale,
    /// Locale the content actually came from.
    pub source_locale: Locale,
    pub fallback: bool,
    pub content: SiteSection,
    /// Rendered body for sections carrying Markdown.
    pub html: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl SiteContentResponse {
    pub fn new(requested: Locale, stored: SiteContent) -> Self {
        let html = match &stored.content {
            SiteSection::About(about) => Some(safe_markdown_to_html(&about.body_markdown)),
            _ => None,
        };

        SiteContentResponse {
            locale: requested,
            source_locale: stored.locale,
            fallback: requested != stored.locale,
            content: stored.content,
            html,
            updated_at: stored.updated_at,
        }
    }
}
