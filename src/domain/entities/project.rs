use std::{borrow::Cow, collections::BTreeMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use validator::{Validate, ValidationError};

use crate::{
    entities::{
        locale::Locale,
        option_fields::OptionField,
        seo::{validate_image_ref, ProjectSeo},
    },
    errors::AppError,
    utils::{
        key_kind::is_uuid_shaped,
        markdown::{plain_text_excerpt, safe_markdown_to_html},
    },
};

// ───── Constants ──────────────────────────────────────────────────────
const MAX_TITLE_LENGTH: u64 = 120;
pub const MAX_SLUG_LENGTH: u64 = 80;
const MAX_DESCRIPTION_LENGTH: u64 = 20_000;
const MAX_ORIGINAL_ID_LENGTH: usize = 64;
const MAX_TECHNOLOGIES: usize = 30;
const MAX_TECHNOLOGY_LENGTH: usize = 40;
const MAX_IMAGES: usize = 30;
const SUMMARY_EXCERPT_CHARS: usize = 200;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub struct ProjectRow {
    pub slug: String,
    pub original_id: String,
    pub locale: String,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub images: Vec<String>,
    pub status: bool,
    pub sort_order: i32,
    pub seo: Json<ProjectSeo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One locale's record of a logical project.
///
/// `id` is the locale-scoped slug; `original_id` links the Turkish and
/// English records of the same project and never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub original_id: String,
    pub locale: Locale,
    pub title: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub images: Vec<String>,
    pub status: bool,
    pub order: i32,
    pub seo: ProjectSeo,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProjectRow> for Project {
    type Error = AppError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        let locale = row
            .locale
            .parse::<Locale>()
            .map_err(|_| AppError::InternalError(format!("Stored project has unknown locale '{}'", row.locale)))?;

        Ok(Project {
            id: row.slug,
            original_id: row.original_id,
            locale,
            title: row.title,
            description: row.description,
            technologies: row.technologies,
            images: row.images,
            status: row.status,
            order: row.sort_order,
            seo: row.seo.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProjectRequest {
    /// Explicit slug; generated from the title when absent.
    #[validate(length(min = 1, max = MAX_SLUG_LENGTH), custom(function = "validate_slug"))]
    pub id: Option<String>,

    /// Reuse a sibling's key to create the other-locale translation.
    #[validate(custom(function = "validate_original_id"))]
    pub original_id: Option<String>,

    #[serde(default)]
    #[validate(length(max = MAX_TITLE_LENGTH), custom(function = "validate_title"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: String,

    #[serde(default)]
    #[validate(custom(function = "validate_technologies"))]
    pub technologies: Vec<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_images"))]
    pub images: Vec<String>,

    #[serde(default)]
    pub status: bool,

    pub order: Option<i32>,

    #[serde(default)]
    pub seo: ProjectSeo,
}

/// Partial update. `originalId` is not part of the accepted fields, so a
/// payload carrying it leaves the stored key untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = MAX_SLUG_LENGTH), custom(function = "validate_optional_slug"))]
    pub id: OptionField<String>,

    #[validate(length(max = MAX_TITLE_LENGTH), custom(function = "validate_optional_title"))]
    pub title: OptionField<String>,

    #[validate(length(max = MAX_DESCRIPTION_LENGTH))]
    pub description: OptionField<String>,

    #[validate(custom(function = "validate_optional_technologies"))]
    pub technologies: OptionField<Vec<String>>,

    #[validate(custom(function = "validate_optional_images"))]
    pub images: OptionField<Vec<String>>,

    pub status: OptionField<bool>,

    pub order: OptionField<i32>,

    pub seo: OptionField<ProjectSeo>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReorderProjectsRequest {
    /// `originalId`s in display order.
    #[validate(length(min = 1, max = 500))]
    pub original_ids: Vec<String>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub id: String,
    pub original_id: String,
    pub locale: Locale,
    pub title: String,
    pub excerpt: String,
    pub technologies: Vec<String>,
    pub cover_image: Option<String>,
    pub status: bool,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetailResponse {
    pub id: String,
    pub original_id: String,
    pub locale: Locale,
    pub title: String,
    pub description: String,
    pub description_html: String,
    pub technologies: Vec<String>,
    pub images: Vec<String>,
    pub order: i32,
    pub seo: ProjectSeo,
    /// Published translations, locale code → slug. Includes this record.
    pub translations: BTreeMap<String, String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListResponse<T> {
    pub projects: Vec<T>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}

/// A file that could not be removed while deleting a project pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanupError {
    pub url: String,
    pub message: String,
}

/// Outcome of deleting a project together with its sibling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReport {
    pub original_id: String,
    pub deleted: Vec<Locale>,
    pub sibling_found: bool,
    pub removed_images: Vec<String>,
    /// Files left in place because another project still lists them.
    pub retained_images: Vec<String>,
    pub cleanup_errors: Vec<CleanupError>,
}

/// Outcome of reordering a locale's projects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReorderReport {
    pub updated: usize,
    /// `originalId`s with no record in the locale.
    pub missing: Vec<String>,
}

impl Project {
    pub fn to_summary(&self) -> ProjectSummary {
        ProjectSummary {
            id: self.id.clone(),
            original_id: self.original_id.clone(),
            locale: self.locale,
            title: self.title.clone(),
            excerpt: plain_text_excerpt(&self.description, SUMMARY_EXCERPT_CHARS),
            technologies: self.technologies.clone(),
            cover_image: self.images.first().cloned(),
            status: self.status,
            order: self.order,
        }
    }

    pub fn to_detail_response(&self, seo: ProjectSeo, translations: BTreeMap<String, String>) -> ProjectDetailResponse {
        ProjectDetailResponse {
            id: self.id.clone(),
            original_id: self.original_id.clone(),
            locale: self.locale,
            title: self.title.clone(),
            description: self.description.clone(),
            description_html: safe_markdown_to_html(&self.description),
            technologies: self.technologies.clone(),
            images: self.images.clone(),
            order: self.order,
            seo,
            translations,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Public path of this record's detail page.
    pub fn public_path(&self) -> String {
        project_path(self.locale, &self.id)
    }
}

pub fn project_path(locale: Locale, slug: &str) -> String {
    format!("/{}/projects/{}", locale, slug)
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(new_validation_error("slug_empty", "Slug cannot be empty"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    if is_uuid_shaped(slug) {
        return Err(new_validation_error("slug_uuid_shape", "Slug must not look like a UUID"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

pub fn validate_original_id(id: &str) -> Result<(), ValidationError> {
    if id.is_empty() || id.len() > MAX_ORIGINAL_ID_LENGTH {
        return Err(new_validation_error("original_id_length", "originalId must be between 1 and 64 characters"));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(new_validation_error("original_id_chars", "originalId may contain only letters, digits, '-' or '_'"));
    }
    Ok(())
}

pub fn validate_technologies(technologies: &[String]) -> Result<(), ValidationError> {
    if technologies.len() > MAX_TECHNOLOGIES {
        return Err(new_validation_error("too_many_technologies", "Too many technologies provided"));
    }
    for tech in technologies {
        if tech.trim().is_empty() || tech.chars().count() > MAX_TECHNOLOGY_LENGTH {
            return Err(new_validation_error("invalid_technology_length", "Technology names must be 1-40 characters"));
        }
    }
    Ok(())
}

pub fn validate_images(images: &[String]) -> Result<(), ValidationError> {
    if images.len() > MAX_IMAGES {
        return Err(new_validation_error("too_many_images", "Too many images provided"));
    }
    for image in images {
        if image.is_empty() {
            return Err(new_validation_error("image_empty", "Image URL cannot be empty"));
        }
        validate_image_ref(image)?;
    }
    Ok(())
}

pub fn validate_optional_slug(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(slug) => validate_slug(slug),
        _ => Ok(()),
    }
}

pub fn validate_optional_title(value: &OptionField<String>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(title) => validate_title(title),
        _ => Ok(()),
    }
}

pub fn validate_optional_technologies(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(technologies) => validate_technologies(technologies),
        _ => Ok(()),
    }
}

pub fn validate_optional_images(value: &OptionField<Vec<String>>) -> Result<(), ValidationError> {
    match value {
        OptionField::SetToValue(images) => validate_images(images),
        _ => Ok(()),
    }
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}
