//! Owns every read and write that spans the two locale records of one
//! logical project.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        locale::Locale,
        project::{CleanupError, DeleteReport, NewProjectRequest, Project, MAX_SLUG_LENGTH},
        seo::{SeoSubject, SiteDefaults},
    },
    errors::AppError,
    repositories::{image_store::ImageStore, project::ProjectRepository},
    utils::key_kind::is_uuid_shaped,
};

/// Generated slugs give up after this many numeric suffixes.
const MAX_SLUG_ATTEMPTS: u32 = 1000;

/// What happened to the sibling when images were copied over.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Propagation {
    Propagated,
    SiblingMissing,
    Failed(String),
}

pub struct LinkedPair {
    repo: Arc<dyn ProjectRepository>,
    image_store: Arc<dyn ImageStore>,
    site: SiteDefaults,
}

impl LinkedPair {
    pub fn new(repo: Arc<dyn ProjectRepository>, image_store: Arc<dyn ImageStore>, site: SiteDefaults) -> Self {
        LinkedPair { repo, image_store, site }
    }

    /// Creates the `locale` record of a project. Passing an existing
    /// sibling's `originalId` creates its translation.
    pub async fn create(&self, locale: Locale, request: NewProjectRequest) -> Result<Project, AppError> {
        request.validate()?;
        request.seo.validate()?;

        let original_id = request
            .original_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        if self.repo.find_by_original_id(locale, &original_id).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "A {} record already exists for originalId '{}'",
                locale, original_id
            )));
        }

        let sibling = match request.original_id {
            Some(_) => self.repo.find_by_original_id(locale.other(), &original_id).await?,
            None => None,
        };

        let slug = match request.id {
            Some(slug) => {
                if self.repo.find_by_slug(locale, &slug).await?.is_some() {
                    return Err(AppError::Conflict(format!("Slug '{}' is already used in {}", slug, locale)));
                }
                slug
            }
            None => self.unique_slug(locale, &request.title, None).await?,
        };

        let images = match (&sibling, request.images.is_empty()) {
            (Some(sibling), true) => sibling.images.clone(),
            _ => request.images,
        };

        let order = match (request.order, &sibling) {
            (Some(order), _) => order,
            (None, Some(sibling)) => sibling.order,
            (None, None) => self.repo.next_order(locale).await?,
        };

        let seo = request.seo.with_fallbacks(
            SeoSubject {
                title: &request.title,
                description: &request.description,
                technologies: &request.technologies,
                images: &images,
            },
            locale,
            &self.site,
        );

        let now = Utc::now();
        let project = Project {
            id: slug,
            original_id,
            locale,
            title: request.title,
            description: request.description,
            technologies: request.technologies,
            images,
            status: request.status,
            order,
            seo,
            created_at: now,
            updated_at: now,
        };

        let created = self.repo.insert_project(&project).await?;
        info!(locale = %created.locale, original_id = %created.original_id, slug = %created.id, "Project created");

        if let Some(sibling) = sibling {
            if sibling.images != created.images {
                let propagation = self.propagate_images(&created.original_id, &created.images, locale).await;
                debug!(original_id = %created.original_id, ?propagation, "Sibling images synced after create");
            }
        }

        Ok(created)
    }

    /// Copies `images` onto the other locale's record. Never fails the
    /// caller: a missing sibling is skipped and a failed write is logged.
    pub async fn propagate_images(&self, original_id: &str, images: &[String], source: Locale) -> Propagation {
        let target = source.other();

        match self.repo.set_images(target, original_id, images).await {
            Ok(true) => {
                debug!(%original_id, %target, "Images propagated to sibling");
                Propagation::Propagated
            }
            Ok(false) => {
                debug!(%original_id, %target, "No sibling to propagate images to");
                Propagation::SiblingMissing
            }
            Err(e) => {
                warn!(%original_id, %target, "Failed to propagate images to sibling: {}", e);
                Propagation::Failed(e.to_string())
            }
        }
    }

    /// Deletes the `source` record and its sibling, then removes the image
    /// files both referenced that no other project still lists.
    pub async fn linked_delete(&self, original_id: &str, source: Locale) -> Result<DeleteReport, AppError> {
        let primary = self
            .repo
            .find_by_original_id(source, original_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        if !self.repo.delete_project(source, original_id).await? {
            return Err(AppError::NotFound("Project not found".into()));
        }

        let mut deleted = vec![source];
        let mut images = primary.images;

        let sibling = self.repo.find_by_original_id(source.other(), original_id).await?;
        let sibling_found = sibling.is_some();

        match sibling {
            Some(sibling) => {
                if self.repo.delete_project(sibling.locale, original_id).await? {
                    deleted.push(sibling.locale);
                }
                for url in sibling.images {
                    if !images.contains(&url) {
                        images.push(url);
                    }
                }
            }
            None => debug!(%original_id, "Deleted project had no sibling"),
        }

        let mut removed_images = Vec::new();
        let mut retained_images = Vec::new();
        let mut cleanup_errors = Vec::new();

        for url in images {
            match self.repo.image_in_use(&url, original_id).await {
                Ok(false) => {}
                Ok(true) => {
                    debug!(%original_id, %url, "Image still referenced, keeping file");
                    retained_images.push(url);
                    continue;
                }
                Err(e) => {
                    warn!(%original_id, %url, "Could not check image references: {}", e);
                    cleanup_errors.push(CleanupError { url, message: e.to_string() });
                    continue;
                }
            }

            match self.image_store.remove(&url).await {
                Ok(true) => removed_images.push(url),
                Ok(false) => {}
                Err(e) => {
                    warn!(%original_id, %url, "Failed to remove image file: {}", e);
                    cleanup_errors.push(CleanupError { url, message: e.to_string() });
                }
            }
        }

        info!(%original_id, deleted = deleted.len(), removed = removed_images.len(), "Project pair deleted");

        Ok(DeleteReport {
            original_id: original_id.to_string(),
            deleted,
            sibling_found,
            removed_images,
            retained_images,
            cleanup_errors,
        })
    }

    /// Slug derived from `title`, suffixed `-1`, `-2`, ... until no other
    /// project in `locale` uses it. A record owning the slug with
    /// `exclude_original_id` does not count as a collision.
    pub async fn unique_slug(&self, locale: Locale, title: &str, exclude_original_id: Option<&str>) -> Result<String, AppError> {
        let base = base_slug(title);

        for attempt in 0..MAX_SLUG_ATTEMPTS {
            let candidate = if attempt == 0 { base.clone() } else { format!("{}-{}", base, attempt) };

            match self.repo.find_by_slug(locale, &candidate).await? {
                None => return Ok(candidate),
                Some(existing) if Some(existing.original_id.as_str()) == exclude_original_id => return Ok(candidate),
                Some(_) => continue,
            }
        }

        Err(AppError::Conflict(format!("Could not find a free slug for '{}'", title)))
    }
}

/// Slugified title, trimmed to the slug length limit. Titles that slugify
/// to nothing or to a UUID shape get a `project` prefix.
pub fn base_slug(title: &str) -> String {
    // Leave room for a numeric suffix.
    let max_len = MAX_SLUG_LENGTH as usize - 5;

    let mut slug = slug::slugify(title);
    if slug.len() > max_len {
        slug.truncate(max_len);
        slug = slug.trim_end_matches('-').to_string();
    }

    if slug.is_empty() {
        "project".to_string()
    } else if is_uuid_shaped(&slug) {
        format!("project-{}", slug)
    } else {
        slug
    }
}
