use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::{
    entities::{locale::Locale, project::Project},
    errors::AppError,
    repositories::project::ProjectRepository,
    utils::key_kind::{classify_key, KeyKind},
};

/// Which lookup found the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolvedBy {
    /// `(locale, slug = key)`.
    Slug,
    /// UUID-shaped key matched `(locale, originalId = key)`.
    CrossLocaleId,
    /// Non-UUID key matched `(locale, originalId = key)` after the slug lookup missed.
    CrossLocaleFallback,
    /// Key matched a record in the other locale whose sibling lives in `locale`.
    SiblingBridge,
}

impl ResolvedBy {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolvedBy::Slug => "slug",
            ResolvedBy::CrossLocaleId => "crossLocaleId",
            ResolvedBy::CrossLocaleFallback => "crossLocaleFallback",
            ResolvedBy::SiblingBridge => "siblingBridge",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub project: Project,
    pub resolved_by: ResolvedBy,
}

/// Finds the record a URL key refers to in a locale, whatever form the key
/// takes: this locale's slug, the shared `originalId`, or the other
/// locale's slug.
pub struct Resolver {
    repo: Arc<dyn ProjectRepository>,
}

impl Resolver {
    pub fn new(repo: Arc<dyn ProjectRepository>) -> Self {
        Resolver { repo }
    }

    /// Runs the lookup strategies in order; first match wins. Ignores
    /// `status`.
    pub async fn resolve(&self, locale: Locale, key: &str) -> Result<Option<Resolution>, AppError> {
        let key = key.trim();
        if key.is_empty() {
            return Ok(None);
        }

        let direct = match classify_key(key) {
            KeyKind::CrossLocaleId => {
                if let Some(project) = self.repo.find_by_original_id(locale, key).await? {
                    Some((project, ResolvedBy::CrossLocaleId))
                } else {
                    self.repo
                        .find_by_slug(locale, key)
                        .await?
                        .map(|p| (p, ResolvedBy::Slug))
                }
            }
            KeyKind::Slug => {
                if let Some(project) = self.repo.find_by_slug(locale, key).await? {
                    Some((project, ResolvedBy::Slug))
                } else {
                    self.repo
                        .find_by_original_id(locale, key)
                        .await?
                        .map(|p| (p, ResolvedBy::CrossLocaleFallback))
                }
            }
        };

        if let Some((project, resolved_by)) = direct {
            return Ok(Some(Resolution { project, resolved_by }));
        }

        let Some(foreign) = self.repo.find_by_slug_or_original_id(locale.other(), key).await? else {
            debug!(%locale, %key, "No project matches key");
            return Ok(None);
        };

        let bridged = self.repo.find_by_original_id(locale, &foreign.original_id).await?;
        if bridged.is_none() {
            debug!(%locale, %key, original_id = %foreign.original_id, "Key matches an untranslated project");
        }

        Ok(bridged.map(|project| Resolution {
            project,
            resolved_by: ResolvedBy::SiblingBridge,
        }))
    }

    /// The other locale's record of `project`, any status.
    pub async fn sibling(&self, project: &Project) -> Result<Option<Project>, AppError> {
        self.repo.find_by_original_id(project.locale.other(), &project.original_id).await
    }

    /// Admin lookup: any status, `NotFound` when nothing matches.
    pub async fn require(&self, locale: Locale, key: &str) -> Result<Resolution, AppError> {
        self.resolve(locale, key)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Project '{}' not found in {}", key, locale)))
    }

    /// Public lookup: unpublished records are reported as missing.
    pub async fn require_published(&self, locale: Locale, key: &str) -> Result<Resolution, AppError> {
        match self.resolve(locale, key).await? {
            Some(resolution) if resolution.project.status => Ok(resolution),
            _ => Err(AppError::NotFound(format!("Project '{}' not found in {}", key, locale))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{entities::seo::ProjectSeo, repositories::project::MockProjectRepository};
    use chrono::Utc;
    use mockall::{predicate::*, Sequence};

    const U1: &str = "550e8400-e29b-41d4-a716-446655440000";

    fn project(locale: Locale, slug: &str, original_id: &str, status: bool) -> Project {
        Project {
            id: slug.into(),
            original_id: original_id.into(),
            locale,
            title: slug.into(),
            description: String::new(),
            technologies: vec![],
            images: vec![],
            status,
            order: 0,
            seo: ProjectSeo::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn slug_match_wins_first() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug()
            .with(eq(Locale::Tr), eq("vazo-1"))
            .times(1)
            .returning(|_, _| Ok(Some(project(Locale::Tr, "vazo-1", U1, true))));
        repo.expect_find_by_original_id().never();
        repo.expect_find_by_slug_or_original_id().never();

        let found = Resolver::new(Arc::new(repo)).resolve(Locale::Tr, "vazo-1").await.unwrap().unwrap();
        assert_eq!(found.resolved_by, ResolvedBy::Slug);
        assert_eq!(found.project.id, "vazo-1");
    }

    #[tokio::test]
    async fn uuid_keys_try_cross_locale_id_before_slug_and_bridge() {
        let mut repo = MockProjectRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_original_id()
            .with(eq(Locale::En), eq(U1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        repo.expect_find_by_slug()
            .with(eq(Locale::En), eq(U1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        repo.expect_find_by_slug_or_original_id()
            .with(eq(Locale::Tr), eq(U1))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));

        let found = Resolver::new(Arc::new(repo)).resolve(Locale::En, U1).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn uuid_key_resolves_as_cross_locale_id() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_original_id()
            .with(eq(Locale::En), eq(U1))
            .returning(|_, _| Ok(Some(project(Locale::En, "vase-1", U1, true))));
        repo.expect_find_by_slug().never();

        let found = Resolver::new(Arc::new(repo)).resolve(Locale::En, U1).await.unwrap().unwrap();
        assert_eq!(found.resolved_by, ResolvedBy::CrossLocaleId);
        assert_eq!(found.project.id, "vase-1");
    }

    #[tokio::test]
    async fn non_uuid_original_id_falls_back_after_slug() {
        let mut repo = MockProjectRepository::new();
        let mut seq = Sequence::new();

        repo.expect_find_by_slug()
            .with(eq(Locale::Tr), eq("legacy-42"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(None));
        repo.expect_find_by_original_id()
            .with(eq(Locale::Tr), eq("legacy-42"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(Some(project(Locale::Tr, "vazo", "legacy-42", true))));

        let found = Resolver::new(Arc::new(repo)).resolve(Locale::Tr, "legacy-42").await.unwrap().unwrap();
        assert_eq!(found.resolved_by, ResolvedBy::CrossLocaleFallback);
    }

    #[tokio::test]
    async fn other_locale_slug_bridges_to_sibling() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug()
            .with(eq(Locale::En), eq("vazo-1"))
            .returning(|_, _| Ok(None));
        repo.expect_find_by_original_id()
            .with(eq(Locale::En), eq("vazo-1"))
            .returning(|_, _| Ok(None));
        repo.expect_find_by_slug_or_original_id()
            .with(eq(Locale::Tr), eq("vazo-1"))
            .returning(|_, _| Ok(Some(project(Locale::Tr, "vazo-1", U1, true))));
        repo.expect_find_by_original_id()
            .with(eq(Locale::En), eq(U1))
            .returning(|_, _| Ok(Some(project(Locale::En, "vase-1", U1, true))));

        let found = Resolver::new(Arc::new(repo)).resolve(Locale::En, "vazo-1").await.unwrap().unwrap();
        assert_eq!(found.resolved_by, ResolvedBy::SiblingBridge);
        assert_eq!(found.project.id, "vase-1");
        assert_eq!(found.project.locale, Locale::En);
    }

    #[tokio::test]
    async fn untranslated_project_is_not_found() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug().returning(|_, _| Ok(None));
        repo.expect_find_by_original_id()
            .with(eq(Locale::En), always())
            .returning(|_, _| Ok(None));
        repo.expect_find_by_slug_or_original_id()
            .returning(|_, _| Ok(Some(project(Locale::Tr, "vazo-1", U1, true))));

        let resolver = Resolver::new(Arc::new(repo));
        assert!(resolver.resolve(Locale::En, "vazo-1").await.unwrap().is_none());
        assert!(matches!(
            resolver.require(Locale::En, "vazo-1").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn unpublished_records_are_hidden_publicly() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug()
            .returning(|_, _| Ok(Some(project(Locale::En, "vase-1", U1, false))));

        let resolver = Resolver::new(Arc::new(repo));
        assert!(resolver.require(Locale::En, "vase-1").await.is_ok());
        assert!(matches!(
            resolver.require_published(Locale::En, "vase-1").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn blank_keys_never_hit_storage() {
        let repo = MockProjectRepository::new();
        let found = Resolver::new(Arc::new(repo)).resolve(Locale::Tr, "  ").await.unwrap();
        assert!(found.is_none());
    }
}
