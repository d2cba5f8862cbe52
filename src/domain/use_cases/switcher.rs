use std::sync::Arc;

use serde::Serialize;

use crate::{
    entities::{locale::Locale, project::project_path},
    errors::AppError,
    use_cases::resolver::{ResolvedBy, Resolver},
};

/// Where the language switcher sends a visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchTarget {
    pub locale: Locale,
    pub path: String,
    /// False when the visitor is sent to the target site root instead of
    /// the same page.
    pub available: bool,
    pub resolved_by: Option<ResolvedBy>,
}

impl SwitchTarget {
    fn root(locale: Locale) -> Self {
        SwitchTarget {
            locale,
            path: format!("/{}", locale),
            available: false,
            resolved_by: None,
        }
    }
}

pub struct LanguageSwitcher {
    resolver: Arc<Resolver>,
}

impl LanguageSwitcher {
    pub fn new(resolver: Arc<Resolver>) -> Self {
        LanguageSwitcher { resolver }
    }

    /// Target for the project page `key` viewed in `current`. The key is
    /// resolved where it came from and followed to its sibling; only a
    /// published sibling is linked. Keys unknown in `current` are tried
    /// in the target locale directly.
    pub async fn switch_project(&self, current: Locale, key: &str) -> Result<SwitchTarget, AppError> {
        let target = current.other();

        let linked = match self.resolver.resolve(current, key).await? {
            Some(resolution) => self
                .resolver
                .sibling(&resolution.project)
                .await?
                .map(|sibling| (sibling, ResolvedBy::SiblingBridge)),
            None => self
                .resolver
                .resolve(target, key)
                .await?
                .map(|resolution| (resolution.project, resolution.resolved_by)),
        };

        match linked {
            Some((project, resolved_by)) if project.status => Ok(SwitchTarget {
                locale: target,
                path: project_path(target, &project.id),
                available: true,
                resolved_by: Some(resolved_by),
            }),
            _ => Ok(SwitchTarget::root(target)),
        }
    }

    /// Target for any site path. Project detail pages go through
    /// [`Self::switch_project`]; other paths swap the locale prefix.
    pub async fn switch_path(&self, current: Locale, path: &str) -> Result<SwitchTarget, AppError> {
        let rest = strip_locale_prefix(path);
        let segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

        if let ["projects", key] = segments.as_slice() {
            return self.switch_project(current, key).await;
        }

        Ok(SwitchTarget {
            locale: current.other(),
            path: swap_locale_prefix(path, current.other()),
            available: true,
            resolved_by: None,
        })
    }
}

/// Path without its leading `/{locale}` segment, always starting with `/`
/// unless empty.
fn strip_locale_prefix(path: &str) -> &str {
    let trimmed = path.trim_start_matches('/');
    let (first, rest) = trimmed.split_once('/').unwrap_or((trimmed, ""));

    if first.parse::<Locale>().is_ok() {
        let start = path.len() - rest.len();
        // Keep the slash before `rest`.
        if rest.is_empty() { "" } else { &path[start - 1..] }
    } else {
        path
    }
}

/// `/tr/about` → `/en/about`, `/about` → `/en/about`, `/tr` → `/en`.
pub fn swap_locale_prefix(path: &str, target: Locale) -> String {
    let rest = strip_locale_prefix(path);
    let rest = rest.trim_end_matches('/');

    if rest.is_empty() || rest == "/" {
        format!("/{}", target)
    } else if rest.starts_with('/') {
        format!("/{}{}", target, rest)
    } else {
        format!("/{}/{}", target, rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        entities::{project::Project, seo::ProjectSeo},
        repositories::project::MockProjectRepository,
    };
    use chrono::Utc;
    use mockall::predicate::*;

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

    fn switcher(repo: MockProjectRepository) -> LanguageSwitcher {
        LanguageSwitcher::new(Arc::new(Resolver::new(Arc::new(repo))))
    }

    #[test]
    fn prefixes_are_swapped() {
        assert_eq!(swap_locale_prefix("/tr/about", Locale::En), "/en/about");
        assert_eq!(swap_locale_prefix("/en", Locale::Tr), "/tr");
        assert_eq!(swap_locale_prefix("/en/", Locale::Tr), "/tr");
        assert_eq!(swap_locale_prefix("/contact", Locale::En), "/en/contact");
        assert_eq!(swap_locale_prefix("", Locale::En), "/en");
        assert_eq!(swap_locale_prefix("/tr/projects", Locale::En), "/en/projects");
    }

    #[tokio::test]
    async fn published_sibling_is_linked() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug()
            .with(eq(Locale::Tr), eq("vazo-1"))
            .returning(|_, _| Ok(Some(project(Locale::Tr, "vazo-1", "U1", true))));
        repo.expect_find_by_original_id()
            .with(eq(Locale::En), eq("U1"))
            .returning(|_, _| Ok(Some(project(Locale::En, "vase-1", "U1", true))));

        let target = switcher(repo).switch_project(Locale::Tr, "vazo-1").await.unwrap();
        assert_eq!(target.path, "/en/projects/vase-1");
        assert!(target.available);
        assert_eq!(target.resolved_by, Some(ResolvedBy::SiblingBridge));
    }

    #[tokio::test]
    async fn same_slug_in_target_locale_does_not_hijack_the_switch() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug()
            .with(eq(Locale::Tr), eq("atlas"))
            .returning(|_, _| Ok(Some(project(Locale::Tr, "atlas", "U1", true))));
        repo.expect_find_by_original_id()
            .with(eq(Locale::En), eq("U1"))
            .returning(|_, _| Ok(Some(project(Locale::En, "atlas-map", "U1", true))));
        repo.expect_find_by_slug()
            .with(eq(Locale::En), eq("atlas"))
            .never();

        let target = switcher(repo).switch_project(Locale::Tr, "atlas").await.unwrap();
        assert_eq!(target.path, "/en/projects/atlas-map");
        assert_eq!(target.resolved_by, Some(ResolvedBy::SiblingBridge));
    }

    #[tokio::test]
    async fn unpublished_sibling_sends_to_site_root() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug()
            .with(eq(Locale::Tr), eq("atlas"))
            .returning(|_, _| Ok(Some(project(Locale::Tr, "atlas", "U1", true))));
        repo.expect_find_by_original_id()
            .with(eq(Locale::En), eq("U1"))
            .returning(|_, _| Ok(Some(project(Locale::En, "atlas-map", "U1", false))));
        repo.expect_find_by_slug()
            .with(eq(Locale::En), eq("atlas"))
            .never();

        let target = switcher(repo).switch_project(Locale::Tr, "atlas").await.unwrap();
        assert_eq!(target, SwitchTarget::root(Locale::En));
        assert_eq!(target.path, "/en");
    }

    #[tokio::test]
    async fn stale_key_is_tried_in_the_target_locale() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug()
            .with(eq(Locale::Tr), eq("vase-1"))
            .returning(|_, _| Ok(None));
        repo.expect_find_by_original_id()
            .with(eq(Locale::Tr), eq("vase-1"))
            .returning(|_, _| Ok(None));
        repo.expect_find_by_slug_or_original_id()
            .with(eq(Locale::En), eq("vase-1"))
            .returning(|_, _| Ok(None));
        repo.expect_find_by_slug()
            .with(eq(Locale::En), eq("vase-1"))
            .returning(|_, _| Ok(Some(project(Locale::En, "vase-1", "U1", true))));

        let target = switcher(repo).switch_project(Locale::Tr, "vase-1").await.unwrap();
        assert_eq!(target.path, "/en/projects/vase-1");
        assert_eq!(target.resolved_by, Some(ResolvedBy::Slug));
    }

    #[tokio::test]
    async fn project_paths_are_resolved() {
        let mut repo = MockProjectRepository::new();
        repo.expect_find_by_slug()
            .with(eq(Locale::En), eq("vase-1"))
            .returning(|_, _| Ok(Some(project(Locale::En, "vase-1", "U1", true))));
        repo.expect_find_by_original_id()
            .with(eq(Locale::Tr), eq("U1"))
            .returning(|_, _| Ok(Some(project(Locale::Tr, "vazo-1", "U1", true))));

        let target = switcher(repo).switch_path(Locale::En, "/en/projects/vase-1").await.unwrap();
        assert_eq!(target.path, "/tr/projects/vazo-1");
    }
}
