use std::{
    collections::{BTreeMap, HashSet},
    sync::Arc,
};

use chrono::Utc;
use tracing::info;
use validator::Validate;

use crate::{
    entities::{
        locale::Locale,
        option_fields::OptionField,
        project::{
            DeleteReport, NewProjectRequest, Project, ProjectDetailResponse, ProjectListResponse, ProjectSummary,
            ReorderProjectsRequest, ReorderReport, UpdateProjectRequest,
        },
        seo::{ProjectSeo, SeoSubject, SiteDefaults},
    },
    errors::AppError,
    repositories::project::ProjectRepository,
    use_cases::{
        linker::LinkedPair,
        resolver::{Resolution, ResolvedBy, Resolver},
    },
};

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub resolver: Arc<Resolver>,
    pub linker: Arc<LinkedPair>,
    site: SiteDefaults,
}

impl ProjectHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepository>,
        resolver: Arc<Resolver>,
        linker: Arc<LinkedPair>,
        site: SiteDefaults,
    ) -> Self {
        ProjectHandler { project_repo, resolver, linker, site }
    }

    pub async fn create_project(&self, locale: Locale, request: NewProjectRequest) -> Result<Project, AppError> {
        self.linker.create(locale, request).await
    }

    /// Published detail page, with the strategy that found it.
    pub async fn get_public_project(&self, locale: Locale, key: &str) -> Result<(ProjectDetailResponse, ResolvedBy), AppError> {
        let Resolution { project, resolved_by } = self.resolver.require_published(locale, key).await?;

        let translations = self.translations(&project).await?;
        let seo = self.resolved_seo(&project);

        Ok((project.to_detail_response(seo, translations), resolved_by))
    }

    pub async fn get_admin_project(&self, locale: Locale, key: &str) -> Result<Resolution, AppError> {
        self.resolver.require(locale, key).await
    }

    pub async fn list_public_projects(&self, locale: Locale, page: u32, per_page: u32) -> Result<ProjectListResponse<ProjectSummary>, AppError> {
        let projects = self.project_repo.list_projects(locale, true, page, per_page).await?;
        let total = self.project_repo.count_projects(locale, true).await?;

        Ok(ProjectListResponse {
            projects: projects.iter().map(Project::to_summary).collect(),
            total,
            page,
            per_page,
        })
    }

    pub async fn list_admin_projects(&self, locale: Locale, page: u32, per_page: u32) -> Result<ProjectListResponse<Project>, AppError> {
        let projects = self.project_repo.list_projects(locale, false, page, per_page).await?;
        let total = self.project_repo.count_projects(locale, false).await?;

        Ok(ProjectListResponse { projects, total, page, per_page })
    }

    /// Partial update of the record `key` resolves to in `locale`. The
    /// stored `originalId` is never changed; images reach the sibling.
    pub async fn update_project(&self, locale: Locale, key: &str, request: UpdateProjectRequest) -> Result<Project, AppError> {
        request.validate()?;
        if let Some(seo) = request.seo.value_ref() {
            seo.validate()?;
        }

        let current = self.resolver.require(locale, key).await?.project;

        let title = request.title.apply_to(&current.title);
        let description = request.description.apply_to(&current.description);
        let technologies = request.technologies.apply_to(&current.technologies);
        let images = request.images.apply_to(&current.images);

        let slug = match &request.id {
            OptionField::SetToValue(slug) => {
                if let Some(owner) = self.project_repo.find_by_slug(locale, slug).await? {
                    if owner.original_id != current.original_id {
                        return Err(AppError::Conflict(format!("Slug '{}' is already used in {}", slug, locale)));
                    }
                }
                slug.clone()
            }
            OptionField::SetToNull => {
                self.linker.unique_slug(locale, &title, Some(&current.original_id)).await?
            }
            OptionField::Unchanged if title != current.title => {
                self.linker.unique_slug(locale, &title, Some(&current.original_id)).await?
            }
            OptionField::Unchanged => current.id.clone(),
        };

        let seo_input = match &request.seo {
            OptionField::Unchanged => current.seo.forget_derived(&ProjectSeo::default().with_fallbacks(
                subject_of(&current),
                locale,
                &self.site,
            )),
            other => other.apply_to(&current.seo),
        };

        let seo = seo_input.with_fallbacks(
            SeoSubject {
                title: &title,
                description: &description,
                technologies: &technologies,
                images: &images,
            },
            locale,
            &self.site,
        );

        let updated = Project {
            id: slug,
            original_id: current.original_id.clone(),
            locale: current.locale,
            title,
            description,
            technologies,
            images,
            status: request.status.apply_to(&current.status),
            order: request.order.apply_to(&current.order),
            seo,
            created_at: current.created_at,
            updated_at: Utc::now(),
        };

        let saved = self.project_repo.update_project(&updated).await?;

        let propagation = if request.images.is_unchanged() {
            None
        } else {
            Some(
                self.linker
                    .propagate_images(&saved.original_id, &saved.images, saved.locale)
                    .await,
            )
        };

        info!(
            locale = %saved.locale,
            original_id = %saved.original_id,
            slug = %saved.id,
            ?propagation,
            "Project updated"
        );

        Ok(saved)
    }

    /// Deletes the record `key` resolves to together with its sibling.
    pub async fn delete_project(&self, locale: Locale, key: &str) -> Result<DeleteReport, AppError> {
        let project = self.resolver.require(locale, key).await?.project;
        self.linker.linked_delete(&project.original_id, project.locale).await
    }

    /// Sets `order` to each entry's position in the list.
    pub async fn reorder_projects(&self, locale: Locale, request: ReorderProjectsRequest) -> Result<ReorderReport, AppError> {
        request.validate()?;

        let mut seen = HashSet::new();
        if let Some(duplicate) = request.original_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(AppError::InvalidInput(format!("Duplicate originalId '{}'", duplicate)));
        }

        let mut updated = 0;
        let mut missing = Vec::new();

        for (index, original_id) in request.original_ids.iter().enumerate() {
            if self.project_repo.set_order(locale, original_id, index as i32).await? {
                updated += 1;
            } else {
                missing.push(original_id.clone());
            }
        }

        Ok(ReorderReport { updated, missing })
    }

    /// Published versions of `project`, locale code → slug.
    pub async fn translations(&self, project: &Project) -> Result<BTreeMap<String, String>, AppError> {
        let mut translations = BTreeMap::new();

        if project.status {
            translations.insert(project.locale.to_string(), project.id.clone());
        }

        let sibling = self
            .project_repo
            .find_by_original_id(project.locale.other(), &project.original_id)
            .await?;

        if let Some(sibling) = sibling.filter(|s| s.status) {
            translations.insert(sibling.locale.to_string(), sibling.id);
        }

        Ok(translations)
    }

    /// Stored SEO with any gaps filled from the current fields and site defaults.
    pub fn resolved_seo(&self, project: &Project) -> ProjectSeo {
        project.seo.with_fallbacks(subject_of(project), project.locale, &self.site)
    }

    pub fn site(&self) -> &SiteDefaults {
        &self.site
    }
}

fn subject_of(project: &Project) -> SeoSubject<'_> {
    SeoSubject {
        title: &project.title,
        description: &project.description,
        technologies: &project.technologies,
        images: &project.images,
    }
}
