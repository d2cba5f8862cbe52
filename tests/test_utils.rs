#![allow(dead_code)]

use std::{cmp::Reverse, collections::HashSet, sync::Arc};

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::NormalizePath,
    web, App,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use uuid::Uuid;

use portfolio_i18n::{
    auth::password::hash_password,
    entities::{
        contact::{ContactMessage, ContactMessageInsert},
        locale::Locale,
        project::Project,
        seo::ProjectSeo,
        site_content::{SectionKind, SiteContent, SiteSection},
    },
    errors::AppError,
    repositories::{
        contact::ContactRepository, content::ContentRepository, image_store::ImageStore,
        project::ProjectRepository,
    },
    routes::configure_routes,
    settings::AppConfig,
    shared_repos::SharedRepositories,
    AppState,
};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "Kil-ve-Ates-42";

static ADMIN_HASH: Lazy<String> =
    Lazy::new(|| hash_password(ADMIN_PASSWORD).expect("Failed to hash admin password"));

pub fn test_config(contact_limit: u64) -> AppConfig {
    serde_json::from_value(serde_json::json!({
        "env": "testing",
        "database_url": "postgres://unused",
        "jwt_secret": "test_jwt_secret_that_is_long_enough_for_hs512_1234567890",
        "jwt_expiration_minutes": 5,
        "admin_email": ADMIN_EMAIL,
        "admin_password_hash": ADMIN_HASH.as_str(),
        "site_url": "https://example.dev",
        "site_name": "Atölye",
        "site_description_tr": "Seramik atölyesi",
        "site_description_en": "Ceramics studio",
        "contact_rate_limit_per_hour": contact_limit,
        "worker_count": 1,
    }))
    .expect("Invalid test config")
}

// ───── In-memory storage ──────────────────────────────────────────────

#[derive(Default)]
pub struct InMemoryProjects {
    records: Mutex<Vec<Project>>,
}

impl InMemoryProjects {
    pub fn seed(&self, project: Project) {
        self.records.lock().push(project);
    }

    pub fn get(&self, locale: Locale, original_id: &str) -> Option<Project> {
        self.records
            .lock()
            .iter()
            .find(|p| p.locale == locale && p.original_id == original_id)
            .cloned()
    }

    pub fn count_original_id(&self, original_id: &str) -> usize {
        self.records.lock().iter().filter(|p| p.original_id == original_id).count()
    }
}

#[async_trait]
impl ProjectRepository for InMemoryProjects {
    async fn find_by_slug(&self, locale: Locale, slug: &str) -> Result<Option<Project>, AppError> {
        Ok(self.records.lock().iter().find(|p| p.locale == locale && p.id == slug).cloned())
    }

    async fn find_by_original_id(&self, locale: Locale, original_id: &str) -> Result<Option<Project>, AppError> {
        Ok(self.get(locale, original_id))
    }

    async fn find_by_slug_or_original_id(&self, locale: Locale, key: &str) -> Result<Option<Project>, AppError> {
        match self.find_by_slug(locale, key).await? {
            Some(project) => Ok(Some(project)),
            None => self.find_by_original_id(locale, key).await,
        }
    }

    async fn list_projects(&self, locale: Locale, published_only: bool, page: u32, per_page: u32) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self
            .records
            .lock()
            .iter()
            .filter(|p| p.locale == locale && (p.status || !published_only))
            .cloned()
            .collect();
        projects.sort_by_key(|p| (p.order, Reverse(p.created_at)));

        let skip = (page.saturating_sub(1) * per_page) as usize;
        Ok(projects.into_iter().skip(skip).take(per_page as usize).collect())
    }

    async fn count_projects(&self, locale: Locale, published_only: bool) -> Result<i64, AppError> {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|p| p.locale == locale && (p.status || !published_only))
            .count() as i64)
    }

    async fn list_published(&self) -> Result<Vec<Project>, AppError> {
        let mut projects: Vec<Project> = self.records.lock().iter().filter(|p| p.status).cloned().collect();
        projects.sort_by_key(|p| (p.locale.as_str(), p.order));
        Ok(projects)
    }

    async fn next_order(&self, locale: Locale) -> Result<i32, AppError> {
        Ok(self
            .records
            .lock()
            .iter()
            .filter(|p| p.locale == locale)
            .map(|p| p.order + 1)
            .max()
            .unwrap_or(0))
    }

    async fn insert_project(&self, project: &Project) -> Result<Project, AppError> {
        let mut records = self.records.lock();

        if records.iter().any(|p| p.locale == project.locale && p.id == project.id) {
            return Err(AppError::Conflict("Slug already exists in this locale".into()));
        }
        if records.iter().any(|p| p.locale == project.locale && p.original_id == project.original_id) {
            return Err(AppError::Conflict("A record for this originalId already exists in this locale".into()));
        }

        records.push(project.clone());
        Ok(project.clone())
    }

    async fn update_project(&self, project: &Project) -> Result<Project, AppError> {
        let mut records = self.records.lock();

        if records.iter().any(|p| {
            p.locale == project.locale && p.id == project.id && p.original_id != project.original_id
        }) {
            return Err(AppError::Conflict("Slug already exists in this locale".into()));
        }

        let stored = records
            .iter_mut()
            .find(|p| p.locale == project.locale && p.original_id == project.original_id)
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;

        let created_at = stored.created_at;
        *stored = Project { created_at, ..project.clone() };
        Ok(stored.clone())
    }

    async fn set_images(&self, locale: Locale, original_id: &str, images: &[String]) -> Result<bool, AppError> {
        let mut records = self.records.lock();
        match records.iter_mut().find(|p| p.locale == locale && p.original_id == original_id) {
            Some(stored) => {
                stored.images = images.to_vec();
                stored.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_order(&self, locale: Locale, original_id: &str, order: i32) -> Result<bool, AppError> {
        let mut records = self.records.lock();
        match records.iter_mut().find(|p| p.locale == locale && p.original_id == original_id) {
            Some(stored) => {
                stored.order = order;
                stored.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_project(&self, locale: Locale, original_id: &str) -> Result<bool, AppError> {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|p| !(p.locale == locale && p.original_id == original_id));
        Ok(records.len() < before)
    }

    async fn image_in_use(&self, url: &str, excluding_original_id: &str) -> Result<bool, AppError> {
        Ok(self
            .records
            .lock()
            .iter()
            .any(|p| p.original_id != excluding_original_id && p.images.iter().any(|i| i == url)))
    }

    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryContent {
    sections: Mutex<Vec<SiteContent>>,
}

#[async_trait]
impl ContentRepository for InMemoryContent {
    async fn get_section(&self, section: SectionKind, locale: Locale) -> Result<Option<SiteContent>, AppError> {
        Ok(self
            .sections
            .lock()
            .iter()
            .find(|s| s.locale == locale && s.content.kind() == section)
            .cloned())
    }

    async fn upsert_section(&self, locale: Locale, content: &SiteSection) -> Result<SiteContent, AppError> {
        let mut sections = self.sections.lock();
        sections.retain(|s| !(s.locale == locale && s.content.kind() == content.kind()));

        let saved = SiteContent {
            locale,
            content: content.clone(),
            updated_at: Utc::now(),
        };
        sections.push(saved.clone());
        Ok(saved)
    }
}

#[derive(Default)]
pub struct InMemoryContact {
    messages: Mutex<Vec<(ContactMessage, bool)>>,
}

impl InMemoryContact {
    pub fn stored(&self) -> Vec<ContactMessage> {
        self.messages.lock().iter().filter(|(_, deleted)| !deleted).map(|(m, _)| m.clone()).collect()
    }
}

#[async_trait]
impl ContactRepository for InMemoryContact {
    async fn create_contact_message(&self, msg: &ContactMessageInsert) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        self.messages.lock().push((
            ContactMessage {
                id,
                name: msg.name.clone(),
                email: msg.email.clone(),
                subject: msg.subject.clone(),
                message: msg.message.clone(),
                locale: msg.locale,
                is_read: false,
                created_at: Utc::now(),
            },
            false,
        ));
        Ok(id)
    }

    async fn list_contact_messages(&self, page: u32, per_page: u32) -> Result<Vec<ContactMessage>, AppError> {
        let mut messages = self.stored();
        messages.sort_by_key(|m| Reverse(m.created_at));
        let skip = (page.saturating_sub(1) * per_page) as usize;
        Ok(messages.into_iter().skip(skip).take(per_page as usize).collect())
    }

    async fn count_contact_messages(&self) -> Result<i64, AppError> {
        Ok(self.stored().len() as i64)
    }

    async fn count_unread_messages(&self) -> Result<i64, AppError> {
        Ok(self.stored().iter().filter(|m| !m.is_read).count() as i64)
    }

    async fn mark_read(&self, id: &Uuid) -> Result<ContactMessage, AppError> {
        let mut messages = self.messages.lock();
        let (message, _) = messages
            .iter_mut()
            .find(|(m, deleted)| m.id == *id && !deleted)
            .ok_or_else(|| AppError::NotFound("Contact message not found".into()))?;
        message.is_read = true;
        Ok(message.clone())
    }

    async fn soft_delete_contact_message(&self, id: &Uuid) -> Result<(), AppError> {
        let mut messages = self.messages.lock();
        let (_, deleted) = messages
            .iter_mut()
            .find(|(m, deleted)| m.id == *id && !deleted)
            .ok_or_else(|| AppError::NotFound("Contact message not found".into()))?;
        *deleted = true;
        Ok(())
    }

    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, AppError> {
        let mut messages = self.messages.lock();
        let before = messages.len();
        messages.retain(|(m, _)| m.created_at >= cutoff);
        Ok((before - messages.len()) as u64)
    }
}

/// Records removed image URLs; URLs listed in `failing` report an error.
#[derive(Default)]
pub struct RecordingImageStore {
    pub removed: Mutex<Vec<String>>,
    pub failing: Mutex<HashSet<String>>,
}

#[async_trait]
impl ImageStore for RecordingImageStore {
    async fn remove(&self, url: &str) -> Result<bool, AppError> {
        if self.failing.lock().contains(url) {
            return Err(AppError::InternalError(format!("permission denied: {}", url)));
        }
        if !url.starts_with("/uploads/") {
            return Ok(false);
        }
        self.removed.lock().push(url.to_string());
        Ok(true)
    }
}

// ───── App wiring ─────────────────────────────────────────────────────

pub struct TestContext {
    pub projects: Arc<InMemoryProjects>,
    pub content: Arc<InMemoryContent>,
    pub contact: Arc<InMemoryContact>,
    pub images: Arc<RecordingImageStore>,
    pub state: web::Data<AppState>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_contact_limit(5)
    }

    pub fn with_contact_limit(limit: u64) -> Self {
        let projects = Arc::new(InMemoryProjects::default());
        let content = Arc::new(InMemoryContent::default());
        let contact = Arc::new(InMemoryContact::default());
        let images = Arc::new(RecordingImageStore::default());

        let repos = SharedRepositories {
            project_repo: projects.clone(),
            content_repo: content.clone(),
            contact_repo: contact.clone(),
            image_store: images.clone(),
        };
        let state = web::Data::new(AppState::from_repositories(&test_config(limit), repos));

        TestContext { projects, content, contact, images, state }
    }

    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(NormalizePath::trim())
            .configure(configure_routes)
    }

    pub fn admin_token(&self) -> String {
        self.state
            .auth_handler
            .token_service
            .create_jwt(ADMIN_EMAIL, true)
            .expect("Failed to sign admin token")
    }

    pub fn bearer(&self) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", self.admin_token()))
    }
}

pub fn project(locale: Locale, slug: &str, original_id: &str, status: bool) -> Project {
    let now = Utc::now();
    Project {
        id: slug.to_string(),
        original_id: original_id.to_string(),
        locale,
        title: slug.replace('-', " "),
        description: format!("About {}", slug),
        technologies: vec!["stoneware".to_string()],
        images: vec![],
        status,
        order: 0,
        seo: ProjectSeo::default(),
        created_at: now,
        updated_at: now,
    }
}
