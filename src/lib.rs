use std::sync::Arc;

mod domain;
mod infrastructure;
mod interfaces;
pub mod background_task;
pub mod constants;
pub mod errors;
pub mod graceful_shutdown;
pub mod settings;
pub mod shared_repos;

pub use domain::{entities, use_cases};
pub use infrastructure::{auth, db, limiter, storage, utils};
pub use interfaces::{handlers, middlewares, repositories, routes};

use auth::jwt::JwtService;
use limiter::rate_limiter::RateLimiterStore;
use settings::AppConfig;
use shared_repos::SharedRepositories;
use use_cases::{
    auth::AuthHandler, contact::ContactHandler, content::ContentHandler, linker::LinkedPair,
    projects::ProjectHandler, resolver::Resolver, seo::SeoHandler, switcher::LanguageSwitcher,
};

pub struct AppState {
    pub auth_handler: AuthHandler,
    pub project_handler: Arc<ProjectHandler>,
    pub switcher: LanguageSwitcher,
    pub seo_handler: SeoHandler,
    pub content_handler: ContentHandler,
    pub contact_handler: Arc<ContactHandler>,
    pub contact_limiter: RateLimiterStore,
    pub trust_x_forwarded_for: bool,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: sqlx::PgPool) -> Self {
        Self::from_repositories(config, SharedRepositories::new(pool, config))
    }

    pub fn from_repositories(config: &AppConfig, repos: SharedRepositories) -> Self {
        let site = config.site_defaults();

        let resolver = Arc::new(Resolver::new(repos.project_repo.clone()));
        let linker = Arc::new(LinkedPair::new(
            repos.project_repo.clone(),
            repos.image_store,
            site.clone(),
        ));
        let project_handler = Arc::new(ProjectHandler::new(
            repos.project_repo,
            resolver.clone(),
            linker,
            site,
        ));

        AppState {
            auth_handler: AuthHandler::new(config, JwtService::new(config)),
            switcher: LanguageSwitcher::new(resolver),
            seo_handler: SeoHandler::new(project_handler.clone()),
            project_handler,
            content_handler: ContentHandler::new(repos.content_repo),
            contact_handler: Arc::new(ContactHandler::new(repos.contact_repo)),
            contact_limiter: RateLimiterStore::per_hour(config.contact_rate_limit_per_hour),
            trust_x_forwarded_for: config.trust_x_forwarded_for,
        }
    }
}
