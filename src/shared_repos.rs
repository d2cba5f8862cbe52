use std::sync::Arc;

use crate::{
    repositories::{
        contact::ContactRepository,
        content::ContentRepository,
        image_store::ImageStore,
        project::ProjectRepository,
        sqlx_repo::{SqlxContactRepo, SqlxContentRepo, SqlxProjectRepo},
    },
    settings::AppConfig,
    storage::local::LocalImageStore,
};

/// Storage the handlers are built on. Tests swap in in-memory versions.
#[derive(Clone)]
pub struct SharedRepositories {
    pub project_repo: Arc<dyn ProjectRepository>,
    pub content_repo: Arc<dyn ContentRepository>,
    pub contact_repo: Arc<dyn ContactRepository>,
    pub image_store: Arc<dyn ImageStore>,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool, config: &AppConfig) -> Self {
        SharedRepositories {
            project_repo: Arc::new(SqlxProjectRepo::new(pool.clone())),
            content_repo: Arc::new(SqlxContentRepo::new(pool.clone())),
            contact_repo: Arc::new(SqlxContactRepo::new(pool)),
            image_store: Arc::new(LocalImageStore::from_config(config)),
        }
    }
}
