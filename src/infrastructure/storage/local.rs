use std::{
    io::ErrorKind,
    path::{Component, Path, PathBuf},
};

use async_trait::async_trait;
use tracing::debug;

use crate::{errors::AppError, repositories::image_store::ImageStore, settings::AppConfig};

/// Images uploaded to the local filesystem and served under `url_prefix`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        LocalImageStore {
            root: root.into(),
            url_prefix: format!("/{}", url_prefix.trim_matches('/')),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.upload_dir, &config.upload_url_prefix)
    }

    /// Maps a stored URL to a file under `root`. `None` for URLs outside
    /// the prefix; an error for paths escaping the root.
    fn path_for(&self, url: &str) -> Result<Option<PathBuf>, AppError> {
        let path_part = match url::Url::parse(url) {
            Ok(parsed) => parsed.path().to_string(),
            Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
        };

        let Some(rest) = path_part.strip_prefix(&self.url_prefix) else {
            return Ok(None);
        };
        let Some(relative) = rest.strip_prefix('/') else {
            return Ok(None);
        };

        let relative = Path::new(relative);
        if relative.as_os_str().is_empty()
            || relative.components().any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::InvalidInput(format!("Refusing to remove '{}'", url)));
        }

        Ok(Some(self.root.join(relative)))
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn remove(&self, url: &str) -> Result<bool, AppError> {
        let Some(path) = self.path_for(url)? else {
            debug!("Skipping external image {}", url);
            return Ok(false);
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed image file {}", path.display());
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::InternalError(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}
