use async_trait::async_trait;

use crate::errors::AppError;

/// Physical storage behind project image URLs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Sync + Send {
    /// Removes the file behind `url`. Returns `Ok(false)` when the URL does
    /// not point into this store (external links, other prefixes) or the
    /// file is already gone.
    async fn remove(&self, url: &str) -> Result<bool, AppError>;
}
