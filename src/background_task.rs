use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::use_cases::contact::ContactHandler;

/// Deletes contact messages older than `retention_days`, once a day.
pub async fn start_purge_task(contact_handler: Arc<ContactHandler>, retention_days: i64) {
    let mut interval = interval(Duration::from_secs(60 * 60 * 24));

    loop {
        interval.tick().await;

        match contact_handler.purge_expired(retention_days).await {
            Ok(count) => tracing::info!("Purged {} expired contact messages", count),
            Err(e) => tracing::error!("Contact purge failed: {}", e),
        }
    }
}
