use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use std::time::Duration;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// How often idle contact-form limiter entries are dropped.
pub const LIMITER_EVICTION_INTERVAL: Duration = Duration::from_secs(10 * 60);
