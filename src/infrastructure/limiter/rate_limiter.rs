use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

/// Weighted two-bucket sliding window: the previous window's count decays
/// linearly as the current window advances.
#[derive(Debug)]
struct SlidingWindow {
    window_size: Duration,
    limit: u64,
    current_window_start: Instant,
    current_count: u64,
    prev_count: u64,
    last_seen: Instant,
}

impl SlidingWindow {
    fn new(window_size: Duration, limit: u64, now: Instant) -> Self {
        Self {
            window_size,
            limit,
            current_window_start: now,
            current_count: 0,
            prev_count: 0,
            last_seen: now,
        }
    }

    fn roll(&mut self, now: Instant) {
        let elapsed = now.duration_since(self.current_window_start);
        if elapsed >= self.window_size * 2 {
            self.prev_count = 0;
            self.current_count = 0;
            self.current_window_start = now;
        } else if elapsed >= self.window_size {
            self.prev_count = self.current_count;
            self.current_count = 0;
            self.current_window_start += self.window_size;
        }
    }

    fn effective(&self, now: Instant) -> f64 {
        let elapsed = now.duration_since(self.current_window_start).as_secs_f64();
        let weight = (elapsed / self.window_size.as_secs_f64()).min(1.0);
        (self.prev_count as f64) * (1.0 - weight) + (self.current_count as f64)
    }

    fn allow(&mut self, now: Instant) -> RateDecision {
        self.last_seen = now;
        self.roll(now);

        let effective = self.effective(now);
        if effective + 1.0 <= self.limit as f64 + 1e-9 {
            self.current_count += 1;
            let remaining = (self.limit as f64 - effective - 1.0).max(0.0).floor() as u64;
            return RateDecision { allowed: true, remaining, retry_after: None };
        }

        // Seconds until the current window closes; a safe upper bound.
        let until_roll = self
            .window_size
            .saturating_sub(now.duration_since(self.current_window_start))
            .as_secs()
            .max(1);

        RateDecision { allowed: false, remaining: 0, retry_after: Some(until_roll) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub remaining: u64,
    pub retry_after: Option<u64>,
}

type Key = String;

/// Per-key limiter store shared across workers.
#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<Key, Arc<Mutex<SlidingWindow>>>>,
    window_size: Duration,
    limit: u64,
}

impl RateLimiterStore {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            window_size,
            limit,
        }
    }

    /// Contact-form limiter: `per_hour` submissions per client.
    pub fn per_hour(per_hour: u64) -> Self {
        Self::new(per_hour, Duration::from_secs(60 * 60))
    }

    fn get_window(&self, key: &str, now: Instant) -> Arc<Mutex<SlidingWindow>> {
        if let Some(existing) = self.map.get(key) {
            return existing.clone();
        }
        self.map
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(SlidingWindow::new(self.window_size, self.limit, now))))
            .clone()
    }

    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let window = self.get_window(key, now);
        let mut w = window.lock();
        w.allow(now)
    }

    /// Drops keys idle for two full windows.
    pub fn evict_idle(&self) -> usize {
        let now = Instant::now();
        let ttl = self.window_size * 2;
        let before = self.map.len();
        self.map.retain(|_, w| now.duration_since(w.lock().last_seen) <= ttl);
        before.saturating_sub(self.map.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.map.len()
    }

    /// Runs [`Self::evict_idle`] every `every` on the current runtime.
    pub fn spawn_eviction(&self, every: Duration) {
        let store = self.clone();
        tokio::spawn(async move {
            loop {
                sleep(every).await;
                let evicted = store.evict_idle();
                if evicted > 0 {
                    tracing::debug!("Evicted {} idle rate limiter entries", evicted);
                }
            }
        });
    }
}
