//! Process-local sliding-window limiter.
//!
//! Callers over quota are delayed until a slot frees up rather than rejected.
//! Counters live in memory only: they reset on restart and are not shared
//! between instances.

use crate::utils::error::{PlatformError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl BucketConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

#[derive(Clone)]
pub struct SlidingWindowLimiter {
    buckets: Arc<HashMap<String, BucketConfig>>,
    hits: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
}

impl SlidingWindowLimiter {
    pub fn new(buckets: HashMap<String, BucketConfig>) -> Self {
        Self {
            buckets: Arc::new(buckets),
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Waits until `bucket` has a free slot, then records the request.
    pub async fn acquire(&self, bucket: &str) -> Result<()> {
        loop {
            match self.try_acquire(bucket).await? {
                None => return Ok(()),
                Some(wait) => {
                    tracing::debug!(
                        bucket,
                        wait_ms = wait.as_millis() as u64,
                        "rate limit reached, waiting"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }

    /// Records the request if a slot is free, otherwise returns how long
    /// `acquire` would wait before rechecking.
    pub async fn try_acquire(&self, bucket: &str) -> Result<Option<Duration>> {
        let config = *self
            .buckets
            .get(bucket)
            .ok_or_else(|| PlatformError::UnknownBucket {
                bucket: bucket.to_string(),
            })?;

        let now = Instant::now();
        let mut hits = self.hits.lock().await;
        let timestamps = hits.entry(bucket.to_string()).or_default();
        prune(timestamps, now, config.window);

        if (timestamps.len() as u64) < u64::from(config.max_requests) {
            timestamps.push_back(now);
            return Ok(None);
        }

        let wait = match timestamps.front() {
            Some(oldest) => (*oldest + config.window).saturating_duration_since(now),
            // max_requests == 0: the bucket never admits anyone, poll once per window.
            None => config.window,
        };
        Ok(Some(wait))
    }

    /// Requests currently counted inside the window of `bucket`.
    pub async fn in_flight(&self, bucket: &str) -> usize {
        let Some(config) = self.buckets.get(bucket) else {
            return 0;
        };
        let mut hits = self.hits.lock().await;
        match hits.get_mut(bucket) {
            Some(timestamps) => {
                prune(timestamps, Instant::now(), config.window);
                timestamps.len()
            }
            None => 0,
        }
    }
}

fn prune(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
    while let Some(oldest) = timestamps.front() {
        if now.duration_since(*oldest) >= window {
            timestamps.pop_front();
        } else {
            break;
        }
    }
}
