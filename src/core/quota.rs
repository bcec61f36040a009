use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Mutex;

pub const DEFAULT_WINDOW_MS: u64 = 60_000;
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub window_ms: u64,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Unix timestamp (seconds) at which the current window resets.
    pub reset: i64,
}

impl RateLimitDecision {
    /// Response headers advertising the quota state.
    pub fn headers(&self, now_ms: i64) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("X-RateLimit-Limit", self.limit.to_string()),
            ("X-RateLimit-Remaining", self.remaining.to_string()),
            ("X-RateLimit-Reset", self.reset.to_string()),
        ];
        if !self.allowed {
            let retry_after = self.reset.saturating_sub(now_ms.div_euclid(1000)).max(1);
            headers.push(("Retry-After", retry_after.to_string()));
        }
        headers
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at_ms: i64,
}

/// Fixed-window request counter keyed by caller identity.
#[derive(Debug, Default)]
pub struct QuotaLimiter {
    windows: Mutex<HashMap<String, Window>>,
}

impl QuotaLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, key: &str, config: &RateLimitConfig, now_ms: i64) -> RateLimitDecision {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let window_ms = i64::try_from(config.window_ms).unwrap_or(i64::MAX);
        let reset_at_ms = now_ms.saturating_add(window_ms);

        let window = windows
            .entry(key.to_string())
            .and_modify(|w| {
                if now_ms > w.reset_at_ms {
                    *w = Window {
                        count: 0,
                        reset_at_ms,
                    };
                }
            })
            .or_insert(Window {
                count: 0,
                reset_at_ms,
            });
        window.count = window.count.saturating_add(1);

        let decision = RateLimitDecision {
            allowed: window.count <= config.max_requests,
            limit: config.max_requests,
            remaining: config.max_requests.saturating_sub(window.count),
            reset: window.reset_at_ms.div_euclid(1000),
        };

        if !decision.allowed {
            tracing::warn!(
                key,
                count = window.count,
                limit = config.max_requests,
                "request quota exceeded"
            );
        }
        decision
    }

    pub fn check_now(&self, key: &str, config: &RateLimitConfig) -> RateLimitDecision {
        self.check(key, config, chrono::Utc::now().timestamp_millis())
    }

    /// Drops windows that have already reset.
    pub fn purge_expired(&self, now_ms: i64) -> usize {
        let mut windows = self
            .windows
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = windows.len();
        windows.retain(|_, w| now_ms <= w.reset_at_ms);
        before - windows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: i64 = 1_700_000_000_000;

    fn small() -> RateLimitConfig {
        RateLimitConfig {
            window_ms: 10_000,
            max_requests: 2,
        }
    }

    #[test]
    fn test_first_request_opens_window() {
        let limiter = QuotaLimiter::new();
        let decision = limiter.check("ws:key", &small(), T0);

        assert!(decision.allowed);
        assert_eq!(decision.limit, 2);
        assert_eq!(decision.remaining, 1);
        assert_eq!(decision.reset, (T0 + 10_000) / 1000);
    }

    #[test]
    fn test_rejects_after_quota_until_reset() {
        let limiter = QuotaLimiter::new();
        let config = small();

        assert!(limiter.check("k", &config, T0).allowed);
        assert!(limiter.check("k", &config, T0 + 1).allowed);

        let third = limiter.check("k", &config, T0 + 2);
        assert!(!third.allowed);
        assert_eq!(third.remaining, 0);

        // Window boundary is inclusive of reset time.
        assert!(!limiter.check("k", &config, T0 + 10_000).allowed);
        assert!(limiter.check("k", &config, T0 + 10_001).allowed);
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = QuotaLimiter::new();
        let config = small();

        limiter.check("a", &config, T0);
        limiter.check("a", &config, T0);
        assert!(!limiter.check("a", &config, T0).allowed);
        assert!(limiter.check("b", &config, T0).allowed);
    }

    #[test]
    fn test_headers_include_retry_after_when_rejected() {
        let decision = RateLimitDecision {
            allowed: false,
            limit: 100,
            remaining: 0,
            reset: 1_700_000_030,
        };
        let headers = decision.headers(1_700_000_000_000);

        assert_eq!(headers.len(), 4);
        assert_eq!(headers[3], ("Retry-After", "30".to_string()));

        let ok = RateLimitDecision {
            allowed: true,
            ..decision
        };
        assert_eq!(ok.headers(1_700_000_000_000).len(), 3);
    }

    #[test]
    fn test_retry_after_is_at_least_one_second() {
        let decision = RateLimitDecision {
            allowed: false,
            limit: 1,
            remaining: 0,
            reset: 1_700_000_000,
        };
        let headers = decision.headers(1_700_000_000_900);
        assert_eq!(headers[3], ("Retry-After", "1".to_string()));
    }

    #[test]
    fn test_huge_window_saturates_instead_of_wrapping() {
        let limiter = QuotaLimiter::new();

        for window_ms in [i64::MAX as u64, u64::MAX] {
            let key = format!("ws:{}", window_ms);
            let config = RateLimitConfig {
                window_ms,
                max_requests: 1,
            };

            let first = limiter.check(&key, &config, T0);
            assert!(first.allowed);
            assert_eq!(first.reset, i64::MAX.div_euclid(1000));

            let second = limiter.check(&key, &config, T0 + 1);
            assert!(!second.allowed);
            assert_eq!(second.remaining, 0);
        }
    }

    #[test]
    fn test_check_now_uses_wall_clock() {
        let limiter = QuotaLimiter::new();
        let before = chrono::Utc::now().timestamp();

        let decision = limiter.check_now("live", &small());

        assert!(decision.allowed);
        assert!(decision.reset >= before + 10);
        assert!(decision.reset <= chrono::Utc::now().timestamp() + 10);
    }

    #[test]
    fn test_purge_expired() {
        let limiter = QuotaLimiter::new();
        limiter.check("old", &small(), T0);
        limiter.check("new", &small(), T0 + 20_000);

        assert_eq!(limiter.purge_expired(T0 + 20_000), 1);
    }
}
