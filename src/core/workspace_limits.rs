use crate::core::quota::RateLimitConfig;
use std::collections::HashMap;

pub const WINDOW_MS_SECRET: &str = "RATE_LIMIT_WINDOW_MS";
pub const MAX_REQUESTS_SECRET: &str = "RATE_LIMIT_MAX_REQUESTS";

// Windows are added to millisecond timestamps, so they must fit in an i64.
const MAX_WINDOW_MS: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitOverride {
    pub window_ms: Option<u64>,
    pub max_requests: Option<u32>,
}

/// Reads rate limit overrides from a workspace's secrets.
///
/// Values that are missing, non-numeric, not positive or out of range are
/// skipped.
pub fn workspace_override(secrets: &HashMap<String, String>) -> Option<RateLimitOverride> {
    let parsed = RateLimitOverride {
        window_ms: positive(secrets, WINDOW_MS_SECRET, MAX_WINDOW_MS),
        max_requests: positive(secrets, MAX_REQUESTS_SECRET, u64::from(u32::MAX))
            .map(|v| v as u32),
    };

    if parsed == RateLimitOverride::default() {
        None
    } else {
        Some(parsed)
    }
}

pub fn effective_config(
    defaults: RateLimitConfig,
    workspace: Option<RateLimitOverride>,
) -> RateLimitConfig {
    match workspace {
        Some(o) => RateLimitConfig {
            window_ms: o.window_ms.unwrap_or(defaults.window_ms),
            max_requests: o.max_requests.unwrap_or(defaults.max_requests),
        },
        None => defaults,
    }
}

fn positive(secrets: &HashMap<String, String>, name: &str, max: u64) -> Option<u64> {
    let raw = secrets.get(name)?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 && value <= max => Some(value),
        _ => {
            tracing::debug!(secret = name, "ignoring invalid rate limit secret");
            None
        }
    }
}
