use crate::core::quota::RateLimitConfig;
use crate::core::rate_limiter::{BucketConfig, SlidingWindowLimiter};
use crate::core::submission::SubmissionPolicy;
use crate::utils::error::{PlatformError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub rate_limit: RateLimitSection,
    pub submission: Option<SubmissionSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateLimitSection {
    #[serde(default)]
    pub buckets: HashMap<String, BucketEntry>,
    pub quota: Option<QuotaEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketEntry {
    pub max_requests: u32,
    pub window_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaEntry {
    pub window_ms: Option<u64>,
    pub max_requests: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionSection {
    pub max_attempts: Option<u32>,
}

impl PlatformConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PlatformError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses configuration from a TOML string, substituting `${VAR}` first.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        toml::from_str(&processed).map_err(|e| PlatformError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    // Unset variables are left as-is so the parse error points at them.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        for (name, bucket) in &self.rate_limit.buckets {
            validation::validate_non_empty_string("rate_limit.buckets", name)?;
            validation::validate_positive_number(
                &format!("rate_limit.buckets.{}.max_requests", name),
                u64::from(bucket.max_requests),
                1,
            )?;
            validation::validate_positive_number(
                &format!("rate_limit.buckets.{}.window_ms", name),
                bucket.window_ms,
                1,
            )?;
        }

        if let Some(quota) = &self.rate_limit.quota {
            if let Some(window_ms) = quota.window_ms {
                validation::validate_positive_number("rate_limit.quota.window_ms", window_ms, 1)?;
            }
            if let Some(max_requests) = quota.max_requests {
                validation::validate_positive_number(
                    "rate_limit.quota.max_requests",
                    u64::from(max_requests),
                    1,
                )?;
            }
        }

        if let Some(submission) = &self.submission {
            let max_attempts = validation::validate_required_field(
                "submission.max_attempts",
                &submission.max_attempts,
            )?;
            validation::validate_range("submission.max_attempts", *max_attempts, 1, 100)?;
        }

        Ok(())
    }

    pub fn bucket_configs(&self) -> HashMap<String, BucketConfig> {
        self.rate_limit
            .buckets
            .iter()
            .map(|(name, entry)| {
                (
                    name.clone(),
                    BucketConfig::new(entry.max_requests, Duration::from_millis(entry.window_ms)),
                )
            })
            .collect()
    }

    pub fn build_limiter(&self) -> SlidingWindowLimiter {
        SlidingWindowLimiter::new(self.bucket_configs())
    }

    /// Fixed-window quota, with unset fields falling back to the defaults.
    pub fn quota(&self) -> RateLimitConfig {
        let defaults = RateLimitConfig::default();
        match &self.rate_limit.quota {
            Some(q) => RateLimitConfig {
                window_ms: q.window_ms.unwrap_or(defaults.window_ms),
                max_requests: q.max_requests.unwrap_or(defaults.max_requests),
            },
            None => defaults,
        }
    }

    pub fn submission_policy(&self) -> SubmissionPolicy {
        let defaults = SubmissionPolicy::default();
        SubmissionPolicy {
            max_attempts: self
                .submission
                .as_ref()
                .and_then(|s| s.max_attempts)
                .unwrap_or(defaults.max_attempts),
        }
    }
}

impl Validate for PlatformConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
