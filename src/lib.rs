pub mod adapters;
#[cfg(feature = "cli")]
pub mod commands;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Cli, Command};

pub use adapters::InMemorySubmissionStore;
pub use config::PlatformConfig;
pub use crate::core::presence::aggregate_viewers;
pub use crate::core::request::{extract_client_ip, hash_email};
pub use crate::core::quota::{QuotaLimiter, RateLimitConfig, RateLimitDecision};
pub use crate::core::rate_limiter::{BucketConfig, SlidingWindowLimiter};
pub use crate::core::submission::{check_permission, SubmissionPolicy, MAX_ATTEMPTS};
pub use crate::core::whiteboard::{diff_elements, merge_elements};
pub use domain::model::{Element, ElementChanges, PermissionDecision, SubmissionRequest};
pub use domain::ports::SubmissionStore;
pub use utils::error::{PlatformError, Result};
