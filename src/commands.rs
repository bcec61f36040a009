//! Subcommand handlers behind the `platform-utils` binary.
//!
//! Handlers write their output to the given writer and return the process
//! exit code, so they can be driven from tests without spawning the binary.

use crate::adapters::InMemorySubmissionStore;
use crate::config::{Command, PlatformConfig};
use crate::core::submission::check_permission;
use crate::core::whiteboard::{diff_elements, merge_elements};
use crate::domain::model::{Element, SubmissionRequest};
use crate::utils::error::PlatformError;
use crate::utils::validation::Validate;
use anyhow::Context;
use std::io::Write;
use std::path::Path;

pub const SUCCESS: i32 = 0;
/// Exit code of `check-submission` when the submission is refused.
pub const SUBMISSION_DENIED: i32 = 4;

pub async fn execute<W: Write>(command: Command, out: &mut W) -> anyhow::Result<i32> {
    match command {
        Command::Merge { local, remote } => {
            let local = read_elements(&local)?;
            let remote = read_elements(&remote)?;
            let merged = merge_elements(&local, &remote);
            tracing::info!(
                "Merged {} local and {} remote elements into {}",
                local.len(),
                remote.len(),
                merged.len()
            );
            writeln!(out, "{}", serde_json::to_string_pretty(&merged)?)?;
        }
        Command::Diff { previous, current } => {
            let previous = read_elements(&previous)?;
            let current = read_elements(&current)?;
            let changes = diff_elements(&previous, &current);
            tracing::info!(
                "Diff: {} inserted, {} updated, {} deleted",
                changes.inserted.len(),
                changes.updated.len(),
                changes.deleted.len()
            );
            writeln!(out, "{}", serde_json::to_string_pretty(&changes)?)?;
        }
        Command::CheckConfig { config } => {
            let config = load_config(&config)?;
            let mut buckets: Vec<_> = config.bucket_configs().into_iter().collect();
            buckets.sort_by(|a, b| a.0.cmp(&b.0));

            writeln!(out, "✅ Configuration is valid")?;
            for (name, bucket) in buckets {
                writeln!(
                    out,
                    "  bucket {}: {} requests / {} ms",
                    name,
                    bucket.max_requests,
                    bucket.window.as_millis()
                )?;
            }
            let quota = config.quota();
            writeln!(
                out,
                "  quota: {} requests / {} ms",
                quota.max_requests, quota.window_ms
            )?;
            writeln!(out, "  max attempts: {}", config.submission_policy().max_attempts)?;
        }
        Command::CheckSubmission {
            fixture,
            user,
            problem,
            session,
            config,
            at,
        } => {
            let policy = match config {
                Some(path) => load_config(&path)?.submission_policy(),
                None => Default::default(),
            };
            let store = InMemorySubmissionStore::from_json_file(&fixture)?;
            let request = SubmissionRequest {
                user_id: user,
                problem_id: problem,
                session_id: session,
            };
            let now = at.unwrap_or_else(chrono::Utc::now);

            let decision = check_permission(&store, &request, &policy, now).await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&decision)?)?;
            if !decision.can_submit {
                return Ok(SUBMISSION_DENIED);
            }
        }
    }
    Ok(SUCCESS)
}

/// Maps a command failure to the process exit code.
///
/// Errors that do not originate from `PlatformError` exit with 1.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<PlatformError>()
        .map(PlatformError::exit_code)
        .unwrap_or(1)
}

fn read_elements(path: &Path) -> anyhow::Result<Vec<Element>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("parsing elements in {}", path.display()))
}

fn load_config(path: &Path) -> Result<PlatformConfig, PlatformError> {
    let config = PlatformConfig::from_file(path)?;
    config.validate()?;
    Ok(config)
}
