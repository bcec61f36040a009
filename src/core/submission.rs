//! Attempt policy for challenge submissions.
//!
//! Read-only: session timing and submission counts are owned by the store.

use crate::domain::model::{PermissionDecision, SubmissionRequest};
use crate::domain::ports::SubmissionStore;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPolicy {
    pub max_attempts: u32,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

/// Decides whether `request` may submit another attempt at `now`.
pub async fn check_permission<S>(
    store: &S,
    request: &SubmissionRequest,
    policy: &SubmissionPolicy,
    now: DateTime<Utc>,
) -> Result<PermissionDecision>
where
    S: SubmissionStore + ?Sized,
{
    if store.is_challenge_manager(&request.user_id).await? {
        tracing::debug!(user_id = %request.user_id, "challenge manager bypasses attempt limits");
        return Ok(PermissionDecision::allow("Challenge managers can always submit", None));
    }

    let Some(session_id) = request.session_id.as_deref() else {
        return Ok(PermissionDecision::deny(
            "A challenge session is required to submit",
            None,
        ));
    };

    let Some(window) = store.session_window(session_id, &request.user_id).await? else {
        return Ok(PermissionDecision::deny("Session not found", None));
    };

    if window.is_expired(now) {
        tracing::info!(
            user_id = %request.user_id,
            session_id,
            expires_at = ?window.expires_at(),
            "submission rejected: session has ended"
        );
        return Ok(PermissionDecision::deny("This session has ended", None));
    }

    let used = store
        .count_submissions(&request.user_id, &request.problem_id, session_id)
        .await?;

    if used >= policy.max_attempts {
        tracing::info!(
            user_id = %request.user_id,
            problem_id = %request.problem_id,
            used,
            "submission rejected: attempt limit reached"
        );
        return Ok(PermissionDecision::deny(
            format!(
                "You have reached the maximum number of attempts ({})",
                policy.max_attempts
            ),
            Some(0),
        ));
    }

    Ok(PermissionDecision::allow(
        "You can submit",
        Some(policy.max_attempts - used),
    ))
}
