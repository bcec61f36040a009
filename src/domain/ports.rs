use crate::domain::model::SessionWindow;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read access to the challenge tables the submission policy depends on.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn is_challenge_manager(&self, user_id: &str) -> Result<bool>;

    /// Session owned by `user_id`, or `None` if it does not exist for that user.
    async fn session_window(&self, session_id: &str, user_id: &str)
        -> Result<Option<SessionWindow>>;

    async fn count_submissions(
        &self,
        user_id: &str,
        problem_id: &str,
        session_id: &str,
    ) -> Result<u32>;
}
