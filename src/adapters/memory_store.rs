use crate::domain::model::SessionWindow;
use crate::domain::ports::SubmissionStore;
use crate::utils::error::{PlatformError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub id: String,
    pub user_id: String,
    #[serde(flatten)]
    pub window: SessionWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub user_id: String,
    pub problem_id: String,
    pub session_id: String,
}

/// Snapshot of the challenge tables, as loaded from a JSON fixture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreFixture {
    #[serde(default)]
    pub managers: Vec<String>,
    #[serde(default)]
    pub sessions: Vec<StoredSession>,
    #[serde(default)]
    pub submissions: Vec<SubmissionRecord>,
}

#[derive(Default)]
struct State {
    managers: HashSet<String>,
    sessions: HashMap<String, StoredSession>,
    submissions: Vec<SubmissionRecord>,
}

/// `SubmissionStore` backed by process memory, for local runs and tests.
#[derive(Default)]
pub struct InMemorySubmissionStore {
    state: RwLock<State>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: StoreFixture) -> Self {
        let state = State {
            managers: fixture.managers.into_iter().collect(),
            sessions: fixture
                .sessions
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
            submissions: fixture.submissions,
        };
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        let fixture: StoreFixture = serde_json::from_str(&content)?;
        Ok(Self::from_fixture(fixture))
    }

    pub async fn add_manager(&self, user_id: impl Into<String>) {
        self.state.write().await.managers.insert(user_id.into());
    }

    pub async fn add_session(&self, session: StoredSession) {
        self.state
            .write()
            .await
            .sessions
            .insert(session.id.clone(), session);
    }

    pub async fn record_submission(&self, record: SubmissionRecord) -> Result<()> {
        let mut state = self.state.write().await;
        if !state.sessions.contains_key(&record.session_id) {
            return Err(PlatformError::store(format!(
                "session {} does not exist",
                record.session_id
            )));
        }
        state.submissions.push(record);
        Ok(())
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn is_challenge_manager(&self, user_id: &str) -> Result<bool> {
        Ok(self.state.read().await.managers.contains(user_id))
    }

    async fn session_window(
        &self,
        session_id: &str,
        user_id: &str,
    ) -> Result<Option<SessionWindow>> {
        let state = self.state.read().await;
        Ok(state
            .sessions
            .get(session_id)
            .filter(|s| s.user_id == user_id)
            .map(|s| s.window.clone()))
    }

    async fn count_submissions(
        &self,
        user_id: &str,
        problem_id: &str,
        session_id: &str,
    ) -> Result<u32> {
        let state = self.state.read().await;
        let count = state
            .submissions
            .iter()
            .filter(|r| {
                r.user_id == user_id && r.problem_id == problem_id && r.session_id == session_id
            })
            .count();
        Ok(count as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn session(id: &str, user_id: &str) -> StoredSession {
        StoredSession {
            id: id.to_string(),
            user_id: user_id.to_string(),
            window: SessionWindow {
                start_time: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
                duration_seconds: 1800,
                close_at: None,
                ended: false,
            },
        }
    }

    #[tokio::test]
    async fn test_sessions_are_scoped_to_owner() {
        let store = InMemorySubmissionStore::new();
        store.add_session(session("s1", "alice")).await;

        assert!(store.session_window("s1", "alice").await.unwrap().is_some());
        assert!(store.session_window("s1", "bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_counts_per_problem_and_session() {
        let store = InMemorySubmissionStore::new();
        store.add_session(session("s1", "alice")).await;

        for problem in ["p1", "p1", "p2"] {
            store
                .record_submission(SubmissionRecord {
                    user_id: "alice".to_string(),
                    problem_id: problem.to_string(),
                    session_id: "s1".to_string(),
                })
                .await
                .unwrap();
        }

        assert_eq!(store.count_submissions("alice", "p1", "s1").await.unwrap(), 2);
        assert_eq!(store.count_submissions("alice", "p2", "s1").await.unwrap(), 1);
        assert_eq!(store.count_submissions("bob", "p1", "s1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_submission_for_unknown_session_fails() {
        let store = InMemorySubmissionStore::new();
        let result = store
            .record_submission(SubmissionRecord {
                user_id: "alice".to_string(),
                problem_id: "p1".to_string(),
                session_id: "nope".to_string(),
            })
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_fixture_parses_flattened_session() {
        let raw = r#"{
            "managers": ["admin"],
            "sessions": [{
                "id": "s1",
                "user_id": "alice",
                "start_time": "2024-03-01T10:00:00Z",
                "duration_seconds": 1800,
                "close_at": null
            }]
        }"#;

        let fixture: StoreFixture = serde_json::from_str(raw).unwrap();
        assert_eq!(fixture.sessions[0].window.duration_seconds, 1800);
        assert!(!fixture.sessions[0].window.ended);
        assert!(fixture.submissions.is_empty());

        let store = InMemorySubmissionStore::from_fixture(fixture);
        assert!(tokio_test::block_on(store.is_challenge_manager("admin")).unwrap());
        assert!(!tokio_test::block_on(store.is_challenge_manager("alice")).unwrap());
    }
}
