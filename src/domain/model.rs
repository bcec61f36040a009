use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A drawing element as exchanged between collaborating whiteboard clients.
///
/// Only the reconciliation fields are typed; every other drawing property is
/// carried through untouched in `properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: String,
    pub version: u64,
    pub version_nonce: u64,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Element {
    pub fn new(id: impl Into<String>, version: u64, version_nonce: u64) -> Self {
        Self {
            id: id.into(),
            version,
            version_nonce,
            is_deleted: false,
            properties: Map::new(),
        }
    }

    pub fn deleted(mut self) -> Self {
        self.is_deleted = true;
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementChanges {
    pub inserted: Vec<Element>,
    pub updated: Vec<Element>,
    pub deleted: Vec<String>,
}

impl ElementChanges {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }

    pub fn len(&self) -> usize {
        self.inserted.len() + self.updated.len() + self.deleted.len()
    }
}

/// Timing of a challenge session, as stored by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub start_time: DateTime<Utc>,
    pub duration_seconds: i64,
    pub close_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ended: bool,
}

impl SessionWindow {
    /// End of the session: start + duration, capped by the challenge close time.
    ///
    /// A duration too large to represent has no natural end, so only
    /// `close_at` applies; `None` means the session never expires.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let natural_end = TimeDelta::try_seconds(self.duration_seconds)
            .and_then(|duration| self.start_time.checked_add_signed(duration));
        match (natural_end, self.close_at) {
            (Some(end), Some(close_at)) => Some(end.min(close_at)),
            (end, close_at) => end.or(close_at),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ended || self.expires_at().is_some_and(|end| now >= end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRequest {
    pub user_id: String,
    pub problem_id: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDecision {
    pub can_submit: bool,
    pub message: String,
    /// `None` when the caller is not subject to the attempt quota.
    pub remaining_attempts: Option<u32>,
}

impl PermissionDecision {
    pub fn allow(message: impl Into<String>, remaining_attempts: Option<u32>) -> Self {
        Self {
            can_submit: true,
            message: message.into(),
            remaining_attempts,
        }
    }

    pub fn deny(message: impl Into<String>, remaining_attempts: Option<u32>) -> Self {
        Self {
            can_submit: false,
            message: message.into(),
            remaining_attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceUser {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// One realtime connection tracked by the presence channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub user: PresenceUser,
    pub online_at: DateTime<Utc>,
    #[serde(default)]
    pub away: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSummary {
    pub user: PresenceUser,
    pub online_at: DateTime<Utc>,
    pub away: bool,
    pub presence_count: usize,
}
