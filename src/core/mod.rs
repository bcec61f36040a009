pub mod presence;
pub mod quota;
pub mod rate_limiter;
pub mod request;
pub mod submission;
pub mod whiteboard;
pub mod workspace_limits;

pub use crate::domain::model::{
    Element, ElementChanges, PermissionDecision, PresenceEntry, SessionWindow, SubmissionRequest,
    ViewerSummary,
};
pub use crate::domain::ports::SubmissionStore;
pub use crate::utils::error::Result;
