// Adapters layer: concrete implementations of domain ports.

pub mod memory_store;

pub use memory_store::{InMemorySubmissionStore, StoreFixture, StoredSession, SubmissionRecord};
