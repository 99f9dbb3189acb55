//! Persistence: update sinks, onboarding profiles and dialogue state
//!
//! Every sink sits behind a trait so the webhook can run with any subset of
//! them configured, and tests can substitute recording fakes.

pub mod dialogue;
pub mod records;
pub mod recorder;
pub mod stream;
pub mod table;

use async_trait::async_trait;

use crate::core::error::AppResult;

pub use dialogue::{DialogueStorage, InMemoryDialogueStorage};
pub use records::{UpdateRecord, UserProfile};
pub use recorder::UpdateRecorder;
pub use stream::FirehoseStream;
pub use table::DynamoTable;

/// Append-only delivery channel for raw updates
#[async_trait]
pub trait UpdateStream: Send + Sync {
    /// Appends one record. Batching is the channel's business.
    async fn append(&self, data: Vec<u8>) -> AppResult<()>;
}

/// Keyed store for recorded updates
#[async_trait]
pub trait UpdateStore: Send + Sync {
    /// Upserts one recorded update.
    async fn put_update(&self, record: &UpdateRecord) -> AppResult<()>;
}

/// Keyed store for completed onboarding profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Writes the profile, replacing any earlier one for the same user.
    async fn put_profile(&self, profile: &UserProfile) -> AppResult<()>;
}
