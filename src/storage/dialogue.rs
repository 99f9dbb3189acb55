//! Where onboarding progress lives between webhook calls
//!
//! Two backends: a per-process `moka` cache (lost on cold start) and the
//! DynamoDB table (see [`super::table::DynamoTable`]). Both drop a
//! conversation after the inactivity window.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use crate::core::config;
use crate::core::error::AppResult;
use crate::telegram::onboarding::OnboardingState;

/// Per-user onboarding state storage
#[async_trait]
pub trait DialogueStorage: Send + Sync {
    /// Current state, or `None` when absent or expired.
    async fn get(&self, user_id: i64) -> AppResult<Option<OnboardingState>>;

    /// Saves the state and restarts the inactivity window.
    async fn update(&self, user_id: i64, state: OnboardingState) -> AppResult<()>;

    /// Drops the state. Removing a missing state is not an error.
    async fn remove(&self, user_id: i64) -> AppResult<()>;
}

/// Warm-process dialogue cache with idle expiry
pub struct InMemoryDialogueStorage {
    cache: Cache<i64, OnboardingState>,
}

impl InMemoryDialogueStorage {
    pub fn new() -> Self {
        Self::with_idle_timeout(config::dialogue::inactivity_timeout())
    }

    pub fn with_idle_timeout(idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(config::dialogue::MAX_IN_MEMORY)
            .time_to_idle(idle)
            .build();
        Self { cache }
    }
}

impl Default for InMemoryDialogueStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DialogueStorage for InMemoryDialogueStorage {
    async fn get(&self, user_id: i64) -> AppResult<Option<OnboardingState>> {
        Ok(self.cache.get(&user_id).await)
    }

    async fn update(&self, user_id: i64, state: OnboardingState) -> AppResult<()> {
        self.cache.insert(user_id, state).await;
        Ok(())
    }

    async fn remove(&self, user_id: i64) -> AppResult<()> {
        self.cache.invalidate(&user_id).await;
        Ok(())
    }
}
