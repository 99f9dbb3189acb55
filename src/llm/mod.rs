//! Text generation behind the `/coach` command

pub mod bedrock;

use async_trait::async_trait;

use crate::core::error::AppResult;

pub use bedrock::BedrockGenerator;

/// A single request/response call to a text-generation model.
///
/// Implementations carry their own system instruction and sampling settings;
/// callers only supply the user prompt. One call, no retries.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Returns the model's answer as plain text.
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}
