//! KinethosBot - Telegram webhook for a training-coach bot
//!
//! This library provides the webhook pipeline (secret check, body decoding,
//! update recording, dispatch) and the bot's conversational features.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, and logging
//! - `storage`: Firehose/DynamoDB sinks, profiles, and dialogue state
//! - `telegram`: command table, dispatcher, onboarding and coach flows
//! - `llm`: text generation for the coach (Bedrock)
//! - `webhook`: request pipeline plus HTTP and Lambda transports
//! - `app`: cold-start wiring from configuration

pub mod app;
pub mod cli;
pub mod core;
pub mod llm;
pub mod storage;
pub mod telegram;
pub mod webhook;

// Re-export commonly used types for convenience
pub use crate::core::{config, AppError, AppResult, Config};
pub use telegram::Dispatcher;
pub use webhook::{WebhookHandler, WebhookRequest, WebhookResponse};
