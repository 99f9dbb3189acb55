//! Telegram bot integration and handlers

pub mod bot;
pub mod coach;
pub mod commands;
pub mod dispatcher;
pub mod onboarding;
pub mod text;
pub mod update;

// Re-exports for convenience
pub use bot::{create_bot, register_webhook, setup_bot_commands, Command};
pub use dispatcher::Dispatcher;
pub use teloxide::Bot;
pub use update::InboundUpdate;
