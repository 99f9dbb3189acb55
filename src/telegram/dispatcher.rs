//! Update routing: commands, onboarding continuation, plain-text fallback
//!
//! One [`Dispatcher`] is built per process and shared by every request.
//! It holds no per-request state of its own; onboarding progress lives in
//! the [`DialogueStorage`] it was given.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use teloxide::prelude::*;
use teloxide::types::{KeyboardMarkup, KeyboardRemove};

use crate::core::config;
use crate::core::error::AppResult;
use crate::llm::TextGenerator;
use crate::storage::{DialogueStorage, ProfileStore, UserProfile};
use crate::telegram::bot::Command;
use crate::telegram::onboarding::{self, OnboardingState, StepOutcome};
use crate::telegram::update::{InboundUpdate, IncomingMessage};
use crate::telegram::{coach, commands, text};

/// Routes decoded updates to their handlers and sends the replies
pub struct Dispatcher {
    bot: Bot,
    bot_username: String,
    dialogues: Arc<dyn DialogueStorage>,
    profiles: Option<Arc<dyn ProfileStore>>,
    generator: Arc<dyn TextGenerator>,
}

impl Dispatcher {
    pub fn new(
        bot: Bot,
        bot_username: impl Into<String>,
        dialogues: Arc<dyn DialogueStorage>,
        profiles: Option<Arc<dyn ProfileStore>>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            bot,
            bot_username: bot_username.into(),
            dialogues,
            profiles,
            generator,
        }
    }

    /// Handles one decoded webhook body.
    ///
    /// # Errors
    /// Returns an error if the body is not an update, a reply cannot be sent,
    /// or dialogue/profile storage fails. Model failures are answered with an
    /// apology instead and never surface here.
    pub async fn dispatch(&self, payload: Value) -> AppResult<()> {
        let update = InboundUpdate::from_value(payload)?;

        let Some(message) = update.message.as_ref() else {
            log::debug!("Update {} ({}) has nothing to route", update.update_id, update.kind());
            return Ok(());
        };
        let Some(text) = message.text.as_deref() else {
            log::debug!("Update {} carries no text, ignoring", update.update_id);
            return Ok(());
        };

        self.route_text(message, text).await
    }

    async fn route_text(&self, message: &IncomingMessage, text: &str) -> AppResult<()> {
        if let Some(command) = Command::from_text(text, &self.bot_username) {
            log::info!("Command {:?} from chat {}", command, message.chat.id);
            return self.handle_command(command, message).await;
        }
        if commands::looks_like_command(text) {
            log::info!("Ignoring unknown command from chat {}: {}", message.chat.id, text);
            return Ok(());
        }

        let user_id = message.user_id();
        if let Some(state) = self.dialogues.get(user_id).await? {
            return self.continue_onboarding(message, state, text).await;
        }

        if commands::is_ping_alias(text) {
            self.reply(message, commands::PONG_TEXT).await?;
            return Ok(());
        }

        self.reply(message, commands::echo_text(text)).await?;
        Ok(())
    }

    async fn handle_command(&self, command: Command, message: &IncomingMessage) -> AppResult<()> {
        match command {
            Command::Start => {
                self.reply(message, commands::GREETING_TEXT).await?;
            }
            Command::Ping => {
                self.reply(message, commands::PONG_TEXT).await?;
            }
            Command::Onboard => {
                self.apply_outcome(message, onboarding::begin()).await?;
            }
            Command::Cancel => {
                self.cancel_onboarding(message).await?;
            }
            Command::Coach(args) => {
                self.handle_coach(message, &args).await?;
            }
        }
        Ok(())
    }

    async fn continue_onboarding(&self, message: &IncomingMessage, state: OnboardingState, answer: &str) -> AppResult<()> {
        log::debug!("Onboarding answer from user {} at {}", message.user_id(), state.step);
        self.apply_outcome(message, onboarding::advance(state, answer)).await
    }

    async fn apply_outcome(&self, message: &IncomingMessage, outcome: StepOutcome) -> AppResult<()> {
        let user_id = message.user_id();
        match outcome {
            StepOutcome::Continue { state, prompt } => {
                self.dialogues.update(user_id, state).await?;
                match prompt.keyboard() {
                    Some(keyboard) => self.reply_with_keyboard(message, prompt.text, keyboard).await?,
                    None => self.reply(message, prompt.text).await?,
                }
            }
            StepOutcome::Completed { answers } => {
                let profile = UserProfile {
                    user_id,
                    answers,
                    updated_at: Utc::now(),
                };
                match &self.profiles {
                    Some(profiles) => profiles.put_profile(&profile).await?,
                    None => log::warn!("No table configured, profile for user {} not saved", user_id),
                }
                self.dialogues.remove(user_id).await?;
                self.reply_removing_keyboard(message, onboarding::DONE_TEXT).await?;
            }
        }
        Ok(())
    }

    async fn cancel_onboarding(&self, message: &IncomingMessage) -> AppResult<()> {
        let user_id = message.user_id();
        if self.dialogues.get(user_id).await?.is_none() {
            self.reply(message, onboarding::NOTHING_TO_CANCEL_TEXT).await?;
            return Ok(());
        }

        self.dialogues.remove(user_id).await?;
        log::info!("User {} cancelled onboarding", user_id);
        self.reply_removing_keyboard(message, onboarding::CANCEL_TEXT).await?;
        Ok(())
    }

    async fn handle_coach(&self, message: &IncomingMessage, args: &str) -> AppResult<()> {
        let Some(prompt) = coach::extract_prompt(args, message) else {
            self.reply(message, coach::USAGE_TEXT).await?;
            return Ok(());
        };

        self.reply(message, coach::THINKING_TEXT).await?;

        let answer = match self.generator.generate(&prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                log::error!("Coach request failed for chat {}: {}", message.chat.id, e);
                self.reply(message, coach::APOLOGY_TEXT).await?;
                return Ok(());
            }
        };

        for chunk in text::split_message(&answer, config::telegram::MESSAGE_LIMIT) {
            self.reply(message, chunk).await?;
        }
        Ok(())
    }

    async fn reply(&self, message: &IncomingMessage, text: impl Into<String>) -> AppResult<()> {
        self.bot.send_message(ChatId(message.chat.id), text).await?;
        Ok(())
    }

    async fn reply_with_keyboard(
        &self,
        message: &IncomingMessage,
        text: impl Into<String>,
        keyboard: KeyboardMarkup,
    ) -> AppResult<()> {
        self.bot
            .send_message(ChatId(message.chat.id), text)
            .reply_markup(keyboard)
            .await?;
        Ok(())
    }

    async fn reply_removing_keyboard(&self, message: &IncomingMessage, text: impl Into<String>) -> AppResult<()> {
        self.bot
            .send_message(ChatId(message.chat.id), text)
            .reply_markup(KeyboardRemove::new())
            .await?;
        Ok(())
    }
}
