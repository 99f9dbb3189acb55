//! Typed view of an inbound Telegram update
//!
//! Only the fields the dispatcher reads are modelled, and almost all of them
//! are optional: the handler must route sparse payloads (tests, replays,
//! channel posts) without failing on missing `message_id`s or chat types.

use serde::Deserialize;

use crate::core::error::AppResult;

/// One update delivered to the webhook
#[derive(Debug, Clone, Deserialize)]
pub struct InboundUpdate {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub edited_message: Option<IncomingMessage>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

/// A chat message (new or edited)
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    #[serde(default)]
    pub message_id: Option<i32>,
    /// Unix time in seconds
    #[serde(default)]
    pub date: Option<i64>,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<Sender>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub reply_to_message: Option<Box<IncomingMessage>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sender {
    pub id: u64,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: Sender,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
    #[serde(default)]
    pub data: Option<String>,
}

/// Coarse kind of an update, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum UpdateKind {
    Message,
    EditedMessage,
    CallbackQuery,
    Other,
}

impl InboundUpdate {
    /// Converts a decoded webhook body into a typed update.
    ///
    /// # Errors
    /// Returns `AppError::Json` if the document is not shaped like an update
    /// (e.g. no `update_id`, or a message without a chat).
    pub fn from_value(value: serde_json::Value) -> AppResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn kind(&self) -> UpdateKind {
        if self.message.is_some() {
            UpdateKind::Message
        } else if self.edited_message.is_some() {
            UpdateKind::EditedMessage
        } else if self.callback_query.is_some() {
            UpdateKind::CallbackQuery
        } else {
            UpdateKind::Other
        }
    }
}

impl IncomingMessage {
    /// Id used to key per-user state: the sender, or the chat for anonymous posts.
    pub fn user_id(&self) -> i64 {
        self.from
            .as_ref()
            .and_then(|u| i64::try_from(u.id).ok())
            .unwrap_or(self.chat.id)
    }

    /// Text body, falling back to a media caption
    pub fn text_or_caption(&self) -> Option<&str> {
        self.text.as_deref().or(self.caption.as_deref())
    }
}
