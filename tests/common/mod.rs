//! Common test utilities
//!
//! This module is shared across all integration tests

pub mod fakes;
pub mod telegram_mock;

use std::sync::Arc;

use axum::http::HeaderValue;
use kinethos::app::{build_dispatcher, DispatcherParts};
use kinethos::storage::{InMemoryDialogueStorage, ProfileStore, UpdateRecorder, UpdateStore, UpdateStream};
use kinethos::webhook::{WebhookHandler, WebhookRequest, WebhookResponse};
use secrecy::SecretString;
use serde_json::{json, Value};

#[allow(unused_imports)]
pub use fakes::{FailingSink, FakeGenerator, RecordingProfiles, RecordingStore, RecordingStream};
#[allow(unused_imports)]
pub use telegram_mock::{SentMessage, TelegramMock};

/// A webhook handler wired to the Bot API mock and in-process fakes
pub struct Harness {
    pub telegram: TelegramMock,
    pub stream: Arc<RecordingStream>,
    pub store: Arc<RecordingStore>,
    pub profiles: Arc<RecordingProfiles>,
    pub generator: Arc<FakeGenerator>,
    pub handler: WebhookHandler,
}

#[allow(dead_code)]
impl Harness {
    pub async fn new() -> Self {
        Self::build(None, FakeGenerator::answering("Keep your easy runs easy.")).await
    }

    pub async fn with_secret(secret: &str) -> Self {
        Self::build(Some(secret), FakeGenerator::answering("Keep your easy runs easy.")).await
    }

    pub async fn with_generator(generator: Arc<FakeGenerator>) -> Self {
        Self::build(None, generator).await
    }

    async fn build(secret: Option<&str>, generator: Arc<FakeGenerator>) -> Self {
        let telegram = TelegramMock::start().await;
        let stream = Arc::new(RecordingStream::default());
        let store = Arc::new(RecordingStore::default());
        let profiles = Arc::new(RecordingProfiles::default());

        let recorder = UpdateRecorder::new(
            Some(stream.clone() as Arc<dyn UpdateStream>),
            Some(store.clone() as Arc<dyn UpdateStore>),
        );
        let parts = DispatcherParts {
            bot_username: "KinethosBot".to_string(),
            dialogues: Arc::new(InMemoryDialogueStorage::new()),
            profiles: Some(profiles.clone() as Arc<dyn ProfileStore>),
            generator: generator.clone(),
        };
        let dispatcher = build_dispatcher(telegram.create_bot(), parts);
        let handler = WebhookHandler::with_dispatcher(secret.map(SecretString::from), recorder, dispatcher);

        Self {
            telegram,
            stream,
            store,
            profiles,
            generator,
            handler,
        }
    }

    /// Delivers `update` as a plain JSON body without a secret header.
    pub async fn deliver(&self, update: &Value) -> WebhookResponse {
        self.handler.handle(json_request(update, None)).await
    }

    /// Delivers `update` with the given secret header.
    pub async fn deliver_with_secret(&self, update: &Value, secret: &str) -> WebhookResponse {
        self.handler.handle(json_request(update, Some(secret))).await
    }

    /// Sends one text message from `user_id` in a private chat with the same id.
    pub async fn say(&self, update_id: i64, user_id: i64, text: &str) -> WebhookResponse {
        self.deliver(&text_update(update_id, user_id, text)).await
    }
}

#[allow(dead_code)]
pub fn json_request(update: &Value, secret: Option<&str>) -> WebhookRequest {
    let mut request = WebhookRequest {
        body: Some(update.to_string()),
        ..Default::default()
    };
    if let Some(secret) = secret {
        request
            .headers
            .insert("x-telegram-bot-api-secret-token", HeaderValue::from_str(secret).unwrap());
    }
    request
}

/// A text message update in the private chat of `user_id`
#[allow(dead_code)]
pub fn text_update(update_id: i64, user_id: i64, text: &str) -> Value {
    json!({
        "update_id": update_id,
        "message": {
            "message_id": update_id,
            "date": 1700000000 + update_id,
            "chat": {"id": user_id, "type": "private", "first_name": "Ana"},
            "from": {"id": user_id, "is_bot": false, "first_name": "Ana"},
            "text": text
        }
    })
}
