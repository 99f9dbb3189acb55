//! Cold-start wiring: configuration → AWS clients → webhook handler

use std::sync::Arc;

use aws_config::BehaviorVersion;

use crate::core::config::{Config, DialogueBackend};
use crate::core::error::{AppError, AppResult};
use crate::llm::{BedrockGenerator, TextGenerator};
use crate::storage::{
    DialogueStorage, DynamoTable, FirehoseStream, InMemoryDialogueStorage, ProfileStore, UpdateRecorder, UpdateStore,
    UpdateStream,
};
use crate::telegram::{create_bot, Dispatcher};
use crate::webhook::WebhookHandler;

/// Everything a dispatcher needs besides the bot
#[derive(Clone)]
pub struct DispatcherParts {
    pub bot_username: String,
    pub dialogues: Arc<dyn DialogueStorage>,
    pub profiles: Option<Arc<dyn ProfileStore>>,
    pub generator: Arc<dyn TextGenerator>,
}

/// Loads the shared AWS configuration (region, credentials) from the environment.
pub async fn load_aws_config() -> aws_config::SdkConfig {
    aws_config::defaults(BehaviorVersion::latest()).load().await
}

/// Builds the webhook handler for `config`.
///
/// Sink clients are created eagerly. The dispatcher (which needs the bot
/// token) is built on the first decoded update.
pub fn build_handler(config: &Config, aws: &aws_config::SdkConfig) -> WebhookHandler {
    let stream: Option<Arc<dyn UpdateStream>> = config
        .firehose_stream_name
        .as_ref()
        .map(|name| Arc::new(FirehoseStream::new(aws, name)) as Arc<dyn UpdateStream>);
    let table = config.table_name.as_ref().map(|name| Arc::new(DynamoTable::new(aws, name)));

    let recorder = UpdateRecorder::new(stream, table.clone().map(|t| t as Arc<dyn UpdateStore>));

    let parts = DispatcherParts {
        bot_username: config.bot_username.clone(),
        dialogues: select_dialogue_storage(config.dialogue_backend, table.clone()),
        profiles: table.map(|t| t as Arc<dyn ProfileStore>),
        generator: Arc::new(BedrockGenerator::new(aws, config.model.clone())),
    };

    let token = config.telegram_token.clone();
    let api_url = config.bot_api_url.clone();
    WebhookHandler::new(config.webhook_secret.clone(), recorder, move || {
        let token = token
            .as_ref()
            .ok_or_else(|| AppError::Config("TELEGRAM_TOKEN is not set".to_string()))?;
        let bot = create_bot(token, api_url.as_ref())?;
        log::info!("Dispatcher initialized");
        Ok(build_dispatcher(bot, parts.clone()))
    })
}

pub fn build_dispatcher(bot: teloxide::Bot, parts: DispatcherParts) -> Dispatcher {
    Dispatcher::new(bot, parts.bot_username, parts.dialogues, parts.profiles, parts.generator)
}

fn select_dialogue_storage(backend: DialogueBackend, table: Option<Arc<DynamoTable>>) -> Arc<dyn DialogueStorage> {
    match (backend, table) {
        (DialogueBackend::Table, Some(table)) => table as Arc<dyn DialogueStorage>,
        (DialogueBackend::Table, None) => {
            log::warn!("DIALOGUE_STORE=table but DDB_TABLE_NAME is not set, keeping onboarding progress in memory");
            Arc::new(InMemoryDialogueStorage::new())
        }
        (DialogueBackend::Memory, _) => Arc::new(InMemoryDialogueStorage::new()),
    }
}

/// Builds a bot for the one-shot CLI commands, where a missing token is fatal.
pub fn bot_from_config(config: &Config) -> AppResult<teloxide::Bot> {
    let token = config
        .telegram_token
        .as_ref()
        .ok_or_else(|| AppError::Config("TELEGRAM_TOKEN is not set".to_string()))?;
    create_bot(token, config.bot_api_url.as_ref())
}
