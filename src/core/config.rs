//! Runtime configuration read from the environment.
//!
//! Variable names match the ones the infrastructure stack injects into the
//! function (`TELEGRAM_TOKEN`, `WEBHOOK_SECRET_TOKEN`, `FIREHOSE_STREAM_NAME`,
//! `DDB_TABLE_NAME`). Empty values count as unset.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use indoc::indoc;
use secrecy::SecretString;

use crate::core::error::{AppError, AppResult};

/// Header Telegram uses to echo the `secret_token` given to `setWebhook`
pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Default webhook route
pub const DEFAULT_WEBHOOK_PATH: &str = "/bot";

/// Default listen address for `serve`
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Default Bedrock model for `/coach`
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-haiku-20240307-v1:0";

/// Default output bound for `/coach`
pub const DEFAULT_MAX_TOKENS: i32 = 800;

/// Default sampling temperature for `/coach`
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

/// Default system instruction for `/coach`
pub const DEFAULT_SYSTEM_PROMPT: &str = indoc! {"
    You are Kinethos, a friendly endurance and strength coach.
    Give practical, safe training advice in plain language.
    Keep answers focused and under 300 words unless asked for a full plan.
    If something sounds like an injury, recommend seeing a professional."};

/// Telegram-side limits
pub mod telegram {
    use super::Duration;

    /// Maximum characters in a single text message
    pub const MESSAGE_LIMIT: usize = 4096;

    /// Request timeout for Bot API calls (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Persistence configuration
pub mod storage {
    /// Retention of recorded updates in the table (days)
    pub const UPDATE_RETENTION_DAYS: i64 = 90;

    /// Sentinel used in the partition key when an update has no chat
    pub const UNKNOWN_CHAT: &str = "unknown";
}

/// Onboarding conversation configuration
pub mod dialogue {
    use super::Duration;

    /// Inactivity window after which an unfinished onboarding is dropped (seconds)
    pub const INACTIVITY_TIMEOUT_SECS: u64 = 600;

    /// Inactivity window duration
    pub fn inactivity_timeout() -> Duration {
        Duration::from_secs(INACTIVITY_TIMEOUT_SECS)
    }

    /// Upper bound of concurrently tracked conversations per warm process
    pub const MAX_IN_MEMORY: u64 = 10_000;
}

/// Where onboarding progress lives between requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DialogueBackend {
    /// Per-process cache; lost on cold start
    Memory,
    /// The updates table; survives cold starts
    Table,
}

/// Settings for the text-generation call behind `/coach`
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model_id: String,
    pub region: Option<String>,
    pub max_tokens: i32,
    pub temperature: f32,
    pub system_prompt: String,
}

/// Full runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token; required to build the dispatcher
    pub telegram_token: Option<SecretString>,
    /// Shared webhook secret; `None` disables the gate
    pub webhook_secret: Option<SecretString>,
    pub firehose_stream_name: Option<String>,
    pub table_name: Option<String>,
    /// Username accepted in `/command@username`
    pub bot_username: String,
    /// Alternative Bot API base URL (local Bot API server, tests)
    pub bot_api_url: Option<url::Url>,
    pub webhook_path: String,
    pub bind_addr: SocketAddr,
    pub dialogue_backend: DialogueBackend,
    pub model: ModelConfig,
}

impl Config {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    /// Returns `AppError::Config` when a numeric or enumerated variable holds
    /// an unparseable value. A missing `TELEGRAM_TOKEN` is not an error here;
    /// it only fails dispatcher construction.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_api_url = get("BOT_API_URL")
            .map(|raw| url::Url::parse(&raw).map_err(|e| AppError::Config(format!("Invalid BOT_API_URL: {}", e))))
            .transpose()?;

        let webhook_path = get("WEBHOOK_PATH").unwrap_or_else(|| DEFAULT_WEBHOOK_PATH.to_string());
        if !webhook_path.starts_with('/') {
            return Err(AppError::Config(format!("WEBHOOK_PATH must start with '/': {}", webhook_path)));
        }

        Ok(Self {
            telegram_token: get("TELEGRAM_TOKEN").map(SecretString::from),
            webhook_secret: get("WEBHOOK_SECRET_TOKEN").map(SecretString::from),
            firehose_stream_name: get("FIREHOSE_STREAM_NAME"),
            table_name: get("DDB_TABLE_NAME"),
            bot_username: get("BOT_USERNAME").unwrap_or_default(),
            bot_api_url,
            webhook_path,
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR.parse().ok())?,
            dialogue_backend: parse_or("DIALOGUE_STORE", get("DIALOGUE_STORE"), Some(DialogueBackend::Memory))?,
            model: ModelConfig {
                model_id: get("BEDROCK_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
                region: get("BEDROCK_REGION"),
                max_tokens: parse_or("BEDROCK_MAX_TOKENS", get("BEDROCK_MAX_TOKENS"), Some(DEFAULT_MAX_TOKENS))?,
                temperature: parse_or("BEDROCK_TEMPERATURE", get("BEDROCK_TEMPERATURE"), Some(DEFAULT_TEMPERATURE))?,
                system_prompt: get("COACH_SYSTEM_PROMPT").unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string()),
            },
        })
    }

    /// True when both persistence sinks are disabled
    pub fn has_no_sinks(&self) -> bool {
        self.firehose_stream_name.is_none() && self.table_name.is_none()
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: Option<T>) -> AppResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {}={:?}: {}", key, value, e))),
        None => default.ok_or_else(|| AppError::Config(format!("{} has no default", key))),
    }
}
