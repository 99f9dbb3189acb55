//! Items written to the sinks: recorded updates and onboarding profiles

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::core::config;
use crate::core::error::AppResult;

/// Durable copy of one inbound update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    /// `CHAT#<chat_id>` or `CHAT#unknown`
    pub pk: String,
    /// `TS#<epoch_ms>`
    pub sk: String,
    pub update_id: Option<i64>,
    /// Compact JSON of the whole update
    pub payload: String,
    /// TTL attribute, epoch seconds
    pub expire_at: i64,
}

impl UpdateRecord {
    /// Derives the table item for a decoded update.
    ///
    /// Keys come from the raw document, not the typed update, so updates the
    /// dispatcher cannot understand are still recorded.
    pub fn from_payload(payload: &Value, received_at: DateTime<Utc>) -> AppResult<Self> {
        let chat = chat_id(payload).map_or_else(|| config::storage::UNKNOWN_CHAT.to_string(), |id| id.to_string());
        let ts_ms = event_timestamp_ms(payload).unwrap_or_else(|| received_at.timestamp_millis());
        let expire_at = (received_at + Duration::days(config::storage::UPDATE_RETENTION_DAYS)).timestamp();

        Ok(Self {
            pk: format!("CHAT#{}", chat),
            sk: format!("TS#{}", ts_ms),
            update_id: payload.get("update_id").and_then(Value::as_i64),
            payload: serde_json::to_string(payload)?,
            expire_at,
        })
    }

    /// Key reserved for update-id lookups (`gsi1`). Written, never queried.
    pub fn idempotency_key(&self) -> Option<String> {
        self.update_id.map(|id| format!("UPDATE#{}", id))
    }
}

/// Completed onboarding answers for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub user_id: i64,
    pub answers: BTreeMap<String, String>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn pk(&self) -> String {
        user_pk(self.user_id)
    }
}

pub fn user_pk(user_id: i64) -> String {
    format!("USER#{}", user_id)
}

/// One line for the delivery stream: compact JSON plus `\n`, so objects
/// landing in S3 are newline-delimited.
pub fn stream_line(payload: &Value) -> AppResult<Vec<u8>> {
    let mut bytes = serde_json::to_vec(payload)?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Chat the update belongs to, wherever the update kind keeps it.
pub fn chat_id(payload: &Value) -> Option<i64> {
    event_message(payload)
        .and_then(|m| m.pointer("/chat/id"))
        .and_then(Value::as_i64)
}

/// Event time embedded in the update (`date`, seconds) in milliseconds.
///
/// A `date` too large to express in milliseconds counts as absent.
pub fn event_timestamp_ms(payload: &Value) -> Option<i64> {
    event_message(payload)
        .and_then(|m| m.get("date"))
        .and_then(Value::as_i64)
        .and_then(|secs| secs.checked_mul(1000))
}

fn event_message(payload: &Value) -> Option<&Value> {
    const MESSAGE_KEYS: [&str; 4] = ["message", "edited_message", "channel_post", "edited_channel_post"];

    MESSAGE_KEYS
        .iter()
        .find_map(|key| payload.get(*key))
        .or_else(|| payload.pointer("/callback_query/message"))
}
