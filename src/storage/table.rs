//! DynamoDB table: recorded updates, profiles and (optionally) dialogues
//!
//! Layout (single table, string keys `pk`/`sk`, TTL attribute `expire_at`):
//!
//! | item | pk | sk |
//! |---|---|---|
//! | recorded update | `CHAT#<chat_id>` | `TS#<epoch_ms>` |
//! | profile | `USER#<user_id>` | `PROFILE` |
//! | dialogue | `USER#<user_id>` | `DIALOGUE` |
//!
//! Recorded updates also carry `gsi1pk = UPDATE#<update_id>` / `gsi1sk` for
//! the `gsi1` index.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::Utc;

use super::dialogue::DialogueStorage;
use super::records::{user_pk, UpdateRecord, UserProfile};
use super::{ProfileStore, UpdateStore};
use crate::core::config;
use crate::core::error::AppResult;
use crate::telegram::onboarding::OnboardingState;

const PROFILE_SK: &str = "PROFILE";
const DIALOGUE_SK: &str = "DIALOGUE";

/// Handle to the bot's DynamoDB table
#[derive(Clone)]
pub struct DynamoTable {
    client: Client,
    table_name: String,
}

impl DynamoTable {
    pub fn new(shared: &aws_config::SdkConfig, table_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(shared),
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl UpdateStore for DynamoTable {
    async fn put_update(&self, record: &UpdateRecord) -> AppResult<()> {
        let mut request = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .item("pk", AttributeValue::S(record.pk.clone()))
            .item("sk", AttributeValue::S(record.sk.clone()))
            .item("payload", AttributeValue::S(record.payload.clone()))
            .item("expire_at", AttributeValue::N(record.expire_at.to_string()));

        if let (Some(update_id), Some(gsi1pk)) = (record.update_id, record.idempotency_key()) {
            request = request
                .item("update_id", AttributeValue::N(update_id.to_string()))
                .item("gsi1pk", AttributeValue::S(gsi1pk))
                .item("gsi1sk", AttributeValue::S(record.sk.clone()));
        }

        request.send().await.map_err(aws_sdk_dynamodb::Error::from)?;
        log::debug!("Stored update {} / {}", record.pk, record.sk);
        Ok(())
    }
}

#[async_trait]
impl ProfileStore for DynamoTable {
    async fn put_profile(&self, profile: &UserProfile) -> AppResult<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("pk", AttributeValue::S(profile.pk()))
            .item("sk", AttributeValue::S(PROFILE_SK.to_string()))
            .item("user_id", AttributeValue::N(profile.user_id.to_string()))
            .item("answers", AttributeValue::M(answers_to_attributes(profile)))
            .item("updated_at", AttributeValue::S(profile.updated_at.to_rfc3339()))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        log::info!("Saved profile for user {}", profile.user_id);
        Ok(())
    }
}

#[async_trait]
impl DialogueStorage for DynamoTable {
    async fn get(&self, user_id: i64) -> AppResult<Option<OnboardingState>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(user_pk(user_id)))
            .key("sk", AttributeValue::S(DIALOGUE_SK.to_string()))
            .consistent_read(true)
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;

        let Some(item) = output.item() else {
            return Ok(None);
        };

        // TTL deletion lags by hours, so the window is enforced on read.
        let updated_at_ms = item
            .get("updated_at_ms")
            .and_then(|v| v.as_n().ok())
            .and_then(|n| n.parse::<i64>().ok())
            .unwrap_or(0);
        if is_expired(updated_at_ms, Utc::now().timestamp_millis()) {
            log::info!("Onboarding for user {} timed out, discarding", user_id);
            DialogueStorage::remove(self, user_id).await?;
            return Ok(None);
        }

        match item.get("state").and_then(|v| v.as_s().ok()) {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn update(&self, user_id: i64, state: OnboardingState) -> AppResult<()> {
        let now = Utc::now();
        let expire_at = now.timestamp() + config::dialogue::INACTIVITY_TIMEOUT_SECS as i64;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .item("pk", AttributeValue::S(user_pk(user_id)))
            .item("sk", AttributeValue::S(DIALOGUE_SK.to_string()))
            .item("state", AttributeValue::S(serde_json::to_string(&state)?))
            .item("updated_at_ms", AttributeValue::N(now.timestamp_millis().to_string()))
            .item("expire_at", AttributeValue::N(expire_at.to_string()))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        Ok(())
    }

    async fn remove(&self, user_id: i64) -> AppResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key("pk", AttributeValue::S(user_pk(user_id)))
            .key("sk", AttributeValue::S(DIALOGUE_SK.to_string()))
            .send()
            .await
            .map_err(aws_sdk_dynamodb::Error::from)?;
        Ok(())
    }
}

fn answers_to_attributes(profile: &UserProfile) -> HashMap<String, AttributeValue> {
    profile
        .answers
        .iter()
        .map(|(field, answer)| (field.clone(), AttributeValue::S(answer.clone())))
        .collect()
}

fn is_expired(updated_at_ms: i64, now_ms: i64) -> bool {
    let window_ms = (config::dialogue::INACTIVITY_TIMEOUT_SECS * 1000) as i64;
    now_ms.saturating_sub(updated_at_ms) > window_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_inactivity_window() {
        let now = 1_700_000_000_000;
        assert!(!is_expired(now - 599_000, now));
        assert!(!is_expired(now - 600_000, now));
        assert!(is_expired(now - 600_001, now));
        assert!(is_expired(0, now));
    }

    #[test]
    fn test_answers_become_string_map() {
        let profile = UserProfile {
            user_id: 7,
            answers: BTreeMap::from([
                ("goal".to_string(), "Get faster".to_string()),
                ("injuries".to_string(), "None".to_string()),
            ]),
            updated_at: Utc::now(),
        };

        let attrs = answers_to_attributes(&profile);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs["goal"].as_s().unwrap(), "Get faster");
        assert_eq!(profile.pk(), "USER#7");
    }
}
