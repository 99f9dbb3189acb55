//! Bot API mock backed by wiremock
//!
//! Answers every Bot API method the webhook uses with a canned success and
//! lets tests read back what the bot sent.

#![allow(dead_code)]

use serde_json::{json, Value};
use teloxide::Bot;
use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server that stands in for api.telegram.org
pub struct TelegramMock {
    server: MockServer,
}

/// One `sendMessage` call as received by the mock
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub chat_id: i64,
    pub text: String,
    pub reply_markup: Option<Value>,
}

impl TelegramMock {
    pub async fn start() -> Self {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path_regex("(?i)/bot[^/]+/sendMessage"))
            .respond_with(ResponseTemplate::new(200).set_body_json(sent_message_response()))
            .mount(&server)
            .await;

        for name in ["setWebhook", "deleteWebhook", "setMyCommands"] {
            Mock::given(method("POST"))
                .and(path_regex(format!("(?i)/bot[^/]+/{}", name)))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": true})))
                .mount(&server)
                .await;
        }

        Self { server }
    }

    /// Create a Bot instance that uses this mock server
    pub fn create_bot(&self) -> Bot {
        Bot::new("test_token_12345:ABCDEF").set_api_url(self.server.uri().parse().unwrap())
    }

    /// Get the mock server URI
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Every `sendMessage` call, in the order received
    pub async fn sent_messages(&self) -> Vec<SentMessage> {
        self.calls_to("sendMessage")
            .await
            .into_iter()
            .map(|body| SentMessage {
                chat_id: body["chat_id"].as_i64().unwrap_or_default(),
                text: body["text"].as_str().unwrap_or_default().to_string(),
                reply_markup: body.get("reply_markup").cloned(),
            })
            .collect()
    }

    /// Texts of every `sendMessage` call, in order
    pub async fn sent_texts(&self) -> Vec<String> {
        self.sent_messages().await.into_iter().map(|m| m.text).collect()
    }

    /// JSON bodies of every call to `method_name`
    pub async fn calls_to(&self, method_name: &str) -> Vec<Value> {
        // teloxide requests `/SendMessage`; Bot API method names are case-insensitive.
        let suffix = format!("/{}", method_name).to_lowercase();
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|request| request.url.path().to_lowercase().ends_with(&suffix))
            .filter_map(|request| request.body_json::<Value>().ok())
            .collect()
    }
}

fn sent_message_response() -> Value {
    json!({
        "ok": true,
        "result": {
            "message_id": 42,
            "from": {
                "id": 987654321,
                "is_bot": true,
                "first_name": "KinethosBot",
                "username": "KinethosBot"
            },
            "chat": {
                "id": 7,
                "first_name": "Test",
                "type": "private"
            },
            "date": 1700000000,
            "text": "ok"
        }
    })
}
