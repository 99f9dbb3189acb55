//! AWS Lambda transport (Function URL / API Gateway proxy events)

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use lambda_runtime::{service_fn, LambdaEvent};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::webhook::handler::{WebhookHandler, WebhookRequest, WebhookResponse};

/// The parts of a proxy event the webhook reads
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyEvent {
    #[serde(default)]
    pub headers: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Proxy integration response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub body: String,
}

impl From<WebhookResponse> for ProxyResponse {
    fn from(response: WebhookResponse) -> Self {
        Self {
            status_code: response.status.as_u16(),
            body: response.body.to_string(),
        }
    }
}

impl ProxyEvent {
    /// Converts the event into a pipeline request.
    ///
    /// Header names are matched case-insensitively downstream; entries that
    /// are not valid HTTP headers are dropped.
    pub fn into_request(self) -> WebhookRequest {
        let mut headers = HeaderMap::new();
        for (name, value) in self.headers.unwrap_or_default() {
            let Some(value) = value else {
                continue;
            };
            match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(&value)) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => log::debug!("Skipping invalid header {:?}", name),
            }
        }

        WebhookRequest {
            headers,
            body: self.body,
            is_base64_encoded: self.is_base64_encoded,
        }
    }
}

/// Handles one raw invocation payload.
pub async fn handle_event(handler: &WebhookHandler, payload: Value) -> ProxyResponse {
    let event = match serde_json::from_value::<ProxyEvent>(payload) {
        Ok(event) => event,
        Err(e) => {
            log::warn!("Unrecognised invocation event: {}", e);
            ProxyEvent::default()
        }
    };

    handler.handle(event.into_request()).await.into()
}

/// Runs the Lambda runtime loop until the sandbox is shut down.
pub async fn run_lambda(handler: Arc<WebhookHandler>) -> Result<(), lambda_runtime::Error> {
    log::info!("Starting Lambda runtime loop");
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { Ok::<_, lambda_runtime::Error>(handle_event(&handler, event.payload).await) }
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::AppError;
    use crate::storage::UpdateRecorder;
    use pretty_assertions::assert_eq;
    use secrecy::SecretString;
    use serde_json::json;

    fn handler(secret: Option<&str>) -> WebhookHandler {
        WebhookHandler::new(secret.map(SecretString::from), UpdateRecorder::disabled(), || {
            Err(AppError::Config("TELEGRAM_TOKEN is not set".into()))
        })
    }

    #[test]
    fn test_event_headers_and_flags() {
        let event: ProxyEvent = serde_json::from_value(json!({
            "headers": {"X-Telegram-Bot-Api-Secret-Token": "abc", "x-empty": null},
            "body": "e30=",
            "isBase64Encoded": true
        }))
        .unwrap();

        let request = event.into_request();
        assert!(request.is_base64_encoded);
        assert_eq!(request.body.as_deref(), Some("e30="));
        assert_eq!(request.headers.get("x-telegram-bot-api-secret-token").unwrap(), "abc");
        assert!(request.headers.get("x-empty").is_none());
    }

    #[test]
    fn test_response_shape() {
        let body = serde_json::to_value(ProxyResponse::from(WebhookResponse::invalid_body())).unwrap();
        assert_eq!(body, json!({"statusCode": 400, "body": "invalid body"}));
    }

    #[tokio::test]
    async fn test_wrong_secret_over_lambda() {
        let response = handle_event(
            &handler(Some("abc")),
            json!({"headers": {"x-telegram-bot-api-secret-token": "nope"}, "body": "{}"}),
        )
        .await;
        assert_eq!(response.status_code, 401);
        assert_eq!(response.body, "unauthorized");
    }

    #[tokio::test]
    async fn test_unrecognised_event_without_secret_is_invalid_body() {
        let response = handle_event(&handler(None), json!({"headers": 5})).await;
        assert_eq!(response.status_code, 400);
    }
}
