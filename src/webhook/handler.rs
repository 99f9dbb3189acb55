//! Transport-independent webhook pipeline
//!
//! auth → decode → record → dispatch → response. Both the HTTP server and
//! the Lambda adapter translate their native request into a
//! [`WebhookRequest`] and hand it to the same [`WebhookHandler`].

use axum::http::{HeaderMap, StatusCode};
use chrono::Utc;
use once_cell::sync::OnceCell;
use secrecy::SecretString;
use serde_json::Value;

use crate::core::error::{AppError, AppResult};
use crate::storage::UpdateRecorder;
use crate::telegram::Dispatcher;
use crate::webhook::auth::verify_secret;
use crate::webhook::decode::decode_body;

pub const UNAUTHORIZED_BODY: &str = "unauthorized";
pub const INVALID_BODY: &str = "invalid body";
pub const OK_BODY: &str = "OK";
pub const ERROR_LOGGED_BODY: &str = "error logged";

/// One inbound delivery, as seen by the pipeline
#[derive(Debug, Clone, Default)]
pub struct WebhookRequest {
    pub headers: HeaderMap,
    pub body: Option<String>,
    pub is_base64_encoded: bool,
}

/// Status plus plain-text body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: StatusCode,
    pub body: &'static str,
}

impl WebhookResponse {
    pub const fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: UNAUTHORIZED_BODY,
        }
    }

    pub const fn invalid_body() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: INVALID_BODY,
        }
    }

    pub const fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            body: OK_BODY,
        }
    }

    /// Dispatch failed after decode; still `200` so Telegram does not redeliver.
    pub const fn error_logged() -> Self {
        Self {
            status: StatusCode::OK,
            body: ERROR_LOGGED_BODY,
        }
    }
}

type DispatcherFactory = Box<dyn Fn() -> AppResult<Dispatcher> + Send + Sync>;

/// The webhook pipeline with its lazily built dispatcher
pub struct WebhookHandler {
    secret: Option<SecretString>,
    recorder: UpdateRecorder,
    dispatcher: OnceCell<Dispatcher>,
    factory: DispatcherFactory,
}

impl WebhookHandler {
    /// Creates a handler whose dispatcher is built on first use.
    ///
    /// A failing `factory` is retried on the next request; until it succeeds
    /// every decoded update is answered with `200 error logged`.
    pub fn new<F>(secret: Option<SecretString>, recorder: UpdateRecorder, factory: F) -> Self
    where
        F: Fn() -> AppResult<Dispatcher> + Send + Sync + 'static,
    {
        Self {
            secret,
            recorder,
            dispatcher: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Creates a handler around an already built dispatcher.
    pub fn with_dispatcher(secret: Option<SecretString>, recorder: UpdateRecorder, dispatcher: Dispatcher) -> Self {
        Self {
            secret,
            recorder,
            dispatcher: OnceCell::with_value(dispatcher),
            factory: Box::new(|| Err(AppError::Config("dispatcher already built".into()))),
        }
    }

    /// Runs one request through the pipeline. Never fails: every outcome is
    /// a response.
    pub async fn handle(&self, request: WebhookRequest) -> WebhookResponse {
        if !verify_secret(&request.headers, self.secret.as_ref()) {
            log::warn!("Secret token mismatch, rejecting request");
            return WebhookResponse::unauthorized();
        }

        let payload = match decode_body(request.body.as_deref(), request.is_base64_encoded) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Failed to parse request body: {}", e);
                return WebhookResponse::invalid_body();
            }
        };

        self.recorder.record(&payload, Utc::now()).await;

        match self.dispatch(payload).await {
            Ok(()) => WebhookResponse::ok(),
            Err(e) => {
                log::error!("Error processing update: {}", e);
                WebhookResponse::error_logged()
            }
        }
    }

    async fn dispatch(&self, payload: Value) -> AppResult<()> {
        let dispatcher = self.dispatcher.get_or_try_init(|| (self.factory)())?;
        dispatcher.dispatch(payload).await
    }
}
