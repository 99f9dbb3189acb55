use thiserror::Error;

/// Centralized error types for the webhook
///
/// Every fallible operation in the crate returns this enum. The webhook layer
/// decides per variant whether the failure becomes a `401`/`400` response, is
/// swallowed (sinks), or is reported as `200 error logged` (dispatch).
///
/// # Example
///
/// ```no_run
/// use kinethos::core::error::AppError;
///
/// fn handle_error(err: AppError) {
///     log::error!("Error: {}", err);
/// }
/// ```
#[derive(Error, Debug)]
pub enum AppError {
    /// Telegram Bot API errors
    #[error("Telegram error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    /// DynamoDB errors (update table, profiles, durable dialogues)
    #[error("DynamoDB error: {0}")]
    DynamoDb(#[from] aws_sdk_dynamodb::Error),

    /// Firehose errors (update stream)
    #[error("Firehose error: {0}")]
    Firehose(#[from] aws_sdk_firehose::Error),

    /// Bedrock Runtime errors (coaching model)
    #[error("Bedrock error: {0}")]
    Bedrock(#[from] aws_sdk_bedrockruntime::Error),

    /// Request body was not valid base64
    #[error("Invalid base64 body: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Request body was not valid UTF-8
    #[error("Invalid UTF-8 body: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// JSON encode/decode errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing or malformed configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request builder or payload validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Wraps an AWS request builder failure (missing required field).
    pub fn build(err: impl std::fmt::Display) -> Self {
        AppError::Validation(format!("request build failed: {}", err))
    }
}
