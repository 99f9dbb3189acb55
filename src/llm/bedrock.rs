//! Bedrock Runtime `Converse` client for the coach

use async_trait::async_trait;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, InferenceConfiguration, Message, SystemContentBlock,
};
use aws_sdk_bedrockruntime::Client;

use super::TextGenerator;
use crate::core::config::ModelConfig;
use crate::core::error::{AppError, AppResult};

/// Coach model reached through Bedrock Runtime
pub struct BedrockGenerator {
    client: Client,
    model: ModelConfig,
}

impl BedrockGenerator {
    /// Builds a client from the shared AWS config, overriding the region when
    /// the model lives elsewhere.
    pub fn new(shared: &aws_config::SdkConfig, model: ModelConfig) -> Self {
        let mut builder = aws_sdk_bedrockruntime::config::Builder::from(shared);
        if let Some(region) = &model.region {
            builder = builder.region(aws_config::Region::new(region.clone()));
        }
        Self {
            client: Client::from_conf(builder.build()),
            model,
        }
    }
}

#[async_trait]
impl TextGenerator for BedrockGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(AppError::build)?;

        let inference = InferenceConfiguration::builder()
            .max_tokens(self.model.max_tokens)
            .temperature(self.model.temperature)
            .build();

        log::info!(
            "Calling Bedrock model {} (prompt {} chars)",
            self.model.model_id,
            prompt.chars().count()
        );

        let response = self
            .client
            .converse()
            .model_id(&self.model.model_id)
            .system(SystemContentBlock::Text(self.model.system_prompt.clone()))
            .messages(message)
            .inference_config(inference)
            .send()
            .await
            .map_err(aws_sdk_bedrockruntime::Error::from)?;

        let text = match response.output() {
            Some(ConverseOutput::Message(message)) => collect_text(message.content()),
            _ => String::new(),
        };

        log::info!("Bedrock answered with {} chars", text.chars().count());
        if text.trim().is_empty() {
            return Err(AppError::Validation("model returned no text".to_string()));
        }
        Ok(text)
    }
}

/// Joins the text segments of a reply, skipping non-text blocks.
fn collect_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .filter_map(|block| block.as_text().ok())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("")
}
