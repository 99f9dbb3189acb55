//! Firehose delivery stream sink (lands raw updates in S3)

use async_trait::async_trait;
use aws_sdk_firehose::primitives::Blob;
use aws_sdk_firehose::types::Record;
use aws_sdk_firehose::Client;

use super::UpdateStream;
use crate::core::error::{AppError, AppResult};

/// `PutRecord` into a named delivery stream
pub struct FirehoseStream {
    client: Client,
    stream_name: String,
}

impl FirehoseStream {
    pub fn new(shared: &aws_config::SdkConfig, stream_name: impl Into<String>) -> Self {
        Self {
            client: Client::new(shared),
            stream_name: stream_name.into(),
        }
    }
}

#[async_trait]
impl UpdateStream for FirehoseStream {
    async fn append(&self, data: Vec<u8>) -> AppResult<()> {
        let size = data.len();
        let record = Record::builder().data(Blob::new(data)).build().map_err(AppError::build)?;

        let output = self
            .client
            .put_record()
            .delivery_stream_name(&self.stream_name)
            .record(record)
            .send()
            .await
            .map_err(aws_sdk_firehose::Error::from)?;

        log::debug!(
            "Appended {} bytes to {} (record {:?})",
            size,
            self.stream_name,
            output.record_id()
        );
        Ok(())
    }
}
