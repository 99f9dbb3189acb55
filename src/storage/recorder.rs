//! Best-effort recording of every decoded update

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::records::{stream_line, UpdateRecord};
use super::{UpdateStore, UpdateStream};

/// Writes each update to the stream and the table, swallowing failures
#[derive(Clone, Default)]
pub struct UpdateRecorder {
    stream: Option<Arc<dyn UpdateStream>>,
    store: Option<Arc<dyn UpdateStore>>,
}

impl UpdateRecorder {
    pub fn new(stream: Option<Arc<dyn UpdateStream>>, store: Option<Arc<dyn UpdateStore>>) -> Self {
        Self { stream, store }
    }

    /// A recorder with both sinks disabled
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Attempts both writes exactly once, concurrently.
    ///
    /// Neither outcome affects the other or the caller: errors are logged
    /// and dropped here.
    pub async fn record(&self, payload: &Value, received_at: DateTime<Utc>) {
        let stream_write = async {
            let Some(stream) = &self.stream else {
                return;
            };
            let result = match stream_line(payload) {
                Ok(line) => stream.append(line).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                log::error!("Failed to append update to stream: {}", e);
            }
        };

        let table_write = async {
            let Some(store) = &self.store else {
                return;
            };
            let result = match UpdateRecord::from_payload(payload, received_at) {
                Ok(record) => store.put_update(&record).await,
                Err(e) => Err(e),
            };
            if let Err(e) = result {
                log::error!("Failed to write update to table: {}", e);
            }
        };

        tokio::join!(stream_write, table_write);
    }
}
