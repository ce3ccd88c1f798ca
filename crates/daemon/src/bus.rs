// In-process message bus that logs every published envelope

use async_trait::async_trait;
use jobwire_core::port::{BusError, MessageBus, MessageEnvelope};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;
use url::Url;

pub struct LoggingBus {
    address: Url,
    published: AtomicU64,
}

impl LoggingBus {
    pub fn new(address: Url) -> Self {
        Self {
            address,
            published: AtomicU64::new(0),
        }
    }

    /// Number of envelopes published so far
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl MessageBus for LoggingBus {
    fn address(&self) -> &Url {
        &self.address
    }

    async fn publish(&self, envelope: MessageEnvelope) -> Result<(), BusError> {
        let count = self.published.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            message_id = %envelope.message_id,
            destination = %envelope.destination,
            message_type = %envelope.message_type,
            headers = ?envelope.headers,
            published = count,
            "Message published"
        );
        Ok(())
    }
}
