// Message Bus Port
// Shared messaging dependency handed to jobs that ask for it

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;
use url::Url;

/// Message sent to a bus destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageEnvelope {
    pub message_id: String,
    pub destination: Url,
    pub response_address: Option<Url>,
    pub message_type: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub body: Value,
}

/// Bus errors
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Send to {destination} failed: {reason}")]
    SendFailed { destination: String, reason: String },

    #[error("Bus is stopped")]
    Stopped,
}

/// Message bus trait
///
/// One instance is shared by every job for the whole process lifetime; the
/// job factory never mutates it.
#[async_trait]
pub trait MessageBus: Send + Sync {
    /// Address of the bus itself (used as the default response address)
    fn address(&self) -> &Url;

    /// Send a message to its destination
    async fn publish(&self, envelope: MessageEnvelope) -> Result<(), BusError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::Mutex;

    /// Bus that records every published envelope
    pub struct RecordingBus {
        address: Url,
        published: Mutex<Vec<MessageEnvelope>>,
    }

    impl RecordingBus {
        pub fn new(address: Url) -> Self {
            Self {
                address,
                published: Mutex::new(Vec::new()),
            }
        }

        pub fn published(&self) -> Vec<MessageEnvelope> {
            self.published.lock().unwrap().clone()
        }
    }

    impl Default for RecordingBus {
        fn default() -> Self {
            Self::new(Url::parse("loopback://localhost/").expect("static URL is valid"))
        }
    }

    #[async_trait]
    impl MessageBus for RecordingBus {
        fn address(&self) -> &Url {
            &self.address
        }

        async fn publish(&self, envelope: MessageEnvelope) -> Result<(), BusError> {
            self.published.lock().unwrap().push(envelope);
            Ok(())
        }
    }
}
