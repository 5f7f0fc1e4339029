//! Event sink collaborator.
//!
//! After every state-changing operation the mechanism publishes an
//! [`AuctionSummary`] on the auction's ledger-key topic. Delivery and
//! ordering guarantees towards clients are owned by the hosting platform.

use {
    crate::ledger::auction_key,
    anyhow::{Context, Result},
    model::AuctionSummary,
};

/// Publishes payloads to interested clients.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait EventSink: Send + Sync {
    fn emit(&self, topic: &str, payload: Vec<u8>) -> Result<()>;
}

/// Serializes a summary and publishes it on the auction's topic.
pub fn emit_summary(sink: &dyn EventSink, summary: &AuctionSummary) -> Result<()> {
    let payload = serde_json::to_vec(summary).context("serialize auction summary")?;
    sink.emit(&auction_key(&summary.name), payload)
}

/// Sink that records every emitted event, for tests.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: std::sync::Mutex<Vec<(String, Vec<u8>)>>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingSink {
    /// All events emitted so far as `(topic, payload)` pairs.
    pub fn events(&self) -> Vec<(String, Vec<u8>)> {
        self.events.lock().unwrap().clone()
    }

    /// The summaries published so far, in emission order.
    pub fn summaries(&self) -> Vec<AuctionSummary> {
        self.events()
            .iter()
            .map(|(_, payload)| serde_json::from_slice(payload).unwrap())
            .collect()
    }
}

#[cfg(any(test, feature = "test-util"))]
impl EventSink for RecordingSink {
    fn emit(&self, topic: &str, payload: Vec<u8>) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }
}
