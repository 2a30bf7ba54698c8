//! Tracing-backed progress sink for headless use.

use super::{ProgressSink, TransferEvent};
use crate::identity::TransferIdentity;

/// Reports transfer events to the `tracing` subscriber and nowhere else.
#[derive(Debug, Default)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn on_event(&self, identity: &TransferIdentity, event: TransferEvent) {
        match event {
            TransferEvent::Created(name) => {
                tracing::info!("transfer {} created: {}", identity, name);
            }
            TransferEvent::Progress(percent) => {
                tracing::debug!("transfer {} at {}%", identity, percent);
            }
            TransferEvent::Completed => {
                tracing::info!("transfer {} completed", identity);
            }
            TransferEvent::Failed(reason) => {
                tracing::warn!("transfer {} failed: {}", identity, reason);
            }
        }
    }
}
