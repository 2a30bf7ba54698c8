//! Console progress sink: one status line per event on stderr.

use mgrab_core::identity::TransferIdentity;
use mgrab_core::sink::{ProgressSink, TransferEvent};

pub struct ConsoleProgressSink;

impl ProgressSink for ConsoleProgressSink {
    fn on_event(&self, identity: &TransferIdentity, event: TransferEvent) {
        match event {
            TransferEvent::Created(name) => eprintln!("[{}] {}", identity, name),
            TransferEvent::Progress(percent) => eprintln!("[{}] {}%", identity, percent),
            TransferEvent::Completed => eprintln!("[{}] done", identity),
            TransferEvent::Failed(reason) => eprintln!("[{}] failed: {}", identity, reason),
        }
    }
}
