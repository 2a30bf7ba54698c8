//! Engine facade: wires the registry, the fetcher, and the sinks together.

use crate::fetch::RangeFetch;
use crate::identity::TransferIdentity;
use crate::media::MediaKind;
use crate::registry::TransferRegistry;
use crate::sink::{DeliverySink, ProgressSink};
use crate::transfer::{self, SavedFile, TransferError};
use std::sync::Arc;

/// Result of a `download` call.
#[derive(Debug)]
pub enum DownloadOutcome {
    /// The transfer completed and the object was delivered.
    Saved(SavedFile),
    /// A transfer for this locator is already in flight; nothing was
    /// started. This is the idempotent no-op path, not an error.
    AlreadyActive(TransferIdentity),
}

/// One engine per application. Cheap to clone; clones share the registry,
/// so dedup holds across all of them.
#[derive(Clone)]
pub struct Engine {
    registry: Arc<TransferRegistry>,
    fetcher: Arc<dyn RangeFetch>,
    progress: Arc<dyn ProgressSink>,
    delivery: Arc<dyn DeliverySink>,
}

impl Engine {
    pub fn new(
        fetcher: Arc<dyn RangeFetch>,
        progress: Arc<dyn ProgressSink>,
        delivery: Arc<dyn DeliverySink>,
    ) -> Self {
        Self {
            registry: Arc::new(TransferRegistry::new()),
            fetcher,
            progress,
            delivery,
        }
    }

    /// Registry access for progress rendering (`snapshot`, `is_active`).
    pub fn registry(&self) -> &Arc<TransferRegistry> {
        &self.registry
    }

    /// Retrieves `locator` as a resumable range transfer and delivers the
    /// assembled object.
    ///
    /// Idempotent by identity: a second call for the same locator while the
    /// first is in flight returns [`DownloadOutcome::AlreadyActive`]. Once a
    /// transfer reaches a terminal state its registry entry is gone, so a
    /// later call starts fresh instead of being silently suppressed.
    pub fn download(
        &self,
        locator: &str,
        kind: MediaKind,
    ) -> Result<DownloadOutcome, TransferError> {
        let handle = match self.registry.begin(locator, kind) {
            Ok(handle) => handle,
            Err(TransferError::Duplicate(identity)) => {
                tracing::debug!("download for {} already in flight", identity);
                return Ok(DownloadOutcome::AlreadyActive(identity));
            }
            Err(e) => return Err(e),
        };

        let saved = transfer::run(handle.state(), self.fetcher.as_ref(), self.progress.as_ref())?;

        // The bytes were retrieved; a delivery failure is surfaced to the
        // caller but the transfer itself stays completed.
        if let Err(e) = self.delivery.deliver(&saved.media, &saved.name) {
            tracing::warn!("delivery of {} failed: {:#}", saved.name, e);
            return Err(TransferError::Delivery(e.to_string()));
        }

        Ok(DownloadOutcome::Saved(saved))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{parse_content_range, FetchError, RangeResponse};
    use crate::sink::TransferEvent;
    use crate::transfer::TransferStatus;
    use std::sync::mpsc;
    use std::sync::Mutex;

    struct OneShotFetcher {
        status: u32,
        body: Vec<u8>,
    }

    impl RangeFetch for OneShotFetcher {
        fn fetch_range(&self, _locator: &str, _offset: u64) -> Result<RangeResponse, FetchError> {
            Ok(RangeResponse {
                status: self.status,
                content_type: None,
                content_range: None,
                body: self.body.clone(),
            })
        }
    }

    /// Blocks inside fetch_range until released, so a transfer can be held
    /// in flight while another download for the same locator is attempted.
    struct GatedFetcher {
        entered_tx: Mutex<mpsc::Sender<()>>,
        release_rx: Mutex<mpsc::Receiver<()>>,
    }

    impl RangeFetch for GatedFetcher {
        fn fetch_range(&self, _locator: &str, _offset: u64) -> Result<RangeResponse, FetchError> {
            self.entered_tx.lock().unwrap().send(()).unwrap();
            self.release_rx.lock().unwrap().recv().unwrap();
            Ok(RangeResponse {
                status: 206,
                content_type: None,
                content_range: parse_content_range("bytes 0-3/4"),
                body: vec![1, 2, 3, 4],
            })
        }
    }

    #[derive(Default)]
    struct EventLog(Mutex<Vec<TransferEvent>>);

    impl ProgressSink for EventLog {
        fn on_event(&self, _identity: &TransferIdentity, event: TransferEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[derive(Default)]
    struct CapturingDelivery {
        delivered: Mutex<Vec<(Vec<u8>, String)>>,
        fail: bool,
    }

    impl DeliverySink for CapturingDelivery {
        fn deliver(&self, media: &[u8], suggested_name: &str) -> anyhow::Result<()> {
            self.delivered
                .lock()
                .unwrap()
                .push((media.to_vec(), suggested_name.to_string()));
            if self.fail {
                anyhow::bail!("disk full");
            }
            Ok(())
        }
    }

    #[test]
    fn completed_download_delivers_exactly_once() {
        let delivery = Arc::new(CapturingDelivery::default());
        let engine = Engine::new(
            Arc::new(OneShotFetcher {
                status: 200,
                body: b"payload".to_vec(),
            }),
            Arc::new(EventLog::default()),
            delivery.clone(),
        );

        let outcome = engine
            .download("https://example.com/media/1", MediaKind::Image)
            .unwrap();
        match outcome {
            DownloadOutcome::Saved(saved) => assert_eq!(saved.media, b"payload"),
            other => panic!("expected Saved, got {:?}", other),
        }

        let delivered = delivery.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, b"payload");
        assert_eq!(engine.registry().active_count(), 0);
    }

    #[test]
    fn failed_download_delivers_nothing_and_frees_identity() {
        let delivery = Arc::new(CapturingDelivery::default());
        let engine = Engine::new(
            Arc::new(OneShotFetcher {
                status: 404,
                body: Vec::new(),
            }),
            Arc::new(EventLog::default()),
            delivery.clone(),
        );

        let locator = "https://example.com/media/missing";
        let err = engine.download(locator, MediaKind::Image).unwrap_err();
        assert_eq!(err, TransferError::UnexpectedStatus(404));
        assert!(delivery.delivered.lock().unwrap().is_empty());

        // The identity is free again: the retry reaches the server rather
        // than being swallowed as a duplicate.
        let err = engine.download(locator, MediaKind::Image).unwrap_err();
        assert_eq!(err, TransferError::UnexpectedStatus(404));
    }

    #[test]
    fn delivery_failure_reported_but_transfer_stays_completed() {
        let delivery = Arc::new(CapturingDelivery {
            delivered: Mutex::new(Vec::new()),
            fail: true,
        });
        let events = Arc::new(EventLog::default());
        let engine = Engine::new(
            Arc::new(OneShotFetcher {
                status: 200,
                body: b"ok".to_vec(),
            }),
            events.clone(),
            delivery,
        );

        let err = engine
            .download("https://example.com/media/2", MediaKind::Image)
            .unwrap_err();
        assert!(matches!(err, TransferError::Delivery(_)));

        // The transfer's terminal event is Completed; the handoff failure
        // does not rewrite history.
        let log = events.0.lock().unwrap();
        assert!(log.contains(&TransferEvent::Completed));
        assert!(!log.iter().any(|e| matches!(e, TransferEvent::Failed(_))));
    }

    #[test]
    fn concurrent_same_locator_is_already_active() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let engine = Engine::new(
            Arc::new(GatedFetcher {
                entered_tx: Mutex::new(entered_tx),
                release_rx: Mutex::new(release_rx),
            }),
            Arc::new(EventLog::default()),
            Arc::new(CapturingDelivery::default()),
        );

        let locator = "https://example.com/media/slow";
        let worker = {
            let engine = engine.clone();
            let locator = locator.to_string();
            std::thread::spawn(move || engine.download(&locator, MediaKind::Video))
        };

        // Wait until the first transfer is provably inside its fetch.
        entered_rx.recv().unwrap();
        let identity = TransferIdentity::of(locator);
        assert!(engine.registry().is_active(&identity));
        let snap = engine.registry().snapshot(&identity).unwrap();
        assert_eq!(snap.status, TransferStatus::Fetching);

        match engine.download(locator, MediaKind::Video).unwrap() {
            DownloadOutcome::AlreadyActive(id) => assert_eq!(id, identity),
            other => panic!("expected AlreadyActive, got {:?}", other),
        }

        release_tx.send(()).unwrap();
        let outcome = worker.join().unwrap().unwrap();
        assert!(matches!(outcome, DownloadOutcome::Saved(_)));
        assert!(!engine.registry().is_active(&identity));
    }
}
