//! Process-wide registry of in-flight transfers.
//!
//! The registry is the only shared mutable state across transfers and the
//! sole gate against double-downloading one resource: pages reissue the
//! same fetch trigger in rapid succession (re-render, repeated click,
//! observer re-scan), and every such call funnels through `begin`.

use crate::identity::TransferIdentity;
use crate::media::MediaKind;
use crate::transfer::{TransferError, TransferSnapshot, TransferState};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Map from transfer identity to live transfer state. `begin`/`end` are
/// atomic with respect to each other: two concurrent `begin` calls for the
/// same identity cannot both succeed.
#[derive(Default)]
pub struct TransferRegistry {
    active: Mutex<HashMap<TransferIdentity, Arc<Mutex<TransferState>>>>,
}

impl TransferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new transfer for `locator`, or refuses with
    /// [`TransferError::Duplicate`] if one is already in flight for the
    /// same identity.
    ///
    /// The returned handle releases the registry entry when dropped, so
    /// `end` runs exactly once per successful `begin`, on success and
    /// failure paths alike (including unwind).
    pub fn begin(
        &self,
        locator: &str,
        kind: MediaKind,
    ) -> Result<TransferHandle<'_>, TransferError> {
        let identity = TransferIdentity::of(locator);
        let mut active = self.active.lock().unwrap();
        if active.contains_key(&identity) {
            return Err(TransferError::Duplicate(identity));
        }
        let state = Arc::new(Mutex::new(TransferState::new(locator, kind)));
        active.insert(identity.clone(), Arc::clone(&state));
        tracing::debug!("registered transfer {} for {}", identity, locator);
        Ok(TransferHandle {
            registry: self,
            identity,
            state,
        })
    }

    /// Removes the entry unconditionally. Called by [`TransferHandle`] on
    /// drop; removing an already-absent identity is a no-op.
    pub fn end(&self, identity: &TransferIdentity) {
        self.active.lock().unwrap().remove(identity);
    }

    /// Read-only view of a transfer for progress rendering.
    pub fn snapshot(&self, identity: &TransferIdentity) -> Option<TransferSnapshot> {
        let state = {
            let active = self.active.lock().unwrap();
            active.get(identity).cloned()?
        };
        let snap = state.lock().unwrap().snapshot();
        Some(snap)
    }

    pub fn is_active(&self, identity: &TransferIdentity) -> bool {
        self.active.lock().unwrap().contains_key(identity)
    }

    pub fn active_count(&self) -> usize {
        self.active.lock().unwrap().len()
    }
}

/// Exclusive claim on one identity's transfer. Holds the shared state cell
/// the run loop mutates; dropping it releases the registry entry.
pub struct TransferHandle<'a> {
    registry: &'a TransferRegistry,
    identity: TransferIdentity,
    state: Arc<Mutex<TransferState>>,
}

impl TransferHandle<'_> {
    pub fn identity(&self) -> &TransferIdentity {
        &self.identity
    }

    pub fn state(&self) -> &Mutex<TransferState> {
        &self.state
    }
}

impl Drop for TransferHandle<'_> {
    fn drop(&mut self) {
        self.registry.end(&self.identity);
    }
}
