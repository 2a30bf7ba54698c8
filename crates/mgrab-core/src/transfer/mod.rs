//! Range-transfer state machine.
//!
//! One [`TransferState`] per in-flight resource, driven by [`run`]: issue an
//! open-ended range request, validate the server's reply, append the chunk,
//! repeat until the known total is consumed, then assemble. Transfers are
//! strictly sequential; offset N+1 is only known after response N.

mod error;
mod run;

pub use error::TransferError;
pub use run::run;

use crate::identity::TransferIdentity;
use crate::media::MediaKind;
use crate::naming;

/// Lifecycle status of a transfer. `Completed` and `Failed` are terminal;
/// nothing transitions out of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Created,
    Fetching,
    Completed,
    Failed,
}

impl TransferStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferStatus::Created => "created",
            TransferStatus::Fetching => "fetching",
            TransferStatus::Completed => "completed",
            TransferStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, TransferStatus::Completed | TransferStatus::Failed)
    }
}

/// Live record for one in-flight resumable download. Mutated only by its
/// own [`run`] loop; everyone else sees immutable [`TransferSnapshot`]s.
#[derive(Debug)]
pub struct TransferState {
    identity: TransferIdentity,
    locator: String,
    kind: MediaKind,
    next_offset: u64,
    total_size: Option<u64>,
    chunks: Vec<Vec<u8>>,
    mime_extension: String,
    /// Name stem, fixed at creation (metadata file name or identity hash).
    stem: String,
    display_name: String,
    status: TransferStatus,
}

impl TransferState {
    /// Creates a fresh transfer record in `created` status. The initial
    /// extension comes from locator metadata when its MIME type matches the
    /// declared kind, else from the kind's default.
    pub fn new(locator: &str, kind: MediaKind) -> Self {
        let identity = TransferIdentity::of(locator);
        let metadata_mime = naming::parse_locator_metadata(locator).and_then(|m| m.mime_type);
        let mime_extension = metadata_mime
            .as_deref()
            .and_then(|m| crate::media::extension_for_content_type(kind, m))
            .unwrap_or_else(|| kind.default_extension().to_string());
        let stem = naming::display_stem(locator, &identity);
        let display_name = naming::display_name(&stem, &mime_extension);
        Self {
            identity,
            locator: locator.to_string(),
            kind,
            next_offset: 0,
            total_size: None,
            chunks: Vec::new(),
            mime_extension,
            stem,
            display_name,
            status: TransferStatus::Created,
        }
    }

    pub fn identity(&self) -> &TransferIdentity {
        &self.identity
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn status(&self) -> TransferStatus {
        self.status
    }

    pub fn next_offset(&self) -> u64 {
        self.next_offset
    }

    pub fn total_size(&self) -> Option<u64> {
        self.total_size
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn mime_extension(&self) -> &str {
        &self.mime_extension
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Percent complete, once the total is known.
    pub fn percent(&self) -> Option<u8> {
        let total = self.total_size?;
        if total == 0 {
            return Some(100);
        }
        let pct = (self.next_offset as f64 * 100.0 / total as f64).round();
        Some(pct.min(100.0) as u8)
    }

    /// Concatenates all received chunks in request order.
    pub fn assemble(&self) -> Vec<u8> {
        let len = self.chunks.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(len);
        for chunk in &self.chunks {
            out.extend_from_slice(chunk);
        }
        out
    }

    pub fn snapshot(&self) -> TransferSnapshot {
        TransferSnapshot {
            identity: self.identity.clone(),
            locator: self.locator.clone(),
            status: self.status,
            next_offset: self.next_offset,
            total_size: self.total_size,
            display_name: self.display_name.clone(),
            percent: self.percent(),
        }
    }
}

/// Immutable view of a transfer for progress rendering.
#[derive(Debug, Clone)]
pub struct TransferSnapshot {
    pub identity: TransferIdentity,
    pub locator: String,
    pub status: TransferStatus,
    pub next_offset: u64,
    pub total_size: Option<u64>,
    pub display_name: String,
    pub percent: Option<u8>,
}

/// Assembled result of a completed transfer.
#[derive(Debug, Clone)]
pub struct SavedFile {
    /// Suggested file name (stem + refined extension).
    pub name: String,
    /// The reassembled object.
    pub media: Vec<u8>,
}
