//! Transfer error taxonomy.

use crate::identity::TransferIdentity;
use thiserror::Error;

/// Why a transfer could not start or did not complete. Every case renders a
/// human-readable reason; failures carry it into the terminal sink event.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// A transfer for this identity is already in flight. Recoverable:
    /// callers treat it as "already downloading, no-op".
    #[error("transfer {0} already in flight")]
    Duplicate(TransferIdentity),

    /// Server responded outside {200, 206}.
    #[error("unexpected HTTP status {0}")]
    UnexpectedStatus(u32),

    /// Server's reported start byte does not match the requested offset:
    /// it skipped or repeated bytes, so the stream cannot be trusted.
    #[error("non-contiguous range: requested offset {expected}, server sent {got}")]
    NonContiguousRange { expected: u64, got: u64 },

    /// Server reported two different total sizes across requests of the
    /// same transfer; the resource changed underneath us.
    #[error("total size changed mid-transfer: {first}, then {second}")]
    InconsistentTotalSize { first: u64, second: u64 },

    /// Transport-level failure (DNS, connection reset, stall, timeout).
    #[error("network failure: {0}")]
    Network(String),

    /// The delivery sink failed after a successful transfer. The retrieved
    /// bytes are intact; only the handoff went wrong.
    #[error("delivery failed: {0}")]
    Delivery(String),
}

impl From<crate::fetch::FetchError> for TransferError {
    fn from(e: crate::fetch::FetchError) -> Self {
        TransferError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reasons_distinguish_cases() {
        let cases = [
            TransferError::UnexpectedStatus(403).to_string(),
            TransferError::NonContiguousRange {
                expected: 0,
                got: 500,
            }
            .to_string(),
            TransferError::InconsistentTotalSize {
                first: 2000,
                second: 4000,
            }
            .to_string(),
            TransferError::Network("connection reset".into()).to_string(),
            TransferError::Delivery("disk full".into()).to_string(),
        ];
        for (i, a) in cases.iter().enumerate() {
            for b in cases.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
        assert!(cases[0].contains("403"));
        assert!(cases[1].contains("500"));
    }
}
