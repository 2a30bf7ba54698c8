//! The transfer loop: sequential range requests until the resource is
//! fully consumed.

use super::{SavedFile, TransferError, TransferState, TransferStatus};
use crate::fetch::RangeFetch;
use crate::media;
use crate::naming;
use crate::sink::{ProgressSink, TransferEvent};
use std::sync::Mutex;

/// Drives one transfer to a terminal state.
///
/// Emits `Created` on entry and exactly one terminal event (`Completed` or
/// `Failed`). The state mutex is never held across a network request, so
/// `snapshot` stays responsive while a transfer is in flight.
///
/// There is no retry here: any fatal condition fails this transfer, and a
/// caller that wants another attempt starts a fresh one.
pub fn run(
    cell: &Mutex<TransferState>,
    fetcher: &dyn RangeFetch,
    progress: &dyn ProgressSink,
) -> Result<SavedFile, TransferError> {
    let (identity, name) = {
        let state = cell.lock().unwrap();
        (state.identity.clone(), state.display_name.clone())
    };
    progress.on_event(&identity, TransferEvent::Created(name));

    match drive(cell, fetcher, progress) {
        Ok(saved) => {
            cell.lock().unwrap().status = TransferStatus::Completed;
            tracing::info!("transfer {} completed ({} bytes)", identity, saved.media.len());
            progress.on_event(&identity, TransferEvent::Completed);
            Ok(saved)
        }
        Err(e) => {
            cell.lock().unwrap().status = TransferStatus::Failed;
            tracing::warn!("transfer {} failed: {}", identity, e);
            progress.on_event(&identity, TransferEvent::Failed(e.to_string()));
            Err(e)
        }
    }
}

fn drive(
    cell: &Mutex<TransferState>,
    fetcher: &dyn RangeFetch,
    progress: &dyn ProgressSink,
) -> Result<SavedFile, TransferError> {
    loop {
        let (locator, offset, identity) = {
            let mut state = cell.lock().unwrap();
            state.status = TransferStatus::Fetching;
            (
                state.locator.clone(),
                state.next_offset,
                state.identity.clone(),
            )
        };

        let response = fetcher.fetch_range(&locator, offset)?;

        if response.status != 200 && response.status != 206 {
            return Err(TransferError::UnexpectedStatus(response.status));
        }

        let mut state = cell.lock().unwrap();

        // The server may only reveal the true subtype once streaming
        // begins; follow it as long as the family matches what the caller
        // declared.
        if let Some(content_type) = response.content_type.as_deref() {
            if let Some(ext) = media::extension_for_content_type(state.kind, content_type) {
                if ext != state.mime_extension {
                    state.mime_extension = ext;
                    state.display_name = naming::display_name(&state.stem, &state.mime_extension);
                }
            }
        }

        if let Some(range) = response.content_range {
            if range.start != state.next_offset {
                return Err(TransferError::NonContiguousRange {
                    expected: state.next_offset,
                    got: range.start,
                });
            }
            if let Some(known) = state.total_size {
                if known != range.total {
                    return Err(TransferError::InconsistentTotalSize {
                        first: known,
                        second: range.total,
                    });
                }
            }
            state.total_size = Some(range.total);
            state.next_offset = range.end + 1;
            let percent = state.percent().unwrap_or(0);
            progress.on_event(&identity, TransferEvent::Progress(percent));
        }

        tracing::debug!(
            "transfer {}: {} bytes at offset {}",
            identity,
            response.body.len(),
            offset
        );
        state.chunks.push(response.body);

        match state.total_size {
            // More ranges remain; loop with the offset learned from this
            // response.
            Some(total) if state.next_offset < total => continue,
            // Either fully consumed, or the server ignored the Range header
            // and sent everything in one response (total never learned).
            _ => {
                return Ok(SavedFile {
                    name: state.display_name.clone(),
                    media: state.assemble(),
                });
            }
        }
    }
}
