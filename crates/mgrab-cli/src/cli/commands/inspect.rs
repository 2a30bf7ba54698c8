//! `mgrab inspect <url>` – show identity and derived name, no download.

use anyhow::Result;
use mgrab_core::media::MediaKind;
use mgrab_core::naming;
use mgrab_core::transfer::TransferState;

pub fn run_inspect(url: &str, kind: MediaKind) -> Result<()> {
    let state = TransferState::new(url, kind);
    println!("identity:  {}", state.identity());
    println!("name:      {}", state.display_name());
    println!("extension: {}", state.mime_extension());

    if let Some(meta) = naming::parse_locator_metadata(url) {
        if let Some(file_name) = meta.file_name.as_deref() {
            println!("metadata file name: {}", file_name);
        }
        if let Some(mime) = meta.mime_type.as_deref() {
            println!("metadata mime type: {}", mime);
        }
        if let Some(size) = meta.size {
            println!("metadata size: {} bytes", size);
        }
    }
    Ok(())
}
