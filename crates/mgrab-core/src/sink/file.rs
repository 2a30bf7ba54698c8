//! Delivery sink that saves the assembled object into a directory.

use super::DeliverySink;
use crate::naming::sanitize_file_name;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Fallback name when the suggested one sanitizes away to nothing.
const DEFAULT_FILENAME: &str = "download.bin";

/// Writes delivered media into `dir`, never clobbering an existing file.
/// The write goes to a `.part` file first and is renamed into place, so a
/// crash mid-write leaves no truncated final file behind.
#[derive(Debug, Clone)]
pub struct FileDeliverySink {
    dir: PathBuf,
}

impl FileDeliverySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl DeliverySink for FileDeliverySink {
    fn deliver(&self, media: &[u8], suggested_name: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("create download dir {}", self.dir.display()))?;

        let mut name = sanitize_file_name(suggested_name);
        if name.is_empty() {
            name = DEFAULT_FILENAME.to_string();
        }
        let final_path = unique_path(&self.dir, &name);

        let mut part_os = final_path.clone().into_os_string();
        part_os.push(".part");
        let part_path = PathBuf::from(part_os);
        fs::write(&part_path, media)
            .with_context(|| format!("write {}", part_path.display()))?;
        fs::rename(&part_path, &final_path).with_context(|| {
            format!(
                "rename {} to {}",
                part_path.display(),
                final_path.display()
            )
        })?;

        tracing::info!("delivered {} bytes to {}", media.len(), final_path.display());
        Ok(())
    }
}

/// First free path for `name` in `dir`: `clip.mp4`, `clip (1).mp4`, ...
fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !candidate.exists() {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((s, e)) if !s.is_empty() => (s, Some(e)),
        _ => (name, None),
    };
    for n in 1u32.. {
        let numbered = match ext {
            Some(e) => format!("{} ({}).{}", stem, n, e),
            None => format!("{} ({})", stem, n),
        };
        let candidate = dir.join(numbered);
        if !candidate.exists() {
            return candidate;
        }
    }
    unreachable!("u32 exhausted while searching for a free file name")
}
