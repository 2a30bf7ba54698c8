//! `mgrab fetch <url>...` – retrieve media via resumable range requests.

use crate::cli::progress::ConsoleProgressSink;
use anyhow::{bail, Result};
use mgrab_core::checksum;
use mgrab_core::config::MgrabConfig;
use mgrab_core::engine::{DownloadOutcome, Engine};
use mgrab_core::fetch::CurlFetcher;
use mgrab_core::media::MediaKind;
use mgrab_core::sink::FileDeliverySink;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

pub fn run_fetch(
    config: &MgrabConfig,
    urls: &[String],
    kind: MediaKind,
    out: Option<PathBuf>,
    headers: &[String],
    show_checksum: bool,
) -> Result<()> {
    let header_map = parse_headers(headers)?;
    let out_dir = out
        .or_else(|| config.download_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    tracing::info!("fetching {} url(s) into {}", urls.len(), out_dir.display());

    let fetcher = CurlFetcher::new(config).with_headers(header_map);
    let engine = Engine::new(
        Arc::new(fetcher),
        Arc::new(ConsoleProgressSink),
        Arc::new(FileDeliverySink::new(&out_dir)),
    );

    // Distinct identities download concurrently; the engine's registry
    // turns repeats of an in-flight URL into no-ops.
    let mut workers = Vec::with_capacity(urls.len());
    for url in urls {
        let engine = engine.clone();
        let url = url.clone();
        workers.push(thread::spawn(move || {
            let outcome = engine.download(&url, kind);
            (url, outcome)
        }));
    }

    let mut failures = 0usize;
    for worker in workers {
        let (url, outcome) = worker
            .join()
            .unwrap_or_else(|e| panic!("download worker panicked: {:?}", e));
        match outcome {
            Ok(DownloadOutcome::Saved(saved)) => {
                println!("Saved {} ({} bytes)", saved.name, saved.media.len());
                if show_checksum {
                    println!("{}  {}", checksum::sha256_bytes(&saved.media), saved.name);
                }
            }
            Ok(DownloadOutcome::AlreadyActive(identity)) => {
                println!("Already downloading ({}): {}", identity, url);
            }
            Err(e) => {
                eprintln!("Failed {}: {}", url, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} downloads failed", failures, urls.len());
    }
    Ok(())
}

/// Parses repeatable `--header "Name: value"` arguments.
fn parse_headers(raw: &[String]) -> Result<HashMap<String, String>> {
    let mut map = HashMap::new();
    for item in raw {
        match item.split_once(':') {
            Some((name, value)) if !name.trim().is_empty() => {
                map.insert(name.trim().to_string(), value.trim().to_string());
            }
            _ => bail!("invalid header {:?}, expected \"Name: value\"", item),
        }
    }
    Ok(map)
}
