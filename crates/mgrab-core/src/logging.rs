//! Logging init: file under XDG state dir, or graceful fallback to stderr.

use anyhow::Result;
use std::fs;
use std::io;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,mgrab=debug"))
}

/// Log destination resolved per write: the log file, or stderr when the
/// file handle cannot be cloned.
enum LogWriter {
    File(fs::File),
    Stderr,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogWriter::File(f) => f.write(buf),
            LogWriter::Stderr => io::stderr().lock().write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogWriter::File(f) => f.flush(),
            LogWriter::Stderr => io::stderr().lock().flush(),
        }
    }
}

struct LogFileWriter(fs::File);

impl<'a> MakeWriter<'a> for LogFileWriter {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.0
            .try_clone()
            .map(LogWriter::File)
            .unwrap_or(LogWriter::Stderr)
    }
}

/// Initialize structured logging to `~/.local/state/mgrab/mgrab.log`.
/// Returns Err when the state dir is unusable so the caller can fall back
/// to [`init_logging_stderr`].
pub fn init_logging() -> Result<()> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mgrab")?;
    let log_dir = xdg_dirs.get_state_home();
    fs::create_dir_all(&log_dir)?;
    let log_file_path = log_dir.join("mgrab.log");

    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(BoxMakeWriter::new(LogFileWriter(file)))
        .with_ansi(false)
        .init();

    tracing::info!("mgrab logging initialized at {}", log_file_path.display());
    Ok(())
}

/// Initialize logging to stderr only (no file). Use when `init_logging`
/// fails so the CLI doesn't crash over an unwritable state dir.
pub fn init_logging_stderr() {
    tracing_subscriber::fmt()
        .with_env_filter(default_filter())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}
