//! CLI for the mgrab media retriever.

mod commands;
mod progress;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use mgrab_core::config;
use mgrab_core::media::MediaKind;
use std::path::PathBuf;

use commands::{run_checksum, run_fetch, run_inspect};

/// Top-level CLI for the mgrab media retriever.
#[derive(Debug, Parser)]
#[command(name = "mgrab")]
#[command(about = "mgrab: resumable range-request media retriever", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Media kind as a CLI argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Image,
    Video,
}

impl From<KindArg> for MediaKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Image => MediaKind::Image,
            KindArg::Video => MediaKind::Video,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Retrieve one or more media URLs via resumable range requests.
    Fetch {
        /// Direct HTTP/HTTPS media URLs. Distinct URLs download
        /// concurrently; repeats of an in-flight URL are no-ops.
        #[arg(required = true)]
        urls: Vec<String>,

        /// Declared media kind (sets the default file extension).
        #[arg(long, value_enum, default_value_t = KindArg::Video)]
        kind: KindArg,

        /// Output directory. Defaults to the configured download dir, then
        /// the current directory.
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Extra request header as "Name: value" (e.g. a session Cookie).
        /// Repeatable.
        #[arg(long = "header", value_name = "HEADER")]
        headers: Vec<String>,

        /// Print the SHA-256 of each retrieved object.
        #[arg(long)]
        checksum: bool,
    },

    /// Show the identity and derived name for a URL without downloading.
    Inspect {
        /// URL to inspect.
        url: String,

        /// Declared media kind used for the default extension.
        #[arg(long, value_enum, default_value_t = KindArg::Video)]
        kind: KindArg,
    },

    /// Compute SHA-256 of a file (e.g. after download).
    Checksum {
        /// Path to the file.
        path: PathBuf,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        match cli.command {
            CliCommand::Fetch {
                urls,
                kind,
                out,
                headers,
                checksum,
            } => {
                let cfg = config::load_or_init()?;
                run_fetch(&cfg, &urls, kind.into(), out, &headers, checksum)
            }
            CliCommand::Inspect { url, kind } => run_inspect(&url, kind.into()),
            CliCommand::Checksum { path } => run_checksum(&path),
        }
    }
}
