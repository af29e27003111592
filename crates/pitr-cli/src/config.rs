//! CLI configuration.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::Parser;

/// Point-in-time restore command line arguments.
#[derive(Debug, Parser)]
#[command(name = "pitr")]
#[command(about = "Reconstruct a backed-up record set as of a point in time")]
pub struct Args {
    /// S3 bucket holding the revision history (credentials from the
    /// environment).
    #[arg(long, conflicts_with = "local_dir", required_unless_present = "local_dir")]
    pub bucket: Option<String>,

    /// Local directory holding the revision history, instead of S3.
    #[arg(long)]
    pub local_dir: Option<PathBuf>,

    /// Path prefix under which revisions are stored.
    #[arg(long, default_value = "revisions")]
    pub prefix: String,

    /// Restore the state as of this RFC 3339 instant (inclusive); omit to
    /// restore to latest.
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Maximum body fetches in flight.
    #[arg(long, default_value_t = pitr_core::DEFAULT_MAX_IN_FLIGHT)]
    pub max_in_flight: usize,

    /// Write restored records to this file as JSON lines instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}
