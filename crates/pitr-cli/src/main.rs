//! Point-in-time restore binary.

mod config;
mod writer;

use std::sync::Arc;

use clap::Parser;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::ObjectStore;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pitr_core::{DestinationWriter, RestoreOptions, Restorer};
use pitr_store::VersionedObjectStore;

use config::Args;
use writer::JsonLinesWriter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let store: Arc<dyn ObjectStore> = if let Some(bucket) = &args.bucket {
        Arc::new(
            AmazonS3Builder::from_env()
                .with_bucket_name(bucket)
                .build()?,
        )
    } else if let Some(dir) = &args.local_dir {
        Arc::new(LocalFileSystem::new_with_prefix(dir)?)
    } else {
        anyhow::bail!("either --bucket or --local-dir is required");
    };

    info!(prefix = %args.prefix, cutoff = ?args.at, "starting restore");

    let revisions = Arc::new(VersionedObjectStore::new(store, &args.prefix));
    let restorer = Restorer::new(revisions);

    let options = match args.at {
        Some(at) => RestoreOptions::as_of(at),
        None => RestoreOptions::latest(),
    }
    .with_max_in_flight(args.max_in_flight);

    let report = restorer.restore(options).await?;

    let writer = match &args.output {
        Some(path) => JsonLinesWriter::create(path)?,
        None => JsonLinesWriter::stdout(),
    };
    for (key, snapshot) in &report.records {
        writer.write(key, snapshot).await?;
    }
    writer.flush()?;

    for failure in &report.failures {
        warn!(key = %failure.key, error = %failure.error, "key was not restored");
    }
    if !report.is_complete() {
        anyhow::bail!(
            "{} of {} keys failed to restore",
            report.failures.len(),
            report.failures.len() + report.records.len()
        );
    }

    info!(restored = report.records.len(), "restore complete");
    Ok(())
}
