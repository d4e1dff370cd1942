//! Uppercase every matching file under a directory.
//!
//! ```text
//! RUST_LOG=walkpool_walker=debug cargo run -p walkpool --example uppercase -- ./notes "**/*.txt" 4
//! ```
//!
//! Arguments are the root directory, the glob pattern and the concurrency.
//! Results are written next to the originals with an `.upper` extension.

use std::env;

use tracing::info;
use tracing_subscriber::EnvFilter;
use walkpool::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = env::args().skip(1);
    let root = args.next().unwrap_or_else(|| ".".to_string());
    let pattern = args.next().unwrap_or_else(|| "**/*.txt".to_string());
    let concurrency = match args.next() {
        Some(value) => value.parse()?,
        None => 4,
    };

    let config = WalkConfig::new()
        .with_root(&root)
        .with_pattern(pattern)
        .with_concurrency(concurrency);

    let mut walk = Walk::new(config);
    walk.on_start(|walk| async move {
        info!("Uppercasing {} files", walk.progress().total);
        Ok(())
    })
    .on_progress(|snapshot| async move {
        info!("Progress: {}", describe_progress(&snapshot));
        Ok(())
    });

    let report = walk
        .run_report(|ctx| async move {
            let text = ctx.read().await?;
            let target = ctx.filepath().with_extension("upper");
            ctx.write_to(&target, &text.to_uppercase()).await?;
            Ok(target)
        })
        .await?;

    for failure in &report.failures {
        eprintln!("failed: {} ({})", failure.path.display(), failure.error);
    }
    println!(
        "Run {} wrote {} files in {:?} ({} failed, {} ignored)",
        report.run_id,
        report.results.len(),
        report.elapsed,
        report.progress.failed,
        report.progress.ignored
    );

    Ok(())
}

fn describe_progress(snapshot: &ProgressSnapshot) -> String {
    format!(
        "{}/{} processed, {} succeeded, {} failed",
        snapshot.processed, snapshot.total, snapshot.success, snapshot.failed
    )
}
