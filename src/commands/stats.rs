//! Stats command for displaying index statistics and metrics

use anyhow::Result;
use std::env;

use crate::extractor::ExtractorRegistry;
use crate::metrics::{gather_metrics, MetricSnapshot};
use crate::symbol::SymbolIndex;
use crate::Config;

/// Run the stats command
///
/// Indexes the current directory once so the index gauges reflect it, then
/// prints the metric values.
///
/// # Arguments
/// * `prometheus` - If true, output in Prometheus text format
pub async fn run(prometheus: bool) -> Result<()> {
    let root = env::current_dir()?;
    let config = Config::load(&root)?;

    let registry = ExtractorRegistry::new();
    let index = tokio::task::spawn_blocking({
        let root = root.clone();
        let indexer_config = config.indexer.clone();
        move || SymbolIndex::build(&[root], &registry, &indexer_config)
    })
    .await?;

    if prometheus {
        print!("{}", gather_metrics());
        return Ok(());
    }

    let snapshot = MetricSnapshot::capture();

    println!("codescope Index Statistics");
    println!("==========================\n");

    println!("Index Contents:");
    println!("  Root:          {}", root.display());
    println!("  Total files:   {}", index.file_count());
    println!("  Total symbols: {}", index.symbol_count());
    println!("  Build time:    {:.3}s", snapshot.index_latency_avg);

    Ok(())
}
