//! Moments command implementation
//!
//! Prints the stored moment summaries of every cached distribution, then
//! the moments of those per-distribution means and variances.

use sampler_core::{moments, DistributionCache, Moments, SamplerConfig};
use serde::Serialize;
use tracing::info;

use crate::{OutputFormat, Result};

#[derive(Debug, Serialize)]
struct DistributionRow {
    index: usize,
    iterations: u64,
    seed: Option<u64>,
    real: Moments,
    imag: Moments,
}

#[derive(Debug, Serialize)]
struct Report {
    distributions: Vec<DistributionRow>,
    /// Spread of the per-distribution statistics; absent with fewer than
    /// two distributions.
    summary: Option<Summary>,
}

#[derive(Debug, Serialize)]
struct Summary {
    mean_real: Moments,
    mean_imag: Moments,
    variance_real: Moments,
    variance_imag: Moments,
}

/// Run the moments command
pub fn run(config: SamplerConfig, format: OutputFormat) -> Result<()> {
    let cache = DistributionCache::new(config)?;
    info!("Summarising {} distributions", cache.len());

    let rows: Vec<DistributionRow> = (0..cache.len())
        .filter_map(|index| cache.get(index).map(|d| (index, d)))
        .map(|(index, d)| DistributionRow {
            index,
            iterations: d.iterations(),
            seed: d.seed(),
            real: *d.moments_real(),
            imag: *d.moments_imag(),
        })
        .collect();

    let summary = if rows.len() >= 2 {
        Some(summarise(&rows)?)
    } else {
        None
    };
    let report = Report {
        distributions: rows,
        summary,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => print_table(&report),
    }
    Ok(())
}

fn summarise(rows: &[DistributionRow]) -> Result<Summary> {
    Ok(Summary {
        mean_real: moments(&column(rows, |r| r.real.mean))?,
        mean_imag: moments(&column(rows, |r| r.imag.mean))?,
        variance_real: moments(&column(rows, |r| r.real.variance))?,
        variance_imag: moments(&column(rows, |r| r.imag.variance))?,
    })
}

fn column(rows: &[DistributionRow], field: impl Fn(&DistributionRow) -> f64) -> Vec<f64> {
    rows.iter().map(field).collect()
}

fn print_table(report: &Report) {
    for row in &report.distributions {
        println!(
            "[{}] iterations: {} seed: {:?}",
            row.index, row.iterations, row.seed
        );
        println!("  moments(re): {:?}", row.real.to_array());
        println!("  moments(im): {:?}", row.imag.to_array());
    }
    if let Some(summary) = &report.summary {
        println!("moments(mean) (re): {:?}", summary.mean_real.to_array());
        println!("moments(mean) (im): {:?}", summary.mean_imag.to_array());
        println!("moments(variance) (re): {:?}", summary.variance_real.to_array());
        println!("moments(variance) (im): {:?}", summary.variance_imag.to_array());
    }
}
