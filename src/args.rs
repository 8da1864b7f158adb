//! Command line interface of the dashboard binary.

use crate::data::DEFAULT_DATA_PATH;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// ShopSmart Sales Dashboard: KPI cards and charts from a CSV of retail sales.
///
/// The CSV needs a header row with at least the columns date, order_id,
/// category, region and total_amount. Dates are ISO (YYYY-MM-DD) and amounts
/// are non-negative decimals.
#[derive(Debug, Parser, Clone)]
#[command(version)]
pub struct Args {
    /// Path to the sales CSV file.
    #[arg(long, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// Print all dashboard views as JSON and exit instead of opening the window.
    #[arg(long)]
    summary: bool,
}

impl Args {
    pub fn data(&self) -> &Path {
        &self.data
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn summary(&self) -> bool {
        self.summary
    }
}
