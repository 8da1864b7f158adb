//! ShopSmart Sales Dashboard - KPI cards and charts from a sales CSV
//!
//! Opens the dashboard window, or prints the views as JSON with `--summary`.

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use shopsmart_dashboard::args::Args;
use shopsmart_dashboard::data::{DashboardViews, Dataset, TableCache};
use shopsmart_dashboard::gui::DashboardApp;
use std::path::Path;
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    init_logger(args.log_level());
    debug!("Log level set to {}", args.log_level().to_string().to_lowercase());

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> anyhow::Result<ExitCode> {
    if args.summary() {
        return print_summary(args.data());
    }

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1000.0, 700.0])
            .with_title("ShopSmart Sales Dashboard"),
        ..Default::default()
    };

    let data_path = args.data().to_path_buf();
    eframe::run_native(
        "ShopSmart Sales Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, data_path)))),
    )
    .map_err(|e| anyhow::anyhow!("Dashboard window failed: {e}"))?;

    Ok(ExitCode::SUCCESS)
}

/// Headless mode: load once and print every view as JSON.
fn print_summary(path: &Path) -> anyhow::Result<ExitCode> {
    let cache = TableCache::new(path);
    let dataset = cache
        .load()
        .with_context(|| format!("Failed to load {}", path.display()))?;

    match dataset {
        Dataset::Absent => {
            error!("Data file {} not found", path.display());
            Ok(ExitCode::FAILURE)
        }
        Dataset::Empty => {
            warn!("Data file {} contains no transactions", path.display());
            Ok(ExitCode::FAILURE)
        }
        Dataset::Populated(table) => {
            let views = DashboardViews::compute(&table);
            println!("{}", serde_json::to_string_pretty(&views)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Initializes the tracing subscriber.
fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // Otherwise only this crate logs, at the requested level.
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
