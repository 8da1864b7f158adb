//! Report Export Module
//! Bundles the dashboard into a ZIP: a JSON summary of every view plus one
//! PNG per chart. The source CSV is only ever read.

use crate::charts::{Breakdown, RenderError, StaticChartRenderer};
use crate::data::DashboardViews;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const REPORT_TITLE: &str = "ShopSmart Sales Dashboard";
pub const SUMMARY_FILE: &str = "summary.json";

/// Pixel size of every exported chart.
const IMAGE_WIDTH: u32 = 1200;
const IMAGE_HEIGHT: u32 = 700;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// A rendered chart and its file name inside the bundle.
#[derive(Debug, Clone)]
pub struct ReportImage {
    pub file_name: &'static str,
    pub png: Vec<u8>,
}

#[derive(Serialize)]
struct ReportSummary<'a> {
    title: &'static str,
    source: String,
    generated_at: String,
    #[serde(flatten)]
    views: &'a DashboardViews,
}

/// Writes dashboard report bundles.
pub struct ReportGenerator;

impl ReportGenerator {
    /// Render all charts and write the bundle. Returns the number of charts written.
    pub fn export(
        views: &DashboardViews,
        source: &Path,
        output_path: &Path,
    ) -> Result<usize, ReportError> {
        let images = Self::render_images(views)?;
        Self::write_bundle(views, &images, source, output_path)?;
        Ok(images.len())
    }

    /// Render the three dashboard charts as PNG.
    pub fn render_images(views: &DashboardViews) -> Result<Vec<ReportImage>, ReportError> {
        Ok(vec![
            ReportImage {
                file_name: "monthly_sales.png",
                png: StaticChartRenderer::render_monthly_png(
                    &views.monthly,
                    IMAGE_WIDTH,
                    IMAGE_HEIGHT,
                )?,
            },
            ReportImage {
                file_name: "sales_by_category.png",
                png: StaticChartRenderer::render_breakdown_png(
                    Breakdown::Category,
                    &views.by_category,
                    IMAGE_WIDTH,
                    IMAGE_HEIGHT,
                )?,
            },
            ReportImage {
                file_name: "sales_by_region.png",
                png: StaticChartRenderer::render_breakdown_png(
                    Breakdown::Region,
                    &views.by_region,
                    IMAGE_WIDTH,
                    IMAGE_HEIGHT,
                )?,
            },
        ])
    }

    /// Write `summary.json` and the given images into a ZIP at `output_path`.
    pub fn write_bundle(
        views: &DashboardViews,
        images: &[ReportImage],
        source: &Path,
        output_path: &Path,
    ) -> Result<(), ReportError> {
        let file = File::create(output_path)?;
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default();
        // PNG is already compressed
        let stored = FileOptions::default().compression_method(CompressionMethod::Stored);

        let summary = ReportSummary {
            title: REPORT_TITLE,
            source: source.display().to_string(),
            generated_at: chrono::Local::now().to_rfc3339(),
            views,
        };
        zip.start_file(SUMMARY_FILE, options)?;
        zip.write_all(&serde_json::to_vec_pretty(&summary)?)?;

        for image in images {
            zip.start_file(image.file_name, stored)?;
            zip.write_all(&image.png)?;
        }

        zip.finish()?;

        info!(
            "Report written: {} ({} charts)",
            output_path.display(),
            images.len()
        );
        Ok(())
    }
}
