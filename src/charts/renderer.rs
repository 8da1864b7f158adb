//! Static Chart Renderer
//! Draws the dashboard charts with plotters into an in-memory RGB buffer and
//! encodes them as PNG for the exported report.
//!
//! Layout of every image:
//! 1. Caption centered at the top
//! 2. Y axis in dollars, X axis with one label per month or group
//! 3. Line (monthly trend) or bars (breakdowns)

use crate::charts::to_f64;
use crate::data::{GroupTotal, MonthlyTotal};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use thiserror::Error;

const MONTHLY_RGB: RGBColor = RGBColor(52, 152, 219);
const CATEGORY_RGB: RGBColor = RGBColor(46, 204, 113);
const REGION_RGB: RGBColor = RGBColor(155, 89, 182);

const FONT: &str = "sans-serif";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
    #[error("Pixel buffer does not match {0}x{1}")]
    Buffer(u32, u32),
}

fn draw_err<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Which breakdown a bar chart shows. Picks caption, axis label and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakdown {
    Category,
    Region,
}

impl Breakdown {
    fn caption(self) -> &'static str {
        match self {
            Breakdown::Category => "Sales by Category",
            Breakdown::Region => "Sales by Region",
        }
    }

    fn axis_label(self) -> &'static str {
        match self {
            Breakdown::Category => "Category",
            Breakdown::Region => "Region",
        }
    }

    fn color(self) -> RGBColor {
        match self {
            Breakdown::Category => CATEGORY_RGB,
            Breakdown::Region => REGION_RGB,
        }
    }
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the monthly sales trend as PNG bytes.
    pub fn render_monthly_png(
        monthly: &[MonthlyTotal],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let labels: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
        let values: Vec<f64> = monthly.iter().map(|m| to_f64(m.total)).collect();

        let mut buffer = vec![0u8; Self::buffer_len(width, height)];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let n = values.len().max(1);
            let mut chart = ChartBuilder::on(&root)
                .caption("Monthly Sales Trend", (FONT, 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(90)
                .build_cartesian_2d((0..n).into_segmented(), 0f64..Self::y_ceiling(&values))
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n)
                .x_label_formatter(&|v| Self::segment_label(&labels, v))
                .y_label_formatter(&|y| format!("${:.0}", y))
                .x_desc("Month")
                .y_desc("Sales")
                .draw()
                .map_err(draw_err)?;

            let points: Vec<(SegmentValue<usize>, f64)> = values
                .iter()
                .enumerate()
                .map(|(i, &v)| (SegmentValue::CenterOf(i), v))
                .collect();

            chart
                .draw_series(LineSeries::new(
                    points.iter().cloned(),
                    MONTHLY_RGB.stroke_width(3),
                ))
                .map_err(draw_err)?;
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|(x, y)| Circle::new((x.clone(), *y), 5, MONTHLY_RGB.filled())),
                )
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        Self::encode_png(buffer, width, height)
    }

    /// Render a category or region breakdown as a PNG bar chart.
    pub fn render_breakdown_png(
        breakdown: Breakdown,
        groups: &[GroupTotal],
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
        let values: Vec<f64> = groups.iter().map(|g| to_f64(g.total)).collect();

        let mut buffer = vec![0u8; Self::buffer_len(width, height)];
        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let n = values.len().max(1);
            let mut chart = ChartBuilder::on(&root)
                .caption(breakdown.caption(), (FONT, 28))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(90)
                .build_cartesian_2d((0..n).into_segmented(), 0f64..Self::y_ceiling(&values))
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .disable_x_mesh()
                .x_labels(n)
                .x_label_formatter(&|v| Self::segment_label(&labels, v))
                .y_label_formatter(&|y| format!("${:.0}", y))
                .x_desc(breakdown.axis_label())
                .y_desc("Sales")
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(breakdown.color().filled())
                        .margin(12)
                        .data(values.iter().enumerate().map(|(i, &v)| (i, v))),
                )
                .map_err(draw_err)?;

            root.present().map_err(draw_err)?;
        }

        Self::encode_png(buffer, width, height)
    }

    fn buffer_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 3
    }

    /// Top of the Y axis: 10% headroom over the largest value.
    fn y_ceiling(values: &[f64]) -> f64 {
        let max = values.iter().copied().fold(0.0_f64, f64::max);
        if max > 0.0 {
            max * 1.1
        } else {
            1.0
        }
    }

    fn segment_label(labels: &[String], value: &SegmentValue<usize>) -> String {
        match value {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        }
    }

    /// Encode a tightly packed RGB8 buffer as PNG.
    pub fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
        let img = RgbImage::from_raw(width, height, buffer).ok_or(RenderError::Buffer(width, height))?;
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }
}
