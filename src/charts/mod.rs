//! Charts module - Interactive and static chart rendering

mod plotter;
mod renderer;

pub use plotter::{ChartPlotter, CATEGORY_COLOR, MONTHLY_COLOR, PALETTE, REGION_COLOR};
pub use renderer::{Breakdown, RenderError, StaticChartRenderer};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Lossy conversion for plotting. Values too large for `f64` plot as zero.
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

/// `$1,234.50` style label for KPI cards and axis ticks.
pub fn format_currency(value: Decimal) -> String {
    format!("${}", format_num::format_num!(",.2", to_f64(value)))
}
