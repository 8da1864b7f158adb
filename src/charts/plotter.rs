//! Chart Plotter Module
//! Creates interactive dashboard charts using egui_plot.

use crate::charts::{format_currency, to_f64};
use crate::data::{GroupTotal, MonthlyTotal};
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints, Points};
use rust_decimal::Decimal;

pub const MONTHLY_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue
pub const CATEGORY_COLOR: Color32 = Color32::from_rgb(46, 204, 113); // Green
pub const REGION_COLOR: Color32 = Color32::from_rgb(155, 89, 182); // Purple

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Draws the dashboard charts with egui_plot.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th bar of a breakdown.
    pub fn palette_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Label for an integer grid mark, empty between categories.
    fn index_label(labels: &[String], mark: GridMark) -> String {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        labels.get(rounded as usize).cloned().unwrap_or_default()
    }

    /// Line chart of sales per month.
    pub fn draw_monthly_chart(ui: &mut egui::Ui, monthly: &[MonthlyTotal], height: f32) {
        let labels: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
        let points: Vec<[f64; 2]> = monthly
            .iter()
            .enumerate()
            .map(|(i, m)| [i as f64, to_f64(m.total)])
            .collect();

        Plot::new("monthly_sales")
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("Month")
            .y_axis_label("Sales")
            .x_axis_formatter(move |mark, _range| Self::index_label(&labels, mark))
            .y_axis_formatter(|mark, _range| format!("${:.0}", mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(MONTHLY_COLOR)
                        .width(2.0)
                        .name("Sales"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(4.0)
                        .color(MONTHLY_COLOR),
                );
            });
    }

    /// Vertical bar chart of a breakdown, one colored bar per label.
    pub fn draw_breakdown_chart(
        ui: &mut egui::Ui,
        id: &str,
        axis_label: &str,
        groups: &[GroupTotal],
        height: f32,
    ) {
        let labels: Vec<String> = groups.iter().map(|g| g.label.clone()).collect();
        let bars: Vec<Bar> = groups
            .iter()
            .enumerate()
            .map(|(i, g)| {
                Bar::new(i as f64, to_f64(g.total))
                    .name(&g.label)
                    .width(0.6)
                    .fill(Self::palette_color(i))
            })
            .collect();

        Plot::new(id)
            .height(height)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label(axis_label)
            .y_axis_label("Sales")
            .x_axis_formatter(move |mark, _range| Self::index_label(&labels, mark))
            .y_axis_formatter(|mark, _range| format!("${:.0}", mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(axis_label));
            });
    }

    /// Table of a breakdown with each label's share of total sales.
    pub fn draw_breakdown_table(ui: &mut egui::Ui, id: &str, groups: &[GroupTotal], total: Decimal) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new(ui.make_persistent_id(format!("breakdown_table_{id}")))
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([8.0, 4.0])
                    .show(ui, |ui| {
                        ui.label(RichText::new("").size(11.0));
                        ui.label(RichText::new("Sales").strong().size(11.0));
                        ui.label(RichText::new("Share").strong().size(11.0));
                        ui.end_row();

                        for (i, group) in groups.iter().enumerate() {
                            ui.label(
                                RichText::new(&group.label)
                                    .size(11.0)
                                    .color(Self::palette_color(i)),
                            );
                            ui.label(RichText::new(format_currency(group.total)).size(11.0));
                            ui.label(RichText::new(Self::share(group.total, total)).size(11.0));
                            ui.end_row();
                        }
                    });
            });
    }

    /// Percentage of `total`, one decimal place.
    fn share(part: Decimal, total: Decimal) -> String {
        if total.is_zero() {
            return "-".to_string();
        }
        format!("{:.1}%", to_f64(part / total * Decimal::ONE_HUNDRED))
    }
}
