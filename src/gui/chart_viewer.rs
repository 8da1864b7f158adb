//! Chart Viewer Widget
//! Central scrollable panel with KPI cards and the sales charts.
//! Shows an error or warning instead when there is nothing to chart.

use crate::charts::{format_currency, ChartPlotter, CATEGORY_COLOR, MONTHLY_COLOR, REGION_COLOR};
use crate::data::{DashboardViews, Table};
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;
use std::sync::Arc;

const CARD_SPACING: f32 = 15.0;
const KPI_CARD_HEIGHT: f32 = 90.0;
const CHART_HEIGHT: f32 = 320.0;

const ERROR_COLOR: Color32 = Color32::from_rgb(220, 53, 69);
const WARNING_COLOR: Color32 = Color32::from_rgb(243, 156, 18);

/// What the central panel currently shows.
#[derive(Debug, Clone, Default)]
pub enum DashboardState {
    #[default]
    Loading,
    /// Source file missing or unreadable.
    Absent(PathBuf),
    /// Source file has a header but no rows.
    Empty(PathBuf),
    /// Source file could not be parsed.
    Failed(String),
    Ready {
        table: Arc<Table>,
        views: DashboardViews,
    },
}

/// Dashboard area: KPI row followed by the three charts.
#[derive(Default)]
pub struct ChartViewer {
    pub state: DashboardState,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Views of the currently shown table, if any.
    pub fn views(&self) -> Option<&DashboardViews> {
        match &self.state {
            DashboardState::Ready { views, .. } => Some(views),
            _ => None,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        match &self.state {
            DashboardState::Loading => {
                ui.centered_and_justified(|ui| {
                    ui.spinner();
                });
            }
            DashboardState::Absent(path) => Self::draw_banner(
                ui,
                ERROR_COLOR,
                "⛔ Data file not found",
                &format!(
                    "Could not read {}. Check the path or open another CSV.",
                    path.display()
                ),
            ),
            DashboardState::Empty(path) => Self::draw_banner(
                ui,
                WARNING_COLOR,
                "⚠ No sales data",
                &format!("{} contains no transactions.", path.display()),
            ),
            DashboardState::Failed(message) => {
                Self::draw_banner(ui, ERROR_COLOR, "⛔ Could not load data", message)
            }
            DashboardState::Ready { table, views } => Self::draw_dashboard(ui, table, views),
        }
    }

    fn draw_banner(ui: &mut egui::Ui, color: Color32, title: &str, detail: &str) {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            egui::Frame::none()
                .rounding(8.0)
                .stroke(egui::Stroke::new(2.0, color))
                .fill(color.gamma_multiply(0.1))
                .inner_margin(16.0)
                .show(ui, |ui| {
                    ui.label(RichText::new(title).size(20.0).strong().color(color));
                    ui.add_space(6.0);
                    ui.label(RichText::new(detail).size(14.0));
                });
        });
    }

    fn draw_dashboard(ui: &mut egui::Ui, table: &Table, views: &DashboardViews) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.columns(3, |cols| {
                    Self::draw_kpi_card(
                        &mut cols[0],
                        "Total Sales",
                        &format_currency(views.total_sales),
                    );
                    Self::draw_kpi_card(
                        &mut cols[1],
                        "Total Orders",
                        &views.total_orders.to_string(),
                    );
                    Self::draw_kpi_card(
                        &mut cols[2],
                        "Average Order Value",
                        &format_currency(views.average_order_value),
                    );
                });
                ui.label(
                    RichText::new(format!("{} transactions", table.len()))
                        .size(11.0)
                        .color(Color32::GRAY),
                );

                ui.add_space(CARD_SPACING);

                Self::draw_chart_card(ui, "📈 Monthly Sales Trend", MONTHLY_COLOR, |ui| {
                    ChartPlotter::draw_monthly_chart(ui, &views.monthly, CHART_HEIGHT);
                });

                ui.add_space(CARD_SPACING);

                ui.columns(2, |cols| {
                    Self::draw_chart_card(&mut cols[0], "🏷 Sales by Category", CATEGORY_COLOR, |ui| {
                        ChartPlotter::draw_breakdown_chart(
                            ui,
                            "sales_by_category",
                            "Category",
                            &views.by_category,
                            CHART_HEIGHT,
                        );
                        ui.add_space(8.0);
                        ChartPlotter::draw_breakdown_table(
                            ui,
                            "category",
                            &views.by_category,
                            views.total_sales,
                        );
                    });
                    Self::draw_chart_card(&mut cols[1], "🌍 Sales by Region", REGION_COLOR, |ui| {
                        ChartPlotter::draw_breakdown_chart(
                            ui,
                            "sales_by_region",
                            "Region",
                            &views.by_region,
                            CHART_HEIGHT,
                        );
                        ui.add_space(8.0);
                        ChartPlotter::draw_breakdown_table(
                            ui,
                            "region",
                            &views.by_region,
                            views.total_sales,
                        );
                    });
                });
            });
    }

    fn draw_kpi_card(ui: &mut egui::Ui, title: &str, value: &str) {
        egui::Frame::none()
            .rounding(8.0)
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_height(KPI_CARD_HEIGHT);
                ui.set_width(ui.available_width());
                ui.label(RichText::new(title).size(13.0).color(Color32::GRAY));
                ui.add_space(6.0);
                ui.label(RichText::new(value).size(28.0).strong());
            });
    }

    fn draw_chart_card(
        ui: &mut egui::Ui,
        title: &str,
        accent: Color32,
        add_contents: impl FnOnce(&mut egui::Ui),
    ) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.5, accent))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new(title).size(18.0).strong().color(accent));
                ui.add_space(8.0);
                add_contents(ui);
            });
    }
}
