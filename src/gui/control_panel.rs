//! Control Panel Widget
//! Top bar with the data source, reload/open/export buttons and status line.

use egui::{Color32, RichText};
use std::path::PathBuf;

/// Top toolbar of the dashboard window.
pub struct ControlPanel {
    pub csv_path: PathBuf,
    pub status: String,
    pub is_busy: bool,
    pub export_enabled: bool,
}

impl ControlPanel {
    pub fn new(csv_path: PathBuf) -> Self {
        Self {
            csv_path,
            status: "Ready".to_string(),
            is_busy: false,
            export_enabled: false,
        }
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.label(
                RichText::new("📊 ShopSmart Sales Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.add_enabled_ui(self.export_enabled && !self.is_busy, |ui| {
                    if ui.button("📄 Export report").clicked() {
                        action = ControlPanelAction::ExportReport;
                    }
                });
                ui.add_enabled_ui(!self.is_busy, |ui| {
                    if ui.button("📂 Open CSV…").clicked() {
                        action = ControlPanelAction::BrowseCsv;
                    }
                    if ui.button("🔄 Reload").clicked() {
                        action = ControlPanelAction::Reload;
                    }
                });
            });
        });

        ui.horizontal(|ui| {
            ui.label(RichText::new("📁 Data Source:").size(12.0).strong());
            ui.label(
                RichText::new(self.csv_path.display().to_string())
                    .size(12.0)
                    .color(Color32::GRAY),
            );

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new(&self.status).size(11.0).color(self.status_color()));
                if self.is_busy {
                    ui.spinner();
                }
            });
        });
        ui.add_space(5.0);

        action
    }

    fn status_color(&self) -> Color32 {
        if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Warning") {
            Color32::from_rgb(243, 156, 18)
        } else if self.status.contains("Loaded") || self.status.contains("exported") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        }
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    Reload,
    BrowseCsv,
    ExportReport,
}
