//! Dashboard Main Application
//! Main window with the control panel on top and the dashboard below.

use crate::data::{DashboardViews, Dataset, TableCache};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, DashboardState};
use crate::report::ReportGenerator;
use egui::TopBottomPanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::sync::Arc;
use std::thread;
use tracing::{error, info, warn};

/// CSV loading result from background thread
enum LoadResult {
    Complete(DashboardState),
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    cache: Arc<TableCache>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, csv_path: PathBuf) -> Self {
        let mut app = Self {
            cache: Arc::new(TableCache::new(csv_path.clone())),
            control_panel: ControlPanel::new(csv_path),
            chart_viewer: ChartViewer::new(),
            load_rx: None,
            is_loading: false,
        };
        app.start_loading();
        app
    }

    /// Load (or re-validate the cached) table on a background thread.
    fn start_loading(&mut self) {
        if self.is_loading {
            return;
        }

        self.is_loading = true;
        self.control_panel.is_busy = true;
        self.control_panel.set_status("Loading CSV file...");

        let (tx, rx) = channel();
        self.load_rx = Some(rx);
        let cache = Arc::clone(&self.cache);

        thread::spawn(move || {
            let path = cache.path().to_path_buf();
            let result = match cache.load() {
                Ok(Dataset::Absent) => LoadResult::Complete(DashboardState::Absent(path)),
                Ok(Dataset::Empty) => LoadResult::Complete(DashboardState::Empty(path)),
                Ok(Dataset::Populated(table)) => {
                    let views = DashboardViews::compute(&table);
                    LoadResult::Complete(DashboardState::Ready { table, views })
                }
                Err(e) => LoadResult::Error(e.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.finish_loading(result);
            }
            Err(std::sync::mpsc::TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                self.finish_loading(LoadResult::Error("loader thread stopped".to_string()));
            }
        }
    }

    fn finish_loading(&mut self, result: LoadResult) {
        self.is_loading = false;
        self.control_panel.is_busy = false;

        let state = match result {
            LoadResult::Complete(state) => state,
            LoadResult::Error(message) => {
                error!("Failed to load {}: {}", self.cache.path().display(), message);
                DashboardState::Failed(message)
            }
        };

        let status = match &state {
            DashboardState::Loading => "Loading CSV file...".to_string(),
            DashboardState::Absent(_) => "Error: data file not found".to_string(),
            DashboardState::Empty(_) => "Warning: data file has no rows".to_string(),
            DashboardState::Failed(message) => format!("Error: {}", message),
            DashboardState::Ready { table, .. } => format!("Loaded {} rows", table.len()),
        };
        self.control_panel.set_status(&status);
        self.control_panel.export_enabled = matches!(state, DashboardState::Ready { .. });
        self.chart_viewer.state = state;
    }

    /// Handle CSV file selection: switch the source and load it.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            info!("Switching data source to {}", path.display());
            self.cache = Arc::new(TableCache::new(path.clone()));
            self.control_panel.csv_path = path;
            self.chart_viewer.state = DashboardState::Loading;
            self.start_loading();
        }
    }

    /// Handle report export - render charts to memory and bundle them
    fn handle_export_report(&mut self) {
        let Some(views) = self.chart_viewer.views() else {
            self.control_panel.set_status("No dashboard to export");
            return;
        };

        // Ask user for output location
        let output_path = match rfd::FileDialog::new()
            .add_filter("ZIP archive", &["zip"])
            .set_file_name("shopsmart_report.zip")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match ReportGenerator::export(views, self.cache.path(), &output_path) {
            Ok(count) => {
                self.control_panel
                    .set_status(&format!("Report exported: {} charts", count));
                if let Err(e) = open::that(&output_path) {
                    warn!("Could not open {}: {}", output_path.display(), e);
                }
            }
            Err(e) => {
                error!("Report export failed: {}", e);
                self.control_panel
                    .set_status(&format!("Error: report export failed: {}", e));
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Top panel - Control Panel
        TopBottomPanel::top("control_panel").show(ctx, |ui| {
            let action = self.control_panel.show(ui);

            match action {
                ControlPanelAction::Reload => self.start_loading(),
                ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                ControlPanelAction::ExportReport => self.handle_export_report(),
                ControlPanelAction::None => {}
            }
        });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui);
        });
    }
}
