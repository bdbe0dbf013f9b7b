//! Gapminder Main Application
//! Main window with control panel and chart viewer.

use crate::charts::StaticChartRenderer;
use crate::config::ExportConfig;
use crate::data::{ProcessorError, SelectionOutcome, UnifiedTable};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use egui::SidePanel;
use std::sync::Arc;

/// Main application window.
pub struct GapminderApp {
    table: Arc<UnifiedTable>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    export: ExportConfig,
}

impl GapminderApp {
    /// Build the window state from the memoized table.
    pub fn new(table: Arc<UnifiedTable>, export: ExportConfig) -> Result<Self, ProcessorError> {
        if table.is_empty() {
            tracing::warn!("no (country, year) pair is present in all three datasets");
        }
        let control_panel = ControlPanel::new(table.year_range()?, table.countries()?);

        let mut app = Self {
            table,
            control_panel,
            chart_viewer: ChartViewer::new(),
            export,
        };
        app.refresh();
        Ok(app)
    }

    /// Re-run filter and projection for the current selection.
    fn refresh(&mut self) {
        let selection = self.control_panel.selection();

        let result = self
            .table
            .filter(&selection)
            .and_then(|outcome| match outcome {
                SelectionOutcome::Matched(filtered) => filtered.rows(),
                SelectionOutcome::NoData => Ok(Vec::new()),
            });

        match result {
            Ok(rows) => {
                let status = if rows.is_empty() {
                    format!("{}: no data", selection.year)
                } else {
                    format!("{}: {} rows", selection.year, rows.len())
                };
                self.chart_viewer.set_rows(rows);
                self.control_panel.set_status(status);
            }
            Err(e) => {
                tracing::error!(error = %e, year = selection.year, "render failed");
                self.chart_viewer.clear();
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }

    /// Handle PNG export of the current chart
    fn handle_export_png(&mut self) {
        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("bubble_chart.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_png(
            &self.chart_viewer.chart,
            &output_path,
            self.export.width,
            self.export.height,
        ) {
            Ok(()) => {
                self.control_panel
                    .set_status(format!("Exported {}", output_path.display()));
            }
            Err(e) => {
                tracing::error!(error = %e, path = %output_path.display(), "export failed");
                self.control_panel.set_status(format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for GapminderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::SelectionChanged => self.refresh(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Table and Chart
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.chart_viewer.show(ui);
            });
        });
    }
}
