//! Chart Viewer Widget
//! Central panel showing the filtered rows and the bubble chart.

use crate::charts::{BubbleChart, ChartPlotter};
use crate::data::{Metric, UnifiedRow};
use egui::{RichText, ScrollArea};

const CHART_HEIGHT: f32 = 420.0;
const TABLE_MAX_HEIGHT: f32 = 220.0;

pub const NO_DATA_MESSAGE: &str = "No data available for the selected year and countries.";

/// Output of the latest render pass.
#[derive(Default)]
pub struct ChartViewer {
    pub rows: Vec<UnifiedRow>,
    pub chart: BubbleChart,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
        self.chart = BubbleChart::default();
    }

    /// Replace the displayed rows and re-project the chart.
    pub fn set_rows(&mut self, rows: Vec<UnifiedRow>) {
        self.chart = BubbleChart::project(&rows);
        self.rows = rows;
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        ui.label(RichText::new("Gapminder Dashboard").size(20.0).strong());
        ui.add_space(8.0);

        if self.rows.is_empty() {
            ui.label(RichText::new(NO_DATA_MESSAGE).size(14.0));
        } else {
            Self::draw_table(ui, &self.rows);
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        ChartPlotter::draw_bubble_chart(ui, &self.chart, CHART_HEIGHT);
    }

    fn draw_table(ui: &mut egui::Ui, rows: &[UnifiedRow]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .max_height(TABLE_MAX_HEIGHT)
                    .show(ui, |ui| {
                        egui::Grid::new("filtered_rows")
                            .striped(true)
                            .min_col_width(90.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for header in [
                                    "Country",
                                    "Year",
                                    Metric::LifeExpectancy.label(),
                                    Metric::Population.label(),
                                    Metric::GniPerCapita.label(),
                                ] {
                                    ui.label(RichText::new(header).strong().size(12.0));
                                }
                                ui.end_row();

                                for row in rows {
                                    ui.label(&row.country);
                                    ui.label(row.year.to_string());
                                    ui.label(format!("{:.1}", row.life_expectancy));
                                    ui.label(format!("{:.0}", row.population));
                                    ui.label(format!("{:.0}", row.gni_per_capita));
                                    ui.end_row();
                                }
                            });
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_rows_projects_one_series_per_country() {
        let mut viewer = ChartViewer::new();
        viewer.set_rows(vec![
            UnifiedRow {
                country: "A".into(),
                year: 2000,
                life_expectancy: 70.0,
                population: 100.0,
                gni_per_capita: 5000.0,
            },
            UnifiedRow {
                country: "B".into(),
                year: 2000,
                life_expectancy: 60.0,
                population: 200.0,
                gni_per_capita: 3000.0,
            },
        ]);
        assert_eq!(viewer.chart.series.len(), 2);

        viewer.clear();
        assert!(viewer.rows.is_empty());
        assert!(viewer.chart.is_empty());
    }
}
