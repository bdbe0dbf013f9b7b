//! Chart Plotter Module
//! Draws the interactive bubble chart using egui_plot.
//!
//! egui_plot has no logarithmic axis, so x is plotted as log10(GNI) and the
//! grid marks are pinned to the fixed dollar ticks.

use crate::charts::projection::{
    x_tick_label, y_tick_label, BubbleChart, CHART_TITLE, X_AXIS_LABEL, X_TICKS, Y_AXIS_LABEL,
    Y_TICKS,
};
use egui::{Color32, RichText};
use egui_plot::{GridMark, Legend, Plot, PlotPoints, Points};

/// Largest bubble radius in screen pixels.
pub const MAX_BUBBLE_RADIUS: f64 = 40.0;

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(121, 85, 72),   // Brown
    Color32::from_rgb(96, 125, 139),  // Blue Grey
];

/// Draws bubble charts into an egui `Ui`.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Color for the n-th series.
    pub fn series_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Draw the bubble chart: log GNI on x, life expectancy on y.
    pub fn draw_bubble_chart(ui: &mut egui::Ui, chart: &BubbleChart, height: f32) {
        ui.label(RichText::new(CHART_TITLE).size(18.0).strong());

        Plot::new("bubble_chart")
            .height(height)
            .legend(Legend::default())
            .x_axis_label(X_AXIS_LABEL)
            .y_axis_label(Y_AXIS_LABEL)
            .allow_scroll(false)
            .include_x(0.0)
            .include_x(5.0)
            .include_y(Y_TICKS[0].0)
            .include_y(Y_TICKS[Y_TICKS.len() - 1].0)
            .x_grid_spacer(|_input| {
                X_TICKS
                    .iter()
                    .map(|(value, _)| GridMark {
                        value: value.log10(),
                        step_size: 1.0,
                    })
                    .collect()
            })
            .y_grid_spacer(|_input| {
                Y_TICKS
                    .iter()
                    .map(|(value, _)| GridMark {
                        value: *value,
                        step_size: 20.0,
                    })
                    .collect()
            })
            .x_axis_formatter(|mark, _range| {
                x_tick_label(10f64.powf(mark.value))
                    .unwrap_or_default()
                    .to_string()
            })
            .y_axis_formatter(|mark, _range| {
                y_tick_label(mark.value).unwrap_or_default().to_string()
            })
            .label_formatter(|name, value| {
                let gni = 10f64.powf(value.x);
                if name.is_empty() {
                    format!("GNI ${:.0}\nLife expectancy {:.1}", gni, value.y)
                } else {
                    format!("{}\nGNI ${:.0}\nLife expectancy {:.1}", name, gni, value.y)
                }
            })
            .show(ui, |plot_ui| {
                for (idx, series, point) in chart.plottable_points() {
                    let color = Self::series_color(idx).gamma_multiply(series.opacity);
                    let radius = chart.bubble_radius(point.size, MAX_BUBBLE_RADIUS);

                    plot_ui.points(
                        Points::new(PlotPoints::new(vec![[point.x.log10(), point.y]]))
                            .radius(radius as f32)
                            .filled(true)
                            .color(color)
                            .name(&series.label),
                    );
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_colors_cycle_through_palette() {
        assert_eq!(ChartPlotter::series_color(0), PALETTE[0]);
        assert_eq!(ChartPlotter::series_color(PALETTE.len() + 2), PALETTE[2]);
    }

    #[test]
    fn log_grid_marks_round_trip_to_dollar_labels() {
        let labels: Vec<&str> = X_TICKS
            .iter()
            .filter_map(|(value, _)| x_tick_label(10f64.powf(value.log10())))
            .collect();
        assert_eq!(labels, vec!["$1", "$10", "$100", "$1K", "$10K", "$100K"]);
    }
}
