//! Static Chart Renderer
//! Renders the bubble chart to a PNG file with plotters.
//!
//! Layout matches the interactive chart: log GNI axis with dollar ticks,
//! linear life expectancy axis, one translucent bubble per country and a
//! legend in the lower right corner.

use crate::charts::plotter::{ChartPlotter, MAX_BUBBLE_RADIUS};
use crate::charts::projection::{
    x_tick_label, y_tick_label, BubbleChart, CHART_TITLE, X_AXIS_LABEL, X_TICKS, Y_AXIS_LABEL,
    Y_TICKS,
};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `chart` as a PNG image at `path`.
    pub fn render_png(
        chart: &BubbleChart,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        Self::draw(&root, chart)?;
        root.present().map_err(draw_error)?;

        tracing::info!(
            path = %path.display(),
            series = chart.series.len(),
            "exported bubble chart"
        );
        Ok(())
    }

    fn draw<DB: DrawingBackend>(
        root: &DrawingArea<DB, Shift>,
        chart: &BubbleChart,
    ) -> Result<(), RenderError> {
        root.fill(&WHITE).map_err(draw_error)?;

        let (x_range, y_range) = Self::axis_ranges(chart);

        let mut ctx = ChartBuilder::on(root)
            .caption(CHART_TITLE, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range.log_scale(), y_range)
            .map_err(draw_error)?;

        ctx.configure_mesh()
            .x_desc(X_AXIS_LABEL)
            .y_desc(Y_AXIS_LABEL)
            .x_labels(20)
            .y_labels(20)
            .x_label_formatter(&|v: &f64| x_tick_label(*v).unwrap_or_default().to_string())
            .y_label_formatter(&|v: &f64| y_tick_label(*v).unwrap_or_default().to_string())
            .draw()
            .map_err(draw_error)?;

        for (idx, series) in chart.series.iter().enumerate() {
            let egui_color = ChartPlotter::series_color(idx);
            let color = RGBColor(egui_color.r(), egui_color.g(), egui_color.b());
            let fill = color.mix(f64::from(series.opacity)).filled();

            let bubbles: Vec<_> = chart
                .plottable_points()
                .filter(|(series_idx, _, _)| *series_idx == idx)
                .map(|(_, _, p)| {
                    let radius = chart.bubble_radius(p.size, MAX_BUBBLE_RADIUS).round() as i32;
                    Circle::new((p.x, p.y), radius, fill)
                })
                .collect();
            if bubbles.is_empty() {
                continue;
            }

            ctx.draw_series(bubbles)
                .map_err(draw_error)?
                .label(series.label.as_str())
                .legend(move |(x, y)| Circle::new((x, y), 5, color.filled()));
        }

        if !chart.is_empty() {
            ctx.configure_series_labels()
                .position(SeriesLabelPosition::LowerRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(draw_error)?;
        }

        Ok(())
    }

    /// Axis ranges always cover the fixed ticks and widen to fit the data.
    fn axis_ranges(chart: &BubbleChart) -> (Range<f64>, Range<f64>) {
        let mut x_min = X_TICKS[0].0 / 2.0;
        let mut x_max = X_TICKS[X_TICKS.len() - 1].0 * 2.0;
        let mut y_min = Y_TICKS[0].0 - 10.0;
        let mut y_max = Y_TICKS[Y_TICKS.len() - 1].0 + 10.0;

        for (_, _, p) in chart.plottable_points() {
            x_min = x_min.min(p.x / 2.0);
            x_max = x_max.max(p.x * 2.0);
            y_min = y_min.min(p.y - 5.0);
            y_max = y_max.max(p.y + 5.0);
        }

        (x_min..x_max, y_min..y_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::UnifiedRow;

    #[test]
    fn empty_chart_keeps_fixed_tick_ranges() {
        let (x, y) = StaticChartRenderer::axis_ranges(&BubbleChart::default());
        assert_eq!(x, 0.5..200_000.0);
        assert_eq!(y, 10.0..90.0);
    }

    #[test]
    fn ranges_widen_for_outlying_data() {
        let chart = BubbleChart::project(&[UnifiedRow {
            country: "Rich".into(),
            year: 2010,
            life_expectancy: 95.0,
            population: 1e6,
            gni_per_capita: 400_000.0,
        }]);
        let (x, y) = StaticChartRenderer::axis_ranges(&chart);
        assert_eq!(x.end, 800_000.0);
        assert_eq!(y.end, 100.0);
        assert_eq!(x.start, 0.5);
        assert_eq!(y.start, 10.0);
    }
}
