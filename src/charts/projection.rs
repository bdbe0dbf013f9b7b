//! Bubble Chart Projection
//! Turns filtered rows into per-country bubble series with fixed axis ticks.

use crate::data::UnifiedRow;
use std::collections::BTreeMap;

pub const CHART_TITLE: &str = "Bubble Chart";
pub const X_AXIS_LABEL: &str = "GNI per capita (PPP)";
pub const Y_AXIS_LABEL: &str = "Life Expectancy";

/// Bubble fill opacity, so overlapping bubbles stay readable.
pub const BUBBLE_OPACITY: f32 = 0.5;

/// Smallest bubble radius in pixels.
pub const MIN_BUBBLE_RADIUS: f64 = 3.0;

/// GNI ticks on the logarithmic x axis.
pub const X_TICKS: [(f64, &str); 6] = [
    (1.0, "$1"),
    (10.0, "$10"),
    (100.0, "$100"),
    (1_000.0, "$1K"),
    (10_000.0, "$10K"),
    (100_000.0, "$100K"),
];

/// Life expectancy ticks on the linear y axis.
pub const Y_TICKS: [(f64, &str); 4] = [(20.0, "20"), (40.0, "40"), (60.0, "60"), (80.0, "80")];

/// One bubble: x = GNI per capita, y = life expectancy, size = population.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubblePoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

/// All bubbles of one country.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleSeries {
    pub label: String,
    pub points: Vec<BubblePoint>,
    pub opacity: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BubbleChart {
    pub series: Vec<BubbleSeries>,
}

impl BubbleChart {
    /// Group rows by country (sorted by name) into bubble series.
    pub fn project(rows: &[UnifiedRow]) -> Self {
        let mut groups: BTreeMap<&str, Vec<BubblePoint>> = BTreeMap::new();
        for row in rows {
            groups.entry(row.country.as_str()).or_default().push(BubblePoint {
                x: row.gni_per_capita,
                y: row.life_expectancy,
                size: row.population,
            });
        }

        let series = groups
            .into_iter()
            .map(|(country, points)| BubbleSeries {
                label: country.to_string(),
                points,
                opacity: BUBBLE_OPACITY,
            })
            .collect();

        Self { series }
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Points that can be placed on the log axis.
    pub fn plottable_points(&self) -> impl Iterator<Item = (usize, &BubbleSeries, &BubblePoint)> {
        self.series.iter().enumerate().flat_map(|(idx, series)| {
            series
                .points
                .iter()
                .filter(|p| p.x > 0.0 && p.x.is_finite() && p.y.is_finite())
                .map(move |p| (idx, series, p))
        })
    }

    fn max_size(&self) -> f64 {
        self.series
            .iter()
            .flat_map(|s| s.points.iter())
            .map(|p| p.size)
            .filter(|s| s.is_finite())
            .fold(0.0, f64::max)
    }

    /// Bubble radius in pixels: area proportional to population.
    pub fn bubble_radius(&self, size: f64, max_radius: f64) -> f64 {
        let max_size = self.max_size();
        if max_size <= 0.0 || !size.is_finite() || size <= 0.0 {
            return MIN_BUBBLE_RADIUS;
        }
        (max_radius * (size / max_size).sqrt()).max(MIN_BUBBLE_RADIUS)
    }
}

fn tick_label(ticks: &[(f64, &'static str)], value: f64) -> Option<&'static str> {
    ticks
        .iter()
        .find(|(tick, _)| (tick - value).abs() <= tick.abs() * 1e-6)
        .map(|(_, label)| *label)
}

/// Label for a GNI value if it sits on one of the fixed x ticks.
pub fn x_tick_label(gni: f64) -> Option<&'static str> {
    tick_label(&X_TICKS, gni)
}

/// Label for a life expectancy value if it sits on one of the fixed y ticks.
pub fn y_tick_label(life_expectancy: f64) -> Option<&'static str> {
    tick_label(&Y_TICKS, life_expectancy)
}
