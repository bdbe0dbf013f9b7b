//! Charts module - Bubble chart projection and rendering

mod plotter;
mod projection;
mod renderer;

pub use plotter::ChartPlotter;
pub use projection::BubbleChart;
pub use renderer::{RenderError, StaticChartRenderer};
