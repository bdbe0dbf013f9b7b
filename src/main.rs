//! Gapminder Dashboard - Life expectancy, population & GNI per capita viewer
//!
//! Loads the three Gapminder tables once, then lets the user pick a year and
//! a set of countries to draw a bubble chart.

mod charts;
mod config;
mod data;
mod gui;
mod logging;

use anyhow::Context;
use clap::Parser;
use config::{Cli, DashboardConfig};
use data::DatasetCache;
use eframe::egui;
use gui::GapminderApp;
use logging::LogConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format))?;

    let config = DashboardConfig::resolve(&cli)?;

    // Load errors are fatal: no partial dashboard
    let mut cache = DatasetCache::new();
    let table = cache.get_or_load(&config.data).map_err(|e| {
        tracing::error!(error = %e, "failed to load datasets");
        e
    })?;
    tracing::info!(
        rows = table.height(),
        cached = cache.len(),
        "dataset ready"
    );

    let app = GapminderApp::new(table, config.export.clone())
        .context("failed to prepare dashboard")?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_min_inner_size([1000.0, 650.0])
            .with_title("Gapminder Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Gapminder Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("GUI error: {e}"))
}
