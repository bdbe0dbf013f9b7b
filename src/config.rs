//! Startup configuration: command line flags plus an optional JSON file.

use crate::data::DatasetPaths;
use crate::logging::LogFormat;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Gapminder dashboard: life expectancy vs. GNI per capita, sized by population.
#[derive(Parser, Debug)]
#[command(name = "gapminder-dashboard", version, about)]
pub struct Cli {
    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory containing lex.csv, pop.csv and ny_gnp_pcap_pp_cd.csv
    #[arg(long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1400.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data: DatasetPaths,
    pub window: WindowConfig,
    pub export: ExportConfig,
}

impl DashboardConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Config file (or defaults) with `--data-dir` applied on top.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(dir) = &cli.data_dir {
            config.data = config.data.with_base_dir(dir);
        }

        tracing::debug!(?config, "resolved configuration");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("gapminder-dashboard").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_use_gapminder_file_names() {
        let config = DashboardConfig::resolve(&cli(&[])).unwrap();
        assert_eq!(config.data.life_expectancy, PathBuf::from("lex.csv"));
        assert_eq!(config.data.population, PathBuf::from("pop.csv"));
        assert_eq!(config.export, ExportConfig::default());
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(
            &path,
            r#"{ "data": { "population": "people.csv" }, "export": { "width": 640 } }"#,
        )
        .unwrap();

        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.data.population, PathBuf::from("people.csv"));
        assert_eq!(config.data.life_expectancy, PathBuf::from("lex.csv"));
        assert_eq!(config.export.width, 640);
        assert_eq!(config.export.height, 800);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn data_dir_flag_prefixes_paths() {
        let config = DashboardConfig::resolve(&cli(&["--data-dir", "/srv/gapminder", "-vv"])).unwrap();
        assert_eq!(
            config.data.gni_per_capita,
            PathBuf::from("/srv/gapminder/ny_gnp_pcap_pp_cd.csv")
        );
    }

    #[test]
    fn malformed_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            DashboardConfig::load(&path).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn verbosity_and_format_flags_parse() {
        let parsed = cli(&["-vv", "--log-format", "json"]);
        assert_eq!(parsed.verbose, 2);
        assert_eq!(parsed.log_format, LogFormat::Json);
    }
}
