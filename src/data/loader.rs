//! CSV Dataset Loader Module
//! Reads the three wide Gapminder tables (one column per year) with Polars
//! and forward-fills gaps along each country's row.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the identifier column shared by every source table.
pub const COUNTRY: &str = "country";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },
    #[error("Failed to load CSV {path}: {source}")]
    CsvError {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Missing 'country' column in {path}")]
    MissingCountryColumn { path: PathBuf },
    #[error("Invalid value '{value}' for {country} in column '{column}' of {path}")]
    InvalidValue {
        path: PathBuf,
        country: String,
        column: String,
        value: String,
    },
}

/// The metric carried by one source table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    LifeExpectancy,
    Population,
    GniPerCapita,
}

impl Metric {
    /// Value column name used once the table is in tidy format.
    pub fn column_name(self) -> &'static str {
        match self {
            Metric::LifeExpectancy => "life_expectancy",
            Metric::Population => "population",
            Metric::GniPerCapita => "gni_per_capita",
        }
    }

    /// Human readable header for tables and logs.
    pub fn label(self) -> &'static str {
        match self {
            Metric::LifeExpectancy => "Life Expectancy",
            Metric::Population => "Population",
            Metric::GniPerCapita => "GNI per capita",
        }
    }
}

/// Locations of the three source files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetPaths {
    pub life_expectancy: PathBuf,
    pub population: PathBuf,
    pub gni_per_capita: PathBuf,
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            life_expectancy: PathBuf::from("lex.csv"),
            population: PathBuf::from("pop.csv"),
            gni_per_capita: PathBuf::from("ny_gnp_pcap_pp_cd.csv"),
        }
    }
}

impl DatasetPaths {
    /// Resolve every relative path against `dir`.
    pub fn with_base_dir(&self, dir: &Path) -> Self {
        Self {
            life_expectancy: dir.join(&self.life_expectancy),
            population: dir.join(&self.population),
            gni_per_capita: dir.join(&self.gni_per_capita),
        }
    }
}

/// A wide table as read from disk: `country` plus one Float64 column per year.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub metric: Metric,
    pub df: DataFrame,
}

impl RawTable {
    /// Year column headers in file order.
    pub fn year_columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .filter(|name| name.as_str() != COUNTRY)
            .map(|name| name.to_string())
            .collect()
    }
}

/// The three raw tables of one dashboard.
#[derive(Debug, Clone)]
pub struct RawTables {
    pub life_expectancy: RawTable,
    pub population: RawTable,
    pub gni_per_capita: RawTable,
}

/// Loads Gapminder CSV files with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load all three source tables, failing on the first unreadable file.
    pub fn load_all(paths: &DatasetPaths) -> Result<RawTables, LoaderError> {
        Ok(RawTables {
            life_expectancy: Self::load_table(&paths.life_expectancy, Metric::LifeExpectancy)?,
            population: Self::load_table(&paths.population, Metric::Population)?,
            gni_per_capita: Self::load_table(&paths.gni_per_capita, Metric::GniPerCapita)?,
        })
    }

    /// Load one wide table and forward-fill its rows.
    pub fn load_table(path: &Path, metric: Metric) -> Result<RawTable, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let csv_error = |source: PolarsError| LoaderError::CsvError {
            path: path.to_path_buf(),
            source,
        };

        // Every column is read as text; cells use Gapminder notation ("3.28M")
        let df = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(0))
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(csv_error)?;

        let country_col = df
            .column(COUNTRY)
            .map_err(|_| LoaderError::MissingCountryColumn {
                path: path.to_path_buf(),
            })?;
        let countries: Vec<Option<String>> = country_col
            .str()
            .map_err(csv_error)?
            .into_iter()
            .map(|c| c.map(|c| c.trim().to_string()))
            .collect();

        let mut year_names: Vec<PlSmallStr> = Vec::new();
        let mut year_values: Vec<Vec<Option<f64>>> = Vec::new();

        for column in df.get_columns() {
            if column.name().as_str() == COUNTRY {
                continue;
            }

            let cells = column.str().map_err(csv_error)?;
            let mut values = Vec::with_capacity(df.height());
            for (row, cell) in cells.into_iter().enumerate() {
                let value = match cell {
                    Some(raw) => parse_metric(raw).ok_or_else(|| LoaderError::InvalidValue {
                        path: path.to_path_buf(),
                        country: countries[row].clone().unwrap_or_default(),
                        column: column.name().to_string(),
                        value: raw.to_string(),
                    })?,
                    None => None,
                };
                values.push(value);
            }

            year_names.push(column.name().clone());
            year_values.push(values);
        }

        forward_fill_rows(&mut year_values);

        let mut columns = Vec::with_capacity(year_names.len() + 1);
        columns.push(Column::new(COUNTRY.into(), countries));
        for (name, values) in year_names.into_iter().zip(year_values) {
            columns.push(Column::new(name, values));
        }
        let table = RawTable {
            metric,
            df: DataFrame::new(columns).map_err(csv_error)?,
        };

        tracing::info!(
            path = %path.display(),
            metric = metric.label(),
            countries = table.df.height(),
            years = table.year_columns().len(),
            "loaded source table"
        );

        Ok(table)
    }
}

/// Parse one metric cell.
///
/// Returns `Some(None)` for an empty cell, `Some(Some(v))` for a number and
/// `None` when the text is not a number. Accepts the Gapminder suffixes
/// `k`, `M` and `B` as well as the Unicode minus sign.
pub fn parse_metric(raw: &str) -> Option<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(None);
    }

    let normalized = trimmed.replace('\u{2212}', "-");
    let (number, multiplier) = match normalized.chars().last() {
        Some('k') | Some('K') => (&normalized[..normalized.len() - 1], 1e3),
        Some('M') => (&normalized[..normalized.len() - 1], 1e6),
        Some('B') => (&normalized[..normalized.len() - 1], 1e9),
        _ => (normalized.as_str(), 1.0),
    };

    let value = number.trim().parse::<f64>().ok()?;
    if value.is_nan() {
        Some(None)
    } else {
        Some(Some(value * multiplier))
    }
}

/// Forward-fill gaps along each row.
///
/// `columns` is column-major in header order: a missing cell takes the value
/// of the same row in the previous column. Leading gaps stay missing.
pub fn forward_fill_rows(columns: &mut [Vec<Option<f64>>]) {
    for idx in 1..columns.len() {
        let (filled, rest) = columns.split_at_mut(idx);
        let previous = &filled[idx - 1];
        for (cell, prev) in rest[0].iter_mut().zip(previous) {
            if cell.is_none() {
                *cell = *prev;
            }
        }
    }
}
