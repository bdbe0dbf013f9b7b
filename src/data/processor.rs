//! Data Processor Module
//! Reshapes wide tables into tidy format and joins them on (country, year).

use crate::data::loader::{RawTable, RawTables, COUNTRY};
use crate::data::table::UnifiedTable;
use polars::prelude::*;
use thiserror::Error;

/// Name of the year column in tidy and unified tables.
pub const YEAR: &str = "year";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Column header '{0}' is not a year")]
    InvalidYear(String),
}

/// Handles the reshape and join steps of the pipeline.
pub struct DataProcessor;

impl DataProcessor {
    /// Transform a wide table to tidy format (unpivot the year columns).
    ///
    /// Output columns: ["country", "year", value_col]. Cells still missing
    /// after forward-fill are dropped.
    pub fn stack_to_long(raw: &RawTable, value_col: &str) -> Result<DataFrame, ProcessorError> {
        let mut countries: Vec<String> = Vec::new();
        let mut years: Vec<i32> = Vec::new();
        let mut values: Vec<f64> = Vec::new();

        let country_ca = raw.df.column(COUNTRY)?.str()?;

        for column in raw.df.get_columns() {
            if column.name().as_str() == COUNTRY {
                continue;
            }

            let year = parse_year(column.name())?;
            let value_ca = column.f64()?;

            for (country, value) in country_ca.into_iter().zip(value_ca.into_iter()) {
                if let (Some(c), Some(v)) = (country, value) {
                    countries.push(c.to_string());
                    years.push(year);
                    values.push(v);
                }
            }
        }

        let df = DataFrame::new(vec![
            Column::new(COUNTRY.into(), countries),
            Column::new(YEAR.into(), years),
            Column::new(value_col.into(), values),
        ])?;

        tracing::debug!(
            metric = value_col,
            rows = df.height(),
            "reshaped table to tidy format"
        );

        Ok(df)
    }

    /// Inner-join three tidy tables on (country, year).
    ///
    /// Joins life expectancy with population first, then the result with GNI
    /// per capita. Output is sorted by country, then year.
    pub fn join_tidy(
        life_expectancy: DataFrame,
        population: DataFrame,
        gni_per_capita: DataFrame,
    ) -> Result<UnifiedTable, ProcessorError> {
        let keys = [col(COUNTRY), col(YEAR)];

        let joined = life_expectancy
            .lazy()
            .join(
                population.lazy(),
                keys.clone(),
                keys.clone(),
                JoinArgs::new(JoinType::Inner),
            )
            .join(
                gni_per_capita.lazy(),
                keys.clone(),
                keys,
                JoinArgs::new(JoinType::Inner),
            )
            .sort([COUNTRY, YEAR], SortMultipleOptions::default())
            .collect()?;

        Ok(UnifiedTable::from_frame(joined))
    }

    /// Reshape and join the three source tables.
    pub fn build_unified(raw: &RawTables) -> Result<UnifiedTable, ProcessorError> {
        let life = Self::stack_to_long(
            &raw.life_expectancy,
            raw.life_expectancy.metric.column_name(),
        )?;
        let population = Self::stack_to_long(&raw.population, raw.population.metric.column_name())?;
        let gni = Self::stack_to_long(&raw.gni_per_capita, raw.gni_per_capita.metric.column_name())?;

        let unified = Self::join_tidy(life, population, gni)?;
        tracing::info!(rows = unified.height(), "joined source tables");
        Ok(unified)
    }
}

/// Year labels are compared numerically everywhere downstream.
fn parse_year(header: &str) -> Result<i32, ProcessorError> {
    header
        .trim()
        .parse::<i32>()
        .map_err(|_| ProcessorError::InvalidYear(header.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::Metric;
    use crate::data::table::UnifiedRow;
    use std::collections::BTreeSet;

    fn raw(metric: Metric, df: DataFrame) -> RawTable {
        RawTable { metric, df }
    }

    fn keys(table: &UnifiedTable) -> BTreeSet<(String, i32)> {
        table
            .rows()
            .unwrap()
            .into_iter()
            .map(|r| (r.country, r.year))
            .collect()
    }

    #[test]
    fn stack_drops_only_missing_cells() {
        let table = raw(
            Metric::LifeExpectancy,
            df!(
                COUNTRY => ["A", "B"],
                "2000" => [Some(70.0), None],
                "2001" => [Some(71.0), Some(60.0)],
            )
            .unwrap(),
        );

        let tidy = DataProcessor::stack_to_long(&table, "life_expectancy").unwrap();
        assert_eq!(tidy.height(), 3);
        assert_eq!(
            tidy.get_column_names()
                .iter()
                .map(|n| n.as_str())
                .collect::<Vec<_>>(),
            vec![COUNTRY, YEAR, "life_expectancy"]
        );
        let years: Vec<Option<i32>> = tidy.column(YEAR).unwrap().i32().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(2000), Some(2001), Some(2001)]);
    }

    #[test]
    fn non_numeric_header_is_rejected() {
        let table = raw(
            Metric::Population,
            df!(COUNTRY => ["A"], "notes" => [1.0]).unwrap(),
        );
        let err = DataProcessor::stack_to_long(&table, "population").unwrap_err();
        assert!(matches!(err, ProcessorError::InvalidYear(h) if h == "notes"));
    }

    #[test]
    fn join_keeps_only_keys_present_everywhere() {
        let tables = RawTables {
            life_expectancy: raw(
                Metric::LifeExpectancy,
                df!(COUNTRY => ["A", "B"], "2000" => [70.0, 60.0], "2001" => [71.0, 61.0]).unwrap(),
            ),
            population: raw(
                Metric::Population,
                df!(COUNTRY => ["A", "B"], "2000" => [Some(100.0), None], "2001" => [Some(110.0), Some(210.0)])
                    .unwrap(),
            ),
            gni_per_capita: raw(
                Metric::GniPerCapita,
                df!(COUNTRY => ["A", "C"], "2000" => [5000.0, 1.0], "2001" => [5200.0, 2.0]).unwrap(),
            ),
        };

        let unified = DataProcessor::build_unified(&tables).unwrap();
        let expected: BTreeSet<(String, i32)> =
            [("A".to_string(), 2000), ("A".to_string(), 2001)].into_iter().collect();
        assert_eq!(keys(&unified), expected);

        let rows = unified.rows().unwrap();
        assert_eq!(
            rows[0],
            UnifiedRow {
                country: "A".into(),
                year: 2000,
                life_expectancy: 70.0,
                population: 100.0,
                gni_per_capita: 5000.0,
            }
        );
    }

    #[test]
    fn join_output_is_sorted_by_country_then_year() {
        let life = df!(COUNTRY => ["B", "A", "A"], YEAR => [2000i32, 2001, 2000], "life_expectancy" => [1.0, 2.0, 3.0]).unwrap();
        let pop = df!(COUNTRY => ["A", "A", "B"], YEAR => [2000i32, 2001, 2000], "population" => [1.0, 2.0, 3.0]).unwrap();
        let gni = df!(COUNTRY => ["A", "B", "A"], YEAR => [2001i32, 2000, 2000], "gni_per_capita" => [1.0, 2.0, 3.0]).unwrap();

        let unified = DataProcessor::join_tidy(life, pop, gni).unwrap();
        let order: Vec<(String, i32)> = unified
            .rows()
            .unwrap()
            .into_iter()
            .map(|r| (r.country, r.year))
            .collect();
        assert_eq!(
            order,
            vec![("A".into(), 2000), ("A".into(), 2001), ("B".into(), 2000)]
        );
    }
}
