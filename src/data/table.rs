//! Unified Table Module
//! The joined country/year table and the year/country selection filter.

use crate::data::loader::{Metric, COUNTRY};
use crate::data::processor::{ProcessorError, YEAR};
use polars::prelude::*;
use std::collections::BTreeSet;

/// One joined observation.
#[derive(Debug, Clone, PartialEq)]
pub struct UnifiedRow {
    pub country: String,
    pub year: i32,
    pub life_expectancy: f64,
    pub population: f64,
    pub gni_per_capita: f64,
}

/// User selection for one render pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub year: i32,
    pub countries: BTreeSet<String>,
}

impl Selection {
    pub fn new<I, S>(year: i32, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            year,
            countries: countries.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of applying a [`Selection`].
#[derive(Debug, Clone)]
pub enum SelectionOutcome {
    /// At least one row matched.
    Matched(UnifiedTable),
    /// Nothing matched the year/country combination.
    NoData,
}

/// Columns: country, year, life_expectancy, population, gni_per_capita.
///
/// Immutable once built; share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct UnifiedTable {
    df: DataFrame,
}

impl UnifiedTable {
    pub(crate) fn from_frame(df: DataFrame) -> Self {
        Self { df }
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Smallest and largest year, or `None` for an empty table.
    pub fn year_range(&self) -> Result<Option<(i32, i32)>, ProcessorError> {
        let years = self.df.column(YEAR)?.i32()?;
        Ok(years.min().zip(years.max()))
    }

    /// Distinct country names, sorted.
    pub fn countries(&self) -> Result<Vec<String>, ProcessorError> {
        let countries: BTreeSet<&str> = self
            .df
            .column(COUNTRY)?
            .str()?
            .into_iter()
            .flatten()
            .collect();
        Ok(countries.into_iter().map(str::to_string).collect())
    }

    /// Keep the rows of `selection.year` whose country is selected.
    pub fn filter(&self, selection: &Selection) -> Result<SelectionOutcome, ProcessorError> {
        if selection.countries.is_empty() {
            return Ok(SelectionOutcome::NoData);
        }

        let by_year = self
            .df
            .clone()
            .lazy()
            .filter(col(YEAR).eq(lit(selection.year)))
            .collect()?;

        let mask: BooleanChunked = by_year
            .column(COUNTRY)?
            .str()?
            .into_iter()
            .map(|country| country.is_some_and(|c| selection.countries.contains(c)))
            .collect();
        let filtered = by_year.filter(&mask)?;

        tracing::debug!(
            year = selection.year,
            selected = selection.countries.len(),
            matched = filtered.height(),
            "applied selection"
        );

        if filtered.height() == 0 {
            Ok(SelectionOutcome::NoData)
        } else {
            Ok(SelectionOutcome::Matched(Self::from_frame(filtered)))
        }
    }

    /// Materialize the rows in table order.
    pub fn rows(&self) -> Result<Vec<UnifiedRow>, ProcessorError> {
        let countries = self.df.column(COUNTRY)?.str()?;
        let years = self.df.column(YEAR)?.i32()?;
        let life = self.df.column(Metric::LifeExpectancy.column_name())?.f64()?;
        let population = self.df.column(Metric::Population.column_name())?.f64()?;
        let gni = self.df.column(Metric::GniPerCapita.column_name())?.f64()?;

        let rows = countries
            .into_iter()
            .zip(years.into_iter())
            .zip(life.into_iter())
            .zip(population.into_iter())
            .zip(gni.into_iter())
            .filter_map(|((((country, year), life), population), gni)| {
                Some(UnifiedRow {
                    country: country?.to_string(),
                    year: year?,
                    life_expectancy: life?,
                    population: population?,
                    gni_per_capita: gni?,
                })
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample_table() -> UnifiedTable {
        let df = df!(
            COUNTRY => ["A", "A", "B"],
            YEAR => [2000i32, 2001, 2000],
            "life_expectancy" => [70.0, 71.0, 60.0],
            "population" => [100.0, 110.0, 200.0],
            "gni_per_capita" => [5000.0, 5200.0, 3000.0],
        )
        .unwrap();
        UnifiedTable::from_frame(df)
    }

    fn matched_rows(outcome: SelectionOutcome) -> Vec<UnifiedRow> {
        match outcome {
            SelectionOutcome::Matched(table) => table.rows().unwrap(),
            SelectionOutcome::NoData => Vec::new(),
        }
    }

    #[test]
    fn selects_single_country_year() {
        let table = sample_table();
        let rows = matched_rows(table.filter(&Selection::new(2000, ["A"])).unwrap());
        assert_eq!(
            rows,
            vec![UnifiedRow {
                country: "A".into(),
                year: 2000,
                life_expectancy: 70.0,
                population: 100.0,
                gni_per_capita: 5000.0,
            }]
        );
    }

    #[test]
    fn empty_country_set_yields_no_data() {
        let table = sample_table();
        let outcome = table.filter(&Selection::new(2000, Vec::<String>::new())).unwrap();
        assert!(matches!(outcome, SelectionOutcome::NoData));
    }

    #[test]
    fn year_outside_range_yields_no_data() {
        let table = sample_table();
        let outcome = table.filter(&Selection::new(1850, ["A", "B"])).unwrap();
        assert!(matches!(outcome, SelectionOutcome::NoData));
    }

    #[test]
    fn unknown_country_yields_no_data() {
        let table = sample_table();
        let outcome = table.filter(&Selection::new(2000, ["Atlantis"])).unwrap();
        assert!(matches!(outcome, SelectionOutcome::NoData));
    }

    #[test]
    fn slider_bounds_and_country_list() {
        let table = sample_table();
        assert_eq!(table.year_range().unwrap(), Some((2000, 2001)));
        assert_eq!(table.countries().unwrap(), vec!["A", "B"]);
    }

    #[test]
    fn empty_table_has_no_year_range() {
        let table = UnifiedTable::from_frame(sample_table().df.head(Some(0)));
        assert!(table.is_empty());
        assert_eq!(table.year_range().unwrap(), None);
        assert!(table.countries().unwrap().is_empty());
    }

    proptest! {
        #[test]
        fn filter_is_idempotent_and_respects_selection(
            year in 1999i32..2003,
            picks in proptest::collection::btree_set(prop_oneof![Just("A"), Just("B"), Just("C")], 0..3),
        ) {
            let table = sample_table();
            let selection = Selection::new(year, picks.iter().copied());
            let first = matched_rows(table.filter(&selection).unwrap());

            for row in &first {
                prop_assert_eq!(row.year, year);
                prop_assert!(selection.countries.contains(&row.country));
            }

            if let SelectionOutcome::Matched(filtered) = table.filter(&selection).unwrap() {
                let again = matched_rows(filtered.filter(&selection).unwrap());
                prop_assert_eq!(again, first);
            } else {
                prop_assert!(first.is_empty());
            }
        }
    }
}
