//! Row filter that keeps genuine county-year observations.
//!
//! Raw regional extracts mix county rows with national, state and
//! placeholder aggregates, and carry identifiers in whatever shape the
//! source produced (`1001`, `"01,001"`, ` 01001`). [`drop_aggregates`] makes
//! one pass over the identifier and year columns and decides each row:
//!
//! 1. no identifier digits or no year: dropped as missing
//! 2. year present but not an integer: dropped as a bad year
//! 3. blocklisted code or a code ending in `000`: dropped as an aggregate
//!
//! The canonical five-digit code is written to the `county_fips` column and
//! the year column is replaced by its integer form. Counts for each reason
//! are returned in [`FilterOutcome`] so the caller can log them.

use super::fips::{is_real_county_fips, normalize_fips};
use crate::config::PanelConfig;
use crate::error::{PanelError, Result};
use polars::prelude::*;

/// Result of [`drop_aggregates`], with per-reason drop counts for logging.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub df: DataFrame,
    /// Header the identifiers were read from.
    pub fips_source: String,
    pub rows_before: usize,
    pub dropped_missing: usize,
    pub dropped_bad_year: usize,
    pub dropped_aggregate: usize,
}

impl FilterOutcome {
    pub fn rows_after(&self) -> usize {
        self.df.height()
    }

    pub fn rows_dropped(&self) -> usize {
        self.dropped_missing + self.dropped_bad_year + self.dropped_aggregate
    }
}

/// First configured identifier header present in `df`.
pub fn find_fips_column<'a>(df: &DataFrame, config: &'a PanelConfig) -> Option<&'a str> {
    config
        .fips_columns
        .iter()
        .map(String::as_str)
        .find(|name| df.column(name).is_ok())
}

/// Parse a year cell. Integral floats such as `2019.0` are accepted.
pub fn parse_year(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(year) = trimmed.parse::<i64>() {
        return Some(year);
    }
    let value = trimmed.parse::<f64>().ok()?;
    let year = value as i64;
    (value.is_finite() && value.fract() == 0.0 && year as f64 == value).then_some(year)
}

/// Drop aggregate and malformed rows from a text panel.
///
/// Steps run in a fixed order: normalise identifiers into the canonical column,
/// drop rows missing an identifier or year, coerce year to an integer (dropping
/// failures), then drop codes that are not real counties. Surviving rows keep
/// their source order.
///
/// # Errors
///
/// Returns [`PanelError::MissingColumn`] when no identifier header or no year
/// column is present.
pub fn drop_aggregates(df: DataFrame, config: &PanelConfig) -> Result<FilterOutcome> {
    let fips_source = find_fips_column(&df, config)
        .ok_or_else(|| {
            PanelError::MissingColumn(format!(
                "no FIPS column (expected one of: {})",
                config.fips_columns.join(", ")
            ))
        })?
        .to_owned();

    if df.column(&config.year_column).is_err() {
        return Err(PanelError::MissingColumn(format!(
            "no '{}' column",
            config.year_column
        )));
    }

    let fips_series = df
        .column(&fips_source)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    let year_series = df
        .column(&config.year_column)?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let aggregates = config.aggregate_set();
    let rows_before = df.height();
    let mut county = Vec::with_capacity(rows_before);
    let mut years = Vec::with_capacity(rows_before);
    let mut keep = Vec::with_capacity(rows_before);
    let (mut dropped_missing, mut dropped_bad_year, mut dropped_aggregate) = (0, 0, 0);

    for (raw_fips, raw_year) in fips_series.str()?.into_iter().zip(year_series.str()?) {
        let fips = normalize_fips(raw_fips);
        let year = raw_year.and_then(parse_year);

        let keep_row = match (fips.as_deref(), raw_year, year) {
            (None, _, _) | (_, None, _) => {
                dropped_missing += 1;
                false
            }
            (Some(_), Some(_), None) => {
                dropped_bad_year += 1;
                false
            }
            (Some(code), Some(_), Some(_)) => {
                let real = is_real_county_fips(code, &aggregates);
                if !real {
                    dropped_aggregate += 1;
                }
                real
            }
        };

        county.push(fips);
        years.push(year);
        keep.push(keep_row);
    }

    let mut df = df;
    df.with_column(Series::new(
        config.county_fips_column.as_str().into(),
        county,
    ))?;
    df.with_column(Series::new(config.year_column.as_str().into(), years))?;

    let mask = Series::new("keep".into(), keep);
    let df = df.filter(mask.bool()?)?;

    Ok(FilterOutcome {
        df,
        fips_source,
        rows_before,
        dropped_missing,
        dropped_bad_year,
        dropped_aggregate,
    })
}
