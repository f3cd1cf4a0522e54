//! Descriptive statistics of a single column.

use crate::error::Result;
use crate::utils::round3;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of one column after numeric coercion.
///
/// Every statistic is `None` when it is undefined for the values present: all
/// four for an empty column, and the standard deviation for a single value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub count: usize,
    pub missing: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericStats {
    /// Coerce `col` to `Float64` and summarise it.
    ///
    /// Values that fail to parse become missing, as do NaNs. Text columns
    /// therefore come out with `count == 0`.
    pub fn from_column(col: &Column) -> Result<Self> {
        let series = col.as_materialized_series().cast(&DataType::Float64)?;
        let values: Vec<f64> = series
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        let missing = series.len() - values.len();
        Ok(Self::from_values(values, missing))
    }

    fn from_values(values: Vec<f64>, missing: usize) -> Self {
        let count = values.len();
        let ca = Float64Chunked::from_vec("values".into(), values);

        // Sample variance needs at least two observations.
        let std_dev = if count > 1 { ca.std(1) } else { None };

        Self {
            count,
            missing,
            mean: ca.mean(),
            std_dev,
            min: ca.min(),
            max: ca.max(),
        }
    }

    /// Same statistics with every float rounded to three decimals and
    /// non-finite results mapped to `None`.
    pub fn rounded(self) -> Self {
        let tidy = |v: Option<f64>| v.filter(|x| x.is_finite()).map(round3);
        Self {
            mean: tidy(self.mean),
            std_dev: tidy(self.std_dev),
            min: tidy(self.min),
            max: tidy(self.max),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_of(series: Series) -> NumericStats {
        NumericStats::from_column(&Column::from(series)).unwrap().rounded()
    }

    #[test]
    fn test_numeric_strings_with_token() {
        let stats = stats_of(Series::new("v".into(), vec!["1", "2", "3", "NA"]));
        assert_eq!(stats.count, 3);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.std_dev, Some(1.0));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.max, Some(3.0));
    }

    #[test]
    fn test_sample_standard_deviation() {
        let stats = stats_of(Series::new("v".into(), vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]));
        // Sample variance is 32 / 7.
        assert_eq!(stats.std_dev, Some(2.138));
        assert_eq!(stats.mean, Some(5.0));
    }

    #[test]
    fn test_all_missing_column() {
        let stats = stats_of(Series::new("v".into(), vec![None::<f64>, None, None]));
        assert_eq!(stats.count, 0);
        assert_eq!(stats.missing, 3);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.std_dev, None);
        assert_eq!(stats.min, None);
        assert_eq!(stats.max, None);
    }

    #[test]
    fn test_text_column_becomes_all_missing() {
        // Coercing every column is deliberately lossy: free text has no numeric reading.
        let stats = stats_of(Series::new("name".into(), vec!["Autauga", "Baldwin"]));
        assert_eq!(stats.count, 0);
        assert_eq!(stats.missing, 2);
        assert_eq!(stats.mean, None);
    }

    #[test]
    fn test_single_value_has_no_std() {
        let stats = stats_of(Series::new("v".into(), vec![Some(4.5), None]));
        assert_eq!(stats.count, 1);
        assert_eq!(stats.mean, Some(4.5));
        assert_eq!(stats.std_dev, None);
    }

    #[test]
    fn test_nan_counts_as_missing() {
        let stats = stats_of(Series::new("v".into(), vec![1.0, f64::NAN, 3.0]));
        assert_eq!(stats.count, 2);
        assert_eq!(stats.missing, 1);
        assert_eq!(stats.mean, Some(2.0));
    }

    #[test]
    fn test_rounding() {
        let stats = stats_of(Series::new("v".into(), vec![1.0, 2.0, 2.0]));
        assert_eq!(stats.mean, Some(1.667));
        assert_eq!(stats.std_dev, Some(0.577));
    }

    #[test]
    fn test_integer_column() {
        let stats = stats_of(Series::new("year".into(), vec![2019_i64, 2020, 2021]));
        assert_eq!(stats.min, Some(2019.0));
        assert_eq!(stats.max, Some(2021.0));
    }
}
