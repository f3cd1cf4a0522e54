//! Per-variable summary statistics table.
//!
//! Unlike the metadata summary, this view does not look at storage types:
//! every column is coerced to floating point first, so numbers stored as
//! text are counted and anything unparseable becomes missing. Identifier and
//! name columns therefore appear with `N = 0`.

use super::numeric::NumericStats;
use crate::error::Result;
use polars::prelude::*;

/// Header of the index column in the written table.
pub const VARIABLE_COLUMN: &str = "Variable";

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub variable: String,
    pub stats: NumericStats,
}

/// One row per input column, in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Coerce every column of `df` to numbers and summarise each one.
    ///
    /// Text columns are not skipped: they show up with `N = 0` and empty
    /// statistics.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let rows = df
            .get_columns()
            .iter()
            .map(|col| {
                Ok(SummaryRow {
                    variable: col.name().to_string(),
                    stats: NumericStats::from_column(col)?.rounded(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows })
    }

    pub fn get(&self, variable: &str) -> Option<&NumericStats> {
        self.rows
            .iter()
            .find(|row| row.variable == variable)
            .map(|row| &row.stats)
    }

    /// Lay the table out as `Variable, N, Missing, Mean, Std_Dev, Min, Max`.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let variables: Vec<&str> = self.rows.iter().map(|r| r.variable.as_str()).collect();
        let counts: Vec<u64> = self.rows.iter().map(|r| r.stats.count as u64).collect();
        let missing: Vec<u64> = self.rows.iter().map(|r| r.stats.missing as u64).collect();

        let df = DataFrame::new(vec![
            Column::from(Series::new(VARIABLE_COLUMN.into(), variables)),
            Column::from(Series::new("N".into(), counts)),
            Column::from(Series::new("Missing".into(), missing)),
            Column::from(Series::new("Mean".into(), self.stat(|s| s.mean))),
            Column::from(Series::new("Std_Dev".into(), self.stat(|s| s.std_dev))),
            Column::from(Series::new("Min".into(), self.stat(|s| s.min))),
            Column::from(Series::new("Max".into(), self.stat(|s| s.max))),
        ])?;
        Ok(df)
    }

    fn stat(&self, f: impl Fn(&NumericStats) -> Option<f64>) -> Vec<Option<f64>> {
        self.rows.iter().map(|row| f(&row.stats)).collect()
    }
}
