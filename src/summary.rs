//! Descriptive summaries of the cleaned panel.
//!
//! Two views are produced from the same file:
//!
//! - [`metadata::PanelSummary`]: storage types, missing counts and, for numeric
//!   columns, mean/std/min/max. Written as JSON.
//! - [`stats::SummaryTable`]: every column coerced to numbers, one row of
//!   N/Missing/Mean/Std_Dev/Min/Max per variable. Written as CSV.

pub mod metadata;
pub mod numeric;
pub mod stats;

pub use metadata::{NumericSummary, OrderedMap, PanelSummary, column_label, dtype_label};
pub use numeric::NumericStats;
pub use stats::{SummaryRow, SummaryTable};
