//! CSV input and output for the panel files.
//!
//! Two read modes exist because the stages want different things from the
//! same format:
//!
//! - [`read_panel`] and [`read_text_table`] keep every column as text. The
//!   cleaner needs identifiers such as `01001` verbatim, and the missing-value
//!   tokens are matched against the raw cell contents.
//! - [`read_typed_table`] lets Polars infer types from the whole file. The
//!   summarisers work on the cleaned panel and want numbers as numbers.
//!
//! All writes go through [`write_atomic`]: the data lands in a temporary file
//! next to the target, is synced, and is then renamed over it. Readers never
//! observe a half-written artifact and a failed run leaves the previous file
//! in place.

use crate::config::PanelConfig;
use crate::error::{Result, ResultExt as _};
use polars::prelude::*;
use std::io::Write as _;
use std::path::{Path, PathBuf};

/// Return the first candidate file that exists under `dir`.
pub fn find_first_existing(dir: &Path, candidates: &[String]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

/// Read a panel CSV with every column kept as text.
///
/// Cells matching one of the configured missing tokens (or holding only
/// whitespace) come back as nulls.
pub fn read_panel(path: &Path, config: &PanelConfig) -> Result<DataFrame> {
    let df = read_text_table(path)?;
    mask_missing_tokens(&df, config)
}

/// Read a CSV without type inference: every column is a `String` column.
pub fn read_text_table(path: &Path) -> Result<DataFrame> {
    LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()
        .and_then(LazyFrame::collect)
        .with_context(|| format!("Failed to read CSV: {}", path.display()))
}

/// Read a CSV letting Polars infer column types from the whole file.
///
/// A column with no values at all is typed `Float64`: inference has nothing to
/// go on and would otherwise leave it as text, hiding it from numeric summaries.
pub fn read_typed_table(path: &Path) -> Result<DataFrame> {
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(None)
        .finish()
        .and_then(LazyFrame::collect)
        .with_context(|| format!("Failed to read CSV: {}", path.display()))?;
    promote_empty_columns(df)
}

fn promote_empty_columns(mut df: DataFrame) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df);
    }
    let empty: Vec<String> = df
        .get_columns()
        .iter()
        .filter(|col| col.dtype().is_string() && col.null_count() == col.len())
        .map(|col| col.name().to_string())
        .collect();

    for name in empty {
        let promoted = df
            .column(&name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        df.with_column(promoted)?;
    }
    Ok(df)
}

pub fn mask_missing_tokens(df: &DataFrame, config: &PanelConfig) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|col| {
            let series = col.as_materialized_series().cast(&DataType::String)?;
            let values: Vec<Option<&str>> = series
                .str()?
                .into_iter()
                .map(|v| v.filter(|s| !config.is_missing_token(s)))
                .collect();
            Ok(Column::from(Series::new(col.name().clone(), values)))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DataFrame::new(columns)?)
}

/// Write `df` as CSV with a header row.
pub fn save_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    write_atomic(path, |file| {
        CsvWriter::new(file)
            .include_header(true)
            .finish(df)
            .context("Failed to write CSV file")
    })
}

pub fn save_text(text: &str, path: &Path) -> Result<()> {
    write_atomic(path, |file| {
        file.write_all(text.as_bytes())
            .context("Failed to write text file")
    })
}

/// Write through a temporary file in the destination directory, then move it
/// into place. A failure part-way leaves any existing file at `path` untouched.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut std::fs::File) -> Result<()>,
{
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    write(tmp.as_file_mut())?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}
