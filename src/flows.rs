//! End-to-end batch jobs, one per subcommand.
//!
//! Each flow reads its inputs from a working directory, writes its artifacts
//! back there and returns what it produced so the caller can report on it.

use crate::config::PanelConfig;
use crate::error::{PanelError, Result};
use crate::panel::{
    RenameMap, RenameReport, apply_rename, drop_aggregates,
    io::{find_first_existing, read_panel, read_typed_table, save_csv, save_text},
};
use crate::summary::{PanelSummary, SummaryTable};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// What a cleaner run wrote.
#[derive(Debug, Clone)]
pub struct CleanResult {
    pub input: PathBuf,
    pub output: PathBuf,
    pub report_path: PathBuf,
    pub rows_before: usize,
    pub rows_after: usize,
    pub report: RenameReport,
    pub duration: Duration,
}

/// Clean the raw panel in `dir`: drop aggregate rows, apply the rename map,
/// write the renamed panel and the rename report.
///
/// # Errors
///
/// - [`PanelError::OutputExists`] when the cleaned panel exists and `force` is
///   false. Checked before anything is read, so nothing is written.
/// - [`PanelError::MissingInput`] when none of the raw panel candidates exist.
/// - [`PanelError::MissingColumn`] when the panel lacks an identifier or year.
pub fn run_clean(dir: &Path, config: &PanelConfig, force: bool) -> Result<CleanResult> {
    let start = Instant::now();
    let output = dir.join(&config.files.cleaned_panel);
    let report_path = dir.join(&config.files.rename_report);

    if output.exists() && !force {
        return Err(PanelError::OutputExists(output));
    }

    tracing::info!("[STEP 1] Load unrenamed panel…");
    let input = find_first_existing(dir, &config.files.raw_panel).ok_or_else(|| {
        PanelError::MissingInput(format!(
            "no unrenamed panel found in {} (expected {})",
            dir.display(),
            config.files.raw_panel.join(", ")
        ))
    })?;
    let panel = read_panel(&input, config)?;
    tracing::info!(
        "Read {} rows x {} columns from {}",
        panel.height(),
        panel.width(),
        input.display()
    );

    tracing::info!("[STEP 2] Drop aggregates/fake counties…");
    let filtered = drop_aggregates(panel, config)?;
    tracing::info!(
        source = %filtered.fips_source,
        kept = filtered.rows_after(),
        missing = filtered.dropped_missing,
        bad_year = filtered.dropped_bad_year,
        aggregate = filtered.dropped_aggregate,
        "Dropped {} of {} rows",
        filtered.rows_dropped(),
        filtered.rows_before
    );
    let rows_before = filtered.rows_before;

    tracing::info!("[STEP 3] Apply rename map…");
    let map = RenameMap::load(&dir.join(&config.files.rename_map), config);
    let renamed = apply_rename(filtered.df, &map)?;
    let report = renamed.report();
    let mut df = renamed.df;

    save_csv(&mut df, &output)?;
    save_text(&report.render(), &report_path)?;
    tracing::info!("Report written: {}", report_path.display());

    Ok(CleanResult {
        input,
        output,
        report_path,
        rows_before,
        rows_after: df.height(),
        report,
        duration: start.elapsed(),
    })
}

fn cleaned_input(dir: &Path, config: &PanelConfig) -> Result<PathBuf> {
    let input = dir.join(&config.files.cleaned_panel);
    if input.is_file() {
        Ok(input)
    } else {
        Err(PanelError::MissingInput(format!(
            "{} not found; run the cleaner first",
            input.display()
        )))
    }
}

/// Build the metadata JSON for the cleaned panel in `dir`.
pub fn run_summary_json(dir: &Path, config: &PanelConfig) -> Result<(PathBuf, PanelSummary)> {
    let input = cleaned_input(dir, config)?;
    let output = dir.join(&config.files.summary_json);

    tracing::info!("[START] Loading panel: {}", input.display());
    let df = read_typed_table(&input)?;
    let summary = PanelSummary::from_frame(&df)?;
    save_text(&summary.to_json()?, &output)?;

    tracing::info!("[DONE] Summary JSON saved → {}", output.display());
    tracing::info!(
        "Total rows: {}, columns: {}",
        summary.n_rows,
        summary.n_columns
    );
    Ok((output, summary))
}

/// Build the summary-statistics CSV for the cleaned panel in `dir`.
pub fn run_summary_stats(dir: &Path, config: &PanelConfig) -> Result<(PathBuf, SummaryTable)> {
    let input = cleaned_input(dir, config)?;
    let output = dir.join(&config.files.summary_stats);

    tracing::info!("[START] Reading panel from {}", input.display());
    let df = read_typed_table(&input)?;
    tracing::info!("Computing stats for {} columns.", df.width());

    let table = SummaryTable::from_frame(&df)?;
    let mut out = table.to_frame()?;
    save_csv(&mut out, &output)?;

    tracing::info!("[DONE] Summary stats saved → {}", output.display());
    tracing::info!("Variables summarized: {}", table.rows.len());
    Ok((output, table))
}
