use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use county_panel::config::{DEFAULT_CONFIG, PanelConfig};
use county_panel::flows::{run_clean, run_summary_json, run_summary_stats};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "county-panel",
    about = "Clean and summarise a county-year economic panel"
)]
pub struct Cli {
    /// Working directory holding the panel files
    #[arg(short, long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Path to a JSON configuration file overriding the built-in lookup tables
    #[arg(long, global = true, env = "COUNTY_PANEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write daily log files into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drop aggregate rows, apply the rename map and write the cleaned panel
    Clean {
        /// Overwrite an existing cleaned panel
        #[arg(long)]
        force: bool,
    },
    /// Write the metadata summary of the cleaned panel as JSON
    SummaryJson,
    /// Write per-variable summary statistics of the cleaned panel as CSV
    SummaryStats,
    /// Run clean, summary-json and summary-stats in order
    All {
        /// Overwrite an existing cleaned panel
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration as JSON
    ShowConfig,
}

pub fn run_command(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let dir = cli.dir.as_path();

    match cli.command {
        Commands::Clean { force } => handle_clean(dir, &config, force),
        Commands::SummaryJson => handle_summary_json(dir, &config),
        Commands::SummaryStats => handle_summary_stats(dir, &config),
        Commands::All { force } => {
            handle_clean(dir, &config, force)?;
            handle_summary_json(dir, &config)?;
            handle_summary_stats(dir, &config)
        }
        Commands::ShowConfig => {
            println!("{}", config.to_json()?);
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PanelConfig> {
    match path {
        Some(p) => {
            tracing::info!("Loading config from {}", p.display());
            PanelConfig::from_file(p)
                .with_context(|| format!("Invalid configuration: {}", p.display()))
        }
        None => Ok(DEFAULT_CONFIG.clone()),
    }
}

fn handle_clean(dir: &Path, config: &PanelConfig, force: bool) -> Result<()> {
    let result = run_clean(dir, config, force).context("Cleaning failed")?;

    println!(
        "Cleaned {} -> {} ({} of {} rows kept, {} columns renamed) in {:.2?}",
        result.input.display(),
        result.output.display(),
        result.rows_after,
        result.rows_before,
        result.report.renamed.len(),
        result.duration
    );
    println!("Rename report: {}", result.report_path.display());
    Ok(())
}

fn handle_summary_json(dir: &Path, config: &PanelConfig) -> Result<()> {
    let (path, summary) = run_summary_json(dir, config).context("Summary JSON failed")?;
    println!(
        "Summary JSON saved to {} ({} rows, {} columns)",
        path.display(),
        summary.n_rows,
        summary.n_columns
    );
    Ok(())
}

fn handle_summary_stats(dir: &Path, config: &PanelConfig) -> Result<()> {
    let (path, table) = run_summary_stats(dir, config).context("Summary statistics failed")?;
    println!(
        "Summary statistics saved to {} ({} variables)",
        path.display(),
        table.rows.len()
    );
    Ok(())
}
