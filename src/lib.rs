//! # county-panel
//!
//! Batch tooling that turns a raw county-year economic panel into an analysis-ready
//! file and two descriptive summaries of it.
//!
//! ```no_run
//! use county_panel::config::DEFAULT_CONFIG;
//! use county_panel::flows;
//! use std::path::Path;
//!
//! # fn example() -> county_panel::error::Result<()> {
//! let dir = Path::new("data");
//! let cleaned = flows::run_clean(dir, &DEFAULT_CONFIG, false)?;
//! println!("{} rows kept", cleaned.rows_after);
//!
//! let (_, summary) = flows::run_summary_json(dir, &DEFAULT_CONFIG)?;
//! println!("{} columns", summary.n_columns);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`panel`]: identifier normalisation, aggregate-row filtering and column renaming
//! - [`summary`]: metadata JSON and per-variable statistics
//! - [`flows`]: the end-to-end jobs behind each subcommand
//! - [`config`]: lookup tables and file names
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing subscriber setup

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod flows;
pub mod logging;
pub mod panel;
pub mod summary;
pub mod utils;
