//! Centralized error handling for the county panel pipeline.
//!
//! Errors fall into a small taxonomy that mirrors how a batch run reacts to them:
//!
//! - **Fatal** conditions ([`PanelError::MissingInput`], [`PanelError::MissingColumn`],
//!   [`PanelError::OutputExists`]) stop the run before any artifact is written.
//! - **Data processing** failures wrap errors raised by Polars while reading,
//!   reshaping or writing a frame.
//! - Row- and cell-level data issues are never errors; they are filtered or
//!   coerced to missing by the pipeline stages themselves.
//!
//! ```
//! use county_panel::error::PanelError;
//!
//! fn describe(err: &PanelError) -> &'static str {
//!     match err {
//!         PanelError::MissingInput(_) | PanelError::MissingColumn(_) => "bad input",
//!         PanelError::OutputExists(_) => "refusing to overwrite",
//!         _ => "other",
//!     }
//! }
//! ```
//!
//! The [`ResultExt`] trait adds `.context()` to any result whose error converts
//! into [`PanelError`]:
//!
//! ```no_run
//! use county_panel::error::ResultExt as _;
//!
//! fn load() -> county_panel::error::Result<String> {
//!     std::fs::read_to_string("county_panel_full.csv").context("Failed to read panel")
//! }
//! ```

use std::fmt;
use std::path::PathBuf;

/// Main error type for panel operations.
#[derive(Debug)]
pub enum PanelError {
    /// I/O errors (file operations)
    Io(std::io::Error),

    /// Data processing errors (Polars, parsing, etc.)
    DataProcessing(String),

    /// Configuration errors
    Config(String),

    /// None of the expected input files exist
    MissingInput(String),

    /// A required column is absent from the input table
    MissingColumn(String),

    /// Output already present and overwriting was not requested
    OutputExists(PathBuf),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for PanelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::MissingInput(msg) => write!(f, "Missing input: {msg}"),
            Self::MissingColumn(msg) => write!(f, "Missing column: {msg}"),
            Self::OutputExists(path) => write!(
                f,
                "{} exists; use --force to overwrite",
                path.display()
            ),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PanelError {}

impl From<std::io::Error> for PanelError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<anyhow::Error> for PanelError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

impl From<serde_json::Error> for PanelError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for PanelError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<tempfile::PersistError> for PanelError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}

/// Result type alias for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PanelError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PanelError = e.into();
            PanelError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PanelError = e.into();
            PanelError::Other(format!("{}: {}", f(), err))
        })
    }
}
