use crate::error::{PanelError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Built-in configuration, initialised once and never mutated.
pub static DEFAULT_CONFIG: LazyLock<PanelConfig> = LazyLock::new(PanelConfig::default);

/// Lookup tables and file names that drive the pipeline.
///
/// Everything here is data rather than behaviour: a research group refreshing a
/// different panel can point `--config` at a JSON file instead of patching code.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct PanelConfig {
    /// Cell values read as missing, in addition to empty and whitespace-only cells.
    pub na_tokens: Vec<String>,

    /// Codes that look like counties but denote aggregates or placeholders.
    pub aggregate_fips: Vec<String>,

    /// Candidate identifier headers, first match wins.
    pub fips_columns: Vec<String>,

    /// Exact name of the year column.
    pub year_column: String,

    /// Name given to the canonical identifier column.
    pub county_fips_column: String,

    /// Rename-map header aliases for the source column role.
    pub map_old_columns: Vec<String>,

    /// Rename-map header aliases for the target name role.
    pub map_new_columns: Vec<String>,

    pub files: FileNames,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct FileNames {
    /// Raw panel candidates, checked in order.
    pub raw_panel: Vec<String>,
    pub rename_map: String,
    pub cleaned_panel: String,
    pub rename_report: String,
    pub summary_json: String,
    pub summary_stats: String,
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_owned()).collect()
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            na_tokens: owned(&["(NA)", "NA", "NaN", "D", "*", "...", "", " "]),
            aggregate_fips: owned(&["00000", "00998", "00999", "99999"]),
            fips_columns: owned(&[
                "county_fips",
                "fips",
                "geofips",
                "GeoFIPS",
                "GEOFIPS",
                "GEOID",
            ]),
            year_column: "year".to_owned(),
            county_fips_column: "county_fips".to_owned(),
            map_old_columns: owned(&["old_col", "old", "column", "source"]),
            map_new_columns: owned(&["variable", "new", "pretty_name", "label"]),
            files: FileNames::default(),
        }
    }
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            raw_panel: owned(&[
                "county_panel_full.csv",
                "county_panel.csv",
                "county_panel_unrenamed.csv",
            ]),
            rename_map: "bea_variable_map.csv".to_owned(),
            cleaned_panel: "county_panel_full_renamed.csv".to_owned(),
            rename_report: "rename_report.txt".to_owned(),
            summary_json: "panel_summary.json".to_owned(),
            summary_stats: "summary_statistics.csv".to_owned(),
        }
    }
}

impl PanelConfig {
    /// Load a configuration from a JSON file. Keys left out fall back to the defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config")
    }

    fn validate(&self) -> Result<()> {
        if self.fips_columns.is_empty() {
            return Err(PanelError::Config(
                "fips_columns must name at least one header".to_owned(),
            ));
        }
        if self.year_column.is_empty() || self.county_fips_column.is_empty() {
            return Err(PanelError::Config(
                "year_column and county_fips_column must not be empty".to_owned(),
            ));
        }
        if self.files.raw_panel.is_empty() {
            return Err(PanelError::Config(
                "files.raw_panel must list at least one candidate".to_owned(),
            ));
        }
        Ok(())
    }

    /// True when a raw cell should be read as missing.
    pub fn is_missing_token(&self, value: &str) -> bool {
        value.trim().is_empty() || self.na_tokens.iter().any(|t| t == value)
    }

    pub fn aggregate_set(&self) -> HashSet<&str> {
        self.aggregate_fips.iter().map(String::as_str).collect()
    }
}
