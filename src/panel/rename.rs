//! Column renaming driven by an external lookup table.
//!
//! Source extracts use terse line codes such as `CAINC1_1`. A two-column
//! mapping file pairs each code with a readable variable name; the header of
//! each role may be any of the configured aliases (`old_col`/`old`/... and
//! `variable`/`new`/...).
//!
//! Renaming never fails a run. A missing or unreadable map, or one without
//! recognised headers, gives an empty [`RenameMap`] and the panel keeps its
//! names. Rows with a missing key or value are ignored, and an entry whose
//! target is already the name of a column that stays put is skipped with a
//! warning. The column count is therefore the same before and after.
//!
//! ```
//! use county_panel::panel::rename::{RenameMap, apply_rename};
//! use polars::prelude::*;
//!
//! let df = df!("CAINC1_1" => [1, 2], "year" => [2019, 2020]).unwrap();
//! let map = RenameMap::from_pairs([("CAINC1_1", "personal_income")]);
//! let outcome = apply_rename(df, &map).unwrap();
//! assert_eq!(outcome.columns_after, vec!["personal_income", "year"]);
//! ```

use super::io::{column_names, read_text_table};
use crate::config::PanelConfig;
use crate::error::{PanelError, Result};
use polars::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Maximum number of `old -> new` pairs listed in the report.
pub const REPORT_EXAMPLES: usize = 15;

/// Mapping from raw source column name to a readable variable name.
///
/// Keys are unique; a later entry for the same key replaces the earlier value
/// but keeps the key's original position, which only matters for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl RenameMap {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = Self::default();
        for (old, new) in pairs {
            map.insert(old.into(), new.into());
        }
        map
    }

    fn insert(&mut self, old: String, new: String) {
        if let Some(&pos) = self.index.get(&old) {
            if let Some(entry) = self.entries.get_mut(pos) {
                entry.1 = new;
            }
        } else {
            self.index.insert(old.clone(), self.entries.len());
            self.entries.push((old, new));
        }
    }

    /// Load the rename map from `path`.
    ///
    /// A missing file, an unreadable file or unrecognised headers all yield an
    /// empty map, which turns the rename step into a no-op.
    pub fn load(path: &Path, config: &PanelConfig) -> Self {
        if !path.is_file() {
            tracing::info!("{} not found; skipping rename", path.display());
            return Self::default();
        }

        let df = match read_text_table(path) {
            Ok(df) => df,
            Err(e) => {
                tracing::warn!("Could not read rename map {}: {e}", path.display());
                return Self::default();
            }
        };

        match Self::from_frame(&df, config) {
            Ok(Some(map)) => {
                tracing::info!("Loaded {} rename entries from {}", map.len(), path.display());
                map
            }
            Ok(None) => {
                tracing::warn!(
                    "Mapping headers missing; expected ({}, {}). Got {:?}.",
                    config.map_old_columns.first().map_or("old_col", String::as_str),
                    config.map_new_columns.first().map_or("variable", String::as_str),
                    column_names(&df)
                );
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Malformed rename map {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Build a map from a two-role table. Returns `None` when either role has
    /// no matching header.
    pub fn from_frame(df: &DataFrame, config: &PanelConfig) -> Result<Option<Self>> {
        let pick = |aliases: &[String]| {
            aliases
                .iter()
                .find(|name| df.column(name.as_str()).is_ok())
                .cloned()
        };
        let (Some(old_key), Some(new_key)) =
            (pick(&config.map_old_columns), pick(&config.map_new_columns))
        else {
            return Ok(None);
        };

        let old = df
            .column(&old_key)?
            .as_materialized_series()
            .cast(&DataType::String)?;
        let new = df
            .column(&new_key)?
            .as_materialized_series()
            .cast(&DataType::String)?;

        fn present<'a>(v: Option<&'a str>, config: &PanelConfig) -> Option<&'a str> {
            v.filter(|s| !config.is_missing_token(s))
        }
        let pairs = old
            .str()?
            .into_iter()
            .zip(new.str()?)
            .filter_map(|(o, n)| Some((present(o, config)?, present(n, config)?)));

        Ok(Some(Self::from_pairs(pairs)))
    }

    pub fn get(&self, old: &str) -> Option<&str> {
        self.index
            .get(old)
            .and_then(|&pos| self.entries.get(pos))
            .map(|(_, new)| new.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(o, n)| (o.as_str(), n.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose key names one of `columns`, in map order.
    pub fn subset_for(&self, columns: &[String]) -> Self {
        let present: HashSet<&str> = columns.iter().map(String::as_str).collect();
        Self::from_pairs(
            self.iter()
                .filter(|(old, _)| present.contains(old))
                .map(|(o, n)| (o.to_owned(), n.to_owned())),
        )
    }

    fn without(&self, key: &str) -> Self {
        Self::from_pairs(
            self.iter()
                .filter(|(old, _)| *old != key)
                .map(|(o, n)| (o.to_owned(), n.to_owned())),
        )
    }

    /// Entries of `self` that can be applied to `columns` without producing a
    /// duplicate label.
    ///
    /// A target is free when no column keeps that name after the pass. Entries
    /// are claimed in map order; a loser keeps its old label, which can in turn
    /// block a later entry, so resolution repeats until nothing is dropped.
    pub fn without_collisions(&self, columns: &[String]) -> Self {
        let mut applied = self.subset_for(columns);
        loop {
            let rejected = {
                let renamed_away: HashSet<&str> = applied.iter().map(|(old, _)| old).collect();
                let mut taken: HashSet<&str> = columns
                    .iter()
                    .map(String::as_str)
                    .filter(|c| !renamed_away.contains(c))
                    .collect();

                applied
                    .iter()
                    .find(|&(_, new)| !taken.insert(new))
                    .map(|(old, new)| (old.to_owned(), new.to_owned()))
            };

            match rejected {
                None => return applied,
                Some((old, new)) => {
                    tracing::warn!("Skipping rename {old} -> {new}: '{new}' is already a column");
                    applied = applied.without(&old);
                }
            }
        }
    }
}

/// Outcome of applying a [`RenameMap`] to a frame.
#[derive(Debug, Clone)]
pub struct RenameOutcome {
    pub df: DataFrame,
    /// The entries that matched an existing column.
    pub applied: RenameMap,
    pub columns_before: Vec<String>,
    pub columns_after: Vec<String>,
}

impl RenameOutcome {
    pub fn report(&self) -> RenameReport {
        RenameReport {
            columns_before: self.columns_before.len(),
            columns_after: self.columns_after.len(),
            renamed: self
                .applied
                .iter()
                .map(|(o, n)| (o.to_owned(), n.to_owned()))
                .collect(),
        }
    }
}

/// Relabel matched columns. Unmatched map entries are ignored and the column
/// count never changes.
///
/// An entry whose target is already taken by a column that keeps its name is
/// skipped with a warning and left out of [`RenameOutcome::applied`]; the other
/// entries still apply.
pub fn apply_rename(df: DataFrame, map: &RenameMap) -> Result<RenameOutcome> {
    let columns_before = column_names(&df);
    let applied = map.without_collisions(&columns_before);

    let df = if applied.is_empty() {
        df
    } else {
        let columns = df
            .get_columns()
            .iter()
            .map(|col| {
                let mut series = col.as_materialized_series().clone();
                if let Some(new) = applied.get(col.name().as_str()) {
                    series.rename(new.into());
                }
                Column::from(series)
            })
            .collect();
        DataFrame::new(columns).map_err(|e| {
            PanelError::DataProcessing(format!("rename produced an invalid table: {e}"))
        })?
    };

    let columns_after = column_names(&df);
    Ok(RenameOutcome {
        df,
        applied,
        columns_before,
        columns_after,
    })
}

/// Plain-text summary of a rename pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameReport {
    pub columns_before: usize,
    pub columns_after: usize,
    pub renamed: Vec<(String, String)>,
}

impl RenameReport {
    pub fn render(&self) -> String {
        let mut lines = vec![
            "=== Rename Report ===".to_owned(),
            format!("Columns before: {}", self.columns_before),
            format!("Columns after : {}", self.columns_after),
            format!("Columns renamed (exact): {}", self.renamed.len()),
        ];
        if !self.renamed.is_empty() {
            lines.push("Examples:".to_owned());
            lines.extend(
                self.renamed
                    .iter()
                    .take(REPORT_EXAMPLES)
                    .map(|(old, new)| format!("  {old} -> {new}")),
            );
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_CONFIG;

    fn frame(names: &[&str]) -> DataFrame {
        let columns = names
            .iter()
            .map(|name| Column::from(Series::new((*name).into(), vec![Some("1"), None])))
            .collect();
        DataFrame::new(columns).unwrap()
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let map = RenameMap::from_pairs([("a", "first"), ("b", "bee"), ("a", "second")]);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some("second"));
        let keys: Vec<&str> = map.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn test_apply_renames_only_matches() {
        let df = frame(&["county_fips", "year", "CAINC1_1"]);
        let map = RenameMap::from_pairs([("CAINC1_1", "personal_income"), ("missing", "nope")]);

        let outcome = apply_rename(df, &map).unwrap();
        assert_eq!(outcome.columns_after, vec!["county_fips", "year", "personal_income"]);
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.columns_before.len(), outcome.columns_after.len());
    }

    #[test]
    fn test_apply_unmatched_map_is_noop() {
        let df = frame(&["a", "b"]);
        let map = RenameMap::from_pairs([("x", "y")]);
        let outcome = apply_rename(df, &map).unwrap();
        assert_eq!(outcome.columns_after, vec!["a", "b"]);
        assert!(outcome.applied.is_empty());
    }

    #[test]
    fn test_apply_swap_is_order_independent() {
        let df = frame(&["a", "b"]);
        let map = RenameMap::from_pairs([("a", "b"), ("b", "a")]);
        let outcome = apply_rename(df, &map).unwrap();
        assert_eq!(outcome.columns_after, vec!["b", "a"]);
    }

    #[test]
    fn test_apply_skips_target_that_is_already_a_column() {
        let df = frame(&["GeoFIPS", "year", "CAINC1_1", "county_fips"]);
        let map = RenameMap::from_pairs([
            ("GeoFIPS", "county_fips"),
            ("CAINC1_1", "personal_income"),
        ]);

        let outcome = apply_rename(df, &map).unwrap();
        assert_eq!(
            outcome.columns_after,
            vec!["GeoFIPS", "year", "personal_income", "county_fips"]
        );
        assert_eq!(outcome.applied.len(), 1);
        assert_eq!(outcome.applied.get("GeoFIPS"), None);
        assert_eq!(outcome.report().renamed.len(), 1);
    }

    #[test]
    fn test_apply_two_entries_same_target_keeps_first() {
        let df = frame(&["a", "b", "c"]);
        // b loses to a and keeps its label, so c -> b must be dropped too.
        let map = RenameMap::from_pairs([("a", "x"), ("b", "x"), ("c", "b")]);

        let outcome = apply_rename(df, &map).unwrap();
        assert_eq!(outcome.columns_after, vec!["x", "b", "c"]);
        assert_eq!(outcome.applied.len(), 1);
    }

    #[test]
    fn test_from_frame_drops_missing_tokens() {
        let df = DataFrame::new(vec![
            Column::from(Series::new(
                "old_col".into(),
                vec!["CAINC1_1", "CAINC1_3", "NA", "CAINC4_99"],
            )),
            Column::from(Series::new(
                "variable".into(),
                vec!["NA", "(NA)", "ghost", "wages"],
            )),
        ])
        .unwrap();

        let map = RenameMap::from_frame(&df, &DEFAULT_CONFIG).unwrap().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("CAINC1_1"), None);
        assert_eq!(map.get("CAINC1_3"), None);
        assert_eq!(map.get("CAINC4_99"), Some("wages"));
    }

    #[test]
    fn test_from_frame_aliases_and_missing_cells() {
        let df = DataFrame::new(vec![
            Column::from(Series::new("source".into(), vec![Some("a"), Some("b"), None, Some("c")])),
            Column::from(Series::new("label".into(), vec![Some("A"), Some(" "), Some("X"), Some("C")])),
        ])
        .unwrap();

        let map = RenameMap::from_frame(&df, &DEFAULT_CONFIG).unwrap().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some("A"));
        assert_eq!(map.get("b"), None);
        assert_eq!(map.get("c"), Some("C"));
    }

    #[test]
    fn test_from_frame_alias_priority() {
        let df = DataFrame::new(vec![
            Column::from(Series::new("old".into(), vec!["from_old"])),
            Column::from(Series::new("old_col".into(), vec!["from_old_col"])),
            Column::from(Series::new("variable".into(), vec!["v"])),
        ])
        .unwrap();
        let map = RenameMap::from_frame(&df, &DEFAULT_CONFIG).unwrap().unwrap();
        assert_eq!(map.get("from_old_col"), Some("v"));
    }

    #[test]
    fn test_from_frame_unknown_headers() {
        let df = frame(&["from", "to"]);
        assert!(RenameMap::from_frame(&df, &DEFAULT_CONFIG).unwrap().is_none());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let map = RenameMap::load(&dir.path().join("bea_variable_map.csv"), &DEFAULT_CONFIG);
        assert!(map.is_empty());
    }

    #[test]
    fn test_load_bad_headers_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bea_variable_map.csv");
        std::fs::write(&path, "from,to\na,b\n").unwrap();
        assert!(RenameMap::load(&path, &DEFAULT_CONFIG).is_empty());
    }

    #[test]
    fn test_report_render() {
        let report = RenameReport {
            columns_before: 3,
            columns_after: 3,
            renamed: vec![("CAINC1_1".to_owned(), "personal_income".to_owned())],
        };
        assert_eq!(
            report.render(),
            "=== Rename Report ===\nColumns before: 3\nColumns after : 3\n\
             Columns renamed (exact): 1\nExamples:\n  CAINC1_1 -> personal_income"
        );
    }

    #[test]
    fn test_report_caps_examples() {
        let renamed = (0..20)
            .map(|i| (format!("c{i}"), format!("v{i}")))
            .collect();
        let report = RenameReport {
            columns_before: 20,
            columns_after: 20,
            renamed,
        };
        let text = report.render();
        assert!(text.contains("Columns renamed (exact): 20"));
        assert_eq!(text.matches(" -> ").count(), REPORT_EXAMPLES);
    }

    #[test]
    fn test_report_without_renames_has_no_examples() {
        let report = RenameReport {
            columns_before: 2,
            columns_after: 2,
            renamed: Vec::new(),
        };
        assert!(!report.render().contains("Examples:"));
    }
}
