//! Column-level metadata summary, serialised as JSON.

use super::numeric::NumericStats;
use crate::error::Result;
use polars::prelude::*;
use serde::{Serialize, Serializer};

/// Map that serialises its entries in insertion order.
///
/// Column order carries meaning for the people reading the JSON, so the
/// summary keeps the frame's order rather than sorting keys.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k, v)))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PanelSummary {
    pub n_rows: usize,
    pub n_columns: usize,
    pub columns: Vec<String>,
    pub column_types: OrderedMap<String>,
    pub missing_by_column: OrderedMap<usize>,
    pub nonmissing_by_column: OrderedMap<usize>,
    /// Present only when the frame has at least one numeric column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_summary: Option<NumericSummary>,
}

/// Per-column statistics of the numeric columns, rounded to three decimals.
/// Undefined values serialise as `null`.
#[derive(Debug, Clone, Serialize)]
pub struct NumericSummary {
    pub means: OrderedMap<Option<f64>>,
    pub stds: OrderedMap<Option<f64>>,
    pub mins: OrderedMap<Option<f64>>,
    pub maxs: OrderedMap<Option<f64>>,
}

/// Storage-type label for a column, using the names downstream notebooks expect.
///
/// Integer columns holding nulls are labelled `float64`, the type pandas gives
/// them on read.
pub fn column_label(col: &Column) -> String {
    let dtype = col.dtype();
    if dtype.is_integer() && col.null_count() > 0 {
        "float64".to_owned()
    } else {
        dtype_label(dtype)
    }
}

/// Label for a storage type alone, without looking at the values.
pub fn dtype_label(dtype: &DataType) -> String {
    let label = if dtype.is_integer() {
        "int64"
    } else if dtype.is_float() {
        "float64"
    } else if dtype.is_bool() {
        "bool"
    } else if dtype.is_string() {
        "object"
    } else {
        return dtype.to_string();
    };
    label.to_owned()
}

impl PanelSummary {
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let n_rows = df.height();
        let mut columns = Vec::with_capacity(df.width());
        let mut column_types = Vec::with_capacity(df.width());
        let mut missing = Vec::with_capacity(df.width());
        let mut nonmissing = Vec::with_capacity(df.width());
        let mut numeric: Vec<(String, NumericStats)> = Vec::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            let dtype = col.dtype();

            let nulls = if dtype.is_primitive_numeric() {
                let stats = NumericStats::from_column(col)?;
                numeric.push((name.clone(), stats.rounded()));
                stats.missing
            } else {
                col.null_count()
            };

            columns.push(name.clone());
            column_types.push((name.clone(), column_label(col)));
            missing.push((name.clone(), nulls));
            nonmissing.push((name, n_rows - nulls));
        }

        let numeric_summary = (!numeric.is_empty()).then(|| NumericSummary {
            means: numeric.iter().map(|(n, s)| (n.clone(), s.mean)).collect(),
            stds: numeric.iter().map(|(n, s)| (n.clone(), s.std_dev)).collect(),
            mins: numeric.iter().map(|(n, s)| (n.clone(), s.min)).collect(),
            maxs: numeric.iter().map(|(n, s)| (n.clone(), s.max)).collect(),
        });

        Ok(Self {
            n_rows,
            n_columns: df.width(),
            columns,
            column_types: OrderedMap(column_types),
            missing_by_column: OrderedMap(missing),
            nonmissing_by_column: OrderedMap(nonmissing),
            numeric_summary,
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        DataFrame::new(vec![
            Column::from(Series::new("county_fips".into(), vec![1001_i64, 1003, 1005])),
            Column::from(Series::new("name".into(), vec![Some("Autauga"), None, Some("Barbour")])),
            Column::from(Series::new("income".into(), vec![Some(1.5), None, Some(2.5)])),
            Column::from(Series::new("empty".into(), vec![None::<f64>, None, None])),
        ])
        .unwrap()
    }

    #[test]
    fn test_counts_and_types() {
        let summary = PanelSummary::from_frame(&sample()).unwrap();
        assert_eq!(summary.n_rows, 3);
        assert_eq!(summary.n_columns, 4);
        assert_eq!(summary.columns, vec!["county_fips", "name", "income", "empty"]);
        assert_eq!(summary.column_types.get("county_fips").map(String::as_str), Some("int64"));
        assert_eq!(summary.column_types.get("name").map(String::as_str), Some("object"));
        assert_eq!(summary.column_types.get("income").map(String::as_str), Some("float64"));
        assert_eq!(summary.missing_by_column.get("name"), Some(&1));
        assert_eq!(summary.nonmissing_by_column.get("name"), Some(&2));
        assert_eq!(summary.missing_by_column.get("empty"), Some(&3));
    }

    #[test]
    fn test_integer_column_with_nulls_is_float64() {
        let df = DataFrame::new(vec![
            Column::from(Series::new("year".into(), vec![2019_i64, 2020])),
            Column::from(Series::new("income".into(), vec![Some(10_i64), None])),
        ])
        .unwrap();
        let summary = PanelSummary::from_frame(&df).unwrap();
        assert_eq!(summary.column_types.get("year").map(String::as_str), Some("int64"));
        assert_eq!(summary.column_types.get("income").map(String::as_str), Some("float64"));
    }

    #[test]
    fn test_numeric_summary_only_numeric_columns() {
        let summary = PanelSummary::from_frame(&sample()).unwrap();
        let numeric = summary.numeric_summary.unwrap();
        assert_eq!(numeric.means.len(), 3);
        assert!(numeric.means.get("name").is_none());
        assert_eq!(numeric.means.get("income"), Some(&Some(2.0)));
        assert_eq!(numeric.stds.get("income"), Some(&Some(0.707)));
        assert_eq!(numeric.mins.get("county_fips"), Some(&Some(1001.0)));
        assert_eq!(numeric.maxs.get("empty"), Some(&None));
    }

    #[test]
    fn test_no_numeric_columns_omits_section() {
        let df = DataFrame::new(vec![Column::from(Series::new("name".into(), vec!["a", "b"]))])
            .unwrap();
        let summary = PanelSummary::from_frame(&df).unwrap();
        assert!(summary.numeric_summary.is_none());
        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert!(json.get("numeric_summary").is_none());
    }

    #[test]
    fn test_json_keeps_column_order_and_nulls() {
        let json = PanelSummary::from_frame(&sample()).unwrap().to_json().unwrap();
        let fips = json.find("\"county_fips\": \"int64\"").unwrap();
        let name = json.find("\"name\": \"object\"").unwrap();
        assert!(fips < name, "column order should be preserved");

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["numeric_summary"]["means"]["empty"].is_null());
        assert_eq!(value["n_rows"], 3);
    }
}
