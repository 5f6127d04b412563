use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell.
/// Using `BTreeMap` / `BTreeSet` downstream so `CellValue` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
                Date(_) => 5,
                DateTime(_) => 6,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            (Date(a), Date(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Date(d) => d.hash(state),
            CellValue::DateTime(dt) => dt.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64` for aggregation.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to interpret the value as an `i64`.  Text values may carry
    /// thousands separators ("2,020"), floats must be whole numbers.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            CellValue::Text(s) => s.trim().replace(',', "").parse::<i64>().ok(),
            _ => None,
        }
    }

    /// The calendar day of a date or datetime value.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            CellValue::DateTime(dt) => Some(dt.date()),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Row / Table – the loaded sheet with canonical column names
// ---------------------------------------------------------------------------

/// One sheet row: canonical column name → cell value.
pub type Row = BTreeMap<String, CellValue>;

/// The full loaded table with pre-computed column indices.
///
/// Column names are canonical (see [`super::normalize::canon`]); values are
/// exactly what the loader produced.  Everything downstream (filtering,
/// chart builders) reads this structure.
#[derive(Debug, Clone, Default)]
pub struct Table {
    /// All rows in file order.
    pub rows: Vec<Row>,
    /// Ordered list of canonical column names.
    pub column_names: Vec<String>,
    /// For each column the sorted set of distinct values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Table {
    /// Build column indices from loaded rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut column_names_set: BTreeSet<String> = BTreeSet::new();
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = BTreeMap::new();

        for row in &rows {
            for (col, val) in row {
                column_names_set.insert(col.clone());
                unique_values
                    .entry(col.clone())
                    .or_default()
                    .insert(val.clone());
            }
        }
        let column_names: Vec<String> = column_names_set.into_iter().collect();
        Table {
            rows,
            column_names,
            unique_values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Sum of the numeric values in `value_col` over rows where `key_col`
    /// equals `key`.  Non-numeric cells contribute nothing.
    pub fn sum_where(&self, key_col: &str, key: &CellValue, value_col: &str) -> f64 {
        self.rows
            .iter()
            .filter(|r| r.get(key_col) == Some(key))
            .filter_map(|r| r.get(value_col).and_then(CellValue::as_f64))
            .sum()
    }

    /// Sum of the numeric values in `value_col` over all rows.
    pub fn sum(&self, value_col: &str) -> f64 {
        self.rows
            .iter()
            .filter_map(|r| r.get(value_col).and_then(CellValue::as_f64))
            .sum()
    }

    /// Rebuild the table with a per-row transformation, refreshing the
    /// column index afterwards.
    pub fn map_rows(&self, f: impl Fn(&Row) -> Row) -> Table {
        Table::from_rows(self.rows.iter().map(f).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn from_rows_collects_columns_and_uniques() {
        let table = Table::from_rows(vec![
            row(&[
                ("year", CellValue::Integer(2020)),
                ("cartype", CellValue::Text("bev".into())),
            ]),
            row(&[
                ("year", CellValue::Integer(2030)),
                ("cartype", CellValue::Text("bev".into())),
            ]),
        ]);

        assert_eq!(table.column_names, vec!["cartype", "year"]);
        assert_eq!(table.unique_values["year"].len(), 2);
        assert_eq!(table.unique_values["cartype"].len(), 1);
    }

    #[test]
    fn sum_where_skips_non_numeric() {
        let table = Table::from_rows(vec![
            row(&[
                ("k", CellValue::Text("a".into())),
                ("v", CellValue::Float(1.5)),
            ]),
            row(&[
                ("k", CellValue::Text("a".into())),
                ("v", CellValue::Text("oops".into())),
            ]),
            row(&[
                ("k", CellValue::Text("b".into())),
                ("v", CellValue::Float(9.0)),
            ]),
        ]);
        let key = CellValue::Text("a".into());
        assert_eq!(table.sum_where("k", &key, "v"), 1.5);
        assert_eq!(table.sum("v"), 10.5);
    }

    #[test]
    fn year_coercion_accepts_separators() {
        assert_eq!(CellValue::Text(" 2,020".into()).as_i64(), Some(2020));
        assert_eq!(CellValue::Float(2030.0).as_i64(), Some(2030));
        assert_eq!(CellValue::Float(2030.5).as_i64(), None);
        assert_eq!(CellValue::Text("n/a".into()).as_i64(), None);
    }

    #[test]
    fn ordering_is_total_across_kinds() {
        let mut set = BTreeSet::new();
        set.insert(CellValue::Float(f64::NAN));
        set.insert(CellValue::Float(1.0));
        set.insert(CellValue::Null);
        set.insert(CellValue::Text("z".into()));
        assert_eq!(set.len(), 4);
    }
}
