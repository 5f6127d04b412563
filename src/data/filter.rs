use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Filter predicates: what the user selected per dimension
// ---------------------------------------------------------------------------

/// Row predicate for one dimension.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Categorical membership.  An empty set means "no restriction",
    /// not "match nothing" — leaving a dimension unselected must pass
    /// every row through.
    AnyOf(BTreeSet<CellValue>),
    /// Inclusive range, for years and dates.
    Between(CellValue, CellValue),
}

impl Predicate {
    pub fn any_of<I: IntoIterator<Item = CellValue>>(values: I) -> Self {
        Predicate::AnyOf(values.into_iter().collect())
    }

    /// Whether this predicate restricts anything at all.
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Predicate::AnyOf(set) if set.is_empty())
    }

    fn matches(&self, value: Option<&CellValue>) -> bool {
        match self {
            Predicate::AnyOf(selected) => {
                if selected.is_empty() {
                    return true;
                }
                match value {
                    Some(v) => selected.contains(v),
                    None => selected.contains(&CellValue::Null),
                }
            }
            Predicate::Between(lo, hi) => match value {
                Some(v) => in_range(v, lo, hi),
                None => false,
            },
        }
    }
}

/// Inclusive range check.  Numeric values compare numerically regardless of
/// integer/float representation; otherwise only values of the same kind as
/// the bounds are comparable.
fn in_range(value: &CellValue, lo: &CellValue, hi: &CellValue) -> bool {
    if let (Some(v), Some(l), Some(h)) = (value.as_f64(), lo.as_f64(), hi.as_f64()) {
        return v >= l && v <= h;
    }
    if let (Some(v), Some(l), Some(h)) = (value.as_date(), lo.as_date(), hi.as_date()) {
        return v >= l && v <= h;
    }
    std::mem::discriminant(value) == std::mem::discriminant(lo)
        && std::mem::discriminant(value) == std::mem::discriminant(hi)
        && value >= lo
        && value <= hi
}

/// Per-dimension selection state: canonical column name → predicate.
/// A dimension absent from the map is unrestricted.
pub type Selection = BTreeMap<String, Predicate>;

// ---------------------------------------------------------------------------
// Applying a selection
// ---------------------------------------------------------------------------

/// Distinct values of one column, sorted — populates selection widgets.
pub fn available_values(table: &Table, column: &str) -> BTreeSet<CellValue> {
    table.unique_values.get(column).cloned().unwrap_or_default()
}

/// Indices of rows passing every predicate in the selection.
pub fn filtered_indices(table: &Table, selection: &Selection) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            selection
                .iter()
                .all(|(col, pred)| pred.matches(row.get(col)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// The filtered table itself, recomputed from scratch per interaction.
pub fn apply(table: &Table, selection: &Selection) -> Table {
    let rows = filtered_indices(table, selection)
        .into_iter()
        .map(|i| table.rows[i].clone())
        .collect();
    Table::from_rows(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    fn sample_table() -> Table {
        let mut rows = Vec::new();
        for (scenario, year, cartype) in [
            ("germany owner city", 2020, "bev"),
            ("germany owner city", 2030, "diesel"),
            ("china shuttle", 2020, "bev"),
            ("china shuttle", 2040, "fcev"),
        ] {
            let mut row = std::collections::BTreeMap::new();
            row.insert("country".to_string(), text(scenario));
            row.insert("year".to_string(), CellValue::Integer(year));
            row.insert("cartype".to_string(), text(cartype));
            rows.push(row);
        }
        Table::from_rows(rows)
    }

    #[test]
    fn unset_dimension_passes_everything_through() {
        let table = sample_table();

        // Only car type restricted; scenario/year untouched.
        let mut selection = Selection::new();
        selection.insert("cartype".into(), Predicate::any_of([text("bev")]));
        let only_cartype = filtered_indices(&table, &selection);

        // Same selection plus an *empty* scenario set must not change the result.
        selection.insert("country".into(), Predicate::any_of([]));
        assert_eq!(filtered_indices(&table, &selection), only_cartype);
        assert_eq!(only_cartype, vec![0, 2]);
    }

    #[test]
    fn empty_selection_is_identity() {
        let table = sample_table();
        assert_eq!(
            filtered_indices(&table, &Selection::new()),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn categorical_and_range_combine() {
        let table = sample_table();
        let mut selection = Selection::new();
        selection.insert("cartype".into(), Predicate::any_of([text("bev")]));
        selection.insert(
            "year".into(),
            Predicate::Between(CellValue::Integer(2020), CellValue::Integer(2020)),
        );
        assert_eq!(filtered_indices(&table, &selection), vec![0, 2]);
    }

    #[test]
    fn between_is_inclusive_and_mixed_numeric() {
        let lo = CellValue::Integer(2020);
        let hi = CellValue::Integer(2040);
        assert!(in_range(&CellValue::Float(2020.0), &lo, &hi));
        assert!(in_range(&CellValue::Float(2040.0), &lo, &hi));
        assert!(!in_range(&CellValue::Float(2040.5), &lo, &hi));
        assert!(!in_range(&text("2020"), &lo, &hi));
    }

    #[test]
    fn between_on_dates_spans_datetime_cells() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        let lo = CellValue::Date(d(2024, 1, 1));
        let hi = CellValue::Date(d(2024, 1, 31));
        let inside = CellValue::DateTime(d(2024, 1, 15).and_hms_opt(13, 30, 0).unwrap());
        let outside = CellValue::Date(d(2024, 2, 1));
        assert!(in_range(&inside, &lo, &hi));
        assert!(!in_range(&outside, &lo, &hi));
    }

    #[test]
    fn apply_rebuilds_unique_values() {
        let table = sample_table();
        let mut selection = Selection::new();
        selection.insert("year".into(), Predicate::any_of([CellValue::Integer(2020)]));
        let filtered = apply(&table, &selection);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.unique_values["cartype"].len(), 1);
    }
}
