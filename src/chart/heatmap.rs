use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{CellValue, Table};

use super::ChartError;

// ---------------------------------------------------------------------------
// Heatmap spec – shared by the distribution view and the correlation matrix
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    /// Row-major: `values[y][x]`.
    pub values: Vec<Vec<f64>>,
    pub zmin: f64,
    pub zmax: f64,
}

// ---------------------------------------------------------------------------
// Percentage distribution: row dimension × declared series list
// ---------------------------------------------------------------------------

/// For each distinct value of `row_col`, the percentage share every series
/// value contributes to that row's total of `value_col`.  Rows whose total
/// is zero stay at 0 across the board.
pub fn distribution(
    title: impl Into<String>,
    table: &Table,
    row_col: &str,
    series_col: &str,
    value_col: &str,
    series: &[String],
    x_label: impl Into<String>,
    y_label: impl Into<String>,
) -> Result<HeatmapSpec, ChartError> {
    if table.is_empty() {
        return Err(ChartError::NoData);
    }
    if !table.has_column(row_col) {
        return Err(ChartError::MissingColumn(row_col.to_string()));
    }

    let row_values: Vec<CellValue> = table
        .unique_values
        .get(row_col)
        .map(|set| set.iter().cloned().collect())
        .unwrap_or_default();

    let mut values = Vec::with_capacity(row_values.len());
    for rv in &row_values {
        let total = table.sum_where(row_col, rv, value_col);
        let row: Vec<f64> = series
            .iter()
            .map(|s| {
                if total == 0.0 {
                    return 0.0;
                }
                let cell: f64 = table
                    .rows
                    .iter()
                    .filter(|r| {
                        r.get(row_col) == Some(rv)
                            && r.get(series_col).and_then(CellValue::as_text) == Some(s.as_str())
                    })
                    .filter_map(|r| r.get(value_col).and_then(CellValue::as_f64))
                    .sum();
                cell / total * 100.0
            })
            .collect();
        values.push(row);
    }

    Ok(HeatmapSpec {
        title: title.into(),
        x_label: x_label.into(),
        y_label: y_label.into(),
        x_labels: series.to_vec(),
        y_labels: row_values.iter().map(|v| v.to_string()).collect(),
        values,
        zmin: 0.0,
        zmax: 100.0,
    })
}

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Pairwise Pearson correlation between series, computed over a pivot of
/// `value_col` sums keyed by the `group_cols` combination.  Series missing
/// from a group contribute 0.  Zero-variance series correlate as 0.
pub fn correlation(
    title: impl Into<String>,
    table: &Table,
    group_cols: &[&str],
    series_col: &str,
    value_col: &str,
    series: &[String],
    display_labels: &[String],
    axis_label: impl Into<String>,
) -> Result<HeatmapSpec, ChartError> {
    if table.is_empty() {
        return Err(ChartError::NoData);
    }

    // group key → per-series summed value
    let mut pivot: BTreeMap<Vec<CellValue>, BTreeMap<usize, f64>> = BTreeMap::new();
    for row in &table.rows {
        let Some(series_value) = row.get(series_col).and_then(CellValue::as_text) else {
            continue;
        };
        let Some(series_idx) = series.iter().position(|s| s == series_value) else {
            continue;
        };
        let Some(value) = row.get(value_col).and_then(CellValue::as_f64) else {
            continue;
        };
        let key: Vec<CellValue> = group_cols
            .iter()
            .map(|col| row.get(*col).cloned().unwrap_or(CellValue::Null))
            .collect();
        *pivot.entry(key).or_default().entry(series_idx).or_insert(0.0) += value;
    }

    if pivot.is_empty() {
        return Err(ChartError::NoData);
    }

    // Dense column vectors in group-key order.
    let columns: Vec<Vec<f64>> = (0..series.len())
        .map(|idx| {
            pivot
                .values()
                .map(|sums| sums.get(&idx).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    let values: Vec<Vec<f64>> = columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect();

    let axis_label = axis_label.into();
    Ok(HeatmapSpec {
        title: title.into(),
        x_label: axis_label.clone(),
        y_label: axis_label,
        x_labels: display_labels.to_vec(),
        y_labels: display_labels.to_vec(),
        values,
        zmin: -1.0,
        zmax: 1.0,
    })
}

/// Pearson correlation coefficient; 0 when either side has no variance.
fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n == 0 || n != ys.len() {
        return 0.0;
    }
    let nf = n as f64;
    let mean_x = xs.iter().sum::<f64>() / nf;
    let mean_y = ys.iter().sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        0.0
    } else {
        cov / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    #[test]
    fn distribution_shares_sum_to_hundred_per_row() {
        let table = Table::from_rows(vec![
            row(&[("country", text("de")), ("indicator", text("a")), ("quantity", CellValue::Float(30.0))]),
            row(&[("country", text("de")), ("indicator", text("b")), ("quantity", CellValue::Float(70.0))]),
            row(&[("country", text("cn")), ("indicator", text("a")), ("quantity", CellValue::Float(5.0))]),
        ]);
        let series = vec!["a".to_string(), "b".to_string()];
        let spec = distribution(
            "t", &table, "country", "indicator", "quantity", &series, "Indicator", "Scenario",
        )
        .unwrap();

        assert_eq!(spec.y_labels, vec!["cn", "de"]);
        assert_eq!(spec.values[0], vec![100.0, 0.0]);
        assert_eq!(spec.values[1], vec![30.0, 70.0]);
    }

    #[test]
    fn pearson_matches_known_cases() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b: Vec<f64> = a.iter().map(|x| -2.0 * x + 7.0).collect();
        assert!((pearson(&a, &a) - 1.0).abs() < 1e-12);
        assert!((pearson(&a, &b) + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&a, &[5.0, 5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn correlation_pivot_groups_and_fills_zero() {
        // Two groups; series "a" and "b" move together, "c" missing from one group.
        let mut rows = Vec::new();
        for (group, series, value) in [
            ("g1", "a", 1.0),
            ("g1", "b", 10.0),
            ("g2", "a", 2.0),
            ("g2", "b", 20.0),
            ("g2", "c", 5.0),
        ] {
            rows.push(row(&[
                ("country", text(group)),
                ("indicator", text(series)),
                ("quantity", CellValue::Float(value)),
            ]));
        }
        let table = Table::from_rows(rows);
        let series: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let spec = correlation(
            "t", &table, &["country"], "indicator", "quantity", &series, &series, "Indicators",
        )
        .unwrap();

        assert!((spec.values[0][1] - 1.0).abs() < 1e-12);
        assert_eq!(spec.values.len(), 3);
        assert_eq!(spec.zmin, -1.0);
    }

    #[test]
    fn empty_table_is_no_data() {
        let table = Table::default();
        let series = vec!["a".to_string()];
        assert_eq!(
            distribution("t", &table, "country", "indicator", "quantity", &series, "x", "y"),
            Err(ChartError::NoData)
        );
        assert_eq!(
            correlation("t", &table, &["country"], "indicator", "quantity", &series, &series, "x"),
            Err(ChartError::NoData)
        );
    }
}
