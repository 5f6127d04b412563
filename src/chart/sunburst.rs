use std::collections::BTreeMap;

use serde::Serialize;

use crate::color::ColorMap;
use crate::data::model::{CellValue, Table};

use super::ChartError;

// ---------------------------------------------------------------------------
// Sunburst spec – two-level hierarchy (phase → process)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstLeaf {
    pub label: String,
    pub value: f64,
    /// Share of the parent phase, in percent.
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstPhase {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub children: Vec<SunburstLeaf>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SunburstSpec {
    pub title: String,
    pub phases: Vec<SunburstPhase>,
    pub total: f64,
}

/// Group rows by `(outer_col, inner_col)`, counting occurrences — the
/// inner ring shows each process's share of its lifecycle phase.
pub fn build(
    title: impl Into<String>,
    table: &Table,
    outer_col: &str,
    inner_col: &str,
    palette: &[&str],
) -> Result<SunburstSpec, ChartError> {
    if table.is_empty() {
        return Err(ChartError::NoData);
    }

    let mut groups: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for row in &table.rows {
        let outer = match row.get(outer_col) {
            Some(CellValue::Null) | None => continue,
            Some(v) => v.to_string(),
        };
        let inner = match row.get(inner_col) {
            Some(CellValue::Null) | None => continue,
            Some(v) => v.to_string(),
        };
        *groups.entry(outer).or_default().entry(inner).or_insert(0.0) += 1.0;
    }

    if groups.is_empty() {
        return Err(ChartError::NoData);
    }

    let colors = ColorMap::from_labels(groups.keys().cloned(), palette);
    let mut total = 0.0;
    let phases: Vec<SunburstPhase> = groups
        .into_iter()
        .map(|(label, children)| {
            let phase_total: f64 = children.values().sum();
            total += phase_total;
            let children = children
                .into_iter()
                .map(|(leaf, value)| SunburstLeaf {
                    label: leaf,
                    value,
                    share_pct: value / phase_total * 100.0,
                })
                .collect();
            SunburstPhase {
                color: colors.hex_for(&label),
                label,
                value: phase_total,
                children,
            }
        })
        .collect();

    Ok(SunburstSpec {
        title: title.into(),
        phases,
        total,
    })
}
