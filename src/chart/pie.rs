use serde::Serialize;

use crate::color::ColorMap;

use super::ChartError;

// ---------------------------------------------------------------------------
// Pie spec – breakdown of one waterfall category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSpec {
    pub title: String,
    pub slices: Vec<PieSlice>,
    pub total: f64,
}

/// Build a pie from `(label, value)` entries.  Non-positive slices are
/// dropped (they have no area); an empty or all-zero breakdown is no data.
pub fn build(
    title: impl Into<String>,
    entries: &[(String, f64)],
    palette: &[&str],
) -> Result<PieSpec, ChartError> {
    let kept: Vec<&(String, f64)> = entries.iter().filter(|(_, v)| *v > 0.0).collect();
    if kept.is_empty() {
        return Err(ChartError::NoData);
    }

    let colors = ColorMap::from_labels(kept.iter().map(|(l, _)| l.clone()), palette);
    let slices: Vec<PieSlice> = kept
        .iter()
        .map(|(label, value)| PieSlice {
            label: label.clone(),
            value: *value,
            color: colors.hex_for(label),
        })
        .collect();
    let total = slices.iter().map(|s| s.value).sum();

    Ok(PieSpec {
        title: title.into(),
        slices,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::MACHINE_COLORS;

    #[test]
    fn drops_non_positive_slices() {
        let entries = vec![
            ("steel".to_string(), 40.0),
            ("scrap credit".to_string(), -5.0),
            ("paint".to_string(), 0.0),
            ("labor".to_string(), 60.0),
        ];
        let spec = build("t", &entries, MACHINE_COLORS).unwrap();
        assert_eq!(spec.slices.len(), 2);
        assert_eq!(spec.total, 100.0);
    }

    #[test]
    fn all_zero_is_no_data() {
        let entries = vec![("a".to_string(), 0.0)];
        assert_eq!(build("t", &entries, MACHINE_COLORS), Err(ChartError::NoData));
    }
}
