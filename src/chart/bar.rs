use serde::Serialize;

use super::ChartError;

// ---------------------------------------------------------------------------
// Bar chart spec
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub label: String,
    pub value: f64,
    /// "#rrggbb"
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Bars in caller-declared order.
    pub bars: Vec<BarEntry>,
}

/// Assemble a bar spec.  No entries, or entries that sum to exactly zero,
/// count as "no data" — a row of invisible bars is not a chart.
pub fn build(
    title: impl Into<String>,
    x_label: impl Into<String>,
    y_label: impl Into<String>,
    bars: Vec<BarEntry>,
) -> Result<BarSpec, ChartError> {
    if bars.is_empty() || bars.iter().all(|b| b.value == 0.0) {
        return Err(ChartError::NoData);
    }
    Ok(BarSpec {
        title: title.into(),
        x_label: x_label.into(),
        y_label: y_label.into(),
        bars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, value: f64) -> BarEntry {
        BarEntry {
            label: label.into(),
            value,
            color: "#f57600".into(),
        }
    }

    #[test]
    fn keeps_declared_order() {
        let spec = build("t", "x", "y", vec![entry("b", 2.0), entry("a", 1.0)]).unwrap();
        let labels: Vec<&str> = spec.bars.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a"]);
    }

    #[test]
    fn all_zero_is_no_data() {
        assert_eq!(
            build("t", "x", "y", vec![entry("a", 0.0), entry("b", 0.0)]),
            Err(ChartError::NoData)
        );
        assert_eq!(build("t", "x", "y", vec![]), Err(ChartError::NoData));
    }
}
