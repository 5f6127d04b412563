use serde::Serialize;

use super::ChartError;

// ---------------------------------------------------------------------------
// Waterfall chart spec
// ---------------------------------------------------------------------------

/// One waterfall segment: a signed delta floating from `start` to `end`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallStep {
    pub label: String,
    pub delta: f64,
    /// Running total before this step.
    pub start: f64,
    /// Running total after this step.
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaterfallSpec {
    pub title: String,
    pub y_label: String,
    /// Steps in declared category order — never sorted by value.
    pub steps: Vec<WaterfallStep>,
    /// Final cumulative total; equals the sum of all deltas.
    pub total: f64,
    pub color: String,
}

/// Build a waterfall from `(label, delta)` entries in declared order,
/// computing the running cumulative total left to right.
pub fn build(
    title: impl Into<String>,
    y_label: impl Into<String>,
    entries: &[(String, f64)],
    color: &str,
) -> Result<WaterfallSpec, ChartError> {
    if entries.is_empty() {
        return Err(ChartError::NoData);
    }

    let mut running = 0.0;
    let steps = entries
        .iter()
        .map(|(label, delta)| {
            let start = running;
            running += delta;
            WaterfallStep {
                label: label.clone(),
                delta: *delta,
                start,
                end: running,
            }
        })
        .collect();

    Ok(WaterfallSpec {
        title: title.into(),
        y_label: y_label.into(),
        steps,
        total: running,
        color: color.to_string(),
    })
}
