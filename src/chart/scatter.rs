use serde::Serialize;

use super::ChartError;

// ---------------------------------------------------------------------------
// Scatter spec – categorical x axis, one marker series per label
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    /// Categorical x position (e.g. a car type).
    pub category: String,
    pub value: f64,
    /// Series the point belongs to (e.g. a year); colored per series.
    pub series: String,
    /// Extra hover context lines.
    pub detail: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ScatterPoint>,
}

pub fn build(
    title: impl Into<String>,
    x_label: impl Into<String>,
    y_label: impl Into<String>,
    points: Vec<ScatterPoint>,
) -> Result<ScatterSpec, ChartError> {
    if points.is_empty() {
        return Err(ChartError::NoData);
    }
    Ok(ScatterSpec {
        title: title.into(),
        x_label: x_label.into(),
        y_label: y_label.into(),
        points,
    })
}

impl ScatterSpec {
    /// Distinct categories in first-appearance order (x axis positions).
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for p in &self.points {
            if !seen.contains(&p.category.as_str()) {
                seen.push(p.category.as_str());
            }
        }
        seen
    }

    /// Distinct series labels in first-appearance order.
    pub fn series(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for p in &self.points {
            if !seen.contains(&p.series.as_str()) {
                seen.push(p.series.as_str());
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_no_data() {
        assert_eq!(build("t", "x", "y", vec![]), Err(ChartError::NoData));
    }

    #[test]
    fn categories_and_series_keep_first_appearance_order() {
        let point = |category: &str, series: &str| ScatterPoint {
            category: category.into(),
            value: 1.0,
            series: series.into(),
            detail: vec![],
        };
        let spec = build(
            "t",
            "x",
            "y",
            vec![point("bev", "2030"), point("diesel", "2020"), point("bev", "2020")],
        )
        .unwrap();
        assert_eq!(spec.categories(), vec!["bev", "diesel"]);
        assert_eq!(spec.series(), vec!["2030", "2020"]);
    }
}
