use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::color::ColorMap;

use super::ChartError;

// ---------------------------------------------------------------------------
// Sankey spec – energy source → machine flows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNode {
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    /// Index into `nodes`.
    pub source: usize,
    /// Index into `nodes`.
    pub target: usize,
    pub value: f64,
    /// Same color as the source node, so flows stay visually attributable.
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeySpec {
    pub title: String,
    /// Sources (sorted) followed by targets (sorted).
    pub nodes: Vec<SankeyNode>,
    /// Number of leading `nodes` entries that are sources.
    pub source_count: usize,
    pub links: Vec<SankeyLink>,
}

/// Aggregate `(source, target, value)` triples into a Sankey spec: duplicate
/// source/target pairs are summed into one link, node order is sorted
/// sources then sorted targets, and colors come from the fixed palettes
/// keyed by that stable order.
pub fn build(
    title: impl Into<String>,
    flows: impl IntoIterator<Item = (String, String, f64)>,
    source_palette: &[&str],
    target_palette: &[&str],
) -> Result<SankeySpec, ChartError> {
    let mut totals: BTreeMap<(String, String), f64> = BTreeMap::new();
    let mut sources: BTreeSet<String> = BTreeSet::new();
    let mut targets: BTreeSet<String> = BTreeSet::new();

    for (source, target, value) in flows {
        sources.insert(source.clone());
        targets.insert(target.clone());
        *totals.entry((source, target)).or_insert(0.0) += value;
    }

    // Links that aggregate to nothing carry no ribbon.
    totals.retain(|_, value| *value != 0.0);
    if totals.is_empty() {
        return Err(ChartError::NoData);
    }

    let sources: Vec<String> = sources.into_iter().collect();
    let targets: Vec<String> = targets.into_iter().collect();
    let source_colors = ColorMap::from_labels(sources.iter().cloned(), source_palette);
    let target_colors = ColorMap::from_labels(targets.iter().cloned(), target_palette);

    let node_index: BTreeMap<&str, usize> = sources
        .iter()
        .chain(targets.iter())
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let nodes: Vec<SankeyNode> = sources
        .iter()
        .map(|label| SankeyNode {
            label: label.clone(),
            color: source_colors.hex_for(label),
        })
        .chain(targets.iter().map(|label| SankeyNode {
            label: label.clone(),
            color: target_colors.hex_for(label),
        }))
        .collect();

    let links: Vec<SankeyLink> = totals
        .into_iter()
        .map(|((source, target), value)| SankeyLink {
            source: node_index[source.as_str()],
            target: node_index[target.as_str()],
            value,
            color: source_colors.hex_for(&source),
        })
        .collect();

    Ok(SankeySpec {
        title: title.into(),
        nodes,
        source_count: sources.len(),
        links,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ENERGY_SOURCE_COLORS, MACHINE_COLORS};

    fn flow(s: &str, t: &str, v: f64) -> (String, String, f64) {
        (s.to_string(), t.to_string(), v)
    }

    #[test]
    fn duplicate_pairs_aggregate_into_one_link() {
        let spec = build(
            "t",
            vec![
                flow("Gas", "Maschine 1", 5.0),
                flow("Gas", "Maschine 1", 3.0),
                flow("Oel", "Maschine 2", 1.0),
            ],
            ENERGY_SOURCE_COLORS,
            MACHINE_COLORS,
        )
        .unwrap();

        assert_eq!(spec.links.len(), 2);
        let gas_link = &spec.links[0];
        assert_eq!(gas_link.value, 8.0);
        assert_eq!(spec.nodes[gas_link.source].label, "Gas");
        assert_eq!(spec.nodes[gas_link.target].label, "Maschine 1");
    }

    #[test]
    fn nodes_are_sorted_sources_then_sorted_targets() {
        let spec = build(
            "t",
            vec![
                flow("Oel", "Maschine 2", 1.0),
                flow("Gas", "Maschine 1", 1.0),
            ],
            ENERGY_SOURCE_COLORS,
            MACHINE_COLORS,
        )
        .unwrap();

        let labels: Vec<&str> = spec.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["Gas", "Oel", "Maschine 1", "Maschine 2"]);
        assert_eq!(spec.source_count, 2);
        assert_eq!(spec.nodes[0].color, ENERGY_SOURCE_COLORS[0]);
        assert_eq!(spec.nodes[2].color, MACHINE_COLORS[0]);
    }

    #[test]
    fn links_inherit_their_source_color() {
        let spec = build(
            "t",
            vec![flow("Gas", "Maschine 1", 2.0)],
            ENERGY_SOURCE_COLORS,
            MACHINE_COLORS,
        )
        .unwrap();
        assert_eq!(spec.links[0].color, spec.nodes[spec.links[0].source].color);
    }

    #[test]
    fn zero_flows_are_no_data() {
        assert_eq!(
            build("t", vec![flow("Gas", "M", 0.0)], ENERGY_SOURCE_COLORS, MACHINE_COLORS),
            Err(ChartError::NoData)
        );
        assert_eq!(
            build("t", Vec::new(), ENERGY_SOURCE_COLORS, MACHINE_COLORS),
            Err(ChartError::NoData)
        );
    }
}
