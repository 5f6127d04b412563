//! Lifecycle costing/assessment dashboard: schema, preparation, and the
//! chart entry points.  Every chart function is a pure request handler:
//! (prepared table, current selection) in, chart spec out.

use std::collections::BTreeSet;

use anyhow::Result;

use crate::chart::{bar, heatmap, pie, scatter, sunburst, waterfall, ChartError};
use crate::color::{PHASE_COLORS, REFERENCE_FLOW_COLORS, WATERFALL_COLOR};
use crate::data::filter::{self, Predicate, Selection};
use crate::data::loader::ensure_columns;
use crate::data::model::{CellValue, Row, Table};
use crate::data::normalize::normalize_text;

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

pub const COL_SCENARIO: &str = "country";
pub const COL_YEAR: &str = "year";
pub const COL_CAR_TYPE: &str = "cartype";
pub const COL_REFERENCE_FLOW: &str = "referenceflow";
pub const COL_QUANTITY: &str = "quantity";
pub const COL_PHASE: &str = "lifecyclephase";
pub const COL_INDICATOR: &str = "indicator";
pub const COL_PROCESS: &str = "process";

pub const REQUIRED_COLUMNS: &[&str] = &[
    COL_SCENARIO,
    COL_YEAR,
    COL_CAR_TYPE,
    COL_REFERENCE_FLOW,
    COL_QUANTITY,
    COL_PHASE,
    COL_INDICATOR,
    COL_PROCESS,
];

/// Cost workbook: one (group, cost) column pair per lifecycle category.
pub const COST_REQUIRED_COLUMNS: &[&str] = &[
    "hybridm", "kostm", "hybridp", "kostp", "hybridn", "kostn", "hybride", "koste",
];

/// Cost categories in declared waterfall order.
pub const COST_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Material", "hybridm", "kostm"),
    ("Production", "hybridp", "kostp"),
    ("Nutzung", "hybridn", "kostn"),
    ("End-of-Life", "hybride", "koste"),
];

/// The four tracked reference flows and their display names.
pub const TRACKED_FLOWS: &[(&str, &str)] = &[
    ("Bauteil Tür (eingebaut)_Funier-50/50-Stahl", "Bauteil Tür Reference"),
    ("Bauteil Tür (eingebaut)_Stahl A-50/50-Stahl B", "Bauteil Tür Hybrid"),
    ("Serienbauteil Hutprofil (eingebaut)", "Serienbauteil"),
    ("Hybridbauteil Hutprofil (eingebaut)", "Hybridbauteil"),
];

/// Reference-flow pairs compared in the difference scatter.
pub const REFERENCE_PAIRS: &[(&str, &str)] = &[
    (
        "Hybridbauteil Hutprofil (eingebaut)",
        "Serienbauteil Hutprofil (eingebaut)",
    ),
    (
        "Bauteil Tür (eingebaut)_Funier-50/50-Stahl",
        "Bauteil Tür (eingebaut)_Stahl A-50/50-Stahl B",
    ),
];

/// Environmental indicators (normalized), their unit labels, and the
/// abbreviations used on the correlation matrix axes.
pub const INDICATORS: &[(&str, &str, &str)] = &[
    ("carcinogenic effects - total", "CTUh", "CT"),
    ("biogenic", "kg CO2-Eq", "BG"),
    ("climate change - total", "kg CO2-Eq", "CC"),
    ("fossils", "MJ", "FS"),
    ("fossil", "kg CO2-Eq", "FO"),
    ("freshwater and terrestrial acidification", "mol H+-Eq", "FTA"),
    ("freshwater ecotoxicity - total", "CTUe", "FET"),
    ("freshwater eutrophication", "kg P-Eq", "FE"),
    ("ionizing radiation", "kBq U235-Eq", "IR"),
    ("land use", "points", "LU"),
    ("land use and land use change", "kg CO2-Eq", "LUC"),
    ("marine eutrophication", "kg N-Eq", "ME"),
    ("minerals and metals", "kg Sb-Eq", "MM"),
    ("non-carcinogenic effects - total", "CTUh", "NCT"),
    ("ozone layer depletion", "kg CFC-11-Eq", "OLD"),
    ("photochemical ozone creation", "kg NMVOC-Eq", "POC"),
    ("terrestrial eutrophication", "mol N-Eq", "TE"),
    ("water scarcity", "m3 world-Eq deprived", "WS"),
];

pub fn indicator_names() -> Vec<String> {
    INDICATORS.iter().map(|(name, _, _)| name.to_string()).collect()
}

pub fn indicator_abbreviations() -> Vec<String> {
    INDICATORS.iter().map(|(_, _, abbr)| abbr.to_string()).collect()
}

fn indicator_unit(indicator: &str) -> &'static str {
    INDICATORS
        .iter()
        .find(|(name, _, _)| *name == indicator)
        .map(|(_, unit, _)| *unit)
        .unwrap_or("Units")
}

// ---------------------------------------------------------------------------
// Preparation
// ---------------------------------------------------------------------------

/// Validate and normalize the main data sheet: years become integers
/// (thousands separators stripped, unparseable → Null), scenario, car type
/// and indicator text is cleaned for reliable filtering.
pub fn prepare(table: &Table) -> Result<Table> {
    ensure_columns(table, REQUIRED_COLUMNS)?;
    Ok(table.map_rows(|row| {
        let mut row: Row = row.clone();
        if let Some(year) = row.get(COL_YEAR) {
            let coerced = year.as_i64().map_or(CellValue::Null, CellValue::Integer);
            row.insert(COL_YEAR.to_string(), coerced);
        }
        for col in [COL_SCENARIO, COL_CAR_TYPE, COL_INDICATOR] {
            if let Some(CellValue::Text(s)) = row.get(col) {
                let cleaned = CellValue::Text(normalize_text(s));
                row.insert(col.to_string(), cleaned);
            }
        }
        row
    }))
}

/// Validate the cost-analysis workbook.
pub fn prepare_cost(table: &Table) -> Result<Table> {
    ensure_columns(table, COST_REQUIRED_COLUMNS)?;
    Ok(table.clone())
}

/// Restrict a table to the four tracked reference flows.
pub fn tracked_flows_only(table: &Table) -> Table {
    let mut selection = Selection::new();
    selection.insert(
        COL_REFERENCE_FLOW.to_string(),
        Predicate::any_of(
            TRACKED_FLOWS
                .iter()
                .map(|(flow, _)| CellValue::Text(flow.to_string())),
        ),
    );
    filter::apply(table, &selection)
}

// ---------------------------------------------------------------------------
// Chart entry points
// ---------------------------------------------------------------------------

/// Overview bars: summed quantity per tracked reference flow.
pub fn overview_bars(
    filtered: &Table,
    selected_indicators: &BTreeSet<String>,
) -> Result<bar::BarSpec, ChartError> {
    let y_label = selected_indicators
        .iter()
        .next()
        .map(|ind| indicator_unit(ind))
        .unwrap_or("Units");

    let bars: Vec<bar::BarEntry> = TRACKED_FLOWS
        .iter()
        .enumerate()
        .map(|(i, (flow, display))| bar::BarEntry {
            label: display.to_string(),
            value: filtered.sum_where(
                COL_REFERENCE_FLOW,
                &CellValue::Text(flow.to_string()),
                COL_QUANTITY,
            ),
            color: REFERENCE_FLOW_COLORS[i % REFERENCE_FLOW_COLORS.len()].to_string(),
        })
        .collect();

    bar::build(
        "Overview of LifeCycle Costing and Assessment",
        "Reference Flow",
        y_label,
        bars,
    )
}

/// Heatmap of each indicator's percentage share per geographic scenario.
pub fn scenario_heatmap(table: &Table) -> Result<heatmap::HeatmapSpec, ChartError> {
    heatmap::distribution(
        "Heatmap of Indicators by Geographic Scenario",
        table,
        COL_SCENARIO,
        COL_INDICATOR,
        COL_QUANTITY,
        &indicator_names(),
        "Indicator",
        "Scenario",
    )
}

/// Correlation matrix between indicators over (scenario, year, car type)
/// combinations.
pub fn correlation_matrix(filtered: &Table) -> Result<heatmap::HeatmapSpec, ChartError> {
    heatmap::correlation(
        "Correlation Matrix of Indicators",
        filtered,
        &[COL_SCENARIO, COL_YEAR, COL_CAR_TYPE],
        COL_INDICATOR,
        COL_QUANTITY,
        &indicator_names(),
        &indicator_abbreviations(),
        "Indicators",
    )
}

/// Difference in summed quantity between each tracked reference-flow pair,
/// per year and car type, for the first selected indicator.
pub fn flow_difference_scatter(
    table: &Table,
    selected_indicators: &BTreeSet<String>,
) -> Result<scatter::ScatterSpec, ChartError> {
    let indicator = selected_indicators
        .iter()
        .next()
        .ok_or(ChartError::MissingSelection("indicator"))?;

    let mut selection = Selection::new();
    selection.insert(
        COL_INDICATOR.to_string(),
        Predicate::any_of([CellValue::Text(indicator.clone())]),
    );
    let for_indicator = filter::apply(table, &selection);
    if for_indicator.is_empty() {
        return Err(ChartError::NoData);
    }

    let years = filter::available_values(&for_indicator, COL_YEAR);
    let car_types = filter::available_values(&for_indicator, COL_CAR_TYPE);

    let mut points = Vec::new();
    for year in &years {
        for car_type in &car_types {
            let mut cell_selection = Selection::new();
            cell_selection.insert(COL_YEAR.to_string(), Predicate::any_of([year.clone()]));
            cell_selection.insert(
                COL_CAR_TYPE.to_string(),
                Predicate::any_of([car_type.clone()]),
            );
            let cell = filter::apply(&for_indicator, &cell_selection);

            let flows = filter::available_values(&cell, COL_REFERENCE_FLOW);
            for (first, second) in REFERENCE_PAIRS {
                let first_v = CellValue::Text(first.to_string());
                let second_v = CellValue::Text(second.to_string());
                if !flows.contains(&first_v) || !flows.contains(&second_v) {
                    continue;
                }
                let diff = cell.sum_where(COL_REFERENCE_FLOW, &first_v, COL_QUANTITY)
                    - cell.sum_where(COL_REFERENCE_FLOW, &second_v, COL_QUANTITY);
                points.push(scatter::ScatterPoint {
                    category: car_type.to_string(),
                    value: diff,
                    series: year.to_string(),
                    detail: vec![first.to_string(), second.to_string()],
                });
            }
        }
    }

    scatter::build(
        format!("Scatter Plot for Indicator: {}", title_case(indicator)),
        "Car Type",
        "Difference (Quantity)",
        points,
    )
}

/// Waterfall of total cost per lifecycle category, in declared order.
pub fn cost_waterfall(cost: &Table) -> Result<waterfall::WaterfallSpec, ChartError> {
    if cost.is_empty() {
        return Err(ChartError::NoData);
    }
    let entries: Vec<(String, f64)> = COST_CATEGORIES
        .iter()
        .map(|(label, _, cost_col)| (label.to_string(), cost.sum(cost_col)))
        .collect();
    waterfall::build("Detailed Life Cycle Costing", "Total Kosten [€]", &entries, WATERFALL_COLOR)
}

/// Per-group breakdown of one waterfall category.
pub fn cost_breakdown(cost: &Table, category: &str) -> Result<pie::PieSpec, ChartError> {
    let (label, group_col, cost_col) = COST_CATEGORIES
        .iter()
        .find(|(name, _, _)| *name == category)
        .ok_or(ChartError::NoData)?;

    let groups = filter::available_values(cost, group_col);
    let entries: Vec<(String, f64)> = groups
        .iter()
        .filter(|g| **g != CellValue::Null)
        .map(|g| (g.to_string(), cost.sum_where(group_col, g, cost_col)))
        .collect();

    pie::build(format!("{label} Kosten Distribution"), &entries, &[])
}

/// Sunburst of lifecycle phases and the processes within them.
pub fn phase_sunburst(filtered: &Table) -> Result<sunburst::SunburstSpec, ChartError> {
    sunburst::build(
        "Detailed LifeCycle Assessment",
        filtered,
        COL_PHASE,
        COL_PROCESS,
        PHASE_COLORS,
    )
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    fn data_row(
        scenario: &str,
        year: CellValue,
        car_type: &str,
        flow: &str,
        quantity: f64,
        phase: &str,
        indicator: &str,
        process: &str,
    ) -> Row {
        [
            (COL_SCENARIO, text(scenario)),
            (COL_YEAR, year),
            (COL_CAR_TYPE, text(car_type)),
            (COL_REFERENCE_FLOW, text(flow)),
            (COL_QUANTITY, CellValue::Float(quantity)),
            (COL_PHASE, text(phase)),
            (COL_INDICATOR, text(indicator)),
            (COL_PROCESS, text(process)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }

    fn sample_table() -> Table {
        Table::from_rows(vec![
            data_row(
                "Germany  Owner City",
                text("2,020"),
                " BEV ",
                TRACKED_FLOWS[2].0,
                10.0,
                "Production",
                "Climate Change - Total",
                "Stamping",
            ),
            data_row(
                "Germany Owner City",
                CellValue::Integer(2020),
                "BEV",
                TRACKED_FLOWS[3].0,
                4.0,
                "Production",
                "climate change - total",
                "Welding",
            ),
        ])
    }

    #[test]
    fn prepare_coerces_years_and_normalizes_text() {
        let prepared = prepare(&sample_table()).unwrap();
        assert_eq!(prepared.rows[0][COL_YEAR], CellValue::Integer(2020));
        assert_eq!(prepared.rows[0][COL_SCENARIO], text("germany owner city"));
        assert_eq!(prepared.rows[0][COL_CAR_TYPE], text("bev"));
        // Both spellings of the indicator collapse to one distinct value.
        assert_eq!(prepared.unique_values[COL_INDICATOR].len(), 1);
    }

    #[test]
    fn prepare_rejects_missing_columns() {
        let mut row = sample_table().rows[0].clone();
        row.remove(COL_PROCESS);
        row.remove(COL_PHASE);
        let err = prepare(&Table::from_rows(vec![row])).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains(COL_PROCESS) && msg.contains(COL_PHASE), "{msg}");
    }

    #[test]
    fn overview_bars_sum_per_flow_with_unit_label() {
        let prepared = prepare(&sample_table()).unwrap();
        let selected: BTreeSet<String> = ["climate change - total".to_string()].into();
        let spec = overview_bars(&prepared, &selected).unwrap();

        assert_eq!(spec.y_label, "kg CO2-Eq");
        assert_eq!(spec.bars.len(), TRACKED_FLOWS.len());
        assert_eq!(spec.bars[2].value, 10.0);
        assert_eq!(spec.bars[3].value, 4.0);
        assert_eq!(spec.bars[0].value, 0.0);
    }

    #[test]
    fn overview_bars_without_matching_flows_is_no_data() {
        let mut row = sample_table().rows[0].clone();
        row.insert(COL_REFERENCE_FLOW.to_string(), text("something else"));
        let table = prepare(&Table::from_rows(vec![row])).unwrap();
        assert_eq!(overview_bars(&table, &BTreeSet::new()), Err(ChartError::NoData));
    }

    #[test]
    fn scatter_computes_pair_difference_in_declared_order() {
        let table = prepare(&sample_table()).unwrap();
        let selected: BTreeSet<String> = ["climate change - total".to_string()].into();
        let spec = flow_difference_scatter(&table, &selected).unwrap();

        // Hybridbauteil (4.0) minus Serienbauteil (10.0).
        assert_eq!(spec.points.len(), 1);
        assert_eq!(spec.points[0].value, -6.0);
        assert_eq!(spec.points[0].category, "bev");
        assert_eq!(spec.points[0].series, "2020");
    }

    #[test]
    fn scatter_requires_an_indicator_selection() {
        let table = prepare(&sample_table()).unwrap();
        assert_eq!(
            flow_difference_scatter(&table, &BTreeSet::new()),
            Err(ChartError::MissingSelection("indicator"))
        );
    }

    fn cost_row(pairs: &[(&str, CellValue)]) -> Row {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sample_cost_table() -> Table {
        Table::from_rows(vec![
            cost_row(&[
                ("hybridm", text("steel")),
                ("kostm", CellValue::Float(100.0)),
                ("hybridp", text("stamping")),
                ("kostp", CellValue::Float(40.0)),
                ("hybridn", text("fuel")),
                ("kostn", CellValue::Float(-30.0)),
                ("hybride", text("recycling")),
                ("koste", CellValue::Float(20.0)),
            ]),
            cost_row(&[
                ("hybridm", text("veneer")),
                ("kostm", CellValue::Float(50.0)),
                ("hybridp", text("stamping")),
                ("kostp", CellValue::Float(10.0)),
                ("hybridn", text("fuel")),
                ("kostn", CellValue::Float(0.0)),
                ("hybride", text("landfill")),
                ("koste", CellValue::Float(5.0)),
            ]),
        ])
    }

    #[test]
    fn waterfall_uses_declared_category_order() {
        let cost = prepare_cost(&sample_cost_table()).unwrap();
        let spec = cost_waterfall(&cost).unwrap();

        let labels: Vec<&str> = spec.steps.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Material", "Production", "Nutzung", "End-of-Life"]);
        let ends: Vec<f64> = spec.steps.iter().map(|s| s.end).collect();
        assert_eq!(ends, vec![150.0, 200.0, 170.0, 195.0]);
        assert_eq!(spec.total, 195.0);
    }

    #[test]
    fn cost_breakdown_groups_by_category_column() {
        let cost = prepare_cost(&sample_cost_table()).unwrap();
        let spec = cost_breakdown(&cost, "Material").unwrap();
        assert_eq!(spec.slices.len(), 2);
        let steel = spec.slices.iter().find(|s| s.label == "steel").unwrap();
        assert_eq!(steel.value, 100.0);
    }

    #[test]
    fn title_case_capitalizes_words() {
        assert_eq!(title_case("climate change - total"), "Climate Change - Total");
    }
}
