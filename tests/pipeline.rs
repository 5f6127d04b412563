//! End-to-end pipeline tests: workbook bytes → loader → prepare → filter →
//! chart specs.  Workbooks are built in memory, so the tests exercise the
//! same code path as a real upload without fixture files.

use std::collections::BTreeSet;
use std::io::Cursor;

use chrono::NaiveDate;
use lcview::chart::ChartError;
use lcview::dashboard::{energy, lifecycle};
use lcview::data::filter::{self, Predicate, Selection};
use lcview::data::loader;
use lcview::data::model::{CellValue, Table};
use rust_xlsxwriter::Workbook;

// ---------------------------------------------------------------------------
// In-memory workbooks
// ---------------------------------------------------------------------------

const SERIEN: &str = "Serienbauteil Hutprofil (eingebaut)";
const HYBRID: &str = "Hybridbauteil Hutprofil (eingebaut)";

fn lifecycle_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let headers = [
        "Country", "Year", "Car Type", "ReferenceFlow", "Quantity",
        "LifeCyclePhase", "Indicator", "Process",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    // Messy formatting on purpose: doubled spaces, a "2,020" year string,
    // mixed indicator casing.
    let rows: Vec<(&str, &str, &str, &str, f64, &str, &str, &str)> = vec![
        ("Germany  Owner City", "2,020", " BEV ", SERIEN, 10.0, "Production", "Climate Change - Total", "Stamping"),
        ("Germany Owner City", "2020", "BEV", HYBRID, 4.0, "Production", "climate change - total", "Welding"),
        ("China Shuttle", "2030", "Diesel", SERIEN, 7.0, "Nutzung", "Land Use", "Driving"),
        ("China Shuttle", "2030", "Diesel", HYBRID, 6.0, "End-of-Life", "land use", "Recycling"),
    ];
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.0).unwrap();
        sheet.write_string(r, 1, row.1).unwrap();
        sheet.write_string(r, 2, row.2).unwrap();
        sheet.write_string(r, 3, row.3).unwrap();
        sheet.write_number(r, 4, row.4).unwrap();
        sheet.write_string(r, 5, row.5).unwrap();
        sheet.write_string(r, 6, row.6).unwrap();
        sheet.write_string(r, 7, row.7).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

fn cost_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    let headers = [
        "Hybrid_M", "KostM", "Hybrid_P", "KostP", "Hybrid_N", "KostN", "Hybrid_E", "KostE",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    let rows: Vec<(&str, f64, &str, f64, &str, f64, &str, f64)> = vec![
        ("Steel", 100.0, "Stamping", 40.0, "Fuel", 25.0, "Recycling credit", -30.0),
        ("Veneer", 50.0, "Welding", 10.0, "Maintenance", 5.0, "Landfill", 20.0),
    ];
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.0).unwrap();
        sheet.write_number(r, 1, row.1).unwrap();
        sheet.write_string(r, 2, row.2).unwrap();
        sheet.write_number(r, 3, row.3).unwrap();
        sheet.write_string(r, 4, row.4).unwrap();
        sheet.write_number(r, 5, row.5).unwrap();
        sheet.write_string(r, 6, row.6).unwrap();
        sheet.write_number(r, 7, row.7).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

fn energy_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in ["Datum", "Energiequelle", "Maschine", "Verbrauch"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    let rows: Vec<(&str, &str, &str, f64)> = vec![
        ("01-03-2024 06:00:00", "Gas", "Maschine 1", 5.0),
        ("01-03-2024 14:00:00", "Gas", "Maschine 1", 3.0),
        ("01-03-2024 06:00:00", "Oel", "Maschine 2", 2.5),
        ("02-03-2024 06:00:00", "Gas", "Maschine 1", 7.0),
    ];
    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.0).unwrap();
        sheet.write_string(r, 1, row.1).unwrap();
        sheet.write_string(r, 2, row.2).unwrap();
        sheet.write_number(r, 3, row.3).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

fn load(bytes: Vec<u8>) -> Table {
    loader::load_xlsx_reader(Cursor::new(bytes)).unwrap()
}

// ---------------------------------------------------------------------------
// Lifecycle pipeline
// ---------------------------------------------------------------------------

fn climate_selection() -> (Selection, BTreeSet<String>) {
    let mut selection = Selection::new();
    selection.insert(
        lifecycle::COL_INDICATOR.to_string(),
        Predicate::any_of([CellValue::Text("climate change - total".into())]),
    );
    let indicators: BTreeSet<String> = ["climate change - total".to_string()].into();
    (selection, indicators)
}

/// One full lifecycle render pass, serialized.
fn lifecycle_render(
    table: &Table,
    selection: &Selection,
    indicators: &BTreeSet<String>,
) -> String {
    let filtered = filter::apply(table, selection);
    let flows = lifecycle::tracked_flows_only(&filtered);
    serde_json::to_string(&(
        lifecycle::overview_bars(&flows, indicators).ok(),
        lifecycle::scenario_heatmap(&filtered).ok(),
        lifecycle::correlation_matrix(&flows).ok(),
        lifecycle::flow_difference_scatter(table, indicators).ok(),
        lifecycle::phase_sunburst(&flows).ok(),
    ))
    .unwrap()
}

#[test]
fn lifecycle_pipeline_from_workbook_bytes() {
    let table = lifecycle::prepare(&load(lifecycle_workbook())).unwrap();
    let (selection, indicators) = climate_selection();

    let filtered = filter::apply(&table, &selection);
    assert_eq!(filtered.len(), 2);

    let flows = lifecycle::tracked_flows_only(&filtered);
    let bars = lifecycle::overview_bars(&flows, &indicators).unwrap();
    assert_eq!(bars.y_label, "kg CO2-Eq");
    let serien = bars.bars.iter().find(|b| b.label == "Serienbauteil").unwrap();
    assert_eq!(serien.value, 10.0);

    // Messy year/scenario spellings collapsed into single filter options.
    let years = filter::available_values(&table, lifecycle::COL_YEAR);
    assert!(years.contains(&CellValue::Integer(2020)));
    let scenarios = filter::available_values(&table, lifecycle::COL_SCENARIO);
    assert!(scenarios.contains(&CellValue::Text("germany owner city".into())));
    assert_eq!(scenarios.len(), 2);
}

#[test]
fn identical_input_renders_byte_identical_specs() {
    let (selection, indicators) = climate_selection();

    let first = {
        let table = lifecycle::prepare(&load(lifecycle_workbook())).unwrap();
        lifecycle_render(&table, &selection, &indicators)
    };
    let second = {
        let table = lifecycle::prepare(&load(lifecycle_workbook())).unwrap();
        lifecycle_render(&table, &selection, &indicators)
    };
    assert_eq!(first, second);
}

#[test]
fn filters_that_exclude_everything_yield_no_data_not_a_crash() {
    let table = lifecycle::prepare(&load(lifecycle_workbook())).unwrap();

    let mut selection = Selection::new();
    selection.insert(
        lifecycle::COL_SCENARIO.to_string(),
        Predicate::any_of([CellValue::Text("mars colony".into())]),
    );
    let filtered = filter::apply(&table, &selection);
    assert!(filtered.is_empty());

    let flows = lifecycle::tracked_flows_only(&filtered);
    let indicators: BTreeSet<String> = ["land use".to_string()].into();

    assert_eq!(
        lifecycle::overview_bars(&flows, &indicators),
        Err(ChartError::NoData)
    );
    assert_eq!(
        lifecycle::scenario_heatmap(&filtered),
        Err(ChartError::NoData)
    );
    assert_eq!(
        lifecycle::correlation_matrix(&flows),
        Err(ChartError::NoData)
    );
    assert_eq!(
        lifecycle::phase_sunburst(&flows),
        Err(ChartError::NoData)
    );
    assert_eq!(
        lifecycle::flow_difference_scatter(&filtered, &indicators),
        Err(ChartError::NoData)
    );
    assert_eq!(
        lifecycle::cost_waterfall(&Table::default()),
        Err(ChartError::NoData)
    );
}

#[test]
fn unset_dimensions_pass_through_in_the_full_pipeline() {
    let table = lifecycle::prepare(&load(lifecycle_workbook())).unwrap();

    let mut only_year = Selection::new();
    only_year.insert(
        lifecycle::COL_YEAR.to_string(),
        Predicate::any_of([CellValue::Integer(2030)]),
    );

    // Adding empty sets for the other dimensions must not change anything.
    let mut with_empty_sets = only_year.clone();
    for col in [lifecycle::COL_SCENARIO, lifecycle::COL_CAR_TYPE, lifecycle::COL_INDICATOR] {
        with_empty_sets.insert(col.to_string(), Predicate::any_of([]));
    }

    assert_eq!(
        filter::filtered_indices(&table, &only_year),
        filter::filtered_indices(&table, &with_empty_sets)
    );
    assert_eq!(filter::filtered_indices(&table, &only_year), vec![2, 3]);
}

#[test]
fn cost_workbook_drives_waterfall_and_breakdown() {
    let cost = lifecycle::prepare_cost(&load(cost_workbook())).unwrap();

    let waterfall = lifecycle::cost_waterfall(&cost).unwrap();
    let labels: Vec<&str> = waterfall.steps.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Material", "Production", "Nutzung", "End-of-Life"]);
    assert_eq!(waterfall.steps[0].end, 150.0);
    // End-of-Life nets to -10 even though one row is positive.
    assert_eq!(waterfall.steps[3].delta, -10.0);
    assert_eq!(waterfall.total, 150.0 + 50.0 + 30.0 - 10.0);

    let pie = lifecycle::cost_breakdown(&cost, "Material").unwrap();
    assert_eq!(pie.slices.len(), 2);
    assert_eq!(pie.total, 150.0);
}

// ---------------------------------------------------------------------------
// Energy pipeline
// ---------------------------------------------------------------------------

#[test]
fn energy_pipeline_from_workbook_bytes() {
    let (table, columns) = energy::prepare(&load(energy_workbook())).unwrap();
    let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

    let spec = energy::sankey_for_date(&table, &columns, day).unwrap();
    assert_eq!(spec.links.len(), 2);
    let gas = spec
        .links
        .iter()
        .find(|l| spec.nodes[l.source].label == "Gas")
        .unwrap();
    assert_eq!(gas.value, 8.0);

    // Determinism across a full reload.
    let (table2, columns2) = energy::prepare(&load(energy_workbook())).unwrap();
    let spec2 = energy::sankey_for_date(&table2, &columns2, day).unwrap();
    assert_eq!(
        serde_json::to_string(&spec).unwrap(),
        serde_json::to_string(&spec2).unwrap()
    );
}

#[test]
fn energy_no_data_paths() {
    let (table, columns) = energy::prepare(&load(energy_workbook())).unwrap();

    let absent = NaiveDate::from_ymd_opt(1999, 1, 1).unwrap();
    assert_eq!(
        energy::sankey_for_date(&table, &columns, absent),
        Err(ChartError::NoData)
    );
    assert_eq!(
        energy::source_totals(&table, &columns, absent, absent),
        Err(ChartError::NoData)
    );
}
