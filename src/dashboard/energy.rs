//! Energy-flow dashboard: tolerant column resolution, date coercion, and
//! the Sankey / daily-totals chart entry points.

use anyhow::{bail, Result};
use chrono::{NaiveDate, NaiveDateTime};

use crate::chart::{bar, sankey, ChartError};
use crate::color::{ColorMap, ENERGY_SOURCE_COLORS, MACHINE_COLORS};
use crate::data::filter::{self, Predicate, Selection};
use crate::data::model::{CellValue, Row, Table};

// ---------------------------------------------------------------------------
// Schema – canonical names with accepted alternates per dimension
// ---------------------------------------------------------------------------

const DATE_ALIASES: &[&str] = &["date", "datum"];
const SOURCE_ALIASES: &[&str] = &["source", "energysource", "energiequelle"];
const MACHINE_ALIASES: &[&str] = &["machine", "maschine"];
const VALUE_ALIASES: &[&str] = &["value", "consumption", "verbrauch"];

/// Datetime cell formats tried in order; day-month-year first because that
/// is what the measurement exports use.
const DATETIME_FORMATS: &[&str] = &["%d-%m-%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%d-%m-%Y", "%Y-%m-%d"];

/// Resolved canonical column names of an energy sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyColumns {
    pub date: String,
    pub source: String,
    pub machine: String,
    pub value: String,
}

/// Find each dimension among its accepted canonical spellings.
pub fn resolve_columns(table: &Table) -> Result<EnergyColumns> {
    let find = |aliases: &[&str]| {
        aliases
            .iter()
            .find(|name| table.has_column(name))
            .map(|name| name.to_string())
    };

    match (
        find(DATE_ALIASES),
        find(SOURCE_ALIASES),
        find(MACHINE_ALIASES),
        find(VALUE_ALIASES),
    ) {
        (Some(date), Some(source), Some(machine), Some(value)) => Ok(EnergyColumns {
            date,
            source,
            machine,
            value,
        }),
        (date, source, machine, value) => {
            let mut missing = Vec::new();
            for (col, aliases) in [
                (&date, DATE_ALIASES),
                (&source, SOURCE_ALIASES),
                (&machine, MACHINE_ALIASES),
                (&value, VALUE_ALIASES),
            ] {
                if col.is_none() {
                    missing.push(format!("one of [{}]", aliases.join(", ")));
                }
            }
            bail!(
                "Missing required column(s): {} (found: {})",
                missing.join("; "),
                table.column_names.join(", ")
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Preparation
// ---------------------------------------------------------------------------

/// Validate the sheet and coerce the date column: datetime cells pass
/// through, text is parsed against the known formats, anything else
/// becomes Null rather than failing the load.
pub fn prepare(table: &Table) -> Result<(Table, EnergyColumns)> {
    let columns = resolve_columns(table)?;
    let date_col = columns.date.clone();
    let prepared = table.map_rows(|row| {
        let mut row: Row = row.clone();
        if let Some(value) = row.get(&date_col) {
            let coerced = coerce_date(value);
            row.insert(date_col.clone(), coerced);
        }
        row
    });
    Ok((prepared, columns))
}

fn coerce_date(value: &CellValue) -> CellValue {
    match value {
        CellValue::Date(_) | CellValue::DateTime(_) => value.clone(),
        CellValue::Text(s) => {
            let s = s.trim();
            for fmt in DATETIME_FORMATS {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return CellValue::DateTime(dt);
                }
            }
            for fmt in DATE_FORMATS {
                if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                    return CellValue::Date(d);
                }
            }
            CellValue::Null
        }
        _ => CellValue::Null,
    }
}

/// Distinct calendar days present in the sheet, sorted — drives the date
/// slider.
pub fn available_dates(table: &Table, columns: &EnergyColumns) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = table
        .unique_values
        .get(&columns.date)
        .map(|set| set.iter().filter_map(CellValue::as_date).collect())
        .unwrap_or_default();
    dates.sort_unstable();
    dates.dedup();
    dates
}

// ---------------------------------------------------------------------------
// Chart entry points
// ---------------------------------------------------------------------------

/// Sankey of energy source → machine flows for one calendar day.
pub fn sankey_for_date(
    table: &Table,
    columns: &EnergyColumns,
    date: NaiveDate,
) -> Result<sankey::SankeySpec, ChartError> {
    let flows = table
        .rows
        .iter()
        .filter(|row| {
            row.get(&columns.date)
                .and_then(CellValue::as_date)
                .is_some_and(|d| d == date)
        })
        .filter_map(|row| {
            let source = row.get(&columns.source)?.as_text()?.to_string();
            let machine = row.get(&columns.machine)?.as_text()?.to_string();
            let value = row.get(&columns.value)?.as_f64()?;
            Some((source, machine, value))
        });

    sankey::build(
        format!("Energy Distribution on {}", date.format("%Y-%m-%d")),
        flows,
        ENERGY_SOURCE_COLORS,
        MACHINE_COLORS,
    )
}

/// Total consumption per energy source over an inclusive date range.
pub fn source_totals(
    table: &Table,
    columns: &EnergyColumns,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<bar::BarSpec, ChartError> {
    let mut selection = Selection::new();
    selection.insert(
        columns.date.clone(),
        Predicate::Between(CellValue::Date(from), CellValue::Date(to)),
    );
    let in_range = filter::apply(table, &selection);
    if in_range.is_empty() {
        return Err(ChartError::NoData);
    }

    let sources = filter::available_values(&in_range, &columns.source);
    let labels: Vec<String> = sources
        .iter()
        .filter_map(|s| s.as_text().map(str::to_string))
        .collect();
    let colors = ColorMap::from_labels(labels.clone(), ENERGY_SOURCE_COLORS);

    let bars: Vec<bar::BarEntry> = labels
        .iter()
        .map(|label| bar::BarEntry {
            label: label.clone(),
            value: in_range.sum_where(
                &columns.source,
                &CellValue::Text(label.clone()),
                &columns.value,
            ),
            color: colors.hex_for(label),
        })
        .collect();

    bar::build(
        format!(
            "Total Consumption per Source, {} – {}",
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        ),
        "Energy Source",
        "Consumption",
        bars,
    )
}
