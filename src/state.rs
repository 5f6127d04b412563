use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::dashboard::energy::{self, EnergyColumns};
use crate::dashboard::lifecycle;
use crate::data::filter::{filtered_indices, Predicate, Selection};
use crate::data::model::{CellValue, Table};

// ---------------------------------------------------------------------------
// Lifecycle dashboard state
// ---------------------------------------------------------------------------

/// Which detail view is expanded below the overview charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailView {
    #[default]
    None,
    Costing,
    Assessment,
    Correlation,
}

/// Dimensions the lifecycle side panel offers as checkbox multiselects.
pub const LIFECYCLE_DIMENSIONS: &[(&str, &str)] = &[
    (lifecycle::COL_SCENARIO, "Geographic Scenario"),
    (lifecycle::COL_YEAR, "Year"),
    (lifecycle::COL_CAR_TYPE, "Car Type"),
    (lifecycle::COL_INDICATOR, "Indicator"),
];

/// The full lifecycle-dashboard UI state, independent of rendering.
#[derive(Default)]
pub struct LifecycleState {
    /// Prepared data sheet (None until the user loads a file).
    pub table: Option<Table>,

    /// Prepared cost-analysis sheet for the waterfall view.
    pub cost_table: Option<Table>,

    /// Checked values per dimension.  An empty set is "no restriction" —
    /// the dashboards show everything until the user narrows down.
    pub filters: BTreeMap<String, BTreeSet<CellValue>>,

    /// Indices of rows passing the current filters (cached for the top bar).
    pub visible_indices: Vec<usize>,

    /// Currently expanded detail view.
    pub view: DetailView,

    /// Waterfall category whose breakdown pie is shown.
    pub breakdown_category: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl LifecycleState {
    /// Ingest a newly prepared data sheet and reset the filters.
    pub fn set_table(&mut self, table: Table) {
        self.filters = LIFECYCLE_DIMENSIONS
            .iter()
            .map(|(col, _)| (col.to_string(), BTreeSet::new()))
            .collect();
        self.visible_indices = (0..table.len()).collect();
        self.table = Some(table);
        self.status_message = None;
    }

    pub fn set_cost_table(&mut self, table: Table) {
        self.cost_table = Some(table);
        self.status_message = None;
    }

    /// The current filter selection as predicates.
    pub fn selection(&self) -> Selection {
        self.filters
            .iter()
            .map(|(col, set)| (col.clone(), Predicate::AnyOf(set.clone())))
            .collect()
    }

    /// Selection restricted to the year and car-type dimensions — the
    /// scenario heatmap ignores the other filters.
    pub fn year_car_type_selection(&self) -> Selection {
        self.filters
            .iter()
            .filter(|(col, _)| {
                col.as_str() == lifecycle::COL_YEAR || col.as_str() == lifecycle::COL_CAR_TYPE
            })
            .map(|(col, set)| (col.clone(), Predicate::AnyOf(set.clone())))
            .collect()
    }

    /// Whether both the year and car-type dimensions are narrowed down;
    /// gates the scenario heatmap.
    pub fn year_and_car_type_selected(&self) -> bool {
        [lifecycle::COL_YEAR, lifecycle::COL_CAR_TYPE]
            .iter()
            .all(|col| self.filters.get(*col).is_some_and(|set| !set.is_empty()))
    }

    /// Indicator values currently checked, as plain strings.
    pub fn selected_indicators(&self) -> BTreeSet<String> {
        self.filters
            .get(lifecycle::COL_INDICATOR)
            .map(|set| set.iter().map(|v| v.to_string()).collect())
            .unwrap_or_default()
    }

    /// Recompute `visible_indices` after a filter change.
    pub fn refilter(&mut self) {
        if let Some(table) = &self.table {
            self.visible_indices = filtered_indices(table, &self.selection());
        }
    }

    /// Toggle a single value in a dimension's filter.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let selected = self.filters.entry(column.to_string()).or_default();
        if selected.contains(value) {
            selected.remove(value);
        } else {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Reset one dimension to "no restriction".
    pub fn clear_filter(&mut self, column: &str) {
        self.filters.insert(column.to_string(), BTreeSet::new());
        self.refilter();
    }

    /// Flip a detail view open or closed; views are mutually exclusive.
    pub fn toggle_view(&mut self, view: DetailView) {
        self.view = if self.view == view { DetailView::None } else { view };
    }
}

// ---------------------------------------------------------------------------
// Energy dashboard state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct EnergyState {
    /// Prepared sheet with coerced dates.
    pub table: Option<Table>,

    /// Resolved canonical column names.
    pub columns: Option<EnergyColumns>,

    /// Distinct days in the sheet, sorted; the slider indexes into this.
    pub dates: Vec<NaiveDate>,
    pub date_index: usize,

    /// Inclusive range for the per-source totals chart.
    pub range_from: Option<NaiveDate>,
    pub range_to: Option<NaiveDate>,

    pub status_message: Option<String>,
}

impl EnergyState {
    /// Ingest a newly prepared sheet: derive the selectable days and
    /// default the range to the full span.
    pub fn set_table(&mut self, table: Table, columns: EnergyColumns) {
        self.dates = energy::available_dates(&table, &columns);
        self.date_index = 0;
        self.range_from = self.dates.first().copied();
        self.range_to = self.dates.last().copied();
        self.table = Some(table);
        self.columns = Some(columns);
        self.status_message = None;
    }

    /// The day the slider currently points at.
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.dates.get(self.date_index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.into())
    }

    fn lifecycle_table() -> Table {
        let row = |scenario: &str, year: i64| -> Row {
            [
                (lifecycle::COL_SCENARIO.to_string(), text(scenario)),
                (lifecycle::COL_YEAR.to_string(), CellValue::Integer(year)),
                (lifecycle::COL_CAR_TYPE.to_string(), text("bev")),
                (lifecycle::COL_INDICATOR.to_string(), text("land use")),
            ]
            .into_iter()
            .collect()
        };
        Table::from_rows(vec![
            row("germany owner city", 2020),
            row("china shuttle", 2030),
        ])
    }

    #[test]
    fn fresh_table_shows_every_row() {
        let mut state = LifecycleState::default();
        state.set_table(lifecycle_table());
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert!(!state.year_and_car_type_selected());
    }

    #[test]
    fn toggle_narrows_and_clear_restores() {
        let mut state = LifecycleState::default();
        state.set_table(lifecycle_table());

        state.toggle_filter_value(lifecycle::COL_YEAR, &CellValue::Integer(2020));
        assert_eq!(state.visible_indices, vec![0]);

        // Toggling the same value off returns to pass-through, not to empty.
        state.toggle_filter_value(lifecycle::COL_YEAR, &CellValue::Integer(2020));
        assert_eq!(state.visible_indices, vec![0, 1]);

        state.toggle_filter_value(lifecycle::COL_SCENARIO, &text("china shuttle"));
        assert_eq!(state.visible_indices, vec![1]);
        state.clear_filter(lifecycle::COL_SCENARIO);
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn detail_views_are_mutually_exclusive() {
        let mut state = LifecycleState::default();
        state.toggle_view(DetailView::Costing);
        assert_eq!(state.view, DetailView::Costing);
        state.toggle_view(DetailView::Assessment);
        assert_eq!(state.view, DetailView::Assessment);
        state.toggle_view(DetailView::Assessment);
        assert_eq!(state.view, DetailView::None);
    }
}
