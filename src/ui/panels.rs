use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::DatePickerButton;

use crate::dashboard::{energy, lifecycle};
use crate::data::loader;
use crate::state::{DetailView, EnergyState, LifecycleState, LIFECYCLE_DIMENSIONS};

// ---------------------------------------------------------------------------
// Top bars
// ---------------------------------------------------------------------------

/// Render the lifecycle dashboard's top menu / toolbar.
pub fn lifecycle_top_bar(ui: &mut Ui, state: &mut LifecycleState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data sheet…").clicked() {
                open_lifecycle_data(state);
                ui.close_menu();
            }
            if ui.button("Open cost sheet…").clicked() {
                open_lifecycle_cost(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows loaded, {} pass filters",
                table.len(),
                state.visible_indices.len()
            ));
        }

        status_label(ui, &state.status_message);
    });
}

/// Render the energy dashboard's top menu / toolbar.
pub fn energy_top_bar(ui: &mut Ui, state: &mut EnergyState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open consumption sheet…").clicked() {
                open_energy_data(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            ui.label(format!(
                "{} rows loaded, {} days",
                table.len(),
                state.dates.len()
            ));
        }

        status_label(ui, &state.status_message);
    });
}

fn status_label(ui: &mut Ui, message: &Option<String>) {
    if let Some(msg) = message {
        ui.separator();
        ui.label(RichText::new(msg).color(Color32::RED));
    }
}

// ---------------------------------------------------------------------------
// Side panels
// ---------------------------------------------------------------------------

/// Render the lifecycle filter panel: one checkbox multiselect per
/// dimension, values derived from the loaded sheet, plus the detail-view
/// toggles.
pub fn lifecycle_side_panel(ui: &mut Ui, state: &mut LifecycleState) {
    ui.heading("Selection Filters");
    ui.separator();

    // Clone what we need so we can mutate state inside the loop.
    let unique = match &state.table {
        Some(table) => table.unique_values.clone(),
        None => {
            ui.label("No data sheet loaded.");
            return;
        }
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (col, label) in LIFECYCLE_DIMENSIONS {
                let Some(all_values) = unique.get(*col) else {
                    continue;
                };

                // An empty selection means "any"; say so in the header.
                let n_selected = state.filters.get(*col).map_or(0, |s| s.len());
                let header_text = if n_selected == 0 {
                    format!("{label}  (any)")
                } else {
                    format!("{label}  ({n_selected} selected)")
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        if ui.small_button("Clear").clicked() {
                            state.clear_filter(col);
                        }

                        let selected = state.filters.entry(col.to_string()).or_default();
                        for val in all_values {
                            let mut checked = selected.contains(val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                if checked {
                                    selected.insert(val.clone());
                                } else {
                                    selected.remove(val);
                                }
                            }
                        }
                    });
            }

            ui.separator();
            ui.strong("Detail views");
            for (view, label) in [
                (DetailView::Costing, "Detailed Life Cycle Costing"),
                (DetailView::Assessment, "Detailed LifeCycle Assessment"),
                (DetailView::Correlation, "Correlation Matrix"),
            ] {
                if ui.selectable_label(state.view == view, label).clicked() {
                    state.toggle_view(view);
                }
            }
        });

    // Recompute visible indices after any checkbox changes.
    state.refilter();
}

/// Render the energy filter panel: the day slider for the Sankey and the
/// inclusive date range for the totals chart.
pub fn energy_side_panel(ui: &mut Ui, state: &mut EnergyState) {
    ui.heading("Select Date");
    ui.separator();

    if state.dates.is_empty() {
        ui.label("No consumption sheet loaded.");
        return;
    }

    let max_index = state.dates.len() - 1;
    ui.add(Slider::new(&mut state.date_index, 0..=max_index).show_value(false));
    if let Some(date) = state.selected_date() {
        ui.label(date.format("%Y-%m-%d").to_string());
    }

    ui.separator();
    ui.strong("Totals range");
    if let (Some(mut from), Some(mut to)) = (state.range_from, state.range_to) {
        ui.horizontal(|ui: &mut Ui| {
            ui.label("From");
            ui.add(DatePickerButton::new(&mut from).id_salt("range_from"));
        });
        ui.horizontal(|ui: &mut Ui| {
            ui.label("To");
            ui.add(DatePickerButton::new(&mut to).id_salt("range_to"));
        });
        if to < from {
            std::mem::swap(&mut from, &mut to);
        }
        state.range_from = Some(from);
        state.range_to = Some(to);
    }
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_spreadsheet(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["xlsx", "xls", "csv", "json"])
        .add_filter("Excel", &["xlsx", "xls"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .pick_file()
}

pub fn open_lifecycle_data(state: &mut LifecycleState) {
    let Some(path) = pick_spreadsheet("Open lifecycle data sheet") else {
        return;
    };
    match loader::load_file(&path).and_then(|t| lifecycle::prepare(&t)) {
        Ok(table) => {
            log::info!(
                "Loaded {} rows with columns {:?}",
                table.len(),
                table.column_names
            );
            state.set_table(table);
        }
        Err(e) => {
            log::error!("Failed to load data sheet: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn open_lifecycle_cost(state: &mut LifecycleState) {
    let Some(path) = pick_spreadsheet("Open cost analysis sheet") else {
        return;
    };
    match loader::load_file(&path).and_then(|t| lifecycle::prepare_cost(&t)) {
        Ok(table) => {
            log::info!("Loaded cost sheet with {} rows", table.len());
            state.set_cost_table(table);
        }
        Err(e) => {
            log::error!("Failed to load cost sheet: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn open_energy_data(state: &mut EnergyState) {
    let Some(path) = pick_spreadsheet("Open energy consumption sheet") else {
        return;
    };
    match loader::load_file(&path).and_then(|t| energy::prepare(&t)) {
        Ok((table, columns)) => {
            log::info!(
                "Loaded {} rows, {} distinct days",
                table.len(),
                energy::available_dates(&table, &columns).len()
            );
            state.set_table(table, columns);
        }
        Err(e) => {
            log::error!("Failed to load consumption sheet: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
