use eframe::egui::{self, ScrollArea, Ui};

use crate::chart::ChartError;
use crate::dashboard::{energy, lifecycle};
use crate::data::filter;
use crate::state::{DetailView, EnergyState, LifecycleState};
use crate::ui::{self, heatmap, panels, plot, sankey, sunburst};

// ---------------------------------------------------------------------------
// eframe App implementations
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct LifecycleApp {
    pub state: LifecycleState,
}

impl eframe::App for LifecycleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::lifecycle_top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters and detail-view toggles ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::lifecycle_side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            lifecycle_central(ui, &mut self.state);
        });
    }
}

#[derive(Default)]
pub struct EnergyApp {
    pub state: EnergyState,
}

impl eframe::App for EnergyApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::energy_top_bar(ui, &mut self.state);
        });

        egui::SidePanel::left("date_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::energy_side_panel(ui, &mut self.state);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            energy_central(ui, &mut self.state);
        });
    }
}

// ---------------------------------------------------------------------------
// Central panel composition – one full pipeline run per frame
// ---------------------------------------------------------------------------

fn show<T>(ui: &mut Ui, result: Result<T, ChartError>, render: impl FnOnce(&mut Ui, &T)) {
    match result {
        Ok(spec) => render(ui, &spec),
        Err(err) => ui::chart_message(ui, &err),
    }
}

fn lifecycle_central(ui: &mut Ui, state: &mut LifecycleState) {
    let Some(table) = state.table.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data sheet to begin  (File → Open data sheet…)");
        });
        return;
    };

    let selected_indicators = state.selected_indicators();
    let filtered = filter::apply(&table, &state.selection());
    let flows = lifecycle::tracked_flows_only(&filtered);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            show(
                ui,
                lifecycle::overview_bars(&flows, &selected_indicators),
                plot::bar_chart,
            );

            // The scenario heatmap compares all scenarios, so it only
            // narrows by year and car type — and only once both are set.
            if state.year_and_car_type_selected() {
                let heat_table = filter::apply(&table, &state.year_car_type_selection());
                show(ui, lifecycle::scenario_heatmap(&heat_table), heatmap::heatmap);
            }

            match state.view {
                DetailView::None => {}
                DetailView::Costing => {
                    ui.separator();
                    costing_section(ui, state);
                }
                DetailView::Assessment => {
                    ui.separator();
                    show(ui, lifecycle::phase_sunburst(&flows), sunburst::sunburst);
                    show(
                        ui,
                        lifecycle::flow_difference_scatter(&table, &selected_indicators),
                        plot::scatter,
                    );
                }
                DetailView::Correlation => {
                    ui.separator();
                    show(ui, lifecycle::correlation_matrix(&flows), heatmap::heatmap);
                }
            }
        });
}

fn costing_section(ui: &mut Ui, state: &mut LifecycleState) {
    let Some(cost) = state.cost_table.clone() else {
        ui.label("Upload the cost analysis workbook for detailed life cycle costing  (File → Open cost sheet…).");
        return;
    };

    show(ui, lifecycle::cost_waterfall(&cost), plot::waterfall);

    // Category breakdown pie, driven by an explicit picker.
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Breakdown");
        let current = state
            .breakdown_category
            .clone()
            .unwrap_or_else(|| "Select category…".to_string());
        egui::ComboBox::from_id_salt("breakdown_category")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for (label, _, _) in lifecycle::COST_CATEGORIES {
                    let is_current = state.breakdown_category.as_deref() == Some(*label);
                    if ui.selectable_label(is_current, *label).clicked() {
                        state.breakdown_category = Some(label.to_string());
                    }
                }
            });
    });
    if let Some(category) = state.breakdown_category.clone() {
        show(ui, lifecycle::cost_breakdown(&cost, &category), sunburst::pie);
    }
}

fn energy_central(ui: &mut Ui, state: &mut EnergyState) {
    let (Some(table), Some(columns)) = (state.table.clone(), state.columns.clone()) else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a consumption sheet to begin  (File → Open consumption sheet…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            if let Some(date) = state.selected_date() {
                show(
                    ui,
                    energy::sankey_for_date(&table, &columns, date),
                    sankey::sankey,
                );
            }

            if let (Some(from), Some(to)) = (state.range_from, state.range_to) {
                ui.separator();
                show(
                    ui,
                    energy::source_totals(&table, &columns, from, to),
                    plot::bar_chart,
                );
            }
        });
}
