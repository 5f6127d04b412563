/// UI layer: panels and the chart-spec renderers.  Renderers consume the
/// specs from [`crate::chart`] verbatim and draw nothing when a builder
/// reported an error — the message is shown instead.

pub mod heatmap;
pub mod panels;
pub mod plot;
pub mod sankey;
pub mod sunburst;

use eframe::egui::{RichText, Ui};

use crate::chart::ChartError;

/// Informational message shown in place of a chart ("no data for the
/// current selection" and friends).
pub fn chart_message(ui: &mut Ui, err: &ChartError) {
    ui.label(
        RichText::new(err.to_string())
            .italics()
            .color(ui.visuals().weak_text_color()),
    );
    ui.add_space(8.0);
}
