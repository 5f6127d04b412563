use std::ops::RangeInclusive;

use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::chart::bar::BarSpec;
use crate::chart::scatter::ScatterSpec;
use crate::chart::waterfall::WaterfallSpec;
use crate::color::{generate_palette, hex_to_color32};

// ---------------------------------------------------------------------------
// Axis-based chart renderers (egui_plot)
// ---------------------------------------------------------------------------

/// Integer positions on a categorical axis get their label, everything
/// else stays blank.
fn category_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

/// Render a bar spec; one chart per bar so every category shows up in the
/// legend with its own color.
pub fn bar_chart(ui: &mut Ui, spec: &BarSpec) {
    ui.heading(&spec.title);
    let labels: Vec<String> = spec.bars.iter().map(|b| b.label.clone()).collect();

    Plot::new(&spec.title)
        .legend(Legend::default())
        .x_axis_label(&spec.x_label)
        .y_axis_label(&spec.y_label)
        .x_axis_formatter(category_formatter(labels))
        .height(320.0)
        .show(ui, |plot_ui| {
            for (i, entry) in spec.bars.iter().enumerate() {
                let bar = Bar::new(i as f64, entry.value)
                    .width(0.6)
                    .fill(hex_to_color32(&entry.color))
                    .name(&entry.label);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(&entry.label));
            }
        });
}

/// Render a waterfall spec: floating bars plus connector lines between
/// consecutive running totals.
pub fn waterfall(ui: &mut Ui, spec: &WaterfallSpec) {
    ui.heading(&spec.title);
    let labels: Vec<String> = spec.steps.iter().map(|s| s.label.clone()).collect();
    let color = hex_to_color32(&spec.color);

    Plot::new(&spec.title)
        .x_axis_label("Category")
        .y_axis_label(&spec.y_label)
        .x_axis_formatter(category_formatter(labels))
        .height(320.0)
        .show(ui, |plot_ui| {
            let bars: Vec<Bar> = spec
                .steps
                .iter()
                .enumerate()
                .map(|(i, step)| {
                    Bar::new(i as f64, step.delta)
                        .base_offset(step.start)
                        .width(0.6)
                        .fill(color)
                        .name(&step.label)
                })
                .collect();
            plot_ui.bar_chart(BarChart::new(bars));

            for (i, step) in spec.steps.iter().enumerate().take(spec.steps.len() - 1) {
                let connector = vec![[i as f64 + 0.3, step.end], [i as f64 + 0.7, step.end]];
                plot_ui.line(
                    Line::new(PlotPoints::from(connector)).color(Color32::DARK_GRAY),
                );
            }
        });

    ui.label(format!("Final total: {:.2}", spec.total));
}

/// Render a scatter spec: categorical x axis, one colored marker series
/// per series label.
pub fn scatter(ui: &mut Ui, spec: &ScatterSpec) {
    ui.heading(&spec.title);
    let categories: Vec<String> = spec.categories().iter().map(|c| c.to_string()).collect();
    let series: Vec<String> = spec.series().iter().map(|s| s.to_string()).collect();
    let palette = generate_palette(series.len());

    Plot::new(&spec.title)
        .legend(Legend::default())
        .x_axis_label(&spec.x_label)
        .y_axis_label(&spec.y_label)
        .x_axis_formatter(category_formatter(categories.clone()))
        .height(320.0)
        .show(ui, |plot_ui| {
            for (si, series_label) in series.iter().enumerate() {
                let points: Vec<[f64; 2]> = spec
                    .points
                    .iter()
                    .filter(|p| p.series == *series_label)
                    .filter_map(|p| {
                        let x = categories.iter().position(|c| *c == p.category)?;
                        Some([x as f64, p.value])
                    })
                    .collect();
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .shape(MarkerShape::Circle)
                        .radius(4.0)
                        .color(palette[si])
                        .name(series_label),
                );
            }
        });
}
