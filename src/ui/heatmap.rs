use eframe::egui::{pos2, vec2, Align2, FontId, Rect, Sense, TextStyle, Ui};
use eframe::egui::epaint::TextShape;

use crate::chart::heatmap::HeatmapSpec;
use crate::color::viridis;

const LEFT_MARGIN: f32 = 150.0;
const BOTTOM_MARGIN: f32 = 70.0;
const COLORBAR_WIDTH: f32 = 18.0;
const COLORBAR_GAP: f32 = 36.0;

// ---------------------------------------------------------------------------
// Heatmap grid painter
// ---------------------------------------------------------------------------

/// Paint a heatmap spec as a colored grid with axis labels, a colorbar,
/// and a hover readout of the cell value.
pub fn heatmap(ui: &mut Ui, spec: &HeatmapSpec) {
    ui.heading(&spec.title);

    let n_cols = spec.x_labels.len();
    let n_rows = spec.y_labels.len();
    if n_cols == 0 || n_rows == 0 {
        return;
    }

    let width = ui.available_width();
    let height = (n_rows as f32 * 26.0 + BOTTOM_MARGIN).clamp(220.0, 520.0);
    let (outer, response) = ui.allocate_exact_size(vec2(width, height), Sense::hover());
    let painter = ui.painter_at(outer);

    let grid = Rect::from_min_max(
        pos2(outer.min.x + LEFT_MARGIN, outer.min.y),
        pos2(
            outer.max.x - COLORBAR_WIDTH - COLORBAR_GAP,
            outer.max.y - BOTTOM_MARGIN,
        ),
    );
    let cell = vec2(grid.width() / n_cols as f32, grid.height() / n_rows as f32);
    let font = TextStyle::Small.resolve(ui.style());
    let text_color = ui.visuals().text_color();
    let span = (spec.zmax - spec.zmin).max(f64::EPSILON);

    // Cells
    for (yi, row) in spec.values.iter().enumerate() {
        for (xi, value) in row.iter().enumerate() {
            let t = ((value - spec.zmin) / span) as f32;
            let rect = Rect::from_min_size(
                pos2(
                    grid.min.x + xi as f32 * cell.x,
                    grid.min.y + yi as f32 * cell.y,
                ),
                cell,
            );
            painter.rect_filled(rect.shrink(0.5), 0.0, viridis(t));
        }
    }

    // Row labels
    for (yi, label) in spec.y_labels.iter().enumerate() {
        painter.text(
            pos2(grid.min.x - 6.0, grid.min.y + (yi as f32 + 0.5) * cell.y),
            Align2::RIGHT_CENTER,
            label,
            font.clone(),
            text_color,
        );
    }

    // Column labels, angled so long indicator names stay readable
    for (xi, label) in spec.x_labels.iter().enumerate() {
        let galley = painter.layout_no_wrap(label.clone(), font.clone(), text_color);
        let pos = pos2(
            grid.min.x + (xi as f32 + 0.5) * cell.x,
            grid.max.y + 6.0,
        );
        let mut shape = TextShape::new(pos, galley, text_color);
        shape.angle = std::f32::consts::FRAC_PI_4;
        painter.add(shape);
    }

    draw_colorbar(ui, &painter, grid, spec, &font);

    // Hover readout
    if let Some(pos) = response.hover_pos() {
        if grid.contains(pos) {
            let xi = ((pos.x - grid.min.x) / cell.x) as usize;
            let yi = ((pos.y - grid.min.y) / cell.y) as usize;
            if xi < n_cols && yi < n_rows {
                response.on_hover_text(format!(
                    "{} / {}: {:.2}",
                    spec.y_labels[yi], spec.x_labels[xi], spec.values[yi][xi]
                ));
            }
        }
    }
}

fn draw_colorbar(
    ui: &Ui,
    painter: &eframe::egui::Painter,
    grid: Rect,
    spec: &HeatmapSpec,
    font: &FontId,
) {
    let bar = Rect::from_min_size(
        pos2(grid.max.x + 12.0, grid.min.y),
        vec2(COLORBAR_WIDTH, grid.height()),
    );
    let steps = 40;
    let step_h = bar.height() / steps as f32;
    for i in 0..steps {
        let t = 1.0 - i as f32 / (steps - 1) as f32;
        let rect = Rect::from_min_size(
            pos2(bar.min.x, bar.min.y + i as f32 * step_h),
            vec2(COLORBAR_WIDTH, step_h + 0.5),
        );
        painter.rect_filled(rect, 0.0, viridis(t));
    }
    painter.text(
        pos2(bar.max.x + 4.0, bar.min.y),
        Align2::LEFT_TOP,
        format!("{:.0}", spec.zmax),
        font.clone(),
        ui.visuals().text_color(),
    );
    painter.text(
        pos2(bar.max.x + 4.0, bar.max.y),
        Align2::LEFT_BOTTOM,
        format!("{:.0}", spec.zmin),
        font.clone(),
        ui.visuals().text_color(),
    );
}
