use std::f32::consts::TAU;

use eframe::egui::{vec2, Align2, Color32, Pos2, Sense, TextStyle, Ui};
use eframe::egui::epaint::Mesh;

use crate::chart::pie::PieSpec;
use crate::chart::sunburst::SunburstSpec;
use crate::color::hex_to_color32;

// ---------------------------------------------------------------------------
// Ring segment mesh – shared by the sunburst and the pie
// ---------------------------------------------------------------------------

/// Filled annular segment between radii `r0..r1` and angles `a0..a1`
/// (radians, clockwise from 12 o'clock).
fn ring_segment(center: Pos2, r0: f32, r1: f32, a0: f32, a1: f32, color: Color32) -> Mesh {
    let steps = (((a1 - a0).abs() / 0.04).ceil() as usize).max(2);
    let mut mesh = Mesh::default();
    for i in 0..=steps {
        let angle = a0 + (a1 - a0) * i as f32 / steps as f32;
        // 12 o'clock start, clockwise
        let dir = vec2(angle.sin(), -angle.cos());
        mesh.colored_vertex(center + dir * r0, color);
        mesh.colored_vertex(center + dir * r1, color);
        if i > 0 {
            let base = (i as u32 - 1) * 2;
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base + 1, base + 3, base + 2);
        }
    }
    mesh
}

fn segment_label(
    ui: &Ui,
    painter: &eframe::egui::Painter,
    center: Pos2,
    radius: f32,
    a0: f32,
    a1: f32,
    text: &str,
) {
    // Slivers get no label; they would just overlap their neighbours.
    if a1 - a0 < 0.25 {
        return;
    }
    let mid = (a0 + a1) / 2.0;
    let dir = vec2(mid.sin(), -mid.cos());
    painter.text(
        center + dir * radius,
        Align2::CENTER_CENTER,
        text,
        TextStyle::Small.resolve(ui.style()),
        Color32::WHITE,
    );
}

// ---------------------------------------------------------------------------
// Sunburst
// ---------------------------------------------------------------------------

/// Paint a two-ring sunburst: lifecycle phases inside, their processes
/// outside, angles proportional to row counts.
pub fn sunburst(ui: &mut Ui, spec: &SunburstSpec) {
    ui.heading(&spec.title);

    let size = ui.available_width().clamp(260.0, 460.0);
    let (rect, _response) = ui.allocate_exact_size(vec2(size, size), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let outer_radius = size * 0.48;
    let ring = outer_radius / 3.0;

    let mut angle = 0.0_f32;
    for phase in &spec.phases {
        let sweep = (phase.value / spec.total) as f32 * TAU;
        let color = hex_to_color32(&phase.color);
        painter.add(ring_segment(center, ring * 0.55, ring * 1.55, angle, angle + sweep, color));
        segment_label(ui, &painter, center, ring * 1.05, angle, angle + sweep, &phase.label);

        let mut child_angle = angle;
        for child in &phase.children {
            let child_sweep = (child.value / spec.total) as f32 * TAU;
            painter.add(ring_segment(
                center,
                ring * 1.6,
                ring * 2.6,
                child_angle,
                child_angle + child_sweep,
                color.gamma_multiply(0.75),
            ));
            segment_label(
                ui,
                &painter,
                center,
                ring * 2.1,
                child_angle,
                child_angle + child_sweep,
                &format!("{} ({:.0}%)", child.label, child.share_pct),
            );
            child_angle += child_sweep;
        }
        angle += sweep;
    }
}

// ---------------------------------------------------------------------------
// Pie (waterfall category breakdown)
// ---------------------------------------------------------------------------

pub fn pie(ui: &mut Ui, spec: &PieSpec) {
    ui.heading(&spec.title);

    let size = ui.available_width().clamp(200.0, 340.0);
    let (rect, _response) = ui.allocate_exact_size(vec2(size, size), Sense::hover());
    let painter = ui.painter_at(rect);
    let center = rect.center();
    let radius = size * 0.45;

    let mut angle = 0.0_f32;
    for slice in &spec.slices {
        let sweep = (slice.value / spec.total) as f32 * TAU;
        painter.add(ring_segment(
            center,
            0.0,
            radius,
            angle,
            angle + sweep,
            hex_to_color32(&slice.color),
        ));
        angle += sweep;
    }

    // Legend with the raw values; thin slices are unreadable otherwise.
    for slice in &spec.slices {
        ui.horizontal(|ui: &mut Ui| {
            let (swatch, _) = ui.allocate_exact_size(vec2(12.0, 12.0), Sense::hover());
            ui.painter().rect_filled(swatch, 2.0, hex_to_color32(&slice.color));
            ui.label(format!("{}: {:.2}", slice.label, slice.value));
        });
    }
}
