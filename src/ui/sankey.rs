use std::collections::BTreeMap;

use eframe::egui::{pos2, vec2, Align2, Color32, Rect, Sense, TextStyle, Ui};
use eframe::egui::epaint::Mesh;

use crate::chart::sankey::SankeySpec;
use crate::color::hex_to_color32;

const NODE_WIDTH: f32 = 20.0;
const NODE_PAD: f32 = 14.0;
const RIBBON_STEPS: usize = 24;
const RIBBON_ALPHA: u8 = 150;

// ---------------------------------------------------------------------------
// Sankey painter – source nodes left, machine nodes right, value-scaled
// ribbons between them
// ---------------------------------------------------------------------------

struct NodeLayout {
    rect: Rect,
    /// Next free y offset for stacking link attachments.
    cursor: f32,
}

pub fn sankey(ui: &mut Ui, spec: &SankeySpec) {
    ui.heading(&spec.title);

    let width = ui.available_width();
    let height = ui.available_height().clamp(320.0, 640.0);
    let (rect, _response) = ui.allocate_exact_size(vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);
    let font = TextStyle::Small.resolve(ui.style());
    let text_color = ui.visuals().text_color();

    // Per-node throughput: each node sits on one side, so summing its
    // link values gives its height share.
    let mut totals = vec![0.0_f64; spec.nodes.len()];
    for link in &spec.links {
        totals[link.source] += link.value;
        totals[link.target] += link.value;
    }

    let layout_column = |indices: &[usize], x: f32| -> BTreeMap<usize, NodeLayout> {
        let column_total: f64 = indices.iter().map(|i| totals[*i]).sum();
        let pad_total = NODE_PAD * indices.len().saturating_sub(1) as f32;
        let usable = (height - pad_total - 40.0).max(50.0);
        let mut y = rect.min.y + 20.0;
        indices
            .iter()
            .map(|&i| {
                let h = if column_total > 0.0 {
                    (totals[i] / column_total) as f32 * usable
                } else {
                    usable / indices.len() as f32
                }
                .max(2.0);
                let node = NodeLayout {
                    rect: Rect::from_min_size(pos2(x, y), vec2(NODE_WIDTH, h)),
                    cursor: 0.0,
                };
                y += h + NODE_PAD;
                (i, node)
            })
            .collect()
    };

    let sources: Vec<usize> = (0..spec.source_count).collect();
    let targets: Vec<usize> = (spec.source_count..spec.nodes.len()).collect();
    let left_x = rect.min.x + 120.0;
    let right_x = rect.max.x - 120.0 - NODE_WIDTH;
    let mut left = layout_column(&sources, left_x);
    let mut right = layout_column(&targets, right_x);

    // Ribbons first so nodes draw on top of their attachment edges.
    for link in &spec.links {
        let (src_y0, src_y1) = {
            let node = left.get_mut(&link.source).expect("source laid out");
            let h = (link.value / totals[link.source].max(f64::EPSILON)) as f32
                * node.rect.height();
            let y0 = node.rect.min.y + node.cursor;
            node.cursor += h;
            (y0, y0 + h)
        };
        let (dst_y0, dst_y1) = {
            let node = right.get_mut(&link.target).expect("target laid out");
            let h = (link.value / totals[link.target].max(f64::EPSILON)) as f32
                * node.rect.height();
            let y0 = node.rect.min.y + node.cursor;
            node.cursor += h;
            (y0, y0 + h)
        };

        let color = hex_to_color32(&link.color);
        let ribbon = ribbon_mesh(
            left_x + NODE_WIDTH,
            right_x,
            (src_y0, src_y1),
            (dst_y0, dst_y1),
            Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), RIBBON_ALPHA),
        );
        painter.add(ribbon);
    }

    // Nodes and labels
    for (i, node) in left.iter().chain(right.iter()) {
        painter.rect_filled(node.rect, 2.0, hex_to_color32(&spec.nodes[*i].color));
        let is_source = *i < spec.source_count;
        let (pos, align) = if is_source {
            (node.rect.left_center() - vec2(6.0, 0.0), Align2::RIGHT_CENTER)
        } else {
            (node.rect.right_center() + vec2(6.0, 0.0), Align2::LEFT_CENTER)
        };
        painter.text(
            pos,
            align,
            format!("{} ({:.1})", spec.nodes[*i].label, totals[*i]),
            font.clone(),
            text_color,
        );
    }
}

/// Triangle-strip ribbon between two vertical spans, eased horizontally
/// with a smoothstep so flows curve instead of shearing.
fn ribbon_mesh(
    x0: f32,
    x1: f32,
    (src_y0, src_y1): (f32, f32),
    (dst_y0, dst_y1): (f32, f32),
    color: Color32,
) -> Mesh {
    let mut mesh = Mesh::default();
    for i in 0..=RIBBON_STEPS {
        let t = i as f32 / RIBBON_STEPS as f32;
        let ease = t * t * (3.0 - 2.0 * t);
        let x = x0 + (x1 - x0) * t;
        let top = src_y0 + (dst_y0 - src_y0) * ease;
        let bottom = src_y1 + (dst_y1 - src_y1) * ease;
        mesh.colored_vertex(pos2(x, top), color);
        mesh.colored_vertex(pos2(x, bottom), color);
        if i > 0 {
            let base = (i as u32 - 1) * 2;
            mesh.add_triangle(base, base + 1, base + 2);
            mesh.add_triangle(base + 1, base + 3, base + 2);
        }
    }
    mesh
}
