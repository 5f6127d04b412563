use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Fixed high-contrast palettes
// ---------------------------------------------------------------------------

/// Node/link colors for energy sources in the Sankey diagram.
pub const ENERGY_SOURCE_COLORS: &[&str] = &[
    "#f87c24", "#ff7f0e", "#ffb732", "#ffd27f", "#d4d4d4", "#909090", "#ffedcc", "#778899",
];

/// Node colors for machines in the Sankey diagram.
pub const MACHINE_COLORS: &[&str] = &[
    "#636efa", "#ef553b", "#00cc96", "#ab63fa", "#ffa15a",
];

/// Ring colors for lifecycle phases in the sunburst chart.
pub const PHASE_COLORS: &[&str] = &[
    "#ff6500", "#fa6e00", "#f57600", "#f8891b", "#fa9b35",
];

/// Bar colors for the tracked reference flows.
pub const REFERENCE_FLOW_COLORS: &[&str] = &[
    "#f57600", "#395d78", "#ff8c00", "#808080",
];

/// Single accent used by every waterfall segment.
pub const WATERFALL_COLOR: &str = "#b04238";

pub const FALLBACK_COLOR: &str = "#808080";

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hex conversions – chart specs carry colors as "#rrggbb" strings
// ---------------------------------------------------------------------------

pub fn hex_to_color32(hex: &str) -> Color32 {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color32::GRAY;
    }
    let parse = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(128);
    Color32::from_rgb(parse(0..2), parse(2..4), parse(4..6))
}

pub fn color32_to_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

// ---------------------------------------------------------------------------
// Color mapping: category label → color
// ---------------------------------------------------------------------------

/// Maps category labels to colors: fixed palette entries first (in label
/// order), evenly spaced generated hues once the palette is exhausted.
/// Stable for a given label sequence, so identical renders color alike.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, String>,
}

impl ColorMap {
    pub fn from_labels<I, S>(labels: I, fixed: &[&str]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let overflow = labels.len().saturating_sub(fixed.len());
        let generated: Vec<String> = generate_palette(overflow)
            .into_iter()
            .map(color32_to_hex)
            .collect();

        let mapping = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let color = fixed
                    .get(i)
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| generated[i - fixed.len()].clone());
                (label, color)
            })
            .collect();
        ColorMap { mapping }
    }

    /// Hex color for a label, falling back to neutral gray.
    pub fn hex_for(&self, label: &str) -> String {
        self.mapping
            .get(label)
            .cloned()
            .unwrap_or_else(|| FALLBACK_COLOR.to_string())
    }

    /// Legend entries (label → color) for the UI.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(label, hex)| (label.clone(), hex_to_color32(hex)))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Viridis ramp for heatmap cells
// ---------------------------------------------------------------------------

const VIRIDIS_ANCHORS: &[(f32, f32, f32)] = &[
    (68.0, 1.0, 84.0),
    (59.0, 82.0, 139.0),
    (33.0, 145.0, 140.0),
    (94.0, 201.0, 98.0),
    (253.0, 231.0, 37.0),
];

/// Piecewise-linear approximation of the viridis colormap, `t` in [0, 1].
pub fn viridis(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (VIRIDIS_ANCHORS.len() - 1) as f32;
    let idx = (scaled.floor() as usize).min(VIRIDIS_ANCHORS.len() - 2);
    let frac = scaled - idx as f32;
    let (r0, g0, b0) = VIRIDIS_ANCHORS[idx];
    let (r1, g1, b1) = VIRIDIS_ANCHORS[idx + 1];
    Color32::from_rgb(
        (r0 + (r1 - r0) * frac) as u8,
        (g0 + (g1 - g0) * frac) as u8,
        (b0 + (b1 - b0) * frac) as u8,
    )
}
