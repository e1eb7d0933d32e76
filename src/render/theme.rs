use serde::{Deserialize, Serialize};

use crate::render::Color;

/// Single-day chart palette and stroke policy.
///
/// In-band readings draw in the primary color; above-band readings switch to
/// the warning color with a heavier stroke, and below-band readings get the
/// same heavier treatment in the reference grey.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartTheme {
    pub in_band: Color,
    pub above_band: Color,
    pub below_band: Color,
    pub fill: Color,
    pub annotation: Color,
    pub label_background: Color,
    pub low_reference: Color,
    pub high_reference: Color,
    pub in_band_stroke_px: f64,
    pub out_of_band_stroke_px: f64,
    pub reference_stroke_px: f64,
    pub connector_stroke_px: f64,
    pub callout_font_size_px: f64,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self {
            in_band: Color::from_rgb8(0x4a, 0x86, 0xe8),
            above_band: Color::from_rgb8(0xf3, 0x9c, 0x12),
            below_band: Color::from_rgb8(0x95, 0xa5, 0xa6),
            fill: Color::from_rgb8(0xe8, 0xf2, 0xfe).with_alpha(0.65),
            annotation: Color::from_rgb8(0xe7, 0x4c, 0x3c),
            label_background: Color::rgb(1.0, 1.0, 1.0).with_alpha(0.95),
            low_reference: Color::from_rgb8(0x95, 0xa5, 0xa6),
            high_reference: Color::from_rgb8(0xf3, 0x9c, 0x12),
            in_band_stroke_px: 2.0,
            out_of_band_stroke_px: 2.5,
            reference_stroke_px: 1.2,
            connector_stroke_px: 1.2,
            callout_font_size_px: 9.0,
        }
    }
}

/// Fixed overlay palette; day index cycles through it.
pub const DAY_PALETTE: [Color; 7] = [
    Color::from_rgb8(0x4a, 0x86, 0xe8),
    Color::from_rgb8(0xff, 0x6b, 0x6b),
    Color::from_rgb8(0x1a, 0xbc, 0x9c),
    Color::from_rgb8(0xf3, 0x9c, 0x12),
    Color::from_rgb8(0x9b, 0x59, 0xb6),
    Color::from_rgb8(0x34, 0x49, 0x5e),
    Color::from_rgb8(0x27, 0xae, 0x60),
];

/// Annotation colors paired with `DAY_PALETTE` by index.
pub const DAY_ANNOTATION_PALETTE: [Color; 7] = [
    Color::from_rgb8(0xe7, 0x4c, 0x3c),
    Color::from_rgb8(0x34, 0x98, 0xdb),
    Color::from_rgb8(0x16, 0xa0, 0x85),
    Color::from_rgb8(0xd3, 0x54, 0x00),
    Color::from_rgb8(0x8e, 0x44, 0xad),
    Color::from_rgb8(0x2c, 0x3e, 0x50),
    Color::from_rgb8(0x27, 0xae, 0x60),
];

#[must_use]
pub fn day_color(day_index: usize) -> Color {
    DAY_PALETTE[day_index % DAY_PALETTE.len()]
}

#[must_use]
pub fn day_annotation_color(day_index: usize) -> Color {
    DAY_ANNOTATION_PALETTE[day_index % DAY_ANNOTATION_PALETTE.len()]
}
