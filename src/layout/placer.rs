use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{FrameGeometry, TimeSeries};
use crate::error::{ChartError, ChartResult};

/// Caller-supplied annotation: an event label tied to a timestamp.
///
/// `explicit_offset == 0.0` means no direction or magnitude was requested and
/// the placer decides both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    pub time: DateTime<Utc>,
    pub text: String,
    pub explicit_offset: f64,
}

impl Annotation {
    #[must_use]
    pub fn new(time: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            time,
            text: text.into(),
            explicit_offset: 0.0,
        }
    }

    #[must_use]
    pub fn with_offset(mut self, explicit_offset: f64) -> Self {
        self.explicit_offset = explicit_offset;
        self
    }
}

/// Tuning knobs for annotation layout.
///
/// Vertical offsets are expressed in value units and converted to pixels via
/// `vertical_px_per_unit`; horizontal nudges work the same way with their own
/// scale. Footprint estimation distinguishes wide glyphs (CJK and other
/// non-Latin scripts) from narrow ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementConfig {
    pub base_offset: f64,
    pub offset_step: f64,
    pub explicit_offset_scale: f64,
    pub min_offset: f64,
    pub max_offset: f64,
    pub vertical_px_per_unit: f64,
    pub horizontal_px_per_unit: f64,
    pub horizontal_nudge_per_char: f64,
    pub horizontal_char_cap: usize,
    pub wide_char_width_px: f64,
    pub narrow_char_width_px: f64,
    pub text_width_scale: f64,
    pub label_height_px: f64,
    pub label_margin_px: f64,
    pub max_attempts: u32,
    pub retry_step_px: f64,
    pub connector_arc: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            base_offset: 1.5,
            offset_step: 0.5,
            explicit_offset_scale: 1.5,
            min_offset: 1.0,
            max_offset: 3.0,
            vertical_px_per_unit: 40.0,
            horizontal_px_per_unit: 20.0,
            horizontal_nudge_per_char: 0.05,
            horizontal_char_cap: 15,
            wide_char_width_px: 10.0,
            narrow_char_width_px: 6.0,
            text_width_scale: 0.9,
            label_height_px: 20.0,
            label_margin_px: 5.0,
            max_attempts: 8,
            retry_step_px: 15.0,
            connector_arc: 0.15,
        }
    }
}

impl PlacementConfig {
    /// Multi-day overlays need wider clamp bounds because several days' labels
    /// compete for the same hour slots.
    #[must_use]
    pub fn overlay() -> Self {
        Self {
            min_offset: 0.75,
            max_offset: 4.5,
            ..Self::default()
        }
    }

    pub(crate) fn validate(self) -> ChartResult<Self> {
        for (value, name) in [
            (self.base_offset, "base_offset"),
            (self.offset_step, "offset_step"),
            (self.explicit_offset_scale, "explicit_offset_scale"),
            (self.min_offset, "min_offset"),
            (self.max_offset, "max_offset"),
            (self.vertical_px_per_unit, "vertical_px_per_unit"),
            (self.horizontal_px_per_unit, "horizontal_px_per_unit"),
            (self.horizontal_nudge_per_char, "horizontal_nudge_per_char"),
            (self.wide_char_width_px, "wide_char_width_px"),
            (self.narrow_char_width_px, "narrow_char_width_px"),
            (self.text_width_scale, "text_width_scale"),
            (self.label_height_px, "label_height_px"),
            (self.label_margin_px, "label_margin_px"),
            (self.retry_step_px, "retry_step_px"),
            (self.connector_arc, "connector_arc"),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ChartError::InvalidData(format!(
                    "placement config `{name}` must be finite and > 0"
                )));
            }
        }
        if self.min_offset > self.max_offset {
            return Err(ChartError::InvalidData(
                "placement config min_offset must be <= max_offset".to_owned(),
            ));
        }
        if self.horizontal_char_cap == 0 {
            return Err(ChartError::InvalidData(
                "placement config horizontal_char_cap must be >= 1".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Pixel-space rectangle claimed by an accepted label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OccupiedRegion {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl OccupiedRegion {
    fn around(center_x: f64, center_y: f64, half_width: f64, half_height: f64) -> Self {
        Self {
            x_min: center_x - half_width,
            x_max: center_x + half_width,
            y_min: center_y - half_height,
            y_max: center_y + half_height,
        }
    }

    /// Axis-aligned overlap test; shared edges do not count as overlap.
    #[must_use]
    pub fn overlaps(&self, other: &OccupiedRegion) -> bool {
        self.x_min < other.x_max
            && self.x_max > other.x_min
            && self.y_min < other.y_max
            && self.y_max > other.y_min
    }
}

/// Final on-canvas placement for one annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedAnnotation {
    pub text: String,
    /// The annotation's own requested timestamp (what a label displays).
    pub time: DateTime<Utc>,
    /// The resolved data anchor, possibly snapped to the nearest sample.
    pub anchor_time: DateTime<Utc>,
    pub anchor_value: f64,
    pub label_x_px: f64,
    pub label_y_px: f64,
    /// Signed leader-line arc; positive when the label sits above its anchor,
    /// so the connector bows away from the curve.
    pub connector_curvature: f64,
    pub region: OccupiedRegion,
}

/// Per-pass placement state.
///
/// Scoped to one `place_annotations` call in single-day mode; one overlay
/// composition shares a single context across its days so their labels compete
/// for the same hour slots. Never shared across independent render calls.
#[derive(Debug, Default)]
pub(crate) struct PlacementContext {
    hour_counts: [u32; 24],
    regions: Vec<OccupiedRegion>,
}

impl PlacementContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

/// Computes non-overlapping label positions and leader-line anchors.
///
/// Deterministic for a given input order and geometry. Collision resolution is
/// best-effort: after the retry budget is spent the last candidate is accepted
/// even if it still overlaps, and a warning is logged.
pub fn place_annotations(
    series: &TimeSeries,
    annotations: &[Annotation],
    geometry: FrameGeometry,
    config: PlacementConfig,
) -> ChartResult<Vec<PlacedAnnotation>> {
    let mut context = PlacementContext::new();
    place_annotations_in_context(series, annotations, geometry, config, &mut context)
}

pub(crate) fn place_annotations_in_context(
    series: &TimeSeries,
    annotations: &[Annotation],
    geometry: FrameGeometry,
    config: PlacementConfig,
    context: &mut PlacementContext,
) -> ChartResult<Vec<PlacedAnnotation>> {
    let config = config.validate()?;
    if annotations.is_empty() {
        return Ok(Vec::new());
    }

    // Processing order is always ascending timestamp; ties keep input order.
    let mut ordered: Vec<&Annotation> = annotations.iter().collect();
    ordered.sort_by_key(|annotation| annotation.time);

    let mut placed = Vec::with_capacity(ordered.len());
    for annotation in ordered {
        placed.push(place_one(series, annotation, geometry, config, context)?);
    }
    Ok(placed)
}

fn place_one(
    series: &TimeSeries,
    annotation: &Annotation,
    geometry: FrameGeometry,
    config: PlacementConfig,
    context: &mut PlacementContext,
) -> ChartResult<PlacedAnnotation> {
    if !annotation.explicit_offset.is_finite() {
        return Err(ChartError::InvalidData(
            "annotation explicit offset must be finite".to_owned(),
        ));
    }

    let anchor = series.nearest_sample(annotation.time);
    let (anchor_x, anchor_y) = geometry.position_of(anchor.time, anchor.value)?;

    let hour = annotation.time.hour() as usize;
    let count_in_hour = context.hour_counts[hour];
    context.hour_counts[hour] += 1;

    let offset_units = vertical_offset_units(annotation.explicit_offset, hour, count_in_hour, config);
    let nudge_units = horizontal_nudge_units(&annotation.text, count_in_hour, config);

    let label_x = anchor_x + nudge_units * config.horizontal_px_per_unit;
    // Pixel y grows downward, so an upward offset subtracts.
    let base_y = anchor_y - offset_units * config.vertical_px_per_unit;

    let half_width = 0.5 * label_width_px(&annotation.text, config) + config.label_margin_px;
    let half_height = 0.5 * config.label_height_px + config.label_margin_px;

    let mut label_y = base_y;
    let mut region = OccupiedRegion::around(label_x, label_y, half_width, half_height);
    let mut attempt = 0_u32;
    while attempt < config.max_attempts && overlaps_any(&region, &context.regions) {
        attempt += 1;
        // Attempt 1 nudges up, 2 down, 3 further up, with the magnitude
        // growing every pair of attempts.
        let sign = if attempt % 2 == 1 { -1.0 } else { 1.0 };
        let magnitude = f64::from(attempt.div_ceil(2)) * config.retry_step_px;
        label_y = base_y + sign * magnitude;
        region = OccupiedRegion::around(label_x, label_y, half_width, half_height);
    }
    if overlaps_any(&region, &context.regions) {
        warn!(
            text = %annotation.text,
            attempts = attempt,
            "label collision budget exhausted; accepting overlapping placement"
        );
    }
    context.regions.push(region);

    let connector_curvature = if label_y < anchor_y {
        config.connector_arc
    } else {
        -config.connector_arc
    };

    Ok(PlacedAnnotation {
        text: annotation.text.clone(),
        time: annotation.time,
        anchor_time: anchor.time,
        anchor_value: anchor.value,
        label_x_px: label_x,
        label_y_px: label_y,
        connector_curvature,
        region,
    })
}

/// Signed vertical offset in value units, clamped per direction.
fn vertical_offset_units(
    explicit_offset: f64,
    hour: usize,
    count_in_hour: u32,
    config: PlacementConfig,
) -> f64 {
    let direction = if explicit_offset > 0.0 {
        1.0
    } else if explicit_offset < 0.0 {
        -1.0
    } else if hour % 2 == 0 {
        1.0
    } else {
        -1.0
    };

    let offset = if explicit_offset != 0.0 {
        explicit_offset * config.explicit_offset_scale
    } else {
        direction * (config.base_offset + f64::from(count_in_hour) * config.offset_step)
    };

    if direction > 0.0 {
        offset.clamp(config.min_offset, config.max_offset)
    } else {
        offset.clamp(-config.max_offset, -config.min_offset)
    }
}

/// Left/right bias for crowded hours, capped so long labels don't dominate.
fn horizontal_nudge_units(text: &str, count_in_hour: u32, config: PlacementConfig) -> f64 {
    if count_in_hour == 0 {
        return 0.0;
    }
    let capped_chars = text.chars().count().min(config.horizontal_char_cap) as f64;
    let sign = if count_in_hour % 2 == 0 { -1.0 } else { 1.0 };
    sign * config.horizontal_nudge_per_char * capped_chars
}

/// Footprint width estimate with distinct per-character weights for wide
/// glyphs versus narrow ones.
fn label_width_px(text: &str, config: PlacementConfig) -> f64 {
    let wide = text.chars().filter(|c| (*c as u32) > 256).count() as f64;
    let narrow = text.chars().count() as f64 - wide;
    (wide * config.wide_char_width_px + narrow * config.narrow_char_width_px)
        * config.text_width_scale
}

fn overlaps_any(candidate: &OccupiedRegion, accepted: &[OccupiedRegion]) -> bool {
    accepted.iter().any(|region| candidate.overlaps(region))
}
