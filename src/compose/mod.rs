//! Chart composition: turns segmentation and annotation layout output into one
//! ordered set of backend-agnostic draw primitives per frame.

use chrono::{NaiveDate, TimeDelta};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "parallel-overlay")]
use rayon::prelude::*;

use crate::core::{
    AxisTuning, BandClass, CurveSegment, DayScale, FrameGeometry, GlucoseScale, ThresholdBand,
    TimeSeries, Viewport, segment_series,
};
use crate::error::{ChartError, ChartResult};
use crate::layout::{
    Annotation, PlacedAnnotation, PlacementConfig, PlacementContext,
    place_annotations_in_context,
};
use crate::overlay::{
    DayInput, normalize_annotation, normalize_sample, normalize_series, reference_day,
};
use crate::render::{
    AxisRanges, ChartTheme, Color, ConnectorPrimitive, FillPrimitive, LabelBoxPrimitive,
    LinePrimitive, LineStrokeStyle, RenderFrame, TextHAlign, TextPrimitive, day_annotation_color,
    day_color,
};

/// Bundled composition policy: band, axis range, label layout, palette.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComposeConfig {
    pub band: ThresholdBand,
    pub axis: AxisTuning,
    pub placement: PlacementConfig,
    pub theme: ChartTheme,
    pub hour_tick_interval: u32,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            band: ThresholdBand::glycemic(),
            axis: AxisTuning::default(),
            placement: PlacementConfig::default(),
            theme: ChartTheme::default(),
            hour_tick_interval: 6,
        }
    }
}

impl ComposeConfig {
    /// Preset for multi-day overlays: tighter top margin, relaxed label clamp
    /// bounds, denser hour ticks.
    #[must_use]
    pub fn overlay() -> Self {
        Self {
            axis: AxisTuning::overlay(),
            placement: PlacementConfig::overlay(),
            hour_tick_interval: 3,
            ..Self::default()
        }
    }
}

/// Orchestrates segmenter and placer output into render-ready frames.
#[derive(Debug, Clone)]
pub struct ChartComposer {
    config: ComposeConfig,
}

impl ChartComposer {
    pub fn new(config: ComposeConfig) -> ChartResult<Self> {
        config.placement.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    /// Composes one single-day frame: colored curve, area fill, reference
    /// lines, and collision-laid-out annotation labels with leader lines.
    pub fn compose_day(
        &self,
        series: &TimeSeries,
        annotations: &[Annotation],
        viewport: Viewport,
    ) -> ChartResult<RenderFrame> {
        let theme = self.config.theme;
        let day_scale = DayScale::for_day(series.day())?;
        let value_scale = GlucoseScale::from_series(series, self.config.axis)?;
        let geometry = FrameGeometry::new(day_scale, value_scale, viewport)?;

        let mut frame = RenderFrame::new(viewport, self.axis_ranges(day_scale, value_scale)?);

        frame
            .fills
            .push(self.area_fill(series, geometry, theme.fill)?);

        let segments = segment_series(series, self.config.band);
        for segment in &segments {
            frame
                .lines
                .push(self.curve_line(segment, geometry, self.single_day_style(segment.class))?);
        }

        self.push_reference_lines(&mut frame, geometry)?;

        let mut context = PlacementContext::new();
        let placed = place_annotations_in_context(
            series,
            annotations,
            geometry,
            self.config.placement,
            &mut context,
        )?;
        for placement in &placed {
            self.push_label(&mut frame, placement, geometry, theme.annotation, true)?;
        }

        debug!(
            segments = segments.len(),
            labels = placed.len(),
            "composed single-day frame"
        );
        frame.validate()?;
        Ok(frame)
    }

    /// Composes a multi-day overlay frame on the shared 24-hour axis.
    ///
    /// Curves are segmented per day first, then re-based onto the reference
    /// date. Color encodes day identity, so out-of-band segments switch to a
    /// dashed stroke instead of a distinct color. All days share one placement
    /// context: their labels compete for the same hour slots.
    pub fn compose_overlay(
        &self,
        days: &IndexMap<NaiveDate, DayInput>,
        viewport: Viewport,
    ) -> ChartResult<RenderFrame> {
        if days.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        let reference = reference_day();
        let day_scale = DayScale::for_day(reference)?;

        let mut value_min = f64::INFINITY;
        let mut value_max = f64::NEG_INFINITY;
        for input in days.values() {
            let (min, max) = input.series.value_bounds();
            value_min = value_min.min(min);
            value_max = value_max.max(max);
        }
        let value_scale = GlucoseScale::from_bounds(value_min, value_max, self.config.axis)?;
        let geometry = FrameGeometry::new(day_scale, value_scale, viewport)?;

        let mut frame = RenderFrame::new(viewport, self.axis_ranges(day_scale, value_scale)?);

        let per_day_segments = self.segment_days(days);
        for (day_index, segments) in per_day_segments.iter().enumerate() {
            let color = day_color(day_index);
            for segment in segments {
                let normalized = CurveSegment {
                    start: normalize_sample(segment.start, reference),
                    end: normalize_sample(segment.end, reference),
                    class: segment.class,
                };
                frame.lines.push(self.curve_line(
                    &normalized,
                    geometry,
                    self.overlay_style(segment.class, color),
                )?);
            }
        }

        self.push_reference_lines(&mut frame, geometry)?;

        let mut context = PlacementContext::new();
        let mut label_total = 0_usize;
        for (day_index, input) in days.values().enumerate() {
            let normalized_series = normalize_series(&input.series, reference)?;
            // Overlay labels carry only the event time; full text would drown
            // the shared axis.
            let normalized: Vec<Annotation> = input
                .annotations
                .iter()
                .map(|annotation| {
                    let rebased = normalize_annotation(annotation, reference);
                    Annotation {
                        text: rebased.time.format("%H:%M").to_string(),
                        ..rebased
                    }
                })
                .collect();
            let placed = place_annotations_in_context(
                &normalized_series,
                &normalized,
                geometry,
                self.config.placement,
                &mut context,
            )?;
            let color = day_annotation_color(day_index);
            for placement in &placed {
                self.push_label(&mut frame, placement, geometry, color, false)?;
            }
            label_total += placed.len();
        }

        debug!(
            days = days.len(),
            lines = frame.lines.len(),
            labels = label_total,
            "composed overlay frame"
        );
        frame.validate()?;
        Ok(frame)
    }

    fn segment_days(&self, days: &IndexMap<NaiveDate, DayInput>) -> Vec<Vec<CurveSegment>> {
        let inputs: Vec<&DayInput> = days.values().collect();
        #[cfg(feature = "parallel-overlay")]
        {
            inputs
                .par_iter()
                .map(|input| segment_series(&input.series, self.config.band))
                .collect()
        }
        #[cfg(not(feature = "parallel-overlay"))]
        {
            inputs
                .iter()
                .map(|input| segment_series(&input.series, self.config.band))
                .collect()
        }
    }

    fn axis_ranges(&self, day_scale: DayScale, value_scale: GlucoseScale) -> ChartResult<AxisRanges> {
        let (value_min, value_max) = value_scale.domain();
        Ok(AxisRanges {
            time_start: day_scale.day_start(),
            time_end: day_scale.day_start() + TimeDelta::hours(24),
            value_min,
            value_max,
            hour_ticks: day_scale.hour_ticks(self.config.hour_tick_interval)?,
        })
    }

    /// Fill polygon under the curve down to the bottom of the value axis.
    fn area_fill(
        &self,
        series: &TimeSeries,
        geometry: FrameGeometry,
        color: Color,
    ) -> ChartResult<FillPrimitive> {
        let (axis_min, _) = geometry.value_scale.domain();
        let baseline_y = geometry
            .value_scale
            .value_to_pixel(axis_min, geometry.viewport)?;

        let mut points = Vec::with_capacity(series.len() + 2);
        for sample in series.samples() {
            points.push(geometry.position_of(sample.time, sample.value)?);
        }
        let first_x = points[0].0;
        let last_x = points[points.len() - 1].0;
        points.push((last_x, baseline_y));
        points.push((first_x, baseline_y));

        Ok(FillPrimitive::new(points, color))
    }

    fn single_day_style(&self, class: BandClass) -> (Color, f64, LineStrokeStyle) {
        let theme = self.config.theme;
        match class {
            BandClass::InBand => (theme.in_band, theme.in_band_stroke_px, LineStrokeStyle::Solid),
            BandClass::AboveBand => (
                theme.above_band,
                theme.out_of_band_stroke_px,
                LineStrokeStyle::Solid,
            ),
            BandClass::BelowBand => (
                theme.below_band,
                theme.out_of_band_stroke_px,
                LineStrokeStyle::Solid,
            ),
        }
    }

    fn overlay_style(&self, class: BandClass, color: Color) -> (Color, f64, LineStrokeStyle) {
        let theme = self.config.theme;
        match class {
            BandClass::InBand => (color, theme.in_band_stroke_px, LineStrokeStyle::Solid),
            BandClass::AboveBand | BandClass::BelowBand => {
                (color, theme.out_of_band_stroke_px, LineStrokeStyle::Dashed)
            }
        }
    }

    fn curve_line(
        &self,
        segment: &CurveSegment,
        geometry: FrameGeometry,
        (color, stroke_width, style): (Color, f64, LineStrokeStyle),
    ) -> ChartResult<LinePrimitive> {
        let (x1, y1) = geometry.position_of(segment.start.time, segment.start.value)?;
        let (x2, y2) = geometry.position_of(segment.end.time, segment.end.value)?;
        Ok(LinePrimitive::new(x1, y1, x2, y2, stroke_width, style, color))
    }

    /// Dashed horizontal reference lines at both thresholds, with small value
    /// callouts near the left edge.
    fn push_reference_lines(
        &self,
        frame: &mut RenderFrame,
        geometry: FrameGeometry,
    ) -> ChartResult<()> {
        let theme = self.config.theme;
        let band = self.config.band;
        let width = f64::from(geometry.viewport.width);
        let callout_x = geometry
            .day_scale
            .time_to_pixel(geometry.day_scale.day_start() + TimeDelta::minutes(15), geometry.viewport)?;

        for (threshold, color, label_offset) in [
            (band.low(), theme.low_reference, -0.2),
            (band.high(), theme.high_reference, 0.2),
        ] {
            let y = geometry
                .value_scale
                .value_to_pixel(threshold, geometry.viewport)?;
            frame.lines.push(LinePrimitive::new(
                0.0,
                y,
                width,
                y,
                theme.reference_stroke_px,
                LineStrokeStyle::Dashed,
                color,
            ));
            let text_y = geometry
                .value_scale
                .value_to_pixel(threshold + label_offset, geometry.viewport)?;
            frame.texts.push(TextPrimitive::new(
                format!("{threshold:.1} mmol/L"),
                callout_x,
                text_y,
                theme.callout_font_size_px,
                color,
                TextHAlign::Left,
            ));
        }
        Ok(())
    }

    fn push_label(
        &self,
        frame: &mut RenderFrame,
        placement: &PlacedAnnotation,
        geometry: FrameGeometry,
        color: Color,
        prefix_time: bool,
    ) -> ChartResult<()> {
        let theme = self.config.theme;
        let (anchor_x, anchor_y) =
            geometry.position_of(placement.anchor_time, placement.anchor_value)?;

        frame.connectors.push(ConnectorPrimitive {
            from_x: placement.label_x_px,
            from_y: placement.label_y_px,
            to_x: anchor_x,
            to_y: anchor_y,
            curvature: placement.connector_curvature,
            stroke_width: theme.connector_stroke_px,
            color,
        });

        let text = if prefix_time {
            format!("{} {}", placement.time.format("%H:%M"), placement.text)
        } else {
            placement.text.clone()
        };
        frame.labels.push(LabelBoxPrimitive {
            text,
            x: placement.label_x_px,
            y: placement.label_y_px,
            width: placement.region.x_max - placement.region.x_min,
            height: placement.region.y_max - placement.region.y_min,
            text_color: color,
            background: theme.label_background,
        });
        Ok(())
    }
}
