use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Sample, TimeSeries};
use crate::error::{ChartError, ChartResult};

/// Reference interval considered "normal"; values outside it are flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    low: f64,
    high: f64,
}

impl ThresholdBand {
    pub fn new(low: f64, high: f64) -> ChartResult<Self> {
        if !low.is_finite() || !high.is_finite() || low >= high {
            return Err(ChartError::InvalidData(
                "threshold band must be finite with low < high".to_owned(),
            ));
        }
        Ok(Self { low, high })
    }

    /// Standard post-meal glycemic reference range in mmol/L.
    #[must_use]
    pub fn glycemic() -> Self {
        Self {
            low: 3.9,
            high: 7.8,
        }
    }

    #[must_use]
    pub fn low(self) -> f64 {
        self.low
    }

    #[must_use]
    pub fn high(self) -> f64 {
        self.high
    }

    /// Band membership; values exactly on a boundary count as in-band.
    #[must_use]
    pub fn classify(self, value: f64) -> BandClass {
        if value > self.high {
            BandClass::AboveBand
        } else if value < self.low {
            BandClass::BelowBand
        } else {
            BandClass::InBand
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandClass {
    InBand,
    AboveBand,
    BelowBand,
}

/// Curve sub-interval carrying a single band classification.
///
/// Consecutive segments share their meeting sample exactly, so concatenating
/// the output reconstructs the original polyline without gaps or duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSegment {
    pub start: Sample,
    pub end: Sample,
    pub class: BandClass,
}

/// Splits the series polyline at exact band-boundary crossings.
///
/// Each consecutive sample pair is checked against both thresholds; every true
/// crossing inserts an interpolated sample whose value equals the threshold.
/// Sub-segment classification depends only on its own endpoints, never on
/// neighboring segments.
#[must_use]
pub fn segment_series(series: &TimeSeries, band: ThresholdBand) -> Vec<CurveSegment> {
    let samples = series.samples();
    let mut segments = Vec::with_capacity(samples.len().saturating_sub(1));

    for pair in samples.windows(2) {
        let (p1, p2) = (pair[0], pair[1]);

        let mut crossings: SmallVec<[Sample; 2]> = SmallVec::new();
        for threshold in [band.low, band.high] {
            if let Some(crossing) = boundary_crossing(p1, p2, threshold) {
                crossings.push(crossing);
            }
        }
        crossings.sort_by(|a, b| a.time.cmp(&b.time));

        let mut cursor = p1;
        for crossing in crossings {
            segments.push(classified(cursor, crossing, band));
            cursor = crossing;
        }
        segments.push(classified(cursor, p2, band));
    }

    segments
}

fn classified(start: Sample, end: Sample, band: ThresholdBand) -> CurveSegment {
    let midpoint = 0.5 * (start.value + end.value);
    CurveSegment {
        start,
        end,
        class: band.classify(midpoint),
    }
}

/// Interpolated crossing of `threshold` strictly inside the pair, if any.
///
/// Endpoints sitting exactly on the threshold are in-band by classification and
/// produce no split; the value delta is therefore non-zero whenever the side
/// test fires, but a zero delta is still guarded against.
fn boundary_crossing(p1: Sample, p2: Sample, threshold: f64) -> Option<Sample> {
    let crosses = (p1.value <= threshold) != (p2.value <= threshold);
    let delta = p2.value - p1.value;
    if !crosses || delta == 0.0 {
        return None;
    }

    let fraction = (threshold - p1.value) / delta;
    if fraction <= 0.0 || fraction >= 1.0 {
        return None;
    }

    let span_ms = (p2.time - p1.time).num_milliseconds() as f64;
    let time = p1.time + TimeDelta::milliseconds((fraction * span_ms).round() as i64);
    Some(Sample {
        time,
        value: threshold,
    })
}
