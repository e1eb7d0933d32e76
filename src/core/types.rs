use chrono::{DateTime, NaiveDate, Utc};
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::units::decimal_to_f64;
use crate::error::{ChartError, ChartResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One timestamped glucose reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub time: DateTime<Utc>,
    pub value: f64,
}

impl Sample {
    pub fn new(time: DateTime<Utc>, value: f64) -> ChartResult<Self> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData(
                "sample value must be finite".to_owned(),
            ));
        }
        Ok(Self { time, value })
    }

    /// Builds a sample from a decimal reading as supplied by tabular loaders.
    pub fn from_decimal(time: DateTime<Utc>, value: Decimal) -> ChartResult<Self> {
        Self::new(time, decimal_to_f64(value, "glucose value")?)
    }
}

/// Ordered, non-empty reading sequence for one calendar day.
///
/// Construction is the only mutation point; everything downstream borrows the
/// samples read-only, so one series can feed segmentation and annotation
/// placement from parallel render calls without coordination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    samples: Vec<Sample>,
}

impl TimeSeries {
    /// Validates ordering and finiteness up front.
    ///
    /// Timestamp ties are allowed and keep input order; a backwards step is a
    /// loader bug and is rejected.
    pub fn new(samples: Vec<Sample>) -> ChartResult<Self> {
        if samples.is_empty() {
            return Err(ChartError::EmptySeries);
        }

        for pair in samples.windows(2) {
            if pair[1].time < pair[0].time {
                return Err(ChartError::InvalidData(
                    "samples must be ordered ascending by timestamp".to_owned(),
                ));
            }
        }

        Ok(Self { samples })
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn first(&self) -> Sample {
        self.samples[0]
    }

    #[must_use]
    pub fn last(&self) -> Sample {
        self.samples[self.samples.len() - 1]
    }

    /// Calendar day of the first sample.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.samples[0].time.date_naive()
    }

    /// Min/max value envelope over all samples.
    #[must_use]
    pub fn value_bounds(&self) -> (f64, f64) {
        let mut min = OrderedFloat(self.samples[0].value);
        let mut max = min;
        for sample in &self.samples {
            min = min.min(OrderedFloat(sample.value));
            max = max.max(OrderedFloat(sample.value));
        }
        (min.into_inner(), max.into_inner())
    }

    /// Resolves the sample closest in absolute time to `time`.
    ///
    /// Exact matches win trivially; ties resolve to the earliest index. A
    /// timestamp outside the series range is a normal lookup, not an error.
    /// Linear scan; fine at daily sample counts.
    #[must_use]
    pub fn nearest_sample(&self, time: DateTime<Utc>) -> Sample {
        let mut best = self.samples[0];
        let mut best_distance = i64::MAX;
        for sample in &self.samples {
            let distance = (sample.time - time).num_milliseconds().abs();
            if distance < best_distance {
                best = *sample;
                best_distance = distance;
            }
        }
        best
    }
}
