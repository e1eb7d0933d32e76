//! Multi-day overlay support: re-bases independent day series onto one shared
//! 24-hour axis so days can be compared in a single frame.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{Sample, TimeSeries};
use crate::error::ChartResult;
use crate::layout::Annotation;

/// One day's worth of overlay input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayInput {
    pub series: TimeSeries,
    pub annotations: Vec<Annotation>,
}

impl DayInput {
    #[must_use]
    pub fn new(series: TimeSeries, annotations: Vec<Annotation>) -> Self {
        Self {
            series,
            annotations,
        }
    }
}

/// Arbitrary shared date all overlaid days are re-based onto.
#[must_use]
pub fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Keeps the time-of-day component and swaps the calendar date.
#[must_use]
pub fn normalize_time(time: DateTime<Utc>, reference: NaiveDate) -> DateTime<Utc> {
    reference.and_time(time.time()).and_utc()
}

#[must_use]
pub fn normalize_sample(sample: Sample, reference: NaiveDate) -> Sample {
    Sample {
        time: normalize_time(sample.time, reference),
        value: sample.value,
    }
}

/// Re-bases a whole day series onto the reference date.
///
/// A single-day series stays monotonic under normalization; the rebuilt series
/// re-validates that, so a series leaking across midnight surfaces as an error
/// instead of a scrambled axis.
pub fn normalize_series(series: &TimeSeries, reference: NaiveDate) -> ChartResult<TimeSeries> {
    TimeSeries::new(
        series
            .samples()
            .iter()
            .map(|sample| normalize_sample(*sample, reference))
            .collect(),
    )
}

#[must_use]
pub fn normalize_annotation(annotation: &Annotation, reference: NaiveDate) -> Annotation {
    Annotation {
        time: normalize_time(annotation.time, reference),
        text: annotation.text.clone(),
        explicit_offset: annotation.explicit_offset,
    }
}
