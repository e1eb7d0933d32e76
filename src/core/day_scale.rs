use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::core::units::datetime_to_unix_seconds;
use crate::core::{LinearScale, Viewport};
use crate::error::{ChartError, ChartResult};

/// X axis covering the full `[00:00, 24:00)` span of one calendar day.
///
/// The domain is fixed to the whole day regardless of where the samples start
/// or end, so a partial day still renders against the familiar 24-hour frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayScale {
    day_start: DateTime<Utc>,
    linear: LinearScale,
}

impl DayScale {
    pub fn for_day(day: NaiveDate) -> ChartResult<Self> {
        let day_start = day.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start
            .checked_add_signed(TimeDelta::hours(24))
            .ok_or_else(|| {
                ChartError::InvalidData("day is out of representable datetime range".to_owned())
            })?;
        let linear = LinearScale::new(
            datetime_to_unix_seconds(day_start),
            datetime_to_unix_seconds(day_end),
        )?;
        Ok(Self { day_start, linear })
    }

    #[must_use]
    pub fn day_start(self) -> DateTime<Utc> {
        self.day_start
    }

    pub fn time_to_pixel(self, time: DateTime<Utc>, viewport: Viewport) -> ChartResult<f64> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        self.linear
            .domain_to_pixel(datetime_to_unix_seconds(time), f64::from(viewport.width))
    }

    /// Tick instants at `interval_hours` steps, including both day edges.
    pub fn hour_ticks(self, interval_hours: u32) -> ChartResult<Vec<DateTime<Utc>>> {
        if interval_hours == 0 || interval_hours > 24 {
            return Err(ChartError::InvalidData(
                "hour tick interval must be in 1..=24".to_owned(),
            ));
        }

        let mut ticks = Vec::with_capacity(24 / interval_hours as usize + 1);
        let mut hour = 0_u32;
        while hour <= 24 {
            ticks.push(self.day_start + TimeDelta::hours(i64::from(hour)));
            hour += interval_hours;
        }
        if hour - interval_hours < 24 {
            ticks.push(self.day_start + TimeDelta::hours(24));
        }
        Ok(ticks)
    }
}
