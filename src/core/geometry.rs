use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{DayScale, GlucoseScale, Viewport};
use crate::error::{ChartError, ChartResult};

/// Canvas transform for one draw pass: day axis, value axis, viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub day_scale: DayScale,
    pub value_scale: GlucoseScale,
    pub viewport: Viewport,
}

impl FrameGeometry {
    pub fn new(
        day_scale: DayScale,
        value_scale: GlucoseScale,
        viewport: Viewport,
    ) -> ChartResult<Self> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            day_scale,
            value_scale,
            viewport,
        })
    }

    /// Maps a data-space point to pixel coordinates.
    pub fn position_of(&self, time: DateTime<Utc>, value: f64) -> ChartResult<(f64, f64)> {
        Ok((
            self.day_scale.time_to_pixel(time, self.viewport)?,
            self.value_scale.value_to_pixel(value, self.viewport)?,
        ))
    }
}
