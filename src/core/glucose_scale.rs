use serde::{Deserialize, Serialize};

use crate::core::{LinearScale, TimeSeries, Viewport};
use crate::error::{ChartError, ChartResult};

/// Tuning controls for the value-axis range policy.
///
/// `floor` keeps the reference band on screen even when all readings sit above
/// it; `top_margin` reserves headroom so labels at maximum vertical offset stay
/// on-canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisTuning {
    pub floor: f64,
    pub bottom_margin: f64,
    pub top_margin: f64,
}

impl Default for AxisTuning {
    fn default() -> Self {
        Self {
            floor: 3.5,
            bottom_margin: 0.5,
            top_margin: 3.5,
        }
    }
}

impl AxisTuning {
    /// Overlay charts stack several days' labels in less vertical spread per
    /// label, so they run with a tighter top margin.
    #[must_use]
    pub fn overlay() -> Self {
        Self {
            top_margin: 1.5,
            ..Self::default()
        }
    }

    fn validate(self) -> ChartResult<Self> {
        if !self.floor.is_finite() || self.floor < 0.0 {
            return Err(ChartError::InvalidData(
                "axis floor must be finite and >= 0".to_owned(),
            ));
        }
        if !self.bottom_margin.is_finite()
            || !self.top_margin.is_finite()
            || self.bottom_margin < 0.0
            || self.top_margin <= 0.0
        {
            return Err(ChartError::InvalidData(
                "axis margins must be finite, bottom >= 0 and top > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Value axis mapped to an inverted Y pixel axis (larger value, smaller y).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlucoseScale {
    linear: LinearScale,
}

impl GlucoseScale {
    pub fn from_series(series: &TimeSeries, tuning: AxisTuning) -> ChartResult<Self> {
        let (min, max) = series.value_bounds();
        Self::from_bounds(min, max, tuning)
    }

    /// Range policy: `[max(0, min(floor, min - bottom_margin)), max + top_margin]`.
    pub fn from_bounds(value_min: f64, value_max: f64, tuning: AxisTuning) -> ChartResult<Self> {
        let tuning = tuning.validate()?;
        if !value_min.is_finite() || !value_max.is_finite() || value_min > value_max {
            return Err(ChartError::InvalidData(
                "value bounds must be finite with min <= max".to_owned(),
            ));
        }

        let axis_min = tuning.floor.min(value_min - tuning.bottom_margin).max(0.0);
        let axis_max = value_max + tuning.top_margin;
        Ok(Self {
            linear: LinearScale::new(axis_min, axis_max)?,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        self.linear.domain()
    }

    pub fn value_to_pixel(self, value: f64, viewport: Viewport) -> ChartResult<f64> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let height = f64::from(viewport.height);
        Ok(height - self.linear.domain_to_pixel(value, height)?)
    }

    pub fn pixel_to_value(self, pixel: f64, viewport: Viewport) -> ChartResult<f64> {
        if !viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let height = f64::from(viewport.height);
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }
        self.linear.pixel_to_domain(height - pixel, height)
    }
}
