use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{
    ConnectorPrimitive, FillPrimitive, LabelBoxPrimitive, LinePrimitive, TextPrimitive,
};

/// Computed axis ranges for one frame, handed to the backend alongside the
/// primitives so it can paint axes and gridlines itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisRanges {
    pub time_start: DateTime<Utc>,
    pub time_end: DateTime<Utc>,
    pub value_min: f64,
    pub value_max: f64,
    pub hour_ticks: Vec<DateTime<Utc>>,
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub axes: AxisRanges,
    pub fills: Vec<FillPrimitive>,
    pub lines: Vec<LinePrimitive>,
    pub connectors: Vec<ConnectorPrimitive>,
    pub labels: Vec<LabelBoxPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport, axes: AxisRanges) -> Self {
        Self {
            viewport,
            axes,
            fills: Vec::new(),
            lines: Vec::new(),
            connectors: Vec::new(),
            labels: Vec::new(),
            texts: Vec::new(),
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        if self.axes.time_end <= self.axes.time_start {
            return Err(ChartError::InvalidData(
                "axis time range must be non-empty".to_owned(),
            ));
        }
        if !self.axes.value_min.is_finite()
            || !self.axes.value_max.is_finite()
            || self.axes.value_min >= self.axes.value_max
        {
            return Err(ChartError::InvalidData(
                "axis value range must be finite and non-empty".to_owned(),
            ));
        }

        for fill in &self.fills {
            fill.validate()?;
        }
        for line in &self.lines {
            line.validate()?;
        }
        for connector in &self.connectors {
            connector.validate()?;
        }
        for label in &self.labels {
            label.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
            && self.lines.is_empty()
            && self.connectors.is_empty()
            && self.labels.is_empty()
            && self.texts.is_empty()
    }
}
