mod frame;
mod null_renderer;
mod primitives;
mod theme;

pub use frame::{AxisRanges, RenderFrame};
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, ConnectorPrimitive, FillPrimitive, LabelBoxPrimitive, LinePrimitive, LineStrokeStyle,
    TextHAlign, TextPrimitive,
};
pub use theme::{ChartTheme, DAY_ANNOTATION_PALETTE, DAY_PALETTE, day_annotation_color, day_color};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// painting and export stay isolated from chart domain logic.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
