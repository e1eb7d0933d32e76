pub mod band;
pub mod day_scale;
pub mod geometry;
pub mod glucose_scale;
pub mod scale;
pub mod types;
pub mod units;

pub use band::{BandClass, CurveSegment, ThresholdBand, segment_series};
pub use day_scale::DayScale;
pub use geometry::FrameGeometry;
pub use glucose_scale::{AxisTuning, GlucoseScale};
pub use scale::LinearScale;
pub use types::{Sample, TimeSeries, Viewport};
