//! glucochart: composition engine for daily blood-glucose charts.
//!
//! The crate takes an already-loaded day of readings plus event annotations
//! and produces backend-agnostic draw primitives: a curve split and colored at
//! reference-band crossings, an area fill, threshold reference lines, and
//! collision-aware annotation labels with curved leader lines. Painting and
//! export belong to whichever `render::Renderer` implementation the host
//! plugs in.

pub mod compose;
pub mod core;
pub mod error;
pub mod layout;
pub mod overlay;
pub mod render;
pub mod telemetry;

pub use compose::{ChartComposer, ComposeConfig};
pub use error::{ChartError, ChartResult};
