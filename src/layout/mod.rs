mod placer;

pub use placer::{
    Annotation, OccupiedRegion, PlacedAnnotation, PlacementConfig, place_annotations,
};

pub(crate) use placer::{PlacementContext, place_annotations_in_context};
