// Library exports for plecfinder
pub mod branch;
pub mod combine;
pub mod conflict;
pub mod conformation;
pub mod finder;
pub mod geometry;
pub mod overlap;
pub mod pairs;
pub mod plectoneme;
pub mod topology;
pub mod tracer;
pub mod writhe_map;

pub use finder::{FinderConfig, PlecFinder};
pub use topology::Topology;
pub use writhe_map::{SegmentWritheMapper, WritheMapper, WritheMatrix};
