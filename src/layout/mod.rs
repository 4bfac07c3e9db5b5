//! Course layout: connectors, number labels and special-object geometry
//!
//! This module is organized into submodules:
//! - `defaults`: Symbol sizes and placement settings
//! - `geometry`: Segment distances and the `Geometry` type
//! - `symbols`: Start triangle, control circle and finish rings
//! - `connectors`: Trimmed leg lines between consecutive controls
//! - `labels`: Maximin placement of control numbers
//! - `special`: White-outs, description boxes and lines as geometry
//! - `context`: Runs the whole pipeline for one course
//! - `features`: GeoJSON-like features and the paper-to-SVG transform

pub mod connectors;
pub mod context;
pub mod defaults;
pub mod features;
pub mod geometry;
pub mod labels;
pub mod special;
pub mod symbols;

// Re-export commonly used items
pub use connectors::{Connector, chop_line, compute_connectors};
pub use context::{CourseLayout, LayoutInput, LayoutTarget};
pub use defaults::CircleDiameter;
pub use features::{Feature, FeatureKind, PaperTransform};
pub use geometry::{Geometry, line_segment_distance, point_to_geometry_distance};
pub use labels::{LabelSettings, NumberLabel, place_labels, text_distance};
pub use special::{SpecialGeometry, special_geometries, special_geometry};
pub use symbols::{Symbol, SymbolEnum};
