//! Retained scene: shape items, their keyed paint order and the scene that
//! redraws them.

pub mod items;
mod registry;
mod stage;

pub use items::{Circle, Geometry, Item, Path, PathSegment, Polygon, Rect, Shape, SharedItem, Text};
pub use registry::{Registry, RegistryEntry};
pub use stage::Scene;
