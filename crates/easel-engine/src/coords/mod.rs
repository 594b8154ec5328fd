//! Coordinate types shared by items, transforms and surfaces.
//!
//! Canonical space:
//! - logical pixels, origin top-left
//! - +X right, +Y down
//! - angles in radians once stored (item mutators take degrees)

mod vec2;
mod viewport;

pub use vec2::Vec2;
pub use viewport::Viewport;
