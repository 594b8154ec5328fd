//! Drawable shape items.
//!
//! Each shape kind lives in its own file and implements [`Shape`]; [`Geometry`]
//! dispatches over the closed set of kinds and [`Item`] adds the per-item
//! transform and style every kind shares.

mod circle;
mod item;
mod path;
mod polygon;
mod rect;
mod text;

pub use circle::Circle;
pub use item::{Item, SharedItem};
pub use path::{Path, PathSegment};
pub use polygon::Polygon;
pub use rect::Rect;
pub use text::Text;

use crate::coords::Vec2;
use crate::error::Result;
use crate::paint::DrawStyle;
use crate::surface::Surface;
use crate::text::FontSpec;

/// Capability every shape kind provides to the shared draw procedure.
pub trait Shape {
    /// Short lowercase name for logs and errors.
    fn kind(&self) -> &'static str;

    /// Pivot for rotation and scale, in shape-local coordinates.
    ///
    /// `font` is the item's own stored font; only text reads it.
    fn local_center(&self, surface: &mut dyn Surface, font: &FontSpec) -> Result<Vec2>;

    /// Emits the shape outline into the surface's current path.
    fn emit_path(&self, surface: &mut dyn Surface, style: &DrawStyle);

    /// True when the emitted path should be stroked and filled afterwards.
    /// Text paints itself while emitting.
    fn paints_path(&self) -> bool {
        true
    }

    /// False for non-finite coordinates or negative extents.
    fn is_valid(&self) -> bool;
}

/// Geometry of one item.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Circle(Circle),
    Rect(Rect),
    Path(Path),
    Polygon(Polygon),
    Text(Text),
}

impl Geometry {
    #[inline]
    pub fn shape(&self) -> &dyn Shape {
        match self {
            Geometry::Circle(s) => s,
            Geometry::Rect(s) => s,
            Geometry::Path(s) => s,
            Geometry::Polygon(s) => s,
            Geometry::Text(s) => s,
        }
    }
}

impl From<Circle> for Geometry {
    fn from(s: Circle) -> Self {
        Geometry::Circle(s)
    }
}

impl From<Rect> for Geometry {
    fn from(s: Rect) -> Self {
        Geometry::Rect(s)
    }
}

impl From<Path> for Geometry {
    fn from(s: Path) -> Self {
        Geometry::Path(s)
    }
}

impl From<Polygon> for Geometry {
    fn from(s: Polygon) -> Self {
        Geometry::Polygon(s)
    }
}

impl From<Text> for Geometry {
    fn from(s: Text) -> Self {
        Geometry::Text(s)
    }
}
