//! Paint model shared between items and surfaces.
//!
//! Scope:
//! - color representation (premultiplied alpha)
//! - gradient descriptions (linear, radial)
//! - style sources (flat paint or per-draw callback) and per-item draw styles

pub mod color;
pub mod gradient;
pub mod style;

use std::fmt;
use std::rc::Rc;

pub use color::{Color, ColorParseError};
pub use gradient::{ColorStop, Gradient, LinearGradient, RadialGradient};
pub use style::{DrawOptions, DrawStyle, LineCap, LineJoin, Override, Shadow};

use crate::scene::Item;
use crate::surface::Surface;

/// Concrete paint for a stroke or fill.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Gradient(Gradient),
}

impl Paint {
    #[inline]
    pub fn solid(color: Color) -> Self {
        Paint::Solid(color)
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Paint::Solid(c) => c.is_finite(),
            Paint::Gradient(g) => g.is_finite(),
        }
    }
}

impl From<Color> for Paint {
    fn from(c: Color) -> Self {
        Paint::Solid(c)
    }
}

impl From<Gradient> for Paint {
    fn from(g: Gradient) -> Self {
        Paint::Gradient(g)
    }
}

impl From<LinearGradient> for Paint {
    fn from(g: LinearGradient) -> Self {
        Paint::Gradient(g.into())
    }
}

impl From<RadialGradient> for Paint {
    fn from(g: RadialGradient) -> Self {
        Paint::Gradient(g.into())
    }
}

/// Callback producing a paint at draw time. Receives the item being drawn and
/// the surface it is drawn on.
pub type DynamicPaint = Rc<dyn Fn(&Item, &mut dyn Surface) -> Paint>;

/// Where a stroke or fill paint comes from.
///
/// Resolved once per item per draw: flat paints pass through, gradients are
/// realized against the target surface, callbacks are invoked.
#[derive(Clone)]
pub enum StyleSource {
    Paint(Paint),
    Dynamic(DynamicPaint),
}

impl StyleSource {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Item, &mut dyn Surface) -> Paint + 'static,
    {
        StyleSource::Dynamic(Rc::new(f))
    }

    /// Produces the concrete paint for this draw.
    pub fn resolve(&self, item: &Item, surface: &mut dyn Surface) -> Paint {
        match self {
            StyleSource::Paint(p) => p.clone(),
            StyleSource::Dynamic(f) => f(item, surface),
        }
    }
}

impl fmt::Debug for StyleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleSource::Paint(p) => f.debug_tuple("Paint").field(p).finish(),
            StyleSource::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Paint> for StyleSource {
    fn from(p: Paint) -> Self {
        StyleSource::Paint(p)
    }
}

impl From<Color> for StyleSource {
    fn from(c: Color) -> Self {
        StyleSource::Paint(Paint::Solid(c))
    }
}

impl From<Gradient> for StyleSource {
    fn from(g: Gradient) -> Self {
        StyleSource::Paint(Paint::Gradient(g))
    }
}

impl From<LinearGradient> for StyleSource {
    fn from(g: LinearGradient) -> Self {
        StyleSource::Paint(g.into())
    }
}

impl From<RadialGradient> for StyleSource {
    fn from(g: RadialGradient) -> Self {
        StyleSource::Paint(g.into())
    }
}
