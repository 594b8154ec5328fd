use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::error::Result;
use crate::paint::DrawStyle;
use crate::surface::Surface;
use crate::text::FontSpec;

use super::Shape;

/// Circle centered on the item origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub radius: f32,
}

impl Circle {
    #[inline]
    pub fn new(radius: f32) -> Self {
        Self { radius }
    }
}

impl Shape for Circle {
    fn kind(&self) -> &'static str {
        "circle"
    }

    fn local_center(&self, _surface: &mut dyn Surface, _font: &FontSpec) -> Result<Vec2> {
        Ok(Vec2::zero())
    }

    fn emit_path(&self, surface: &mut dyn Surface, _style: &DrawStyle) {
        surface.move_to(self.radius, 0.0);
        surface.arc(0.0, 0.0, self.radius, 0.0, TAU, false);
        surface.close_path();
    }

    fn is_valid(&self) -> bool {
        self.radius.is_finite() && self.radius >= 0.0
    }
}
