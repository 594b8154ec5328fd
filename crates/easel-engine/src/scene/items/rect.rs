use std::f32::consts::{FRAC_PI_2, PI};

use crate::coords::Vec2;
use crate::error::Result;
use crate::paint::DrawStyle;
use crate::surface::Surface;
use crate::text::FontSpec;

use super::Shape;

/// Axis-aligned rectangle with its top-left corner on the item origin,
/// optionally with rounded corners.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub width: f32,
    pub height: f32,
    /// Corner radius; clamped to half the shorter side when drawn.
    pub radius: Option<f32>,
}

impl Rect {
    #[inline]
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height, radius: None }
    }

    #[inline]
    pub fn rounded(width: f32, height: f32, radius: f32) -> Self {
        Self { width, height, radius: Some(radius) }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.height
    }

    fn effective_radius(&self) -> f32 {
        self.radius
            .unwrap_or(0.0)
            .min(self.width / 2.0)
            .min(self.height / 2.0)
            .max(0.0)
    }
}

impl Shape for Rect {
    fn kind(&self) -> &'static str {
        "rect"
    }

    fn local_center(&self, _surface: &mut dyn Surface, _font: &FontSpec) -> Result<Vec2> {
        Ok(Vec2::new(self.width / 2.0, self.height / 2.0))
    }

    fn emit_path(&self, surface: &mut dyn Surface, _style: &DrawStyle) {
        let (w, h) = (self.width, self.height);
        let r = self.effective_radius();
        if r <= 0.0 {
            surface.rect(0.0, 0.0, w, h);
        } else {
            // Each arc joins the previous corner with a straight edge.
            surface.move_to(r, 0.0);
            surface.arc(w - r, r, r, -FRAC_PI_2, 0.0, false);
            surface.arc(w - r, h - r, r, 0.0, FRAC_PI_2, false);
            surface.arc(r, h - r, r, FRAC_PI_2, PI, false);
            surface.arc(r, r, r, PI, PI + FRAC_PI_2, false);
        }
        surface.close_path();
    }

    fn is_valid(&self) -> bool {
        let extent_ok = |v: f32| v.is_finite() && v >= 0.0;
        extent_ok(self.width) && extent_ok(self.height) && self.radius.is_none_or(extent_ok)
    }
}
