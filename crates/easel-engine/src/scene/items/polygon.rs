use std::f32::consts::TAU;

use crate::coords::Vec2;
use crate::error::Result;
use crate::paint::DrawStyle;
use crate::surface::Surface;
use crate::text::FontSpec;

use super::Shape;

/// Regular polygon centered on the item origin, first vertex on the +x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    sides: u32,
    radius: f32,
    points: Vec<Vec2>,
}

impl Polygon {
    pub fn new(sides: u32, radius: f32) -> Self {
        let mut polygon = Self {
            sides: 0,
            radius: 0.0,
            points: Vec::new(),
        };
        polygon.set_points(sides, radius);
        polygon
    }

    /// Regenerates the vertices for `sides` corners at `radius`.
    pub fn set_points(&mut self, sides: u32, radius: f32) -> &mut Self {
        let step = if sides == 0 { 0.0 } else { TAU / sides as f32 };
        self.sides = sides;
        self.radius = radius;
        self.points = (0..sides).map(|i| Vec2::polar(radius, i as f32 * step)).collect();
        self
    }

    #[inline]
    pub fn sides(&self) -> u32 {
        self.sides
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }
}

impl Shape for Polygon {
    fn kind(&self) -> &'static str {
        "polygon"
    }

    fn local_center(&self, _surface: &mut dyn Surface, _font: &FontSpec) -> Result<Vec2> {
        Ok(Vec2::zero())
    }

    fn emit_path(&self, surface: &mut dyn Surface, _style: &DrawStyle) {
        for p in &self.points {
            surface.line_to(p.x, p.y);
        }
        surface.close_path();
    }

    fn is_valid(&self) -> bool {
        self.radius.is_finite() && self.radius >= 0.0 && self.points.iter().all(|p| p.is_finite())
    }
}
