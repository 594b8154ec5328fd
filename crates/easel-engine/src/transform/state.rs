use crate::coords::Vec2;

use super::matrix::{self, AffineMatrix};

/// Per-item transform state.
///
/// Every component is `None` when it is the identity for that component;
/// setters collapse identity values (zero offset, zero angle, unit scale,
/// identity matrix) back to `None` so [`is_identity`](Self::is_identity) stays cheap.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ItemTransform {
    pub translate: Option<Vec2>,
    /// Radians.
    pub rotate: Option<f32>,
    pub scale: Option<Vec2>,
    pub matrix: Option<AffineMatrix>,
    pub hidden: bool,
}

impl ItemTransform {
    pub fn move_to(&mut self, x: f32, y: f32) {
        let t = Vec2::new(x, y);
        self.translate = (!t.is_zero()).then_some(t);
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) {
        match self.translate {
            Some(t) => self.move_to(t.x + dx, t.y + dy),
            None => self.move_to(dx, dy),
        }
    }

    /// Absolute rotation in degrees.
    pub fn rotate(&mut self, degrees: f32) {
        self.set_radians(degrees.to_radians());
    }

    /// Relative rotation in degrees.
    pub fn rotate_by(&mut self, degrees: f32) {
        match self.rotate {
            Some(current) => self.set_radians(current + degrees.to_radians()),
            None => self.rotate(degrees),
        }
    }

    fn set_radians(&mut self, radians: f32) {
        self.rotate = (radians != 0.0).then_some(radians);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.scale = (sx != 1.0 || sy != 1.0).then_some(Vec2::new(sx, sy));
    }

    /// Adds to the current scale factors. With no current scale the deltas
    /// become the new factors.
    pub fn scale_by(&mut self, dx: f32, dy: f32) {
        match self.scale {
            Some(s) => self.scale(s.x + dx, s.y + dy),
            None => self.scale(dx, dy),
        }
    }

    pub fn set_matrix(&mut self, m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) {
        self.matrix = matrix::set_absolute(m11, m12, m21, m22, dx, dy);
    }

    pub fn change_matrix(&mut self, m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) {
        let m = matrix::compose(self.matrix, m11, m12, m21, m22, dx, dy);
        self.matrix = (!m.is_identity()).then_some(m);
    }

    /// True when rotation or scale needs the shape's pivot.
    #[inline]
    pub fn needs_pivot(&self) -> bool {
        self.rotate.is_some() || self.scale.is_some()
    }

    /// True when no component would change the item's placement.
    #[inline]
    pub fn is_identity(&self) -> bool {
        self.translate.is_none() && self.rotate.is_none() && self.scale.is_none() && self.matrix.is_none()
    }

    pub fn is_finite(&self) -> bool {
        self.translate.is_none_or(|t| t.is_finite())
            && self.rotate.is_none_or(|r| r.is_finite())
            && self.scale.is_none_or(|s| s.is_finite())
            && self.matrix.is_none_or(|m| m.is_finite())
    }
}
