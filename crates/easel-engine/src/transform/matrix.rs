use crate::coords::Vec2;

/// 2x3 affine matrix in canvas order.
///
/// Maps a point as:
/// ```text
/// x' = m11 * x + m21 * y + dx
/// y' = m12 * x + m22 * y + dy
/// ```
/// which matches the six arguments of a canvas `setTransform(a, b, c, d, e, f)`.
///
/// Items store `Option<AffineMatrix>`; `None` is the identity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AffineMatrix {
    pub m11: f32,
    pub m12: f32,
    pub m21: f32,
    pub m22: f32,
    pub dx: f32,
    pub dy: f32,
}

impl AffineMatrix {
    pub const IDENTITY: AffineMatrix = AffineMatrix::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    #[inline]
    pub const fn new(m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> Self {
        Self { m11, m12, m21, m22, dx, dy }
    }

    #[inline]
    pub const fn translation(x: f32, y: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, x, y)
    }

    #[inline]
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    #[inline]
    pub const fn scaling(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Exact comparison against `(1, 0, 0, 1, 0, 0)`.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Matrix product `self · other`.
    ///
    /// The result maps a point through `other` first, then through `self`; the
    /// same as setting `self` on a surface and then applying `other` on top.
    #[inline]
    pub fn concat(&self, other: &AffineMatrix) -> AffineMatrix {
        AffineMatrix {
            m11: self.m11 * other.m11 + self.m21 * other.m12,
            m12: self.m12 * other.m11 + self.m22 * other.m12,
            m21: self.m11 * other.m21 + self.m21 * other.m22,
            m22: self.m12 * other.m21 + self.m22 * other.m22,
            dx: self.m11 * other.dx + self.m21 * other.dy + self.dx,
            dy: self.m12 * other.dx + self.m22 * other.dy + self.dy,
        }
    }

    #[inline]
    pub fn transform_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            self.m11 * p.x + self.m21 * p.y + self.dx,
            self.m12 * p.x + self.m22 * p.y + self.dy,
        )
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        [self.m11, self.m12, self.m21, self.m22, self.dx, self.dy]
            .iter()
            .all(|v| v.is_finite())
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Relative matrix change: multiplies the given matrix into `existing`
/// (identity when `None`), as repeated `change_matrix` calls accumulate.
pub fn compose(
    existing: Option<AffineMatrix>,
    m11: f32,
    m12: f32,
    m21: f32,
    m22: f32,
    dx: f32,
    dy: f32,
) -> AffineMatrix {
    let next = AffineMatrix::new(m11, m12, m21, m22, dx, dy);
    existing.unwrap_or(AffineMatrix::IDENTITY).concat(&next)
}

/// Absolute matrix set. The exact identity tuple collapses to `None`.
pub fn set_absolute(m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> Option<AffineMatrix> {
    let m = AffineMatrix::new(m11, m12, m21, m22, dx, dy);
    (!m.is_identity()).then_some(m)
}
