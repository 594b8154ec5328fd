use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// 2D point or offset in item-local (logical pixel) space.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Point on the circle of `radius` around the origin at `angle` radians.
    #[inline]
    pub fn polar(radius: f32, angle: f32) -> Self {
        Self::new(radius * angle.cos(), radius * angle.sin())
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

macro_rules! componentwise {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Vec2 {
            type Output = Vec2;
            #[inline]
            fn $method(self, rhs: Vec2) -> Vec2 {
                Vec2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }
    };
}

macro_rules! scalar {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<f32> for Vec2 {
            type Output = Vec2;
            #[inline]
            fn $method(self, k: f32) -> Vec2 {
                Vec2::new(self.x $op k, self.y $op k)
            }
        }
    };
}

componentwise!(Add, add, +);
componentwise!(Sub, sub, -);
scalar!(Mul, mul, *);
scalar!(Div, div, /);

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        self * -1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn polar_quarter_turn_points_down() {
        let p = Vec2::polar(2.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-6);
        assert!((p.y - 2.0).abs() < 1e-6);
    }

    #[test]
    fn ops_are_componentwise() {
        let mut a = Vec2::new(1.0, 2.0);
        a += Vec2::new(1.0, 1.0);
        assert_eq!(a - Vec2::new(2.0, 3.0), Vec2::zero());
        assert_eq!(-a * 2.0 / 4.0, Vec2::new(-1.0, -1.5));
    }

    #[test]
    fn non_finite_is_detected() {
        assert!(!Vec2::new(f32::NAN, 0.0).is_finite());
        assert!(Vec2::zero().is_zero());
    }
}
