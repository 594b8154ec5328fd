use crate::coords::Vec2;

use super::Color;

/// A single gradient stop. `t` is the position along the gradient in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ColorStop {
    pub t: f32,
    pub color: Color,
}

impl ColorStop {
    #[inline]
    pub const fn new(t: f32, color: Color) -> Self {
        Self { t, color }
    }
}

/// Linear gradient between two points in item-local space.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    pub start: Vec2,
    pub end: Vec2,
    pub stops: Vec<ColorStop>,
}

impl LinearGradient {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end, stops: Vec::new() }
    }

    /// Appends a stop. Stops are kept in insertion order; the surface sorts if it must.
    pub fn color_stop(mut self, t: f32, color: Color) -> Self {
        self.stops.push(ColorStop::new(t, color));
        self
    }
}

/// Two-circle radial gradient in item-local space.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub start: Vec2,
    pub start_radius: f32,
    pub end: Vec2,
    pub end_radius: f32,
    pub stops: Vec<ColorStop>,
}

impl RadialGradient {
    pub fn new(start: Vec2, start_radius: f32, end: Vec2, end_radius: f32) -> Self {
        Self { start, start_radius, end, end_radius, stops: Vec::new() }
    }

    pub fn color_stop(mut self, t: f32, color: Color) -> Self {
        self.stops.push(ColorStop::new(t, color));
        self
    }
}

/// Gradient description.
///
/// Gradients are never shared with a surface: each draw realizes the
/// description against the surface it paints on.
#[derive(Debug, Clone, PartialEq)]
pub enum Gradient {
    Linear(LinearGradient),
    Radial(RadialGradient),
}

impl Gradient {
    pub fn stops(&self) -> &[ColorStop] {
        match self {
            Gradient::Linear(g) => &g.stops,
            Gradient::Radial(g) => &g.stops,
        }
    }

    /// Stops sorted by position with `t` clamped into `[0, 1]`.
    pub fn normalized_stops(&self) -> Vec<ColorStop> {
        let mut stops: Vec<ColorStop> = self
            .stops()
            .iter()
            .map(|s| ColorStop::new(s.t.clamp(0.0, 1.0), s.color))
            .collect();
        stops.sort_by(|a, b| a.t.total_cmp(&b.t));
        stops
    }

    /// Returns true when the geometry and every stop are finite.
    pub fn is_finite(&self) -> bool {
        let geometry = match self {
            Gradient::Linear(g) => g.start.is_finite() && g.end.is_finite(),
            Gradient::Radial(g) => {
                g.start.is_finite()
                    && g.end.is_finite()
                    && g.start_radius.is_finite()
                    && g.end_radius.is_finite()
            }
        };
        geometry && self.stops().iter().all(|s| s.t.is_finite() && s.color.is_finite())
    }
}

impl From<LinearGradient> for Gradient {
    fn from(g: LinearGradient) -> Self {
        Gradient::Linear(g)
    }
}

impl From<RadialGradient> for Gradient {
    fn from(g: RadialGradient) -> Self {
        Gradient::Radial(g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_stops_accumulate_in_order() {
        let g = LinearGradient::new(Vec2::zero(), Vec2::new(10.0, 0.0))
            .color_stop(0.0, Color::BLACK)
            .color_stop(1.0, Color::WHITE);
        assert_eq!(g.stops.len(), 2);
        assert_eq!(g.stops[1].color, Color::WHITE);
    }

    #[test]
    fn normalized_stops_sort_and_clamp() {
        let g: Gradient = RadialGradient::new(Vec2::zero(), 0.0, Vec2::zero(), 5.0)
            .color_stop(1.5, Color::WHITE)
            .color_stop(-0.5, Color::BLACK)
            .into();
        let stops = g.normalized_stops();
        assert_eq!(stops[0].t, 0.0);
        assert_eq!(stops[1].t, 1.0);
        assert_eq!(stops[0].color, Color::BLACK);
    }

    #[test]
    fn non_finite_radius_is_rejected() {
        let g: Gradient = RadialGradient::new(Vec2::zero(), f32::NAN, Vec2::zero(), 5.0).into();
        assert!(!g.is_finite());
    }
}
