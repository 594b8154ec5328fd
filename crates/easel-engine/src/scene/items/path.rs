use crate::coords::Vec2;
use crate::error::{Result, SceneError};
use crate::paint::DrawStyle;
use crate::surface::Surface;
use crate::text::FontSpec;

use super::Shape;

/// One segment of a [`Path`], in path-local coordinates.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PathSegment {
    Line(Vec2),
    Quadratic { control: Vec2, to: Vec2 },
    Cubic { control1: Vec2, control2: Vec2, to: Vec2 },
}

/// Open or closed path starting at the item origin.
///
/// Builder methods take absolute coordinates and store them relative to the
/// start point given to [`Path::new`]; converting the path into an
/// [`Item`](super::Item) places the item at that start point.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    start: Vec2,
    segments: Vec<PathSegment>,
    closed: bool,
}

impl Path {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            start: Vec2::new(x, y),
            segments: Vec::new(),
            closed: false,
        }
    }

    /// Absolute start point the segments are stored relative to.
    #[inline]
    pub fn start(&self) -> Vec2 {
        self.start
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn local(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y) - self.start
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        let to = self.local(x, y);
        self.segments.push(PathSegment::Line(to));
        self
    }

    /// Alias of [`line_to`](Self::line_to).
    #[inline]
    pub fn to(&mut self, x: f32, y: f32) -> &mut Self {
        self.line_to(x, y)
    }

    pub fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) -> &mut Self {
        let segment = PathSegment::Quadratic {
            control: self.local(cx, cy),
            to: self.local(x, y),
        };
        self.segments.push(segment);
        self
    }

    pub fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) -> &mut Self {
        let segment = PathSegment::Cubic {
            control1: self.local(c1x, c1y),
            control2: self.local(c2x, c2y),
            to: self.local(x, y),
        };
        self.segments.push(segment);
        self
    }

    /// Closes the path back to its start when drawn.
    pub fn close(&mut self) -> &mut Self {
        self.closed = true;
        self
    }

    fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.segments.iter().flat_map(|s| {
            let pts: [Option<Vec2>; 3] = match *s {
                PathSegment::Line(p) => [Some(p), None, None],
                PathSegment::Quadratic { control, to } => [Some(control), Some(to), None],
                PathSegment::Cubic { control1, control2, to } => [Some(control1), Some(control2), Some(to)],
            };
            pts.into_iter().flatten()
        })
    }
}

impl Shape for Path {
    fn kind(&self) -> &'static str {
        "path"
    }

    /// Average of every end and control point; the start point is not counted.
    fn local_center(&self, _surface: &mut dyn Surface, _font: &FontSpec) -> Result<Vec2> {
        let (sum, n) = self.points().fold((Vec2::zero(), 0u32), |(sum, n), p| (sum + p, n + 1));
        if n == 0 {
            return Err(SceneError::DegenerateGeometry("path"));
        }
        Ok(sum / n as f32)
    }

    fn emit_path(&self, surface: &mut dyn Surface, _style: &DrawStyle) {
        surface.move_to(0.0, 0.0);
        for segment in &self.segments {
            match *segment {
                PathSegment::Line(p) => surface.line_to(p.x, p.y),
                PathSegment::Quadratic { control, to } => {
                    surface.quadratic_curve_to(control.x, control.y, to.x, to.y)
                }
                PathSegment::Cubic { control1, control2, to } => surface.bezier_curve_to(
                    control1.x, control1.y, control2.x, control2.y, to.x, to.y,
                ),
            }
        }
        if self.closed {
            surface.close_path();
        }
    }

    fn is_valid(&self) -> bool {
        self.start.is_finite() && self.points().all(Vec2::is_finite)
    }
}
