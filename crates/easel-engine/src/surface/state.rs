use crate::paint::{Color, Gradient, LineCap, LineJoin, Paint, Shadow};
use crate::text::FontSpec;
use crate::transform::AffineMatrix;

use super::CompositeOp;

/// Opaque handle to a gradient realized on one surface.
///
/// Only meaningful on the surface that issued it, and only until that
/// surface's state stack unwinds back to its base level.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct PatternHandle(u32);

impl PatternHandle {
    #[inline]
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Stroke or fill style as stored in surface state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum SurfaceStyle {
    Color(Color),
    Pattern(PatternHandle),
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        SurfaceStyle::Color(Color::BLACK)
    }
}

impl From<Color> for SurfaceStyle {
    fn from(c: Color) -> Self {
        SurfaceStyle::Color(c)
    }
}

/// Result of a text measurement.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width in pixels.
    pub width: f32,
}

/// Current paint state of a surface; saved and restored as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintState {
    pub fill_style: SurfaceStyle,
    pub stroke_style: SurfaceStyle,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub shadow: Shadow,
    pub global_alpha: f32,
    pub composite: CompositeOp,
    pub font: FontSpec,
    pub transform: AffineMatrix,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            fill_style: SurfaceStyle::default(),
            stroke_style: SurfaceStyle::default(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            shadow: Shadow::default(),
            global_alpha: 1.0,
            composite: CompositeOp::SourceOver,
            font: FontSpec::default(),
            transform: AffineMatrix::IDENTITY,
        }
    }
}

/// Save/restore stack plus the gradients realized while it was above base level.
#[derive(Debug, Default)]
pub struct PaintStack {
    current: PaintState,
    saved: Vec<PaintState>,
    patterns: Vec<Gradient>,
}

impl PaintStack {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> &PaintState {
        &self.current
    }

    #[inline]
    pub fn current_mut(&mut self) -> &mut PaintState {
        &mut self.current
    }

    /// Number of states currently saved.
    #[inline]
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// Pops the last saved state. Returns `false` if nothing was saved.
    ///
    /// Realized gradients are dropped once the stack is back at base level.
    pub fn restore(&mut self) -> bool {
        let Some(state) = self.saved.pop() else {
            return false;
        };
        self.current = state;
        if self.saved.is_empty() && !self.patterns.is_empty() {
            log::trace!("dropping {} realized gradient(s)", self.patterns.len());
            self.patterns.clear();
        }
        true
    }

    pub fn register_pattern(&mut self, gradient: &Gradient) -> PatternHandle {
        let handle = PatternHandle::new(self.patterns.len() as u32);
        self.patterns.push(gradient.clone());
        handle
    }

    #[inline]
    pub fn pattern(&self, handle: PatternHandle) -> Option<&Gradient> {
        self.patterns.get(handle.index() as usize)
    }

    /// Concrete paint behind a stored style. `None` for a stale pattern handle.
    pub fn resolve(&self, style: SurfaceStyle) -> Option<Paint> {
        match style {
            SurfaceStyle::Color(c) => Some(Paint::Solid(c)),
            SurfaceStyle::Pattern(h) => self.pattern(h).cloned().map(Paint::Gradient),
        }
    }
}
