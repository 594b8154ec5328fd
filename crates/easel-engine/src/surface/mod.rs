//! Drawing surfaces.
//!
//! [`Surface`] is the immediate-mode 2D context the scene paints through:
//! scoped save/restore of paint state, style and transform setters, path
//! construction, stroke/fill, text, clearing and gradient realization.
//!
//! Two implementations ship with the crate:
//! - [`RecordingSurface`]: records every call; deterministic text metrics.
//! - [`PixmapSurface`]: rasterizes with `tiny-skia`, text through `fontdue`.

mod composite;
mod pixmap;
mod recording;
mod state;

pub use composite::{CompositeOp, UnknownCompositeOp};
pub use pixmap::PixmapSurface;
pub use recording::{PaintSnapshot, RecordingSurface, SurfaceOp};
pub use state::{PaintStack, PaintState, PatternHandle, SurfaceStyle, TextMetrics};

use crate::coords::Viewport;
use crate::paint::{Gradient, LineCap, LineJoin, Shadow};
use crate::text::FontSpec;
use crate::transform::AffineMatrix;

/// Abstract 2D drawing context.
///
/// State handling (save/restore, styles, transforms, gradient realization)
/// is provided on top of [`PaintStack`]; implementors supply path building,
/// painting and text.
pub trait Surface {
    /// Device-pixel size, fixed at creation.
    fn viewport(&self) -> Viewport;

    fn paint_stack(&self) -> &PaintStack;
    fn paint_stack_mut(&mut self) -> &mut PaintStack;

    #[inline]
    fn state(&self) -> &PaintState {
        self.paint_stack().current()
    }

    fn save(&mut self) {
        self.paint_stack_mut().save();
    }

    fn restore(&mut self) {
        if !self.paint_stack_mut().restore() {
            log::warn!("surface restore without matching save");
        }
    }

    // ── styles ────────────────────────────────────────────────────────────

    fn set_fill_style(&mut self, style: SurfaceStyle) {
        self.paint_stack_mut().current_mut().fill_style = style;
    }

    fn set_stroke_style(&mut self, style: SurfaceStyle) {
        self.paint_stack_mut().current_mut().stroke_style = style;
    }

    fn set_line_width(&mut self, width: f32) {
        // Matches canvas: non-positive or non-finite widths are ignored.
        if width.is_finite() && width > 0.0 {
            self.paint_stack_mut().current_mut().line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.paint_stack_mut().current_mut().line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.paint_stack_mut().current_mut().line_join = join;
    }

    fn set_miter_limit(&mut self, limit: f32) {
        if limit.is_finite() && limit > 0.0 {
            self.paint_stack_mut().current_mut().miter_limit = limit;
        }
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.paint_stack_mut().current_mut().shadow = *shadow;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if (0.0..=1.0).contains(&alpha) {
            self.paint_stack_mut().current_mut().global_alpha = alpha;
        }
    }

    fn set_composite_op(&mut self, op: CompositeOp) {
        self.paint_stack_mut().current_mut().composite = op;
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.paint_stack_mut().current_mut().font = font.clone();
    }

    /// Realizes a gradient description as a style usable on this surface.
    fn create_gradient(&mut self, gradient: &Gradient) -> SurfaceStyle {
        SurfaceStyle::Pattern(self.paint_stack_mut().register_pattern(gradient))
    }

    // ── transforms ────────────────────────────────────────────────────────

    fn reset_transform(&mut self) {
        self.set_transform(AffineMatrix::IDENTITY);
    }

    /// Replaces the current transform.
    fn set_transform(&mut self, m: AffineMatrix) {
        self.paint_stack_mut().current_mut().transform = m;
    }

    /// Multiplies `m` into the current transform; `m` applies to points first.
    fn transform(&mut self, m: AffineMatrix) {
        let state = self.paint_stack_mut().current_mut();
        state.transform = state.transform.concat(&m);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.transform(AffineMatrix::translation(x, y));
    }

    /// Radians, clockwise in a y-down space.
    fn rotate(&mut self, angle: f32) {
        self.transform(AffineMatrix::rotation(angle));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.transform(AffineMatrix::scaling(sx, sy));
    }

    // ── paths ─────────────────────────────────────────────────────────────

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f32, y: f32);
    fn line_to(&mut self, x: f32, y: f32);

    /// Circular arc around `(cx, cy)` from `start` to `end` radians.
    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32, anticlockwise: bool);

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32);

    #[allow(clippy::too_many_arguments)]
    fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32);

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32);
    fn close_path(&mut self);

    /// Strokes the current path with the current stroke style.
    fn stroke(&mut self);

    /// Fills the current path (non-zero winding) with the current fill style.
    fn fill(&mut self);

    // ── text and pixels ───────────────────────────────────────────────────

    /// Draws `text` with its alphabetic baseline starting at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32);
    fn stroke_text(&mut self, text: &str, x: f32, y: f32);

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> TextMetrics;

    /// Sets every pixel of the rectangle (in current transform space) to transparent.
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Clears the whole viewport regardless of the current transform.
    fn clear(&mut self) {
        let (w, h) = self.viewport().size_f32();
        self.save();
        self.reset_transform();
        self.clear_rect(0.0, 0.0, w, h);
        self.restore();
    }
}

/// Resolves surface identifiers to surfaces, for scenes bound by name.
pub trait SurfaceProvider {
    type Surface: Surface;

    fn resolve(&mut self, id: &str) -> Option<Self::Surface>;
}
