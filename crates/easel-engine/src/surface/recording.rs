use crate::coords::{Vec2, Viewport};
use crate::paint::{Paint, Shadow};
use crate::text::FontSpec;
use crate::transform::AffineMatrix;

use super::{CompositeOp, PaintStack, Surface, TextMetrics};

/// Paint state captured when a stroke, fill or text op executes.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintSnapshot {
    /// `None` when the active style referenced a stale pattern handle.
    pub paint: Option<Paint>,
    pub transform: AffineMatrix,
    pub global_alpha: f32,
    pub composite: CompositeOp,
    pub line_width: f32,
    pub shadow: Shadow,
    pub font: FontSpec,
}

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    Save,
    Restore,
    BeginPath,
    MoveTo(Vec2),
    LineTo(Vec2),
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        anticlockwise: bool,
    },
    QuadraticCurveTo {
        control: Vec2,
        to: Vec2,
    },
    BezierCurveTo {
        control1: Vec2,
        control2: Vec2,
        to: Vec2,
    },
    Rect {
        origin: Vec2,
        width: f32,
        height: f32,
    },
    ClosePath,
    Stroke(PaintSnapshot),
    Fill(PaintSnapshot),
    FillText {
        text: String,
        at: Vec2,
        paint: PaintSnapshot,
    },
    StrokeText {
        text: String,
        at: Vec2,
        paint: PaintSnapshot,
    },
    ClearRect {
        origin: Vec2,
        width: f32,
        height: f32,
    },
}

impl SurfaceOp {
    /// True for ops that put pixels on the surface.
    pub fn is_paint(&self) -> bool {
        matches!(
            self,
            SurfaceOp::Stroke(_) | SurfaceOp::Fill(_) | SurfaceOp::FillText { .. } | SurfaceOp::StrokeText { .. }
        )
    }
}

/// Surface that records calls instead of rasterizing.
///
/// Text is measured as half an em per character, so layout depending on text
/// width is deterministic without any font files.
#[derive(Debug)]
pub struct RecordingSurface {
    viewport: Viewport,
    stack: PaintStack,
    ops: Vec<SurfaceOp>,
    painted_since_clear: usize,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            viewport: Viewport::new(width, height),
            stack: PaintStack::new(),
            ops: Vec::new(),
            painted_since_clear: 0,
        }
    }

    #[inline]
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Returns and forgets the recorded ops.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Stroke, fill and text ops since the last full-viewport clear.
    #[inline]
    pub fn painted_since_clear(&self) -> usize {
        self.painted_since_clear
    }

    #[inline]
    pub fn is_blank(&self) -> bool {
        self.painted_since_clear == 0
    }

    fn snapshot(&self, stroke: bool) -> PaintSnapshot {
        let state = self.stack.current();
        let style = if stroke { state.stroke_style } else { state.fill_style };
        PaintSnapshot {
            paint: self.stack.resolve(style),
            transform: state.transform,
            global_alpha: state.global_alpha,
            composite: state.composite,
            line_width: state.line_width,
            shadow: state.shadow,
            font: state.font.clone(),
        }
    }

    fn record_paint(&mut self, op: SurfaceOp) {
        self.painted_since_clear += 1;
        self.ops.push(op);
    }
}

impl Surface for RecordingSurface {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn paint_stack(&self) -> &PaintStack {
        &self.stack
    }

    fn paint_stack_mut(&mut self) -> &mut PaintStack {
        &mut self.stack
    }

    fn save(&mut self) {
        self.stack.save();
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        if self.stack.restore() {
            self.ops.push(SurfaceOp::Restore);
        } else {
            log::warn!("surface restore without matching save");
        }
    }

    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.ops.push(SurfaceOp::MoveTo(Vec2::new(x, y)));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.ops.push(SurfaceOp::LineTo(Vec2::new(x, y)));
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32, anticlockwise: bool) {
        self.ops.push(SurfaceOp::Arc {
            center: Vec2::new(cx, cy),
            radius,
            start,
            end,
            anticlockwise,
        });
    }

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        self.ops.push(SurfaceOp::QuadraticCurveTo {
            control: Vec2::new(cx, cy),
            to: Vec2::new(x, y),
        });
    }

    fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        self.ops.push(SurfaceOp::BezierCurveTo {
            control1: Vec2::new(c1x, c1y),
            control2: Vec2::new(c2x, c2y),
            to: Vec2::new(x, y),
        });
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.ops.push(SurfaceOp::Rect {
            origin: Vec2::new(x, y),
            width,
            height,
        });
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn stroke(&mut self) {
        let snap = self.snapshot(true);
        self.record_paint(SurfaceOp::Stroke(snap));
    }

    fn fill(&mut self) {
        let snap = self.snapshot(false);
        self.record_paint(SurfaceOp::Fill(snap));
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let paint = self.snapshot(false);
        self.record_paint(SurfaceOp::FillText {
            text: text.to_string(),
            at: Vec2::new(x, y),
            paint,
        });
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        let paint = self.snapshot(true);
        self.record_paint(SurfaceOp::StrokeText {
            text: text.to_string(),
            at: Vec2::new(x, y),
            paint,
        });
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> TextMetrics {
        TextMetrics {
            width: text.chars().count() as f32 * font.size_px * 0.5,
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let (vw, vh) = self.viewport.size_f32();
        let covers_all = self.stack.current().transform.is_identity()
            && x <= 0.0
            && y <= 0.0
            && x + width >= vw
            && y + height >= vh;
        if covers_all {
            self.painted_since_clear = 0;
        }
        self.ops.push(SurfaceOp::ClearRect {
            origin: Vec2::new(x, y),
            width,
            height,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Vec2;
    use crate::paint::{Color, LinearGradient};
    use crate::surface::SurfaceStyle;

    #[test]
    fn records_path_calls_in_order() {
        let mut s = RecordingSurface::new(10, 10);
        s.begin_path();
        s.move_to(1.0, 2.0);
        s.line_to(3.0, 4.0);
        s.close_path();
        assert_eq!(
            s.ops(),
            &[
                SurfaceOp::BeginPath,
                SurfaceOp::MoveTo(Vec2::new(1.0, 2.0)),
                SurfaceOp::LineTo(Vec2::new(3.0, 4.0)),
                SurfaceOp::ClosePath,
            ]
        );
    }

    #[test]
    fn fill_snapshots_style_and_transform() {
        let mut s = RecordingSurface::new(10, 10);
        s.set_fill_style(SurfaceStyle::Color(Color::WHITE));
        s.translate(5.0, 0.0);
        s.fill();

        let SurfaceOp::Fill(snap) = &s.ops()[0] else {
            panic!("expected fill, got {:?}", s.ops());
        };
        assert_eq!(snap.paint, Some(Paint::Solid(Color::WHITE)));
        assert_eq!(snap.transform, AffineMatrix::translation(5.0, 0.0));
    }

    #[test]
    fn gradient_resolves_while_saved() {
        let mut s = RecordingSurface::new(10, 10);
        let g = LinearGradient::new(Vec2::zero(), Vec2::new(1.0, 0.0)).color_stop(0.0, Color::BLACK);
        s.save();
        let style = s.create_gradient(&g.clone().into());
        s.set_stroke_style(style);
        s.stroke();
        s.restore();

        let SurfaceOp::Stroke(snap) = &s.ops()[1] else {
            panic!("expected stroke, got {:?}", s.ops());
        };
        assert_eq!(snap.paint, Some(Paint::Gradient(g.into())));
    }

    #[test]
    fn full_clear_resets_paint_count() {
        let mut s = RecordingSurface::new(20, 10);
        s.fill();
        s.stroke();
        assert_eq!(s.painted_since_clear(), 2);

        s.clear_rect(0.0, 0.0, 5.0, 5.0);
        assert!(!s.is_blank());

        s.translate(3.0, 3.0);
        s.clear();
        assert!(s.is_blank());
        assert_eq!(s.state().transform, AffineMatrix::translation(3.0, 3.0));
    }

    #[test]
    fn text_width_is_half_em_per_char() {
        let mut s = RecordingSurface::new(10, 10);
        let font = FontSpec::new(20.0, "serif");
        assert_eq!(s.measure_text("abcd", &font).width, 40.0);
    }

    #[test]
    fn unmatched_restore_is_not_recorded() {
        let mut s = RecordingSurface::new(10, 10);
        s.restore();
        assert!(s.ops().is_empty());
    }

    #[test]
    fn set_line_width_ignores_invalid_values() {
        let mut s = RecordingSurface::new(10, 10);
        s.set_line_width(3.0);
        s.set_line_width(0.0);
        s.set_line_width(f32::NAN);
        assert_eq!(s.state().line_width, 3.0);
    }
}
