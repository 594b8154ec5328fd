use std::collections::HashMap;
use std::f32::consts::{FRAC_PI_2, TAU};

use fontdue::layout::GlyphRasterConfig;
use tiny_skia::{
    FillRule, GradientStop, Pixmap, PixmapPaint, Point, PremultipliedColorU8, SpreadMode, Transform,
};

use crate::coords::{Vec2, Viewport};
use crate::error::{Result, SceneError};
use crate::paint::{Color, Gradient, LineCap, LineJoin, Paint};
use crate::text::{FontId, FontLoadError, FontSpec, FontSystem};
use crate::transform::AffineMatrix;

use super::{PaintStack, PaintState, Surface, SurfaceStyle, TextMetrics};

#[derive(Debug, Copy, Clone, PartialEq)]
enum PathCmd {
    Move(Vec2),
    Line(Vec2),
    Quad(Vec2, Vec2),
    Cubic(Vec2, Vec2, Vec2),
    Close,
}

// ── cached glyph ──────────────────────────────────────────────────────────

struct GlyphBitmap {
    width: u32,
    height: u32,
    coverage: Vec<u8>,
}

/// Raster surface backed by a `tiny-skia` pixmap.
///
/// The current path is kept as a command list and converted to a
/// `tiny_skia::Path` at each stroke/fill, so one path can be both stroked and
/// filled. Arcs are flattened to cubic segments of at most a quarter turn.
///
/// Known gaps against a browser canvas:
/// - shadows are offset copies; `blur` is ignored
/// - radial gradients use the end circle only; `start_radius` is ignored
/// - text is painted from glyph coverage in a solid color; a gradient style
///   uses its first stop, and stroked text is filled with the stroke color
pub struct PixmapSurface {
    pixmap: Pixmap,
    stack: PaintStack,
    path: Vec<PathCmd>,
    current_point: Option<Vec2>,
    subpath_start: Vec2,
    fonts: FontSystem,
    glyph_cache: HashMap<GlyphRasterConfig, GlyphBitmap>,
}

impl PixmapSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(SceneError::InvalidViewport { width, height })?;
        log::debug!("created {width}x{height} pixmap surface");
        Ok(Self {
            pixmap,
            stack: PaintStack::new(),
            path: Vec::new(),
            current_point: None,
            subpath_start: Vec2::zero(),
            fonts: FontSystem::new(),
            glyph_cache: HashMap::new(),
        })
    }

    /// Makes a font available to text drawing and measurement.
    pub fn load_font(&mut self, family: &str, bytes: &[u8]) -> std::result::Result<FontId, FontLoadError> {
        self.fonts.load_font(family, bytes)
    }

    #[inline]
    pub fn fonts(&self) -> &FontSystem {
        &self.fonts
    }

    #[inline]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Straight-alpha RGBA of one pixel.
    pub fn pixel_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Whole surface as straight-alpha RGBA rows, top to bottom.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    // ── path construction ────────────────────────────────────────────────

    fn ensure_subpath(&mut self, p: Vec2) {
        if self.current_point.is_none() {
            self.push_move(p);
        }
    }

    fn push_move(&mut self, p: Vec2) {
        self.path.push(PathCmd::Move(p));
        self.current_point = Some(p);
        self.subpath_start = p;
    }

    fn build_path(&self) -> Option<tiny_skia::Path> {
        let mut pb = tiny_skia::PathBuilder::new();
        for cmd in &self.path {
            match *cmd {
                PathCmd::Move(p) => pb.move_to(p.x, p.y),
                PathCmd::Line(p) => pb.line_to(p.x, p.y),
                PathCmd::Quad(c, p) => pb.quad_to(c.x, c.y, p.x, p.y),
                PathCmd::Cubic(c1, c2, p) => pb.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y),
                PathCmd::Close => pb.close(),
            }
        }
        pb.finish()
    }

    // ── paint creation ───────────────────────────────────────────────────

    fn create_paint(&self, style: SurfaceStyle) -> Option<tiny_skia::Paint<'static>> {
        let state = self.stack.current();
        let mut paint = tiny_skia::Paint {
            anti_alias: true,
            blend_mode: state.composite.blend_mode(),
            ..Default::default()
        };

        match self.stack.resolve(style)? {
            Paint::Solid(color) => {
                paint.set_color(to_skia_color(color.scale_alpha(state.global_alpha))?);
            }
            Paint::Gradient(gradient) => {
                paint.shader = create_gradient_shader(&gradient, state)?;
            }
        }
        Some(paint)
    }

    fn shadow_paint(&self) -> Option<(tiny_skia::Paint<'static>, Transform)> {
        let state = self.stack.current();
        if !state.shadow.is_visible() {
            return None;
        }
        let color = state.shadow.color?.scale_alpha(state.global_alpha);
        let mut paint = tiny_skia::Paint {
            anti_alias: true,
            blend_mode: state.composite.blend_mode(),
            ..Default::default()
        };
        paint.set_color(to_skia_color(color)?);
        // Shadow offsets are in device space.
        let transform = to_skia_transform(state.transform)
            .post_translate(state.shadow.offset_x, state.shadow.offset_y);
        Some((paint, transform))
    }

    fn skia_stroke(state: &PaintState) -> tiny_skia::Stroke {
        tiny_skia::Stroke {
            width: state.line_width,
            miter_limit: state.miter_limit,
            line_cap: match state.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match state.line_join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            dash: None,
        }
    }

    // ── text ─────────────────────────────────────────────────────────────

    fn text_color(&self, style: SurfaceStyle) -> Option<Color> {
        let state = self.stack.current();
        let color = match self.stack.resolve(style)? {
            Paint::Solid(c) => c,
            Paint::Gradient(g) => g.normalized_stops().first()?.color,
        };
        Some(color.scale_alpha(state.global_alpha))
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: SurfaceStyle) {
        let Some(color) = self.text_color(style) else {
            return;
        };
        if color.is_transparent() {
            return;
        }

        let state = self.stack.current();
        let font_spec = state.font.clone();
        let base = to_skia_transform(state.transform);
        let pixmap_paint = PixmapPaint {
            blend_mode: state.composite.blend_mode(),
            ..Default::default()
        };

        let Some(laid) = self.fonts.layout(text, &font_spec) else {
            log::trace!("no font loaded; skipping text `{text}`");
            return;
        };

        for g in laid.glyphs.iter().filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0) {
            let bitmap = self.glyph_cache.entry(g.key).or_insert_with(|| {
                let (metrics, coverage) = laid.font.rasterize_config(g.key);
                GlyphBitmap {
                    width: metrics.width as u32,
                    height: metrics.height as u32,
                    coverage,
                }
            });
            let Some(glyph) = tint_glyph(bitmap, color) else {
                continue;
            };
            let transform = base.pre_translate(x + g.x, y - laid.ascent + g.y);
            self.pixmap.draw_pixmap(0, 0, glyph.as_ref(), &pixmap_paint, transform, None);
        }
    }
}

impl Surface for PixmapSurface {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.pixmap.width(), self.pixmap.height())
    }

    fn paint_stack(&self) -> &PaintStack {
        &self.stack
    }

    fn paint_stack_mut(&mut self) -> &mut PaintStack {
        &mut self.stack
    }

    fn begin_path(&mut self) {
        self.path.clear();
        self.current_point = None;
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.push_move(Vec2::new(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = Vec2::new(x, y);
        if self.current_point.is_none() {
            self.push_move(p);
            return;
        }
        self.path.push(PathCmd::Line(p));
        self.current_point = Some(p);
    }

    fn arc(&mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32, anticlockwise: bool) {
        let radius = radius.abs();
        let center = Vec2::new(cx, cy);
        let sweep = arc_sweep(start, end, anticlockwise);

        let p0 = center + Vec2::polar(radius, start);
        if self.current_point.is_none() {
            self.push_move(p0);
        } else {
            self.line_to(p0.x, p0.y);
        }
        if sweep == 0.0 || radius == 0.0 {
            return;
        }

        let segments = (sweep.abs() / FRAC_PI_2).ceil().max(1.0) as u32;
        let step = sweep / segments as f32;
        let k = 4.0 / 3.0 * (step / 4.0).tan();

        let mut a0 = start;
        for _ in 0..segments {
            let a1 = a0 + step;
            let from = center + Vec2::polar(radius, a0);
            let to = center + Vec2::polar(radius, a1);
            let c1 = from + Vec2::new(-a0.sin(), a0.cos()) * (k * radius);
            let c2 = to - Vec2::new(-a1.sin(), a1.cos()) * (k * radius);
            self.path.push(PathCmd::Cubic(c1, c2, to));
            a0 = a1;
        }
        self.current_point = Some(center + Vec2::polar(radius, start + sweep));
    }

    fn quadratic_curve_to(&mut self, cx: f32, cy: f32, x: f32, y: f32) {
        let c = Vec2::new(cx, cy);
        self.ensure_subpath(c);
        let p = Vec2::new(x, y);
        self.path.push(PathCmd::Quad(c, p));
        self.current_point = Some(p);
    }

    fn bezier_curve_to(&mut self, c1x: f32, c1y: f32, c2x: f32, c2y: f32, x: f32, y: f32) {
        let c1 = Vec2::new(c1x, c1y);
        self.ensure_subpath(c1);
        let p = Vec2::new(x, y);
        self.path.push(PathCmd::Cubic(c1, Vec2::new(c2x, c2y), p));
        self.current_point = Some(p);
    }

    fn rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let origin = Vec2::new(x, y);
        self.push_move(origin);
        self.path.push(PathCmd::Line(Vec2::new(x + width, y)));
        self.path.push(PathCmd::Line(Vec2::new(x + width, y + height)));
        self.path.push(PathCmd::Line(Vec2::new(x, y + height)));
        self.path.push(PathCmd::Close);
        self.current_point = Some(origin);
    }

    fn close_path(&mut self) {
        if self.current_point.is_some() {
            self.path.push(PathCmd::Close);
            self.current_point = Some(self.subpath_start);
        }
    }

    fn stroke(&mut self) {
        let Some(path) = self.build_path() else {
            return;
        };
        let state = self.stack.current();
        let stroke = Self::skia_stroke(state);
        let transform = to_skia_transform(state.transform);

        if let Some((shadow, shadow_transform)) = self.shadow_paint() {
            self.pixmap.stroke_path(&path, &shadow, &stroke, shadow_transform, None);
        }
        if let Some(paint) = self.create_paint(self.stack.current().stroke_style) {
            self.pixmap.stroke_path(&path, &paint, &stroke, transform, None);
        }
    }

    fn fill(&mut self) {
        let Some(path) = self.build_path() else {
            return;
        };
        let transform = to_skia_transform(self.stack.current().transform);

        if let Some((shadow, shadow_transform)) = self.shadow_paint() {
            self.pixmap.fill_path(&path, &shadow, FillRule::Winding, shadow_transform, None);
        }
        if let Some(paint) = self.create_paint(self.stack.current().fill_style) {
            self.pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
        }
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        let style = self.stack.current().fill_style;
        self.draw_text(text, x, y, style);
    }

    fn stroke_text(&mut self, text: &str, x: f32, y: f32) {
        let style = self.stack.current().stroke_style;
        self.draw_text(text, x, y, style);
    }

    fn measure_text(&mut self, text: &str, font: &FontSpec) -> TextMetrics {
        TextMetrics {
            width: self.fonts.measure_width(text, font),
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let Some(rect) = tiny_skia::Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let paint = tiny_skia::Paint {
            blend_mode: tiny_skia::BlendMode::Clear,
            ..Default::default()
        };
        let transform = to_skia_transform(self.stack.current().transform);
        self.pixmap.fill_rect(rect, &paint, transform, None);
    }
}

// ── helpers ───────────────────────────────────────────────────────────────

fn to_skia_transform(m: AffineMatrix) -> Transform {
    Transform::from_row(m.m11, m.m12, m.m21, m.m22, m.dx, m.dy)
}

fn to_skia_color(color: Color) -> Option<tiny_skia::Color> {
    let (r, g, b, a) = color.to_straight();
    tiny_skia::Color::from_rgba(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0), a.clamp(0.0, 1.0))
}

fn create_gradient_shader(gradient: &Gradient, state: &PaintState) -> Option<tiny_skia::Shader<'static>> {
    let stops: Vec<GradientStop> = gradient
        .normalized_stops()
        .into_iter()
        .filter_map(|s| Some(GradientStop::new(s.t, to_skia_color(s.color.scale_alpha(state.global_alpha))?)))
        .collect();
    if stops.is_empty() {
        return None;
    }

    let transform = to_skia_transform(state.transform);
    match gradient {
        Gradient::Linear(g) => tiny_skia::LinearGradient::new(
            Point::from_xy(g.start.x, g.start.y),
            Point::from_xy(g.end.x, g.end.y),
            stops,
            SpreadMode::Pad,
            transform,
        ),
        Gradient::Radial(g) => tiny_skia::RadialGradient::new(
            Point::from_xy(g.start.x, g.start.y),
            Point::from_xy(g.end.x, g.end.y),
            g.end_radius,
            stops,
            SpreadMode::Pad,
            transform,
        ),
    }
}

/// Signed sweep of a canvas-style arc, in radians.
fn arc_sweep(start: f32, end: f32, anticlockwise: bool) -> f32 {
    if anticlockwise {
        let d = start - end;
        if d >= TAU { -TAU } else { -d.rem_euclid(TAU) }
    } else {
        let d = end - start;
        if d >= TAU { TAU } else { d.rem_euclid(TAU) }
    }
}

fn tint_glyph(bitmap: &GlyphBitmap, color: Color) -> Option<Pixmap> {
    let mut glyph = Pixmap::new(bitmap.width, bitmap.height)?;
    for (dst, &cov) in glyph.pixels_mut().iter_mut().zip(&bitmap.coverage) {
        let k = cov as f32 / 255.0;
        let a = (color.a * k * 255.0).round().clamp(0.0, 255.0) as u8;
        let channel = |c: f32| ((c * k * 255.0).round().clamp(0.0, 255.0) as u8).min(a);
        if let Some(px) = PremultipliedColorU8::from_rgba(channel(color.r), channel(color.g), channel(color.b), a) {
            *dst = px;
        }
    }
    Some(glyph)
}
