use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::SceneOptions;
use crate::coords::Vec2;
use crate::error::Result;
use crate::paint::{DrawOptions, DrawStyle, Paint, StyleSource};
use crate::surface::{Surface, SurfaceStyle};
use crate::transform::{assemble_paint_transform, AffineMatrix, ItemTransform};

use super::{Circle, Geometry, Path, Polygon, Rect, Text};

/// Item handle shared between registries. Mutations through one handle are
/// seen by every scene holding it.
pub type SharedItem = Rc<RefCell<Item>>;

/// A drawable shape with its own transform and style.
///
/// Mutators return `&mut Self` so calls chain:
///
/// ```
/// # use easel_engine::scene::Item;
/// # use easel_engine::paint::{Color, DrawOptions};
/// let mut star = Item::polygon(50.0, 50.0, 5, 20.0);
/// star.rotate(18.0).scale(2.0, 2.0).set_draw_options(&DrawOptions::new().fill(Color::BLACK));
/// ```
#[derive(Debug, Clone)]
pub struct Item {
    geometry: Geometry,
    transform: ItemTransform,
    style: DrawStyle,
}

impl Item {
    /// Wraps geometry in an item at the origin with default style.
    pub fn new(geometry: impl Into<Geometry>) -> Self {
        Self {
            geometry: geometry.into(),
            transform: ItemTransform::default(),
            style: DrawStyle::default(),
        }
    }

    fn placed(geometry: impl Into<Geometry>, x: f32, y: f32) -> Self {
        let mut item = Self::new(geometry);
        item.move_to(x, y);
        item
    }

    pub fn circle(x: f32, y: f32, radius: f32) -> Self {
        Self::placed(Circle::new(radius), x, y)
    }

    pub fn rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::placed(Rect::new(width, height), x, y)
    }

    pub fn rounded_rect(x: f32, y: f32, width: f32, height: f32, radius: f32) -> Self {
        Self::placed(Rect::rounded(width, height, radius), x, y)
    }

    pub fn polygon(x: f32, y: f32, sides: u32, radius: f32) -> Self {
        Self::placed(Polygon::new(sides, radius), x, y)
    }

    pub fn text(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self::placed(Text::new(text), x, y)
    }

    /// Moves the item into an `Rc<RefCell<_>>` for registration.
    #[inline]
    pub fn shared(self) -> SharedItem {
        Rc::new(RefCell::new(self))
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    #[inline]
    pub fn transform(&self) -> &ItemTransform {
        &self.transform
    }

    #[inline]
    pub fn style(&self) -> &DrawStyle {
        &self.style
    }

    #[inline]
    pub fn kind(&self) -> &'static str {
        self.geometry.shape().kind()
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.transform.hidden
    }

    /// Geometry and transform are finite and extents non-negative.
    pub fn is_valid(&self) -> bool {
        self.geometry.shape().is_valid() && self.transform.is_finite()
    }

    pub fn as_rect_mut(&mut self) -> Option<&mut Rect> {
        match &mut self.geometry {
            Geometry::Rect(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_path_mut(&mut self) -> Option<&mut Path> {
        match &mut self.geometry {
            Geometry::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_polygon_mut(&mut self) -> Option<&mut Polygon> {
        match &mut self.geometry {
            Geometry::Polygon(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut Text> {
        match &mut self.geometry {
            Geometry::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Pivot used for rotation and scale, measured with the item's own font.
    pub fn local_center(&self, surface: &mut dyn Surface) -> Result<Vec2> {
        self.geometry.shape().local_center(surface, &self.style.font)
    }

    // ── mutators ──────────────────────────────────────────────────────────

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.transform.move_to(x, y);
        self
    }

    pub fn move_by(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.transform.move_by(dx, dy);
        self
    }

    /// Absolute rotation in degrees.
    pub fn rotate(&mut self, degrees: f32) -> &mut Self {
        self.transform.rotate(degrees);
        self
    }

    pub fn rotate_by(&mut self, degrees: f32) -> &mut Self {
        self.transform.rotate_by(degrees);
        self
    }

    pub fn scale(&mut self, sx: f32, sy: f32) -> &mut Self {
        self.transform.scale(sx, sy);
        self
    }

    pub fn scale_by(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.transform.scale_by(dx, dy);
        self
    }

    pub fn hide(&mut self) -> &mut Self {
        self.transform.hidden = true;
        self
    }

    pub fn show(&mut self) -> &mut Self {
        self.transform.hidden = false;
        self
    }

    pub fn set_matrix(&mut self, m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> &mut Self {
        self.transform.set_matrix(m11, m12, m21, m22, dx, dy);
        self
    }

    pub fn change_matrix(&mut self, m11: f32, m12: f32, m21: f32, m22: f32, dx: f32, dy: f32) -> &mut Self {
        self.transform.change_matrix(m11, m12, m21, m22, dx, dy);
        self
    }

    /// Current user matrix, `None` for identity.
    #[inline]
    pub fn matrix(&self) -> Option<AffineMatrix> {
        self.transform.matrix
    }

    /// Merges `options` into the stored style.
    pub fn set_draw_options(&mut self, options: &DrawOptions) -> &mut Self {
        self.style.apply(options);
        self
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Paints the item on `surface`.
    ///
    /// Hidden items touch nothing. Otherwise the surface state is saved
    /// before styling and restored afterwards even when painting fails.
    pub fn draw(&self, surface: &mut dyn Surface, options: &SceneOptions, overrides: Option<&DrawOptions>) -> Result<()> {
        if self.transform.hidden {
            log::trace!("skipping hidden {}", self.kind());
            return Ok(());
        }

        let style = match overrides {
            Some(o) => Cow::Owned(self.style.merged(o)),
            None => Cow::Borrowed(&self.style),
        };

        surface.save();
        let result = self.paint(surface, options, &style);
        surface.restore();
        result
    }

    fn paint(&self, surface: &mut dyn Surface, options: &SceneOptions, style: &DrawStyle) -> Result<()> {
        self.prepare(surface, options, style);

        let center = if self.transform.needs_pivot() {
            self.local_center(surface)?
        } else {
            Vec2::zero()
        };
        for op in assemble_paint_transform(&self.transform, center) {
            op.apply(surface);
        }

        let shape = self.geometry.shape();
        surface.begin_path();
        shape.emit_path(surface, style);

        if shape.paints_path() {
            if style.stroke.is_some() {
                surface.stroke();
            }
            if style.fill.is_some() {
                surface.fill();
            }
        }
        Ok(())
    }

    fn prepare(&self, surface: &mut dyn Surface, options: &SceneOptions, style: &DrawStyle) {
        surface.set_global_alpha(options.global_alpha);
        surface.set_composite_op(options.global_composite_operation);

        if let Some(fill) = &style.fill {
            let realized = self.realize(fill, surface);
            surface.set_fill_style(realized);
        }
        if let Some(stroke) = &style.stroke {
            let realized = self.realize(stroke, surface);
            surface.set_stroke_style(realized);
            surface.set_line_width(style.line_width);
            surface.set_line_cap(style.line_cap);
            surface.set_line_join(style.line_join);
            surface.set_miter_limit(style.miter_limit);
        }
        if style.shadow.color.is_some() {
            surface.set_shadow(&style.shadow);
        }
        surface.set_font(&style.font);
    }

    fn realize(&self, source: &StyleSource, surface: &mut dyn Surface) -> SurfaceStyle {
        match source.resolve(self, surface) {
            Paint::Solid(color) => SurfaceStyle::Color(color),
            Paint::Gradient(gradient) => surface.create_gradient(&gradient),
        }
    }
}

impl From<Circle> for Item {
    fn from(s: Circle) -> Self {
        Item::new(s)
    }
}

impl From<Rect> for Item {
    fn from(s: Rect) -> Self {
        Item::new(s)
    }
}

/// Places the item at the path's start point.
impl From<Path> for Item {
    fn from(path: Path) -> Self {
        let start = path.start();
        Item::placed(path, start.x, start.y)
    }
}

impl From<Polygon> for Item {
    fn from(s: Polygon) -> Self {
        Item::new(s)
    }
}

impl From<Text> for Item {
    fn from(s: Text) -> Self {
        Item::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;
    use crate::paint::{Color, LinearGradient};
    use crate::surface::{CompositeOp, RecordingSurface, SurfaceOp};

    fn fill_black() -> DrawOptions {
        DrawOptions::new().fill(Color::BLACK)
    }

    fn count(ops: &[SurfaceOp], pred: impl Fn(&SurfaceOp) -> bool) -> usize {
        ops.iter().filter(|op| pred(op)).count()
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn constructors_place_item() {
        let c = Item::circle(50.0, 50.0, 10.0);
        assert_eq!(c.transform().translate, Some(Vec2::new(50.0, 50.0)));
        assert_eq!(c.kind(), "circle");

        let at_origin = Item::rect(0.0, 0.0, 5.0, 5.0);
        assert_eq!(at_origin.transform().translate, None);
    }

    #[test]
    fn path_item_sits_on_start_point() {
        let mut p = Path::new(10.0, 20.0);
        p.line_to(20.0, 20.0);
        let item = Item::from(p);
        assert_eq!(item.transform().translate, Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn clone_is_independent() {
        let mut a = Item::text(1.0, 1.0, "hi");
        let b = a.clone();
        a.move_by(5.0, 0.0).hide();
        a.as_text_mut().unwrap().append("!");

        assert_eq!(b.transform().translate, Some(Vec2::new(1.0, 1.0)));
        assert!(!b.is_hidden());
        let Geometry::Text(t) = b.geometry() else { panic!() };
        assert_eq!(t.text(), "hi");
    }

    #[test]
    fn mutators_chain() {
        let mut item = Item::rect(0.0, 0.0, 4.0, 4.0);
        item.move_to(1.0, 1.0).rotate(90.0).scale(2.0, 2.0).rotate(0.0).scale(1.0, 1.0);
        assert_eq!(item.transform().rotate, None);
        assert_eq!(item.transform().scale, None);
    }

    #[test]
    fn invalid_geometry_detected() {
        assert!(!Item::circle(0.0, 0.0, -1.0).is_valid());
        assert!(!Item::circle(f32::NAN, 0.0, 1.0).is_valid());
        assert!(Item::polygon(0.0, 0.0, 5, 3.0).is_valid());
    }

    // ── draw procedure ────────────────────────────────────────────────────

    #[test]
    fn hidden_item_touches_nothing() {
        let mut s = RecordingSurface::new(10, 10);
        let mut item = Item::circle(5.0, 5.0, 2.0);
        item.set_draw_options(&fill_black()).hide();
        item.draw(&mut s, &SceneOptions::default(), None).unwrap();
        assert!(s.ops().is_empty());
    }

    #[test]
    fn circle_emits_one_closed_arc_and_fills() {
        let mut s = RecordingSurface::new(100, 100);
        let mut item = Item::circle(50.0, 50.0, 10.0);
        item.set_draw_options(&fill_black());
        item.draw(&mut s, &SceneOptions::default(), None).unwrap();

        let ops = s.ops();
        assert_eq!(ops.first(), Some(&SurfaceOp::Save));
        assert_eq!(ops.last(), Some(&SurfaceOp::Restore));
        assert_eq!(count(ops, |op| matches!(op, SurfaceOp::Arc { .. })), 1);
        assert_eq!(count(ops, |op| matches!(op, SurfaceOp::Fill(_))), 1);
        assert_eq!(count(ops, |op| matches!(op, SurfaceOp::Stroke(_))), 0);

        let fill = ops.iter().find_map(|op| match op {
            SurfaceOp::Fill(snap) => Some(snap),
            _ => None,
        });
        assert_eq!(fill.unwrap().transform, AffineMatrix::translation(50.0, 50.0));
    }

    #[test]
    fn stored_fill_can_be_removed() {
        let mut s = RecordingSurface::new(10, 10);
        let mut item = Item::circle(5.0, 5.0, 2.0);
        item.set_draw_options(&DrawOptions::new().fill(Color::BLACK).stroke(Color::WHITE));
        item.set_draw_options(&DrawOptions::new().no_fill());
        assert!(item.style().fill.is_none());

        item.draw(&mut s, &SceneOptions::default(), None).unwrap();
        assert_eq!(count(s.ops(), |op| matches!(op, SurfaceOp::Fill(_))), 0);
        assert_eq!(count(s.ops(), |op| matches!(op, SurfaceOp::Stroke(_))), 1);
    }

    #[test]
    fn override_suppresses_stroke_for_one_draw() {
        let mut s = RecordingSurface::new(10, 10);
        let mut item = Item::circle(5.0, 5.0, 2.0);
        item.set_draw_options(&DrawOptions::new().fill(Color::BLACK).stroke(Color::WHITE));

        item.draw(&mut s, &SceneOptions::default(), Some(&DrawOptions::new().no_stroke())).unwrap();
        assert_eq!(count(s.ops(), |op| matches!(op, SurfaceOp::Stroke(_))), 0);
        assert_eq!(count(s.ops(), |op| matches!(op, SurfaceOp::Fill(_))), 1);

        s.take_ops();
        item.draw(&mut s, &SceneOptions::default(), None).unwrap();
        assert_eq!(count(s.ops(), |op| matches!(op, SurfaceOp::Stroke(_))), 1);
    }

    #[test]
    fn stroke_runs_before_fill() {
        let mut s = RecordingSurface::new(10, 10);
        let mut item = Item::rect(0.0, 0.0, 5.0, 5.0);
        item.set_draw_options(&DrawOptions::new().fill(Color::WHITE).stroke(Color::BLACK).line_width(3.0));
        item.draw(&mut s, &SceneOptions::default(), None).unwrap();

        let paints: Vec<&SurfaceOp> = s.ops().iter().filter(|op| op.is_paint()).collect();
        assert!(matches!(paints[0], SurfaceOp::Stroke(snap) if snap.line_width == 3.0));
        assert!(matches!(paints[1], SurfaceOp::Fill(_)));
    }

    #[test]
    fn no_style_draws_path_only() {
        let mut s = RecordingSurface::new(10, 10);
        Item::rect(0.0, 0.0, 5.0, 5.0).draw(&mut s, &SceneOptions::default(), None).unwrap();
        assert!(s.ops().iter().any(|op| matches!(op, SurfaceOp::Rect { .. })));
        assert!(s.is_blank());
    }

    #[test]
    fn overrides_do_not_mutate_stored_style() {
        let mut s = RecordingSurface::new(10, 10);
        let mut item = Item::circle(0.0, 0.0, 1.0);
        item.set_draw_options(&fill_black());

        let over = DrawOptions::new().fill(Color::WHITE);
        item.draw(&mut s, &SceneOptions::default(), Some(&over)).unwrap();

        let SurfaceOp::Fill(snap) = s.ops().iter().find(|op| op.is_paint()).unwrap() else {
            panic!()
        };
        assert_eq!(snap.paint, Some(Paint::Solid(Color::WHITE)));
        assert!(matches!(item.style().fill, Some(StyleSource::Paint(Paint::Solid(c))) if c == Color::BLACK));
    }

    #[test]
    fn scene_options_apply_to_item() {
        let mut s = RecordingSurface::new(10, 10);
        let mut item = Item::circle(0.0, 0.0, 1.0);
        item.set_draw_options(&fill_black());
        let opts = SceneOptions {
            global_alpha: 0.25,
            global_composite_operation: CompositeOp::Multiply,
            ..SceneOptions::default()
        };
        item.draw(&mut s, &opts, None).unwrap();

        let SurfaceOp::Fill(snap) = s.ops().iter().find(|op| op.is_paint()).unwrap() else {
            panic!()
        };
        assert_eq!(snap.global_alpha, 0.25);
        assert_eq!(snap.composite, CompositeOp::Multiply);
        assert_eq!(s.state().global_alpha, 1.0);
    }

    #[test]
    fn gradient_is_realized_per_draw() {
        let mut s = RecordingSurface::new(10, 10);
        let g = LinearGradient::new(Vec2::zero(), Vec2::new(10.0, 0.0)).color_stop(0.5, Color::WHITE);
        let mut item = Item::rect(0.0, 0.0, 10.0, 10.0);
        item.set_draw_options(&DrawOptions::new().fill(g.clone()));

        item.draw(&mut s, &SceneOptions::default(), None).unwrap();
        item.draw(&mut s, &SceneOptions::default(), None).unwrap();

        let fills: Vec<_> = s
            .ops()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Fill(snap) => snap.paint.clone(),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![Paint::Gradient(g.clone().into()), Paint::Gradient(g.into())]);
    }

    #[test]
    fn dynamic_style_sees_item_and_surface() {
        let mut s = RecordingSurface::new(10, 10);
        let mut item = Item::circle(3.0, 0.0, 1.0);
        let source = StyleSource::dynamic(|item: &Item, surface: &mut dyn Surface| {
            let x = item.transform().translate.map_or(0.0, |t| t.x);
            let w = surface.viewport().width as f32;
            Paint::Solid(Color::from_straight(x / w, 0.0, 0.0, 1.0))
        });
        item.set_draw_options(&DrawOptions::new().fill(source));
        item.draw(&mut s, &SceneOptions::default(), None).unwrap();

        let SurfaceOp::Fill(snap) = s.ops().iter().find(|op| op.is_paint()).unwrap() else {
            panic!()
        };
        assert_eq!(snap.paint, Some(Paint::Solid(Color::from_straight(0.3, 0.0, 0.0, 1.0))));
    }

    #[test]
    fn rotation_pivots_on_rect_center() {
        let mut s = RecordingSurface::new(100, 100);
        let mut item = Item::rect(10.0, 10.0, 20.0, 10.0);
        item.rotate(180.0).set_draw_options(&fill_black());
        item.draw(&mut s, &SceneOptions::default(), None).unwrap();

        let SurfaceOp::Fill(snap) = s.ops().iter().find(|op| op.is_paint()).unwrap() else {
            panic!()
        };
        let c = snap.transform.transform_point(Vec2::new(10.0, 5.0));
        assert!((c.x - 20.0).abs() < 1e-4 && (c.y - 15.0).abs() < 1e-4, "{c:?}");
    }

    #[test]
    fn degenerate_path_fails_but_restores() {
        let mut s = RecordingSurface::new(10, 10);
        let mut item = Item::from(Path::new(1.0, 1.0));
        item.rotate(45.0);

        let err = item.draw(&mut s, &SceneOptions::default(), None).unwrap_err();
        assert!(matches!(err, SceneError::DegenerateGeometry("path")));
        assert_eq!(s.ops().last(), Some(&SurfaceOp::Restore));
        assert_eq!(s.paint_stack().depth(), 0);
    }

    #[test]
    fn unrotated_empty_path_draws() {
        let mut s = RecordingSurface::new(10, 10);
        let item = Item::from(Path::new(1.0, 1.0));
        assert!(item.draw(&mut s, &SceneOptions::default(), None).is_ok());
    }

    #[test]
    fn text_paints_without_path_fill() {
        let mut s = RecordingSurface::new(100, 100);
        let mut item = Item::text(10.0, 20.0, "hey");
        item.set_draw_options(&DrawOptions::new().fill(Color::BLACK).stroke(Color::WHITE).font("20px serif"));
        item.draw(&mut s, &SceneOptions::default(), None).unwrap();

        let paints: Vec<&SurfaceOp> = s.ops().iter().filter(|op| op.is_paint()).collect();
        assert_eq!(paints.len(), 2);
        assert!(matches!(paints[0], SurfaceOp::StrokeText { .. }));
        assert!(matches!(paints[1], SurfaceOp::FillText { paint, .. } if paint.font.size_px == 20.0));
    }

    #[test]
    fn text_center_uses_stored_font_under_override() {
        let mut s = RecordingSurface::new(100, 100);
        let mut item = Item::text(0.0, 0.0, "abcd");
        item.set_draw_options(&DrawOptions::new().font("10px serif"));
        assert_eq!(item.local_center(&mut s).unwrap(), Vec2::new(10.0, 0.0));
    }
}
