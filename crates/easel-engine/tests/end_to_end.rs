//! Whole-scene behaviour driven through the public API on a recording surface.

use std::cell::Cell;
use std::rc::Rc;

use easel_engine::animation::{Animation, FrameBudget};
use easel_engine::config::SceneOptions;
use easel_engine::coords::Vec2;
use easel_engine::paint::{Color, DrawOptions, LinearGradient, Paint, StyleSource};
use easel_engine::scene::{Geometry, Item, Scene};
use easel_engine::surface::{RecordingSurface, SurfaceOp};
use easel_engine::SceneError;

fn scene() -> Scene<RecordingSurface> {
    Scene::new(RecordingSurface::new(100, 100), SceneOptions::default()).unwrap()
}

fn circle(x: f32, y: f32) -> Item {
    let mut c = Item::circle(x, y, 10.0);
    c.set_draw_options(&DrawOptions::new().fill(Color::BLACK).stroke(Color::WHITE));
    c
}

fn fill_offsets(ops: &[SurfaceOp]) -> Vec<(f32, f32)> {
    ops.iter()
        .filter_map(|op| match op {
            SurfaceOp::Fill(snap) => Some((snap.transform.dx, snap.transform.dy)),
            _ => None,
        })
        .collect()
}

// ── circle lifecycle ──────────────────────────────────────────────────────

#[test]
fn circle_redraw_clear_reorder_and_animate() {
    let mut scene = scene();
    scene.registry_mut().insert("c1", circle(50.0, 50.0)).unwrap();
    scene.surface_mut().take_ops();

    scene.redraw(None).unwrap();
    let ops = scene.surface().ops();
    let arcs = ops.iter().filter(|op| matches!(op, SurfaceOp::Arc { .. })).count();
    let strokes = ops.iter().filter(|op| matches!(op, SurfaceOp::Stroke(_))).count();
    assert_eq!(arcs, 1);
    assert_eq!(strokes, 1);
    assert_eq!(fill_offsets(ops), [(50.0, 50.0)]);
    assert!(!scene.is_empty());

    scene.clear();
    assert!(scene.is_empty());
    assert!(scene.surface().is_blank());

    scene.registry_mut().insert("c2", circle(20.0, 20.0)).unwrap();
    scene.registry_mut().send_to_back("c2").unwrap();
    assert_eq!(scene.registry().keys().collect::<Vec<_>>(), ["c2", "c1"]);
    scene.surface_mut().take_ops();
    scene.redraw(None).unwrap();
    assert_eq!(fill_offsets(scene.surface().ops()), [(20.0, 20.0), (50.0, 50.0)]);

    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let animation = Animation::new(move |_, _| counter.set(counter.get() + 1));
    assert!(scene.start_animation(&animation, FrameBudget::Frames(5)));
    assert!(scene.scheduler().is_running());

    for _ in 0..5 {
        scene.tick().unwrap();
    }
    assert_eq!(calls.get(), 5);

    // Expiry is noticed on the tick after the last invocation.
    scene.tick().unwrap();
    assert_eq!(calls.get(), 5);
    assert!(scene.scheduler().is_empty());
    assert!(!scene.scheduler().is_running());
    assert_eq!(scene.next_deadline(), None);
}

// ── animation ─────────────────────────────────────────────────────────────

#[test]
fn animation_moves_shared_item_between_ticks() {
    let mut scene = scene();
    let dot = circle(0.0, 10.0).shared();
    scene.registry_mut().insert("dot", Rc::clone(&dot)).unwrap();

    let animation = Animation::new(|frame, ctx| {
        if let Ok(item) = ctx.registry().get("dot") {
            item.borrow_mut().move_by(frame.frame as f32, 0.0);
        }
    });
    scene.start_animation(&animation, FrameBudget::Frames(3));
    scene.start_animation(&animation, FrameBudget::Frames(3));
    assert_eq!(scene.scheduler().len(), 1);

    for _ in 0..3 {
        scene.tick().unwrap();
    }
    // 1 + 2 + 3
    assert_eq!(dot.borrow().transform().translate, Some(Vec2::new(6.0, 10.0)));
}

#[test]
fn stop_takes_effect_before_next_tick() {
    let mut scene = scene();
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let animation = Animation::new(move |_, _| counter.set(counter.get() + 1));
    scene.start_animation(&animation, FrameBudget::Unbounded);
    scene.tick().unwrap();

    scene.stop_animation(&animation).unwrap();
    assert!(matches!(scene.stop_animation(&animation), Err(SceneError::AnimationNotFound)));
    scene.tick().unwrap();
    assert_eq!(calls.get(), 1);
}

// ── styles ────────────────────────────────────────────────────────────────

#[test]
fn gradient_and_dynamic_fills_resolve_per_item() {
    let mut scene = scene();

    let mut banded = Item::rect(0.0, 0.0, 50.0, 10.0);
    banded.set_draw_options(&DrawOptions::new().fill(
        LinearGradient::new(Vec2::new(0.0, 0.0), Vec2::new(50.0, 0.0))
            .color_stop(0.0, Color::BLACK)
            .color_stop(1.0, Color::WHITE),
    ));
    scene.registry_mut().insert("banded", banded).unwrap();

    let mut tinted = Item::rect(0.0, 20.0, 10.0, 10.0);
    tinted.set_draw_options(&DrawOptions::new().fill(StyleSource::dynamic(|item, _| {
        let width = match item.geometry() {
            Geometry::Rect(r) => r.width(),
            _ => 0.0,
        };
        Paint::solid(Color::from_straight(width / 10.0, 0.0, 0.0, 1.0))
    })));
    scene.registry_mut().insert("tinted", tinted).unwrap();

    scene.redraw(None).unwrap();
    let paints: Vec<_> = scene
        .surface()
        .ops()
        .iter()
        .filter_map(|op| match op {
            SurfaceOp::Fill(snap) => snap.paint.clone(),
            _ => None,
        })
        .collect();
    assert_eq!(paints.len(), 2);
    assert!(matches!(paints[0], Paint::Gradient(_)));
    assert_eq!(paints[1], Paint::solid(Color::from_straight(1.0, 0.0, 0.0, 1.0)));
}

#[test]
fn global_alpha_applies_to_every_item() {
    let options = SceneOptions { global_alpha: 0.5, ..SceneOptions::default() };
    let mut scene = Scene::new(RecordingSurface::new(10, 10), options).unwrap();
    scene.registry_mut().insert("a", circle(1.0, 1.0)).unwrap();
    scene.registry_mut().insert("b", circle(2.0, 2.0)).unwrap();
    scene.redraw(None).unwrap();

    for op in scene.surface().ops() {
        if let SurfaceOp::Fill(snap) = op {
            assert_eq!(snap.global_alpha, 0.5);
        }
    }
}

#[test]
fn hidden_items_leave_no_trace() {
    let mut scene = scene();
    let mut ghost = circle(5.0, 5.0);
    ghost.hide();
    scene.registry_mut().insert("ghost", ghost).unwrap();
    scene.surface_mut().take_ops();

    scene.redraw(None).unwrap();
    assert!(scene.surface().ops().is_empty());
}
