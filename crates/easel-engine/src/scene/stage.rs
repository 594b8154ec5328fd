use std::ops::ControlFlow;
use std::time::Instant;

use crate::animation::{Animation, AnimationScheduler, FrameBudget};
use crate::config::SceneOptions;
use crate::error::{Result, SceneError};
use crate::paint::DrawOptions;
use crate::surface::{Surface, SurfaceProvider};

use super::Registry;

/// Owns one drawing surface, the items drawn on it and their animations.
///
/// Drawing is pull-based: nothing is painted until [`redraw`](Self::redraw)
/// is called, either directly or by one animation tick.
pub struct Scene<S: Surface> {
    surface: S,
    registry: Registry,
    options: SceneOptions,
    is_empty: bool,
    scheduler: AnimationScheduler,
}

impl<S: Surface> Scene<S> {
    /// Takes over `surface` and clears it.
    pub fn new(surface: S, options: SceneOptions) -> Result<Self> {
        options.validate()?;
        let viewport = surface.viewport();
        let mut scene = Self {
            surface,
            registry: Registry::new(),
            options,
            is_empty: true,
            scheduler: AnimationScheduler::new(),
        };
        scene.clear();
        log::debug!("scene created on {}x{} surface", viewport.width, viewport.height);
        Ok(scene)
    }

    /// Resolves the surface named `id` through `provider`.
    pub fn bind<P>(provider: &mut P, id: &str, options: SceneOptions) -> Result<Self>
    where
        P: SurfaceProvider<Surface = S>,
    {
        let surface = provider
            .resolve(id)
            .ok_or_else(|| SceneError::SurfaceNotFound(id.to_string()))?;
        Self::new(surface, options)
    }

    // ── accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    #[inline]
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    #[inline]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[inline]
    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    #[inline]
    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    /// Replaces the global paint options. A running animation timer keeps
    /// the period it was started with.
    pub fn set_options(&mut self, options: SceneOptions) -> Result<()> {
        options.validate()?;
        self.options = options;
        Ok(())
    }

    /// True when nothing was painted since the last clear.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_empty
    }

    #[inline]
    pub fn scheduler(&self) -> &AnimationScheduler {
        &self.scheduler
    }

    // ── drawing ───────────────────────────────────────────────────────────

    /// Paints every registered item in paint order.
    ///
    /// `overrides` are merged over each item's style for this pass only.
    /// An item that fails to draw does not stop the pass; the first failure is
    /// returned once all items were visited.
    pub fn redraw(&mut self, overrides: Option<&DrawOptions>) -> Result<()> {
        if !self.is_empty && self.options.auto_clear_canvas {
            self.clear();
        }
        self.is_empty = false;

        let mut first_error = None;
        for entry in &self.registry {
            let result = match entry.item.try_borrow() {
                Ok(item) => item.draw(&mut self.surface, &self.options, overrides),
                Err(_) => Err(SceneError::ItemInUse(entry.key.clone())),
            };
            if let Err(err) = result {
                log::warn!("failed to draw `{}`: {err}", entry.key);
                first_error.get_or_insert(SceneError::Draw {
                    key: entry.key.clone(),
                    source: Box::new(err),
                });
            }
        }
        log::trace!("redrew {} item(s)", self.registry.len());

        first_error.map_or(Ok(()), Err)
    }

    /// Clears the whole surface. Idempotent.
    pub fn clear(&mut self) {
        self.surface.clear();
        self.is_empty = true;
    }

    // ── animation ─────────────────────────────────────────────────────────

    /// Schedules `animation`, starting the loop timer at `loop_fps` if idle.
    /// Returns `false` if the animation was already scheduled.
    pub fn start_animation(&mut self, animation: &Animation, duration: FrameBudget) -> bool {
        self.scheduler
            .start(animation, duration, self.options.loop_fps, Instant::now())
    }

    pub fn stop_animation(&mut self, animation: &Animation) -> Result<()> {
        self.scheduler.stop(animation)
    }

    /// Runs one tick now, regardless of the timer deadline.
    pub fn tick(&mut self) -> Result<()> {
        self.tick_at(Instant::now())
    }

    /// Advances every animation, redraws once, then stops the timer if no
    /// animation is left.
    pub fn tick_at(&mut self, now: Instant) -> Result<()> {
        self.scheduler.advance(&mut self.registry);
        let drawn = self.redraw(None);
        self.scheduler.finish_tick(now);
        drawn
    }

    /// Deadline of the next tick; `None` while no animation is scheduled.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.timer().map(|t| t.deadline())
    }

    /// Ticks once if the timer is due at `now`. Returns whether a tick ran.
    ///
    /// For hosts that own their event loop.
    pub fn poll(&mut self, now: Instant) -> Result<bool> {
        match self.scheduler.timer() {
            Some(timer) if timer.is_due(now) => {
                self.tick_at(now)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Blocks, ticking at the timer's cadence until no animation is left.
    /// Returns the number of ticks run.
    pub fn run_animations(&mut self) -> u64 {
        self.run_animations_with(|_| ControlFlow::Continue(()))
    }

    /// Like [`run_animations`](Self::run_animations), calling `after_tick`
    /// once after every tick's redraw. Draw failures are logged, not fatal.
    ///
    /// Returning [`ControlFlow::Break`] ends the loop early; animations that
    /// are still scheduled stay scheduled.
    pub fn run_animations_with<F>(&mut self, mut after_tick: F) -> u64
    where
        F: FnMut(&mut Self) -> ControlFlow<()>,
    {
        let mut ticks = 0;
        while let Some(deadline) = self.next_deadline() {
            let now = Instant::now();
            if deadline > now {
                std::thread::sleep(deadline - now);
            }
            if let Err(err) = self.tick_at(Instant::now()) {
                log::warn!("animation tick {}: {err}", self.scheduler.frame());
            }
            ticks += 1;
            if after_tick(self).is_break() {
                log::debug!("animation loop stopped by host after {ticks} tick(s)");
                break;
            }
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;
    use crate::scene::{Item, Path};
    use crate::surface::{RecordingSurface, SurfaceOp};
    use std::collections::HashMap;
    use std::time::Duration;

    fn scene() -> Scene<RecordingSurface> {
        Scene::new(RecordingSurface::new(100, 100), SceneOptions::default()).unwrap()
    }

    fn filled_circle(x: f32, y: f32) -> Item {
        let mut c = Item::circle(x, y, 10.0);
        c.set_draw_options(&DrawOptions::new().fill(Color::BLACK));
        c
    }

    fn clears(ops: &[SurfaceOp]) -> usize {
        ops.iter().filter(|op| matches!(op, SurfaceOp::ClearRect { .. })).count()
    }

    #[test]
    fn new_clears_surface_and_starts_empty() {
        let s = scene();
        assert!(s.is_empty());
        assert_eq!(clears(s.surface().ops()), 1);
    }

    #[test]
    fn invalid_options_are_rejected() {
        let opts = SceneOptions { global_alpha: -0.1, ..SceneOptions::default() };
        assert!(matches!(
            Scene::new(RecordingSurface::new(1, 1), opts),
            Err(SceneError::Config(_))
        ));
    }

    // ── binding ───────────────────────────────────────────────────────────

    struct Surfaces(HashMap<String, RecordingSurface>);

    impl SurfaceProvider for Surfaces {
        type Surface = RecordingSurface;

        fn resolve(&mut self, id: &str) -> Option<RecordingSurface> {
            self.0.remove(id)
        }
    }

    #[test]
    fn bind_resolves_by_id() {
        let mut p = Surfaces(HashMap::from([("main".to_string(), RecordingSurface::new(30, 20))]));
        let s = Scene::bind(&mut p, "main", SceneOptions::default()).unwrap();
        assert_eq!(s.surface().viewport().width, 30);
        assert!(matches!(
            Scene::bind(&mut p, "main", SceneOptions::default()),
            Err(SceneError::SurfaceNotFound(id)) if id == "main"
        ));
    }

    // ── redraw ────────────────────────────────────────────────────────────

    #[test]
    fn redraw_clears_only_when_not_empty() {
        let mut s = scene();
        s.registry_mut().insert("c", filled_circle(50.0, 50.0)).unwrap();
        s.surface_mut().take_ops();

        s.redraw(None).unwrap();
        assert_eq!(clears(s.surface().ops()), 0);
        assert!(!s.is_empty());

        s.redraw(None).unwrap();
        assert_eq!(clears(s.surface().ops()), 1);
    }

    #[test]
    fn auto_clear_off_accumulates() {
        let opts = SceneOptions { auto_clear_canvas: false, ..SceneOptions::default() };
        let mut s = Scene::new(RecordingSurface::new(10, 10), opts).unwrap();
        s.registry_mut().insert("c", filled_circle(5.0, 5.0)).unwrap();
        s.redraw(None).unwrap();
        s.redraw(None).unwrap();
        assert_eq!(s.surface().painted_since_clear(), 2);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut s = scene();
        s.registry_mut().insert("c", filled_circle(50.0, 50.0)).unwrap();
        s.redraw(None).unwrap();
        s.clear();
        s.clear();
        assert!(s.is_empty());
        assert!(s.surface().is_blank());
    }

    #[test]
    fn paint_order_follows_registry() {
        let mut s = scene();
        s.registry_mut().insert("a", filled_circle(1.0, 1.0)).unwrap();
        s.registry_mut().insert("b", filled_circle(2.0, 2.0)).unwrap();
        s.registry_mut().send_to_back("b").unwrap();
        s.surface_mut().take_ops();
        s.redraw(None).unwrap();

        let xs: Vec<f32> = s
            .surface()
            .ops()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Fill(snap) => Some(snap.transform.dx),
                _ => None,
            })
            .collect();
        assert_eq!(xs, [2.0, 1.0]);
    }

    #[test]
    fn failing_item_does_not_stop_pass() {
        let mut s = scene();
        let mut bad = Item::from(Path::new(0.0, 0.0));
        bad.rotate(10.0);
        s.registry_mut().insert("bad", bad).unwrap();
        s.registry_mut().insert("good", filled_circle(5.0, 5.0)).unwrap();

        let err = s.redraw(None).unwrap_err();
        assert!(matches!(&err, SceneError::Draw { key, source }
            if key == "bad" && matches!(**source, SceneError::DegenerateGeometry(_))));
        assert_eq!(s.surface().painted_since_clear(), 1);
    }

    #[test]
    fn overrides_apply_to_every_item() {
        let mut s = scene();
        s.registry_mut().insert("a", filled_circle(1.0, 1.0)).unwrap();
        s.registry_mut().insert("b", Item::rect(0.0, 0.0, 3.0, 3.0)).unwrap();
        s.redraw(Some(&DrawOptions::new().stroke(Color::WHITE))).unwrap();

        let strokes = s.surface().ops().iter().filter(|op| matches!(op, SurfaceOp::Stroke(_))).count();
        assert_eq!(strokes, 2);
    }

    #[test]
    fn override_can_suppress_stroke_for_one_pass() {
        let mut s = scene();
        let mut c = filled_circle(1.0, 1.0);
        c.set_draw_options(&DrawOptions::new().stroke(Color::WHITE));
        s.registry_mut().insert("c", c).unwrap();

        s.redraw(Some(&DrawOptions::new().no_stroke())).unwrap();
        let strokes = |ops: &[SurfaceOp]| ops.iter().filter(|op| matches!(op, SurfaceOp::Stroke(_))).count();
        assert_eq!(strokes(s.surface().ops()), 0);

        s.surface_mut().take_ops();
        s.redraw(None).unwrap();
        assert_eq!(strokes(s.surface().ops()), 1);
    }

    #[test]
    fn mutably_borrowed_item_reports_in_use() {
        let mut s = scene();
        let item = filled_circle(1.0, 1.0).shared();
        s.registry_mut().insert("c", std::rc::Rc::clone(&item)).unwrap();

        let _guard = item.borrow_mut();
        let err = s.redraw(None).unwrap_err();
        assert!(matches!(&err, SceneError::Draw { source, .. } if matches!(**source, SceneError::ItemInUse(_))));
    }

    // ── animation ─────────────────────────────────────────────────────────

    #[test]
    fn tick_advances_then_redraws_once() {
        let mut s = scene();
        s.registry_mut().insert("c", filled_circle(0.0, 0.0)).unwrap();
        let a = Animation::new(|_, ctx| {
            if let Ok(item) = ctx.registry().get("c") {
                item.borrow_mut().move_by(10.0, 0.0);
            }
        });
        s.start_animation(&a, FrameBudget::Frames(2));
        s.surface_mut().take_ops();

        s.tick().unwrap();
        let fills: Vec<f32> = s
            .surface()
            .ops()
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Fill(snap) => Some(snap.transform.dx),
                _ => None,
            })
            .collect();
        assert_eq!(fills, [10.0]);
    }

    #[test]
    fn tick_redraws_even_when_last_animation_expires() {
        let mut s = scene();
        s.registry_mut().insert("c", filled_circle(0.0, 0.0)).unwrap();
        let a = Animation::new(|_, _| {});
        s.start_animation(&a, FrameBudget::Frames(1));
        s.tick().unwrap();
        s.surface_mut().take_ops();

        s.tick().unwrap();
        assert!(s.surface().ops().iter().any(|op| matches!(op, SurfaceOp::Fill(_))));
        assert!(!s.scheduler().is_running());
        assert_eq!(s.next_deadline(), None);
    }

    #[test]
    fn poll_waits_for_deadline() {
        let mut s = scene();
        let a = Animation::new(|_, _| {});
        s.start_animation(&a, FrameBudget::Unbounded);
        let deadline = s.next_deadline().unwrap();

        assert!(!s.poll(deadline - Duration::from_millis(1)).unwrap());
        assert!(s.poll(deadline).unwrap());
        assert_eq!(s.scheduler().frame(), 1);
        assert!(s.next_deadline().unwrap() > deadline);
    }

    #[test]
    fn run_animations_returns_when_done() {
        let opts = SceneOptions { loop_fps: 1000.0, ..SceneOptions::default() };
        let mut s = Scene::new(RecordingSurface::new(10, 10), opts).unwrap();
        let a = Animation::new(|_, _| {});
        s.start_animation(&a, FrameBudget::Frames(3));

        let mut seen = Vec::new();
        let ticks = s.run_animations_with(|scene| {
            seen.push(scene.scheduler().frame());
            ControlFlow::Continue(())
        });
        assert_eq!(ticks, 4);
        assert_eq!(seen, [1, 2, 3, 4]);
        assert!(!s.scheduler().is_running());
    }

    #[test]
    fn host_can_break_unbounded_loop() {
        let opts = SceneOptions { loop_fps: 1000.0, ..SceneOptions::default() };
        let mut s = Scene::new(RecordingSurface::new(10, 10), opts).unwrap();
        let a = Animation::new(|_, _| {});
        s.start_animation(&a, FrameBudget::Unbounded);

        let ticks = s.run_animations_with(|scene| {
            if scene.scheduler().frame() >= 3 {
                scene.stop_animation(&a).unwrap();
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(ticks, 3);
        assert!(s.scheduler().is_empty());
    }

    #[test]
    fn break_leaves_animations_scheduled() {
        let opts = SceneOptions { loop_fps: 1000.0, ..SceneOptions::default() };
        let mut s = Scene::new(RecordingSurface::new(10, 10), opts).unwrap();
        let a = Animation::new(|_, _| {});
        s.start_animation(&a, FrameBudget::Unbounded);

        assert_eq!(s.run_animations_with(|_| ControlFlow::Break(())), 1);
        assert!(s.scheduler().contains(&a));
        assert!(s.next_deadline().is_some());
    }

    #[test]
    fn set_options_keeps_running_timer_period() {
        let mut s = scene();
        let a = Animation::new(|_, _| {});
        s.start_animation(&a, FrameBudget::Unbounded);
        s.set_options(SceneOptions { loop_fps: 5.0, ..SceneOptions::default() }).unwrap();
        assert_eq!(s.scheduler().timer().unwrap().period(), Duration::from_millis(33));
    }
}
