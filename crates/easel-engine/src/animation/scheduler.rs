use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use crate::error::{Result, SceneError};
use crate::scene::Registry;
use crate::time::LoopTimer;

/// Length of an animation in ticks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum FrameBudget {
    /// Runs for frames `1..=n`, then is removed.
    Frames(u32),
    /// Runs until stopped.
    Unbounded,
}

impl FrameBudget {
    /// `frames(0)` means unbounded.
    #[inline]
    pub fn frames(n: u32) -> Self {
        if n == 0 { FrameBudget::Unbounded } else { FrameBudget::Frames(n) }
    }

    /// Frame count as a float for easing functions; `None` when unbounded.
    #[inline]
    pub fn total(self) -> Option<f32> {
        match self {
            FrameBudget::Frames(n) => Some(n as f32),
            FrameBudget::Unbounded => None,
        }
    }
}

impl From<Option<u32>> for FrameBudget {
    fn from(n: Option<u32>) -> Self {
        n.map_or(FrameBudget::Unbounded, FrameBudget::frames)
    }
}

/// Arguments of one animation callback invocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AnimationFrame {
    /// Frame of this animation, starting at 1.
    pub frame: u32,
    pub duration: FrameBudget,
}

type AnimationFn = dyn Fn(AnimationFrame, &mut AnimationContext<'_>);

enum Request {
    Start(Animation, FrameBudget),
    Stop(Animation),
}

/// What a callback can reach while its tick runs: the scene's items, and
/// start/stop requests applied once every entry was advanced.
pub struct AnimationContext<'a> {
    registry: &'a mut Registry,
    current: &'a Animation,
    requests: &'a mut Vec<Request>,
}

impl AnimationContext<'_> {
    #[inline]
    pub fn registry(&mut self) -> &mut Registry {
        self.registry
    }

    /// The animation being invoked.
    #[inline]
    pub fn current(&self) -> &Animation {
        self.current
    }

    /// Unschedules the running animation after this tick's advance.
    pub fn stop_current(&mut self) {
        self.requests.push(Request::Stop(self.current.clone()));
    }

    /// Unschedules `animation` after this tick's advance. Entries later in
    /// scheduling order are still invoked this tick.
    pub fn stop(&mut self, animation: &Animation) {
        self.requests.push(Request::Stop(animation.clone()));
    }

    /// Schedules `animation` after this tick's advance; its first frame is
    /// the next tick. Ignored if it is already scheduled by then.
    pub fn start(&mut self, animation: &Animation, duration: FrameBudget) {
        self.requests.push(Request::Start(animation.clone(), duration));
    }
}

/// Animation callback.
///
/// Cloning shares the callback; clones compare equal and identify the same
/// scheduled entry, so keep a clone around to stop the animation later.
#[derive(Clone)]
pub struct Animation(Rc<AnimationFn>);

impl Animation {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(AnimationFrame, &mut AnimationContext<'_>) + 'static,
    {
        Self(Rc::new(f))
    }

    #[inline]
    fn call(&self, frame: AnimationFrame, ctx: &mut AnimationContext<'_>) {
        (self.0)(frame, ctx)
    }

    #[inline]
    fn id(&self) -> *const () {
        Rc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for Animation {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Animation {}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Animation({:p})", self.id())
    }
}

#[derive(Debug)]
struct AnimationEntry {
    animation: Animation,
    duration: FrameBudget,
    frame: u32,
}

/// Runs any number of frame-counted animations off one shared timer.
///
/// The timer exists exactly while at least one animation is scheduled: the
/// first [`start`](Self::start) creates it, and [`finish_tick`](Self::finish_tick)
/// drops it once the last entry is gone.
#[derive(Debug, Default)]
pub struct AnimationScheduler {
    entries: Vec<AnimationEntry>,
    timer: Option<LoopTimer>,
    frame: u64,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of scheduled animations.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True while the shared timer exists.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    #[inline]
    pub fn timer(&self) -> Option<&LoopTimer> {
        self.timer.as_ref()
    }

    /// Ticks run since the scheduler was created.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn contains(&self, animation: &Animation) -> bool {
        self.entries.iter().any(|e| e.animation == *animation)
    }

    /// Current frame of a scheduled animation.
    pub fn frame_of(&self, animation: &Animation) -> Option<u32> {
        self.entries.iter().find(|e| e.animation == *animation).map(|e| e.frame)
    }

    /// Schedules `animation`; a no-op returning `false` if it is already scheduled.
    ///
    /// Starts the shared timer at `fps` when this is the only entry. A timer
    /// that is already running keeps its period.
    pub fn start(&mut self, animation: &Animation, duration: FrameBudget, fps: f32, now: Instant) -> bool {
        if !self.schedule(animation, duration) {
            return false;
        }
        if self.timer.is_none() {
            self.timer = Some(LoopTimer::start_at(fps, now));
        }
        true
    }

    fn schedule(&mut self, animation: &Animation, duration: FrameBudget) -> bool {
        if self.contains(animation) {
            log::debug!("{animation:?} already scheduled; ignoring start");
            return false;
        }
        self.entries.push(AnimationEntry {
            animation: animation.clone(),
            duration,
            frame: 0,
        });
        log::debug!("scheduled {animation:?} for {duration:?}");
        true
    }

    /// Removes `animation` immediately.
    pub fn stop(&mut self, animation: &Animation) -> Result<()> {
        let i = self
            .entries
            .iter()
            .position(|e| e.animation == *animation)
            .ok_or(SceneError::AnimationNotFound)?;
        self.entries.remove(i);
        log::debug!("stopped {animation:?}");
        Ok(())
    }

    /// Stops every animation and drops the timer.
    pub fn stop_all(&mut self) {
        self.entries.clear();
        self.timer = None;
    }

    /// Advances every entry by one frame, in scheduling order.
    ///
    /// An entry whose frame passes its budget is removed without being
    /// invoked; every other entry is invoked once. The caller redraws
    /// afterwards and then calls [`finish_tick`](Self::finish_tick).
    pub fn advance(&mut self, registry: &mut Registry) {
        self.frame = self.frame.wrapping_add(1);
        let tick = self.frame;

        let mut requests = Vec::new();
        self.entries.retain_mut(|entry| {
            entry.frame += 1;
            if let FrameBudget::Frames(n) = entry.duration {
                if entry.frame > n {
                    log::debug!("{:?} expired after {n} frame(s)", entry.animation);
                    return false;
                }
            }
            let frame = AnimationFrame {
                frame: entry.frame,
                duration: entry.duration,
            };
            let mut ctx = AnimationContext {
                registry: &mut *registry,
                current: &entry.animation,
                requests: &mut requests,
            };
            entry.animation.call(frame, &mut ctx);
            true
        });
        self.apply_requests(requests);
        log::trace!("tick {tick}: {} animation(s) live", self.entries.len());
    }

    // The timer is still alive here: it is only dropped by `finish_tick` once
    // no entry is left, and a request can only come from a live entry.
    fn apply_requests(&mut self, requests: Vec<Request>) {
        for request in requests {
            match request {
                Request::Start(animation, duration) => {
                    self.schedule(&animation, duration);
                }
                Request::Stop(animation) => {
                    if self.stop(&animation).is_err() {
                        log::debug!("{animation:?} already gone; ignoring stop request");
                    }
                }
            }
        }
    }

    /// Ends a tick: moves the timer deadline on, or drops the timer when no
    /// animation is left.
    pub fn finish_tick(&mut self, now: Instant) {
        if self.entries.is_empty() {
            if self.timer.take().is_some() {
                log::debug!("no animations left; loop timer stopped");
            }
        } else if let Some(timer) = self.timer.as_mut() {
            timer.advance(now);
        }
    }
}
