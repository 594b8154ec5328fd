use std::time::{Duration, Instant};

/// Smallest period the timer runs at, whatever the requested rate.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Tick period for a frame rate: `round(1000 / fps)` milliseconds.
pub fn period_for_fps(fps: f32) -> Duration {
    let ms = (1000.0 / fps).round();
    if ms.is_finite() && ms >= 1.0 {
        Duration::from_millis(ms as u64)
    } else {
        MIN_PERIOD
    }
}

/// Shared periodic timer of an animation loop.
///
/// The timer does not sleep or spawn anything: callers ask for the next
/// deadline, wait however they like, then report the tick with
/// [`advance`](Self::advance). The period is fixed when the timer is created.
#[derive(Debug, Clone)]
pub struct LoopTimer {
    period: Duration,
    next: Instant,
    ticks: u64,
}

impl LoopTimer {
    /// Starts a timer whose first tick is due one period from now.
    pub fn start(fps: f32) -> Self {
        Self::start_at(fps, Instant::now())
    }

    pub fn start_at(fps: f32, now: Instant) -> Self {
        let period = period_for_fps(fps);
        log::debug!("loop timer started: {fps} fps, period {period:?}");
        Self {
            period,
            next: now + period,
            ticks: 0,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    #[inline]
    pub fn deadline(&self) -> Instant {
        self.next
    }

    /// Ticks reported so far.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Time left until the next tick; zero when already due.
    #[inline]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Records one tick and schedules the next.
    ///
    /// Deadlines advance in whole periods. A caller that fell more than one
    /// period behind restarts from `now` instead of replaying missed ticks.
    pub fn advance(&mut self, now: Instant) {
        self.ticks = self.ticks.wrapping_add(1);
        self.next += self.period;
        if self.next <= now {
            log::trace!("loop timer behind by {:?}; resyncing", now - self.next);
            self.next = now + self.period;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn period_rounds_to_whole_millis() {
        assert_eq!(period_for_fps(30.0), Duration::from_millis(33));
        assert_eq!(period_for_fps(60.0), Duration::from_millis(17));
        assert_eq!(period_for_fps(1.0), Duration::from_millis(1000));
    }

    #[test]
    fn extreme_rates_clamp_to_minimum() {
        assert_eq!(period_for_fps(5000.0), MIN_PERIOD);
        assert_eq!(period_for_fps(f32::INFINITY), MIN_PERIOD);
    }

    #[test]
    fn first_tick_due_after_one_period() {
        let t0 = Instant::now();
        let timer = LoopTimer::start_at(10.0, t0);
        assert!(!timer.is_due(t0));
        assert!(timer.is_due(t0 + Duration::from_millis(100)));
        assert_eq!(timer.remaining(t0), Duration::from_millis(100));
    }

    #[test]
    fn advance_keeps_cadence() {
        let t0 = Instant::now();
        let mut timer = LoopTimer::start_at(10.0, t0);
        timer.advance(t0 + Duration::from_millis(105));
        assert_eq!(timer.deadline(), t0 + Duration::from_millis(200));
        assert_eq!(timer.ticks(), 1);
    }

    #[test]
    fn advance_resyncs_after_stall() {
        let t0 = Instant::now();
        let mut timer = LoopTimer::start_at(10.0, t0);
        let late = t0 + Duration::from_millis(550);
        timer.advance(late);
        assert_eq!(timer.deadline(), late + Duration::from_millis(100));
    }
}
