//! Incremental easing functions.
//!
//! Every function returns the change for one frame, not an absolute
//! position: `delta` is the total change over the animation, `frame` the
//! current frame (`1..=total`) and `total` the animation length in frames.
//! Summing the result over all frames yields approximately `delta`, so an
//! animation callback can apply it directly:
//!
//! ```
//! use easel_engine::animation::ease;
//!
//! let total = 60.0;
//! let moved: f32 = (1..=60).map(|f| ease::quad_in_out(120.0, f as f32, total)).sum();
//! assert!((moved - 120.0).abs() < 3.0);
//! ```
//!
//! Each `*_in` curve is the per-frame derivative of its easing curve, `*_out`
//! mirrors it in time, `*_in_out` runs the in curve over the first half and
//! the out curve over the second.

use std::f32::consts::TAU;

/// Default exponent of the `exp_*` family.
pub const DEFAULT_POWER: f32 = 3.0;
/// Default overshoot of `back_in` and `back_out`.
pub const DEFAULT_OVERSHOOT: f32 = 1.70158;
/// Default overshoot of `back_in_out`.
pub const DEFAULT_OVERSHOOT_IN_OUT: f32 = 1.70158 * 1.525;
/// Default oscillation count of the `elastic_*` family.
pub const DEFAULT_OSCILLATIONS: f32 = 3.0;

// ── quadratic ─────────────────────────────────────────────────────────────

pub fn quad_in(delta: f32, frame: f32, total: f32) -> f32 {
    let f = frame / total;
    2.0 * f * delta / total
}

pub fn quad_out(delta: f32, frame: f32, total: f32) -> f32 {
    let f = frame / total;
    -2.0 * (f - 1.0) * delta / total
}

pub fn quad_in_out(delta: f32, frame: f32, total: f32) -> f32 {
    let f = frame / (total / 2.0);
    if f < 1.0 {
        2.0 * f * delta / total
    } else {
        -2.0 * (f - 2.0) * delta / total
    }
}

// ── exponential ───────────────────────────────────────────────────────────

pub fn exp_in(delta: f32, frame: f32, total: f32, power: f32) -> f32 {
    let f = frame / total;
    power * f.powf(power - 1.0) * delta / total
}

pub fn exp_out(delta: f32, frame: f32, total: f32, power: f32) -> f32 {
    exp_in(delta, total - frame, total, power)
}

pub fn exp_in_out(delta: f32, frame: f32, total: f32, power: f32) -> f32 {
    let f = frame / (total / 2.0);
    if f < 1.0 {
        exp_in(delta, f * total, total, power)
    } else {
        exp_out(delta, (f - 1.0) * total, total, power)
    }
}

// ── back ──────────────────────────────────────────────────────────────────

/// Pulls back by `overshoot` before moving forward.
pub fn back_in(delta: f32, frame: f32, total: f32, overshoot: f32) -> f32 {
    let a = overshoot;
    let f = frame / total;
    f * (3.0 * a * f + 3.0 * f - 2.0 * a) * delta / total
}

/// Runs past the target by `overshoot` and settles back.
pub fn back_out(delta: f32, frame: f32, total: f32, overshoot: f32) -> f32 {
    let a = overshoot;
    let f = frame / total - 1.0;
    f * (3.0 * a * f + 3.0 * f + 2.0 * a) * delta / total
}

pub fn back_in_out(delta: f32, frame: f32, total: f32, overshoot: f32) -> f32 {
    let a = overshoot;
    let f = frame / (total / 2.0);
    if f < 1.0 {
        f * (3.0 * a * f + 3.0 * f - 2.0 * a) * delta / total
    } else {
        let f = f - 2.0;
        f * (3.0 * a * f + 3.0 * f + 2.0 * a) * delta / total
    }
}

// ── bounce ────────────────────────────────────────────────────────────────

pub fn bounce_out(delta: f32, frame: f32, total: f32) -> f32 {
    const K: f32 = 7.5625;
    let f = frame / total;
    let offset = if f < 1.0 / 2.75 {
        0.0
    } else if f < 2.0 / 2.75 {
        1.5 / 2.75
    } else if f < 2.5 / 2.75 {
        2.25 / 2.75
    } else {
        2.625 / 2.75
    };
    K * 2.0 * (f - offset) * delta / total
}

pub fn bounce_in(delta: f32, frame: f32, total: f32) -> f32 {
    bounce_out(delta, total - frame, total)
}

pub fn bounce_in_out(delta: f32, frame: f32, total: f32) -> f32 {
    if frame < total / 2.0 {
        bounce_in(delta, frame * 2.0, total)
    } else {
        bounce_out(delta, frame * 2.0 - total, total)
    }
}

// ── elastic ───────────────────────────────────────────────────────────────

/// Derivative of `f^4.5 * sin(w f)`, where `w` puts `oscillations` full
/// swings plus a quarter turn into the run so the curve ends at 1.
pub fn elastic_in(delta: f32, frame: f32, total: f32, oscillations: f32) -> f32 {
    let f = frame / total;
    let w = TAU * (oscillations + 0.25);
    let rate = delta / total;
    rate * 4.5 * f.powf(3.5) * (f * w).sin() + rate * f.powf(4.5) * (f * w).cos() * w
}

pub fn elastic_out(delta: f32, frame: f32, total: f32, oscillations: f32) -> f32 {
    elastic_in(delta, total - frame, total, oscillations)
}

pub fn elastic_in_out(delta: f32, frame: f32, total: f32, oscillations: f32) -> f32 {
    if frame < total / 2.0 {
        elastic_in(delta, frame * 2.0, total, oscillations)
    } else {
        elastic_out(delta, frame * 2.0 - total, total, oscillations)
    }
}
