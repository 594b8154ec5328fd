//! Frame-driven animation.
//!
//! - [`AnimationScheduler`]: multiplexes frame-counted callbacks onto one timer
//! - [`ease`]: per-frame easing increments for those callbacks

pub mod ease;
mod scheduler;

pub use scheduler::{Animation, AnimationContext, AnimationFrame, AnimationScheduler, FrameBudget};
