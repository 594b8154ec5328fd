//! Time subsystem.
//!
//! [`LoopTimer`] is the single periodic timer an animation scheduler shares
//! between all of its animations. It only tracks deadlines; driving it
//! (sleeping, polling from a host loop) is up to the caller.

mod loop_timer;

pub use loop_timer::{period_for_fps, LoopTimer};
