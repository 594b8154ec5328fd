//! Transform engine: matrix math, per-item transform state and the paint-time
//! op sequence that places an item on a surface.

mod matrix;
mod pipeline;
mod state;

pub use matrix::{compose, set_absolute, AffineMatrix};
pub use pipeline::{assemble_paint_transform, resolve, PaintOp};
pub use state::ItemTransform;
