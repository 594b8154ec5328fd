//! Paint-time transform assembly.

use crate::coords::Vec2;
use crate::surface::Surface;

use super::{AffineMatrix, ItemTransform};

/// One primitive transform call on a surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PaintOp {
    /// Back to device identity.
    Reset,
    /// Absolute matrix set.
    SetMatrix(AffineMatrix),
    Translate(Vec2),
    /// Radians.
    Rotate(f32),
    Scale(Vec2),
}

impl PaintOp {
    pub fn apply(self, surface: &mut dyn Surface) {
        match self {
            PaintOp::Reset => surface.reset_transform(),
            PaintOp::SetMatrix(m) => surface.set_transform(m),
            PaintOp::Translate(t) => surface.translate(t.x, t.y),
            PaintOp::Rotate(r) => surface.rotate(r),
            PaintOp::Scale(s) => surface.scale(s.x, s.y),
        }
    }

    /// Applies this op to a tracked current transform the way a surface would.
    pub fn apply_to(self, current: AffineMatrix) -> AffineMatrix {
        match self {
            PaintOp::Reset => AffineMatrix::IDENTITY,
            PaintOp::SetMatrix(m) => m,
            PaintOp::Translate(t) => current.concat(&AffineMatrix::translation(t.x, t.y)),
            PaintOp::Rotate(r) => current.concat(&AffineMatrix::rotation(r)),
            PaintOp::Scale(s) => current.concat(&AffineMatrix::scaling(s.x, s.y)),
        }
    }
}

/// Builds the ordered op list for one item:
///
/// 1. reset to identity
/// 2. user matrix
/// 3. translation
/// 4. rotation about `center`
/// 5. scale about `center`
///
/// `center` is the shape-local pivot; it is only read when rotation or scale is set.
pub fn assemble_paint_transform(state: &ItemTransform, center: Vec2) -> Vec<PaintOp> {
    let mut ops = Vec::with_capacity(10);
    ops.push(PaintOp::Reset);

    if let Some(m) = state.matrix {
        ops.push(PaintOp::SetMatrix(m));
    }
    if let Some(t) = state.translate {
        ops.push(PaintOp::Translate(t));
    }
    if let Some(r) = state.rotate {
        ops.push(PaintOp::Translate(center));
        ops.push(PaintOp::Rotate(r));
        ops.push(PaintOp::Translate(-center));
    }
    if let Some(s) = state.scale {
        ops.push(PaintOp::Translate(center));
        ops.push(PaintOp::Scale(s));
        ops.push(PaintOp::Translate(-center));
    }
    ops
}

/// Folds an op list into the single matrix it leaves on the surface.
pub fn resolve(ops: &[PaintOp]) -> AffineMatrix {
    ops.iter().fold(AffineMatrix::IDENTITY, |m, op| op.apply_to(m))
}
