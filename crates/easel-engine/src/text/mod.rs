//! Font shorthand parsing and font storage used for text measurement.

mod font_spec;
mod font_system;

pub use font_spec::FontSpec;
pub use font_system::{FontId, FontLoadError, FontSystem};
