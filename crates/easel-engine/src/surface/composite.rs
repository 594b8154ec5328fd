use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard 2D compositing modes, named as in CSS (`"source-over"`, `"lighter"`, ...).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOp {
    #[default]
    SourceOver,
    SourceIn,
    SourceOut,
    SourceAtop,
    DestinationOver,
    DestinationIn,
    DestinationOut,
    DestinationAtop,
    Lighter,
    Copy,
    Xor,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

#[derive(Error, Debug, Clone, Eq, PartialEq)]
#[error("unknown composite operation `{0}`")]
pub struct UnknownCompositeOp(pub String);

impl CompositeOp {
    pub const ALL: [CompositeOp; 26] = [
        CompositeOp::SourceOver,
        CompositeOp::SourceIn,
        CompositeOp::SourceOut,
        CompositeOp::SourceAtop,
        CompositeOp::DestinationOver,
        CompositeOp::DestinationIn,
        CompositeOp::DestinationOut,
        CompositeOp::DestinationAtop,
        CompositeOp::Lighter,
        CompositeOp::Copy,
        CompositeOp::Xor,
        CompositeOp::Multiply,
        CompositeOp::Screen,
        CompositeOp::Overlay,
        CompositeOp::Darken,
        CompositeOp::Lighten,
        CompositeOp::ColorDodge,
        CompositeOp::ColorBurn,
        CompositeOp::HardLight,
        CompositeOp::SoftLight,
        CompositeOp::Difference,
        CompositeOp::Exclusion,
        CompositeOp::Hue,
        CompositeOp::Saturation,
        CompositeOp::Color,
        CompositeOp::Luminosity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CompositeOp::SourceOver => "source-over",
            CompositeOp::SourceIn => "source-in",
            CompositeOp::SourceOut => "source-out",
            CompositeOp::SourceAtop => "source-atop",
            CompositeOp::DestinationOver => "destination-over",
            CompositeOp::DestinationIn => "destination-in",
            CompositeOp::DestinationOut => "destination-out",
            CompositeOp::DestinationAtop => "destination-atop",
            CompositeOp::Lighter => "lighter",
            CompositeOp::Copy => "copy",
            CompositeOp::Xor => "xor",
            CompositeOp::Multiply => "multiply",
            CompositeOp::Screen => "screen",
            CompositeOp::Overlay => "overlay",
            CompositeOp::Darken => "darken",
            CompositeOp::Lighten => "lighten",
            CompositeOp::ColorDodge => "color-dodge",
            CompositeOp::ColorBurn => "color-burn",
            CompositeOp::HardLight => "hard-light",
            CompositeOp::SoftLight => "soft-light",
            CompositeOp::Difference => "difference",
            CompositeOp::Exclusion => "exclusion",
            CompositeOp::Hue => "hue",
            CompositeOp::Saturation => "saturation",
            CompositeOp::Color => "color",
            CompositeOp::Luminosity => "luminosity",
        }
    }

    /// Raster blend mode for this operation.
    pub(crate) fn blend_mode(self) -> tiny_skia::BlendMode {
        use tiny_skia::BlendMode;
        match self {
            CompositeOp::SourceOver => BlendMode::SourceOver,
            CompositeOp::SourceIn => BlendMode::SourceIn,
            CompositeOp::SourceOut => BlendMode::SourceOut,
            CompositeOp::SourceAtop => BlendMode::SourceAtop,
            CompositeOp::DestinationOver => BlendMode::DestinationOver,
            CompositeOp::DestinationIn => BlendMode::DestinationIn,
            CompositeOp::DestinationOut => BlendMode::DestinationOut,
            CompositeOp::DestinationAtop => BlendMode::DestinationAtop,
            CompositeOp::Lighter => BlendMode::Plus,
            CompositeOp::Copy => BlendMode::Source,
            CompositeOp::Xor => BlendMode::Xor,
            CompositeOp::Multiply => BlendMode::Multiply,
            CompositeOp::Screen => BlendMode::Screen,
            CompositeOp::Overlay => BlendMode::Overlay,
            CompositeOp::Darken => BlendMode::Darken,
            CompositeOp::Lighten => BlendMode::Lighten,
            CompositeOp::ColorDodge => BlendMode::ColorDodge,
            CompositeOp::ColorBurn => BlendMode::ColorBurn,
            CompositeOp::HardLight => BlendMode::HardLight,
            CompositeOp::SoftLight => BlendMode::SoftLight,
            CompositeOp::Difference => BlendMode::Difference,
            CompositeOp::Exclusion => BlendMode::Exclusion,
            CompositeOp::Hue => BlendMode::Hue,
            CompositeOp::Saturation => BlendMode::Saturation,
            CompositeOp::Color => BlendMode::Color,
            CompositeOp::Luminosity => BlendMode::Luminosity,
        }
    }
}

impl fmt::Display for CompositeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompositeOp {
    type Err = UnknownCompositeOp;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CompositeOp::ALL
            .into_iter()
            .find(|op| op.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownCompositeOp(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_source_over() {
        assert_eq!(CompositeOp::default(), CompositeOp::SourceOver);
    }

    #[test]
    fn names_parse_back() {
        for op in CompositeOp::ALL {
            assert_eq!(op.as_str().parse::<CompositeOp>(), Ok(op));
        }
    }

    #[test]
    fn parse_is_case_insensitive_and_trims() {
        assert_eq!(" Destination-Out ".parse(), Ok(CompositeOp::DestinationOut));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "plus-darker".parse::<CompositeOp>(),
            Err(UnknownCompositeOp("plus-darker".into()))
        );
    }

    #[test]
    fn lighter_maps_to_additive_blend() {
        assert_eq!(CompositeOp::Lighter.blend_mode(), tiny_skia::BlendMode::Plus);
        assert_eq!(CompositeOp::Copy.blend_mode(), tiny_skia::BlendMode::Source);
    }
}
