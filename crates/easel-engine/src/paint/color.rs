use std::fmt;
use std::str::FromStr;

/// Premultiplied RGBA color with channels in `[0, 1]`.
///
/// Invariant: `r`, `g` and `b` never exceed `a`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT: Color = Color::from_premul(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Color::from_premul(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::from_premul(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from already premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from straight-alpha components, clamping each to `[0, 1]`.
    #[inline]
    pub fn from_straight(r: f32, g: f32, b: f32, a: f32) -> Self {
        let a = a.clamp(0.0, 1.0);
        Self {
            r: r.clamp(0.0, 1.0) * a,
            g: g.clamp(0.0, 1.0) * a,
            b: b.clamp(0.0, 1.0) * a,
            a,
        }
    }

    /// Creates a color from straight sRGB bytes.
    #[inline]
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::from_straight(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a as f32 / 255.0)
    }

    /// Parses any CSS color string (`#rgb`, `#rrggbbaa`, `rgb()`, `rgba()`,
    /// `hsl()`, named colors).
    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        let c = csscolorparser::parse(s.trim()).map_err(|e| ColorParseError {
            input: s.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::from_straight(c.r as f32, c.g as f32, c.b as f32, c.a as f32))
    }

    /// Returns straight-alpha components. RGB is zero for a fully transparent color.
    #[inline]
    pub fn to_straight(self) -> (f32, f32, f32, f32) {
        if self.a <= 0.0 {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            let inv = 1.0 / self.a;
            (self.r * inv, self.g * inv, self.b * inv, self.a)
        }
    }

    /// Multiplies every channel by `alpha` (premultiplied opacity scaling).
    #[inline]
    pub fn scale_alpha(self, alpha: f32) -> Self {
        let k = alpha.clamp(0.0, 1.0);
        Self::from_premul(self.r * k, self.g * k, self.b * k, self.a * k)
    }

    #[inline]
    pub fn is_transparent(self) -> bool {
        self.a <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite() && self.a.is_finite()
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s)
    }
}

/// Error returned by [`Color::parse`].
#[derive(Debug, Clone)]
pub struct ColorParseError {
    pub input: String,
    pub reason: String,
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color `{}`: {}", self.input, self.reason)
    }
}

impl std::error::Error for ColorParseError {}
