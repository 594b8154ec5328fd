use std::fmt;

use fontdue::layout::{CoordinateSystem, GlyphPosition, Layout, LayoutSettings, TextStyle};

use super::FontSpec;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone)]
pub struct FontLoadError(pub String);

impl fmt::Display for FontLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "font load error: {}", self.0)
    }
}

impl std::error::Error for FontLoadError {}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

struct LoadedFont {
    family: String,
    font: fontdue::Font,
}

/// Glyph layout of one string, positioned relative to the alphabetic baseline.
pub(crate) struct LaidOutText<'a> {
    pub font: &'a fontdue::Font,
    pub glyphs: Vec<GlyphPosition>,
    /// Distance from the layout top to the baseline, in pixels.
    pub ascent: f32,
}

/// Owns the fonts a surface can measure and draw with.
///
/// Fonts are looked up by family name (case-insensitive); a family that was
/// never loaded falls back to the first loaded font. With no fonts at all,
/// text measures as zero width and draws nothing.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<LoadedFont>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and stores a TrueType or OpenType font under `family`.
    pub fn load_font(&mut self, family: &str, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(LoadedFont { family: family.to_string(), font });
        log::debug!("loaded font family `{family}` as {id:?}");
        Ok(id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    fn font_for(&self, spec: &FontSpec) -> Option<&fontdue::Font> {
        self.fonts
            .iter()
            .find(|f| f.family.eq_ignore_ascii_case(&spec.family))
            .or_else(|| self.fonts.first())
            .map(|f| &f.font)
    }

    /// Advance width of `text` in pixels at the font size.
    #[must_use]
    pub fn measure_width(&self, text: &str, spec: &FontSpec) -> f32 {
        let Some(laid) = self.layout(text, spec) else {
            return 0.0;
        };

        // Pen position after each glyph, not the bitmap right edge, so trailing
        // spaces and side bearings count toward the width.
        laid.glyphs
            .iter()
            .map(|g| {
                let m = laid.font.metrics_indexed(g.key.glyph_index, spec.size_px);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max)
    }

    pub(crate) fn layout(&self, text: &str, spec: &FontSpec) -> Option<LaidOutText<'_>> {
        let font = self.font_for(spec)?;
        let size = spec.size_px.max(0.01);

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, size, 0));

        let ascent = font
            .horizontal_line_metrics(size)
            .map_or(size * 0.8, |m| m.ascent);

        Some(LaidOutText { font, glyphs: layout.glyphs().clone(), ascent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_system_measures_zero() {
        let fonts = FontSystem::new();
        assert!(fonts.is_empty());
        assert_eq!(fonts.measure_width("hello", &FontSpec::default()), 0.0);
    }

    #[test]
    fn garbage_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font("broken", &[0, 1, 2, 3]).is_err());
        assert!(fonts.is_empty());
    }
}
