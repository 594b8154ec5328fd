use crate::coords::Vec2;
use crate::error::Result;
use crate::paint::DrawStyle;
use crate::surface::Surface;
use crate::text::FontSpec;

use super::Shape;

/// Single line of text with its alphabetic baseline starting at the item origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    text: String,
}

impl Text {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    pub fn append(&mut self, text: &str) -> &mut Self {
        self.text.push_str(text);
        self
    }

    pub fn prepend(&mut self, text: &str) -> &mut Self {
        self.text.insert_str(0, text);
        self
    }
}

impl Shape for Text {
    fn kind(&self) -> &'static str {
        "text"
    }

    /// Horizontal middle of the measured run, on the baseline.
    fn local_center(&self, surface: &mut dyn Surface, font: &FontSpec) -> Result<Vec2> {
        let metrics = surface.measure_text(&self.text, font);
        Ok(Vec2::new(metrics.width / 2.0, 0.0))
    }

    fn emit_path(&self, surface: &mut dyn Surface, style: &DrawStyle) {
        if style.stroke.is_some() {
            surface.stroke_text(&self.text, 0.0, 0.0);
        }
        if style.fill.is_some() {
            surface.fill_text(&self.text, 0.0, 0.0);
        }
    }

    fn paints_path(&self) -> bool {
        false
    }

    fn is_valid(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn editing_chains() {
        let mut t = Text::new("b");
        t.append("c").prepend("a");
        assert_eq!(t.text(), "abc");
        t.set_text(42.to_string());
        assert_eq!(t.text(), "42");
    }

    #[test]
    fn center_measures_with_given_font() {
        let mut s = RecordingSurface::new(1, 1);
        let t = Text::new("abcd");
        let c = t.local_center(&mut s, &FontSpec::new(10.0, "serif")).unwrap();
        assert_eq!(c, Vec2::new(10.0, 0.0));
    }
}
