use std::fmt;

const DEFAULT_SIZE_PX: f32 = 13.0;
const DEFAULT_FAMILY: &str = "sans-serif";

/// Parsed CSS-style font shorthand, e.g. `"italic bold 20px/1.2 'Fira Sans', serif"`.
///
/// Only size, the first family, weight and slant are kept. Line height and
/// fallback families are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub size_px: f32,
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            size_px: DEFAULT_SIZE_PX,
            family: DEFAULT_FAMILY.to_string(),
            bold: false,
            italic: false,
        }
    }
}

impl FontSpec {
    pub fn new(size_px: f32, family: impl Into<String>) -> Self {
        Self { size_px, family: family.into(), ..Self::default() }
    }

    /// Parses a font shorthand. Never fails: unknown input keeps the defaults
    /// for whatever could not be read.
    pub fn parse(input: &str) -> Self {
        let mut spec = FontSpec::default();
        let mut tokens = input.split_whitespace();
        let mut found_size = false;

        for token in tokens.by_ref() {
            match token.to_ascii_lowercase().as_str() {
                "italic" | "oblique" => spec.italic = true,
                "bold" | "bolder" | "600" | "700" | "800" | "900" => spec.bold = true,
                "normal" | "small-caps" | "lighter" | "100" | "200" | "300" | "400" | "500" => {}
                other => {
                    if let Some(size) = parse_size(other) {
                        spec.size_px = size;
                        found_size = true;
                        break;
                    }
                }
            }
        }

        if !found_size {
            log::debug!("font `{input}` has no size; using {DEFAULT_SIZE_PX}px");
            return spec;
        }

        let rest = tokens.collect::<Vec<_>>().join(" ");
        if let Some(first) = rest.split(',').next() {
            let family = first.trim().trim_matches(|c| c == '"' || c == '\'');
            if !family.is_empty() {
                spec.family = family.to_string();
            }
        }
        spec
    }
}

/// Reads `"20px"`, `"15pt"` or `"20px/1.2"` into pixels.
fn parse_size(token: &str) -> Option<f32> {
    let size = token.split('/').next()?;
    let (number, factor) = if let Some(n) = size.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = size.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else if let Some(n) = size.strip_suffix("em") {
        (n, DEFAULT_SIZE_PX)
    } else {
        return None;
    };
    let value: f32 = number.parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value * factor)
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.italic {
            f.write_str("italic ")?;
        }
        if self.bold {
            f.write_str("bold ")?;
        }
        write!(f, "{}px {}", self.size_px, self.family)
    }
}
