use crate::text::FontSpec;

use super::{Color, StyleSource};

/// Shape of stroke endpoints.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Shape of stroke corners.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Drop shadow applied to strokes and fills.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Shadow {
    pub offset_x: f32,
    pub offset_y: f32,
    pub blur: f32,
    /// `None` disables the shadow entirely.
    pub color: Option<Color>,
}

impl Shadow {
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.color.is_some_and(|c| !c.is_transparent())
    }
}

/// One key of a [`DrawOptions`] set: leave the current value, remove it, or
/// replace it.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Override<T> {
    #[default]
    Keep,
    Clear,
    Set(T),
}

impl<T: Clone> Override<T> {
    /// Writes this override into `slot`.
    pub fn apply_to(&self, slot: &mut Option<T>) {
        match self {
            Override::Keep => {}
            Override::Clear => *slot = None,
            Override::Set(v) => *slot = Some(v.clone()),
        }
    }

    #[inline]
    pub fn is_keep(&self) -> bool {
        matches!(self, Override::Keep)
    }
}

/// Complete per-item draw style.
///
/// Stroke and fill are independent: both, either or neither may be set.
#[derive(Debug, Clone)]
pub struct DrawStyle {
    pub stroke: Option<StyleSource>,
    pub fill: Option<StyleSource>,
    pub line_width: f32,
    pub font: FontSpec,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub shadow: Shadow,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            stroke: None,
            fill: None,
            line_width: 1.0,
            font: FontSpec::default(),
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
            shadow: Shadow::default(),
        }
    }
}

impl DrawStyle {
    /// Writes every key present in `options` over this style.
    pub fn apply(&mut self, options: &DrawOptions) {
        options.stroke.apply_to(&mut self.stroke);
        options.fill.apply_to(&mut self.fill);
        if let Some(w) = options.line_width {
            self.line_width = w;
        }
        if let Some(font) = &options.font {
            self.font = font.clone();
        }
        if let Some(cap) = options.line_cap {
            self.line_cap = cap;
        }
        if let Some(join) = options.line_join {
            self.line_join = join;
        }
        if let Some(limit) = options.miter_limit {
            self.miter_limit = limit;
        }
        if let Some(x) = options.shadow_offset_x {
            self.shadow.offset_x = x;
        }
        if let Some(y) = options.shadow_offset_y {
            self.shadow.offset_y = y;
        }
        if let Some(blur) = options.shadow_blur {
            self.shadow.blur = blur;
        }
        options.shadow_color.apply_to(&mut self.shadow.color);
    }

    /// Copy of this style with `options` merged on top. `self` is not modified.
    pub fn merged(&self, options: &DrawOptions) -> DrawStyle {
        let mut out = self.clone();
        out.apply(options);
        out
    }
}

/// Partial style: present keys override, missing keys fall back.
///
/// Used both to update an item's stored style and as a per-redraw override set.
/// Stroke, fill and shadow colour can also be cleared with
/// [`no_stroke`](Self::no_stroke), [`no_fill`](Self::no_fill) and
/// [`no_shadow`](Self::no_shadow).
#[derive(Debug, Clone, Default)]
pub struct DrawOptions {
    pub stroke: Override<StyleSource>,
    pub fill: Override<StyleSource>,
    pub line_width: Option<f32>,
    pub font: Option<FontSpec>,
    pub line_cap: Option<LineCap>,
    pub line_join: Option<LineJoin>,
    pub miter_limit: Option<f32>,
    pub shadow_offset_x: Option<f32>,
    pub shadow_offset_y: Option<f32>,
    pub shadow_blur: Option<f32>,
    pub shadow_color: Override<Color>,
}

impl DrawOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stroke(mut self, source: impl Into<StyleSource>) -> Self {
        self.stroke = Override::Set(source.into());
        self
    }

    pub fn no_stroke(mut self) -> Self {
        self.stroke = Override::Clear;
        self
    }

    pub fn fill(mut self, source: impl Into<StyleSource>) -> Self {
        self.fill = Override::Set(source.into());
        self
    }

    pub fn no_fill(mut self) -> Self {
        self.fill = Override::Clear;
        self
    }

    pub fn line_width(mut self, width: f32) -> Self {
        self.line_width = Some(width);
        self
    }

    /// Font shorthand such as `"bold 20px serif"`.
    pub fn font(mut self, font: &str) -> Self {
        self.font = Some(FontSpec::parse(font));
        self
    }

    pub fn line_cap(mut self, cap: LineCap) -> Self {
        self.line_cap = Some(cap);
        self
    }

    pub fn line_join(mut self, join: LineJoin) -> Self {
        self.line_join = Some(join);
        self
    }

    pub fn miter_limit(mut self, limit: f32) -> Self {
        self.miter_limit = Some(limit);
        self
    }

    pub fn shadow(mut self, offset_x: f32, offset_y: f32, blur: f32, color: Color) -> Self {
        self.shadow_offset_x = Some(offset_x);
        self.shadow_offset_y = Some(offset_y);
        self.shadow_blur = Some(blur);
        self.shadow_color = Override::Set(color);
        self
    }

    /// Disables the shadow; offsets and blur are left as they are.
    pub fn no_shadow(mut self) -> Self {
        self.shadow_color = Override::Clear;
        self
    }
}
