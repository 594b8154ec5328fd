/// Device-pixel size of a drawing surface.
///
/// Fixed when the surface is created; scenes clear exactly this area.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width and height as floats, for clear and path calls.
    #[inline]
    pub fn size_f32(self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }
}
