/// Axis-aligned rectangle in physical pixels, used as both the draw viewport and
/// the scissor region of one view.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// One past the last covered column.
    #[inline]
    pub const fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Half-open `[x, right)` ranges share at least one column.
    #[inline]
    pub fn overlaps_horizontally(self, other: PixelRect) -> bool {
        if self.width == 0 || other.width == 0 {
            return false;
        }
        self.x < other.right() && other.x < self.right()
    }
}
