/// Size of the drawing surface or of one viewport, in physical pixels.
///
/// A zero dimension means "not yet configured": the surface exists but the host
/// has not reported its size, or reported it while minimized.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
}

impl Extent {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Both dimensions are non-zero.
    #[inline]
    pub const fn is_configured(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Width over height, or `1.0` for an unconfigured extent.
    #[inline]
    pub fn aspect(self) -> f32 {
        if self.is_configured() {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_dimension_is_unconfigured() {
        assert!(!Extent::new(0, 600).is_configured());
        assert!(!Extent::new(800, 0).is_configured());
        assert!(Extent::new(800, 600).is_configured());
    }

    #[test]
    fn aspect_falls_back_to_square() {
        assert_eq!(Extent::ZERO.aspect(), 1.0);
        assert_eq!(Extent::new(400, 200).aspect(), 2.0);
    }
}
