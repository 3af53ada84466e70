use crate::coords::Extent;

use super::LensParams;

/// Pixel gap between adjacent viewports for the given lens and surface.
///
/// Returns `None` while the geometry is not ready: a zero physical view dimension
/// or a zero surface dimension. A negative gap (lenses closer than the views are
/// wide) clamps to zero. An infinite lens distance saturates to `u32::MAX`; NaN
/// and negative infinity give zero.
///
/// With `h` half the width of one eye view and `d` the gap:
///
/// ```text
/// 2h +  d = lens distance (px)
/// 4h +  d = surface width (px)
/// ```
///
/// so `d = 2 * lens distance - surface width`.
pub fn lens_distance_px(params: &LensParams, surface: Extent) -> Option<u32> {
    if params.view_width_mm == 0.0 || params.view_height_mm == 0.0 || !surface.is_configured() {
        return None;
    }

    // Truncation toward zero; NaN and infinities saturate and are clamped below.
    let lens_px = (params.distance_mm / params.view_width_mm * surface.width as f32) as i64;
    let gap = lens_px.saturating_mul(2).saturating_sub(i64::from(surface.width));

    Some(u32::try_from(gap.max(0)).unwrap_or(u32::MAX))
}

/// Lens calculator with its cached result.
///
/// The cache survives "not ready" inputs so a surface that is still being set up does
/// not flicker between a gap and no gap.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct LensGeometry {
    distance_px: u32,
}

impl LensGeometry {
    pub const fn new() -> Self {
        Self { distance_px: 0 }
    }

    /// Cached inter-viewport gap in pixels.
    #[inline]
    pub const fn distance_px(&self) -> u32 {
        self.distance_px
    }

    /// Recomputes the gap. Returns `true` if the cached value changed.
    pub fn recompute(&mut self, params: &LensParams, surface: Extent) -> bool {
        let Some(distance_px) = lens_distance_px(params, surface) else {
            log::trace!("lens geometry not ready (surface {surface:?}); keeping {}px", self.distance_px);
            return false;
        };

        let changed = distance_px != self.distance_px;
        if changed {
            log::debug!(
                "lens gap {}px -> {}px (lens {}mm, view {}x{}mm, surface {}x{})",
                self.distance_px,
                distance_px,
                params.distance_mm,
                params.view_width_mm,
                params.view_height_mm,
                surface.width,
                surface.height,
            );
        }
        self.distance_px = distance_px;
        changed
    }

    /// Forgets the derived gap; used when the graphics context is re-created.
    pub fn reset(&mut self) {
        self.distance_px = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(distance_mm: f32, view_width_mm: f32) -> LensParams {
        LensParams {
            distance_mm,
            view_width_mm,
            view_height_mm: 70.0,
            scaling_factor: 1.0,
        }
    }

    #[test]
    fn zero_lens_distance_means_no_gap() {
        for width in [1u32, 640, 1000, 2560] {
            assert_eq!(lens_distance_px(&params(0.0, 100.0), Extent::new(width, 500)), Some(0));
        }
    }

    #[test]
    fn close_lenses_clamp_to_zero() {
        // 10 / 100 * 1000 = 100px; 2 * 100 - 1000 = -800.
        assert_eq!(lens_distance_px(&params(10.0, 100.0), Extent::new(1000, 500)), Some(0));
    }

    #[test]
    fn wide_lenses_open_a_gap() {
        // 60 / 100 * 1000 = 600px; 2 * 600 - 1000 = 200.
        assert_eq!(lens_distance_px(&params(60.0, 100.0), Extent::new(1000, 500)), Some(200));
    }

    #[test]
    fn ready_inputs_always_yield_a_gap() {
        for distance in [0.0f32, 0.5, 10.0, 49.9, 50.0, 75.0, 1e6] {
            for view in [1.0f32, 63.0, 100.0, 400.0] {
                for width in [1u32, 3, 1000, 4096] {
                    let d = lens_distance_px(&params(distance, view), Extent::new(width, 10));
                    assert!(d.is_some(), "{distance} {view} {width}");
                }
            }
        }
    }

    #[test]
    fn not_ready_inputs() {
        let surface = Extent::new(1000, 500);
        let mut p = params(60.0, 100.0);
        assert!(lens_distance_px(&p, Extent::new(0, 500)).is_none());
        assert!(lens_distance_px(&p, Extent::new(1000, 0)).is_none());
        p.view_height_mm = 0.0;
        assert!(lens_distance_px(&p, surface).is_none());
        assert!(lens_distance_px(&params(60.0, 0.0), surface).is_none());
    }

    #[test]
    fn not_ready_keeps_cached_value() {
        let mut geometry = LensGeometry::new();
        assert!(geometry.recompute(&params(60.0, 100.0), Extent::new(1000, 500)));
        assert_eq!(geometry.distance_px(), 200);

        assert!(!geometry.recompute(&params(10.0, 100.0), Extent::new(0, 500)));
        assert!(!geometry.recompute(&params(10.0, 0.0), Extent::new(1000, 500)));
        assert_eq!(geometry.distance_px(), 200);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut once = LensGeometry::new();
        once.recompute(&params(60.0, 100.0), Extent::new(1000, 500));

        let mut twice = LensGeometry::new();
        twice.recompute(&params(60.0, 100.0), Extent::new(1000, 500));
        assert!(!twice.recompute(&params(60.0, 100.0), Extent::new(1000, 500)));

        assert_eq!(once, twice);
    }

    #[test]
    fn non_finite_inputs_clamp() {
        let p = params(f32::INFINITY, 100.0);
        assert_eq!(lens_distance_px(&p, Extent::new(1000, 500)), Some(u32::MAX));
        let p = params(f32::NEG_INFINITY, 100.0);
        assert_eq!(lens_distance_px(&p, Extent::new(1000, 500)), Some(0));
        let p = params(f32::NAN, 100.0);
        assert_eq!(lens_distance_px(&p, Extent::new(1000, 500)), Some(0));
    }

    #[test]
    fn reset_clears_gap() {
        let mut geometry = LensGeometry::new();
        geometry.recompute(&params(60.0, 100.0), Extent::new(1000, 500));
        geometry.reset();
        assert_eq!(geometry.distance_px(), 0);
    }
}
