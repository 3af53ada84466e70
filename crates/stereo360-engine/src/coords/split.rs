use super::{Extent, PixelRect};

/// Splits the surface into side-by-side viewports separated by the lens gap.
///
/// For `n` visible views, a gap of `d` pixels and a surface `W` wide, every view is
/// `floor((W - d) / n)` wide and view `i` starts at `(w + d) * i`. Views always span
/// the full surface height. The rounding remainder is left on the right edge.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ViewportSplitter;

impl ViewportSplitter {
    /// Rectangle for view `index`, or `None` when `index` is not a visible view.
    ///
    /// A gap wider than the surface yields zero-width views rather than an error.
    pub fn split(
        surface: Extent,
        distance_px: u32,
        visible_count: usize,
        index: usize,
    ) -> Option<PixelRect> {
        if visible_count == 0 || index >= visible_count {
            return None;
        }

        let count = u32::try_from(visible_count).unwrap_or(u32::MAX);
        let index = u32::try_from(index).ok()?;

        let width = surface.width.saturating_sub(distance_px) / count;
        let x = width.saturating_add(distance_px).saturating_mul(index);

        Some(PixelRect::new(x, 0, width, surface.height))
    }

    /// Rectangles for every visible view, in index order.
    pub fn rects(
        surface: Extent,
        distance_px: u32,
        visible_count: usize,
    ) -> impl Iterator<Item = PixelRect> {
        (0..visible_count).filter_map(move |i| Self::split(surface, distance_px, visible_count, i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_split_with_gap() {
        let surface = Extent::new(1000, 500);
        let left = ViewportSplitter::split(surface, 200, 2, 0).unwrap();
        let right = ViewportSplitter::split(surface, 200, 2, 1).unwrap();
        assert_eq!(left, PixelRect::new(0, 0, 400, 500));
        assert_eq!(right, PixelRect::new(600, 0, 400, 500));
    }

    #[test]
    fn mono_fills_surface() {
        let rect = ViewportSplitter::split(Extent::new(1920, 1080), 0, 1, 0).unwrap();
        assert_eq!(rect, PixelRect::new(0, 0, 1920, 1080));
    }

    #[test]
    fn remainder_is_left_uncovered() {
        // (1001 - 0) / 3 = 333, so the last view ends at 999.
        let rects: Vec<_> = ViewportSplitter::rects(Extent::new(1001, 10), 0, 3).collect();
        assert_eq!(rects.len(), 3);
        assert_eq!(rects[2].right(), 999);
    }

    #[test]
    fn out_of_range_index_and_zero_count() {
        let surface = Extent::new(800, 600);
        assert!(ViewportSplitter::split(surface, 0, 2, 2).is_none());
        assert!(ViewportSplitter::split(surface, 0, 0, 0).is_none());
        assert_eq!(ViewportSplitter::rects(surface, 0, 0).count(), 0);
    }

    #[test]
    fn gap_wider_than_surface_collapses_views() {
        let rect = ViewportSplitter::split(Extent::new(100, 50), 300, 2, 1).unwrap();
        assert_eq!(rect.width, 0);
        assert!(rect.is_empty());
    }

    #[test]
    fn views_never_overlap() {
        for count in 1..=6usize {
            for distance in [0u32, 1, 7, 64, 333] {
                for width in [0u32, 1, 99, 640, 1000, 2561] {
                    let rects: Vec<_> =
                        ViewportSplitter::rects(Extent::new(width, 100), distance, count).collect();
                    for (i, a) in rects.iter().enumerate() {
                        for b in &rects[i + 1..] {
                            assert!(
                                !a.overlaps_horizontally(*b),
                                "count={count} distance={distance} width={width}: {a:?} vs {b:?}"
                            );
                        }
                    }
                }
            }
        }
    }
}
