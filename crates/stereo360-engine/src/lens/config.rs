use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

/// Physical lens and display measurements.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LensParams {
    /// Distance between the optical centres of the two lenses, in millimetres.
    ///
    /// Zero means "no separation".
    pub distance_mm: f32,

    /// Physical width of the drawing surface, in millimetres.
    pub view_width_mm: f32,

    /// Physical height of the drawing surface, in millimetres.
    pub view_height_mm: f32,

    /// Scale taken from the display mode's distortion configuration.
    pub scaling_factor: f32,
}

impl Default for LensParams {
    fn default() -> Self {
        Self {
            distance_mm: 0.0,
            view_width_mm: 0.0,
            view_height_mm: 0.0,
            scaling_factor: 1.0,
        }
    }
}

/// Shared, lock-free lens configuration.
///
/// Setters may run on any thread; the render thread reads a [`LensParams`] snapshot
/// at its consume points and recomputes geometry when [`revision`](Self::revision)
/// moved. Each field is written atomically; a reader racing a two-field update may
/// observe one new and one old value for at most one frame.
#[derive(Debug, Clone)]
pub struct LensConfig {
    inner: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    distance_mm: AtomicU32,
    view_width_mm: AtomicU32,
    view_height_mm: AtomicU32,
    scaling_factor: f32,
    revision: AtomicU64,
}

impl LensConfig {
    pub fn new(params: LensParams) -> Self {
        Self {
            inner: Arc::new(Shared {
                distance_mm: AtomicU32::new(params.distance_mm.to_bits()),
                view_width_mm: AtomicU32::new(params.view_width_mm.to_bits()),
                view_height_mm: AtomicU32::new(params.view_height_mm.to_bits()),
                scaling_factor: params.scaling_factor,
                revision: AtomicU64::new(0),
            }),
        }
    }

    /// Sets the physical distance between the lens centres.
    ///
    /// Takes effect at the next resize or draw on the render thread.
    pub fn set_lens_distance(&self, distance_mm: f32) {
        store_f32(&self.inner.distance_mm, distance_mm);
        self.bump();
    }

    /// Sets the physical size of the drawing surface.
    ///
    /// Takes effect at the next resize or draw on the render thread.
    pub fn set_physical_view_size(&self, width_mm: f32, height_mm: f32) {
        store_f32(&self.inner.view_width_mm, width_mm);
        store_f32(&self.inner.view_height_mm, height_mm);
        self.bump();
    }

    /// Monotonic counter incremented by every setter.
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Acquire)
    }

    /// Reads the current values.
    pub fn snapshot(&self) -> LensParams {
        LensParams {
            distance_mm: load_f32(&self.inner.distance_mm),
            view_width_mm: load_f32(&self.inner.view_width_mm),
            view_height_mm: load_f32(&self.inner.view_height_mm),
            scaling_factor: self.inner.scaling_factor,
        }
    }

    fn bump(&self) {
        self.inner.revision.fetch_add(1, Ordering::Release);
    }
}

impl Default for LensConfig {
    fn default() -> Self {
        Self::new(LensParams::default())
    }
}

fn store_f32(slot: &AtomicU32, value: f32) {
    slot.store(value.to_bits(), Ordering::Relaxed);
}

fn load_f32(slot: &AtomicU32) -> f32 {
    f32::from_bits(slot.load(Ordering::Relaxed))
}
