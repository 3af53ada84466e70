use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lens distortion parameters of a display mode.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DistortionConfig {
    pub scale: f32,
}

impl Default for DistortionConfig {
    fn default() -> Self {
        Self { scale: 0.95 }
    }
}

/// Supplies the view count. Read fresh every frame.
pub trait DisplayModeProvider {
    /// Number of side-by-side views; `0` renders nothing.
    fn visible_count(&self) -> usize;

    /// Read once when the renderer is constructed.
    fn distortion_config(&self) -> DistortionConfig;
}

/// Built-in display modes.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DisplayMode {
    /// One full-surface view.
    #[default]
    Normal = 0,
    /// Two side-by-side views for a head-mounted viewer.
    Glass = 1,
}

impl DisplayMode {
    pub const fn visible_count(self) -> usize {
        match self {
            Self::Normal => 1,
            Self::Glass => 2,
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Normal => Self::Glass,
            Self::Glass => Self::Normal,
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            1 => Self::Glass,
            _ => Self::Normal,
        }
    }
}

/// Display mode that any thread may switch; the render thread sees the change on
/// its next frame.
#[derive(Debug, Clone)]
pub struct SharedDisplayMode {
    mode: Arc<AtomicU8>,
    distortion: DistortionConfig,
}

impl SharedDisplayMode {
    pub fn new(mode: DisplayMode, distortion: DistortionConfig) -> Self {
        Self {
            mode: Arc::new(AtomicU8::new(mode as u8)),
            distortion,
        }
    }

    pub fn mode(&self) -> DisplayMode {
        DisplayMode::from_u8(self.mode.load(Ordering::Acquire))
    }

    pub fn switch(&self, mode: DisplayMode) {
        let prev = DisplayMode::from_u8(self.mode.swap(mode as u8, Ordering::AcqRel));
        if prev != mode {
            log::info!("display mode {prev:?} -> {mode:?}");
        }
    }

    /// Flips between `Normal` and `Glass`; returns the new mode.
    pub fn toggle(&self) -> DisplayMode {
        let next = self.mode().toggled();
        self.switch(next);
        next
    }
}

impl Default for SharedDisplayMode {
    fn default() -> Self {
        Self::new(DisplayMode::default(), DistortionConfig::default())
    }
}

impl DisplayModeProvider for SharedDisplayMode {
    fn visible_count(&self) -> usize {
        self.mode().visible_count()
    }

    fn distortion_config(&self) -> DistortionConfig {
        self.distortion
    }
}
