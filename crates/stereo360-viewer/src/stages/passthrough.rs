use stereo360_engine::coords::Extent;
use stereo360_engine::device::GpuContext;
use stereo360_engine::stage::{Director, DistortionStage, Stage, StageError};

use super::common::no_frame;

/// Distortion stage without lens correction.
///
/// Views render directly into the swapchain image, so the frame only needs to be in
/// flight; committing is the runtime's present.
#[derive(Debug, Default)]
pub struct PassthroughDistortion {
    offset_px: u32,
    visible_count: usize,
}

impl PassthroughDistortion {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stage<GpuContext> for PassthroughDistortion {
    fn prepare(&mut self, _ctx: &mut GpuContext) -> Result<(), StageError> {
        Ok(())
    }

    fn global_update(&mut self, _surface: Extent) -> Result<(), StageError> {
        Ok(())
    }

    fn render_at(
        &mut self,
        _ctx: &mut GpuContext,
        _index: usize,
        _viewport: Extent,
        _director: &Director,
    ) -> Result<(), StageError> {
        Ok(())
    }

    fn label(&self) -> &str {
        "passthrough-distortion"
    }
}

impl DistortionStage<GpuContext> for PassthroughDistortion {
    fn set_offset(&mut self, distance_px: u32) {
        if distance_px != self.offset_px {
            log::debug!("view gap {}px -> {distance_px}px", self.offset_px);
            self.offset_px = distance_px;
        }
    }

    fn begin_frame(
        &mut self,
        ctx: &mut GpuContext,
        _surface: Extent,
        visible_count: usize,
    ) -> Result<(), StageError> {
        ctx.frame_target().ok_or_else(no_frame)?;
        if visible_count != self.visible_count {
            log::debug!("compositing {visible_count} view(s)");
            self.visible_count = visible_count;
        }
        Ok(())
    }

    fn commit_frame(
        &mut self,
        _ctx: &mut GpuContext,
        _surface: Extent,
        _visible_count: usize,
    ) -> Result<(), StageError> {
        Ok(())
    }
}
