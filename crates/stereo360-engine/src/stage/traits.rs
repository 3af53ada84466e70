use crate::coords::Extent;
use crate::device::GraphicsContext;

use super::{Director, StageError};

/// One rendering layer drawn into every visible view.
///
/// Stages are owned by their providers; the pipeline only borrows them for the
/// duration of a frame. Each frame a stage sees, in order: [`prepare`](Self::prepare),
/// [`global_update`](Self::global_update), then one [`render_at`](Self::render_at) per
/// visible view that has a director.
pub trait Stage<C: GraphicsContext> {
    /// Creates or refreshes context resources. Called every frame; implementations
    /// should return early once their resources exist.
    fn prepare(&mut self, ctx: &mut C) -> Result<(), StageError>;

    /// Whole-surface update before any view is drawn.
    fn global_update(&mut self, surface: Extent) -> Result<(), StageError>;

    /// Draws view `index`. The context's viewport and scissor are already bound to
    /// the view's rectangle of size `viewport`.
    fn render_at(
        &mut self,
        ctx: &mut C,
        index: usize,
        viewport: Extent,
        director: &Director,
    ) -> Result<(), StageError>;

    /// Name used in diagnostics.
    fn label(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Owned stage handle as stored by providers.
pub type BoxedStage<C> = Box<dyn Stage<C>>;

/// Lens distortion pre-correction stage.
///
/// It owns the composite target the views render into: [`begin_frame`](Self::begin_frame)
/// runs before the first view, [`commit_frame`](Self::commit_frame) after the last.
pub trait DistortionStage<C: GraphicsContext>: Stage<C> {
    /// Pixel gap between adjacent views.
    fn set_offset(&mut self, distance_px: u32);

    fn begin_frame(
        &mut self,
        ctx: &mut C,
        surface: Extent,
        visible_count: usize,
    ) -> Result<(), StageError>;

    /// Composites all views into the surface.
    fn commit_frame(
        &mut self,
        ctx: &mut C,
        surface: Extent,
        visible_count: usize,
    ) -> Result<(), StageError>;
}
