use crate::command::CommandDrain;
use crate::coords::Extent;
use crate::device::{ClearBuffers, GraphicsContext};
use crate::lens::{LensConfig, LensGeometry, LensParams};
use crate::logging::DiagnosticSink;
use crate::mode::{DisplayModeProvider, OverlayProvider, ProjectionFrame, ProjectionModeProvider};
use crate::stage::{
    record, DistortionStage, FrameLayout, FrameReport, StageError, StagePhase, StagePipeline,
};

use super::{ContextLost, RendererConfig, RendererParts};

const RENDERER_LABEL: &str = "renderer";

/// Per-frame stereo renderer for one drawing surface.
///
/// Transitions are invoked serially on the render thread:
/// - [`on_surface_created`](Self::on_surface_created) when the context is (re)created
/// - [`on_surface_changed`](Self::on_surface_changed) when the surface size changes
/// - [`on_draw_frame`](Self::on_draw_frame) once per frame
///
/// Lens setters may be called from any thread through [`LensConfig`]; the renderer
/// picks the change up at the start of the next resize or draw.
pub struct SurfaceRenderer<C: GraphicsContext> {
    config: RendererConfig,
    lens: LensConfig,
    consumed_revision: u64,
    geometry: LensGeometry,
    surface: Extent,

    display: Box<dyn DisplayModeProvider>,
    projection: Box<dyn ProjectionModeProvider<C>>,
    overlays: Box<dyn OverlayProvider<C>>,
    distortion: Box<dyn DistortionStage<C>>,
    commands: Box<dyn CommandDrain>,
    pipeline: StagePipeline,
}

impl<C: GraphicsContext> SurfaceRenderer<C> {
    pub fn new(config: RendererConfig, parts: RendererParts<C>) -> Self {
        let RendererParts {
            display,
            projection,
            overlays,
            distortion,
            commands,
            diagnostics,
        } = parts;

        let lens = LensConfig::new(LensParams {
            scaling_factor: display.distortion_config().scale,
            ..config.lens
        });
        let consumed_revision = lens.revision();

        Self {
            config,
            lens,
            consumed_revision,
            geometry: LensGeometry::new(),
            surface: Extent::ZERO,
            display,
            projection,
            overlays,
            distortion,
            commands,
            pipeline: StagePipeline::new(diagnostics),
        }
    }

    /// Handle for changing lens measurements from other threads.
    pub fn lens_config(&self) -> &LensConfig {
        &self.lens
    }

    pub fn set_lens_distance(&self, distance_mm: f32) {
        self.lens.set_lens_distance(distance_mm);
    }

    pub fn set_physical_view_size(&self, width_mm: f32, height_mm: f32) {
        self.lens.set_physical_view_size(width_mm, height_mm);
    }

    /// Recomputes the gap from the current lens values and surface size.
    ///
    /// Returns `true` if the gap changed.
    pub fn recompute_geometry(&mut self) -> bool {
        self.consumed_revision = self.lens.revision();
        let params = self.lens.snapshot();
        self.geometry.recompute(&params, self.surface)
    }

    /// Current gap between adjacent views, in pixels.
    pub fn distance_px(&self) -> u32 {
        self.geometry.distance_px()
    }

    pub fn surface_size(&self) -> Extent {
        self.surface
    }

    /// Distortion scale read from the display mode at construction.
    pub fn scaling_factor(&self) -> f32 {
        self.lens.snapshot().scaling_factor
    }

    pub fn diagnostics_mut(&mut self) -> &mut dyn DiagnosticSink {
        self.pipeline.diagnostics_mut()
    }

    /// Created transition: installs the fixed context state.
    ///
    /// The derived gap and surface size are forgotten until the next resize; lens
    /// measurements are kept.
    pub fn on_surface_created(&mut self, ctx: &mut C) {
        ctx.apply_fixed_state(&self.config.fixed);
        self.surface = Extent::ZERO;
        self.geometry.reset();
        log::debug!("surface created; fixed state applied");
    }

    /// Resized transition.
    pub fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.drain_commands();

        let size = Extent::new(width, height);
        if size != self.surface {
            log::debug!("surface resized to {width}x{height}");
        }
        self.surface = size;
        self.recompute_geometry();
    }

    /// Drawing transition.
    ///
    /// A frame always runs to completion. Stage failures are reported to the
    /// diagnostic sink and counted in the returned report; only a lost context turns
    /// into an error, after the frame has been committed.
    pub fn on_draw_frame(&mut self, ctx: &mut C) -> Result<FrameReport, ContextLost> {
        self.drain_commands();
        if self.lens.revision() != self.consumed_revision {
            self.recompute_geometry();
        }

        ctx.clear(ClearBuffers::COLOR | ClearBuffers::DEPTH);

        let visible_count = self.display.visible_count();
        let mut report = FrameReport {
            visible_count,
            ..FrameReport::default()
        };
        self.check_context(ctx, &mut report);

        if visible_count > 0 {
            let layout = FrameLayout {
                surface: self.surface,
                visible_count,
                distance_px: self.geometry.distance_px(),
            };
            let ProjectionFrame {
                directors,
                main_stage,
            } = self.projection.frame();
            let overlays = self.overlays.overlays();

            let run = self.pipeline.run(
                ctx,
                layout,
                self.distortion.as_mut(),
                main_stage,
                overlays,
                directors,
            );
            report.rendered_views = run.rendered_views;
            report.skipped_views = run.skipped_views;
            report.failures += run.failures;
            report.context_lost |= run.context_lost;
        }

        self.check_context(ctx, &mut report);

        if report.context_lost {
            log::warn!("graphics context lost during frame");
            return Err(ContextLost);
        }
        Ok(report)
    }

    fn drain_commands(&mut self) {
        self.commands.drain_pending();
    }

    fn check_context(&mut self, ctx: &mut C, report: &mut FrameReport) {
        let result = ctx.check_error().map_err(StageError::from);
        record(
            self.pipeline.diagnostics_mut(),
            report,
            RENDERER_LABEL,
            StagePhase::FrameCheck,
            result,
        );
    }
}

impl<C: GraphicsContext> std::fmt::Debug for SurfaceRenderer<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurfaceRenderer")
            .field("config", &self.config)
            .field("lens", &self.lens.snapshot())
            .field("geometry", &self.geometry)
            .field("surface", &self.surface)
            .finish_non_exhaustive()
    }
}
