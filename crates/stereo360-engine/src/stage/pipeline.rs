use crate::coords::{Extent, ViewportSplitter};
use crate::device::{GraphicsContext, ScissorScope};
use crate::logging::DiagnosticSink;

use super::{BoxedStage, Director, DistortionStage, StageError, StageFailure, StagePhase};

/// Surface-wide layout of one frame.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct FrameLayout {
    pub surface: Extent,
    pub visible_count: usize,
    /// Pixel gap between adjacent views.
    pub distance_px: u32,
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub visible_count: usize,
    /// Views that had a director and were drawn.
    pub rendered_views: usize,
    /// Visible views without a director.
    pub skipped_views: usize,
    /// Stage calls that returned an error.
    pub failures: usize,
    /// A stage reported the graphics context as lost.
    pub context_lost: bool,
}

/// Sequences the stages of a frame.
///
/// Order, with no parallelism:
/// 1. distortion `prepare`, `set_offset`, `begin_frame` over the whole surface
/// 2. main stage `prepare` + `global_update`
/// 3. each overlay's `prepare` + `global_update`, in registration order
/// 4. per visible view with a director: bind viewport and scissor, main `render_at`,
///    each overlay's `render_at`, release the scissor
/// 5. distortion `commit_frame`
///
/// A failing call is reported to the diagnostic sink and never retried within the
/// frame. A stage that fails to prepare or update sits out that frame's views; a
/// failed `render_at` only affects its own view. The frame always reaches the commit.
pub struct StagePipeline {
    diagnostics: Box<dyn DiagnosticSink>,
    /// Reused per frame: which overlays passed step 3.
    overlay_ready: Vec<bool>,
}

impl StagePipeline {
    pub fn new(diagnostics: Box<dyn DiagnosticSink>) -> Self {
        Self {
            diagnostics,
            overlay_ready: Vec::new(),
        }
    }

    pub fn diagnostics_mut(&mut self) -> &mut dyn DiagnosticSink {
        self.diagnostics.as_mut()
    }

    pub fn run<C, D>(
        &mut self,
        ctx: &mut C,
        layout: FrameLayout,
        distortion: &mut D,
        mut main: Option<&mut BoxedStage<C>>,
        overlays: &mut [BoxedStage<C>],
        directors: &[Director],
    ) -> FrameReport
    where
        C: GraphicsContext,
        D: DistortionStage<C> + ?Sized,
    {
        let FrameLayout {
            surface,
            visible_count,
            distance_px,
        } = layout;
        let sink = self.diagnostics.as_mut();

        let mut report = FrameReport {
            visible_count,
            ..FrameReport::default()
        };

        // 1. Distortion brackets the frame.
        let result = distortion.prepare(ctx);
        record(sink, &mut report, distortion.label(), StagePhase::Prepare, result);
        distortion.set_offset(distance_px);
        let result = distortion.begin_frame(ctx, surface, visible_count);
        record(sink, &mut report, distortion.label(), StagePhase::BeginFrame, result);

        // 2. + 3. Whole-surface preparation.
        let main_ready = match main.as_mut() {
            Some(stage) => prepare_stage(sink, &mut report, ctx, stage, surface),
            None => false,
        };

        let mut overlay_ready = std::mem::take(&mut self.overlay_ready);
        overlay_ready.clear();
        for stage in overlays.iter_mut() {
            overlay_ready.push(prepare_stage(sink, &mut report, ctx, stage, surface));
        }

        // 4. Per-view rendering.
        for index in 0..visible_count {
            let Some(director) = directors.get(index) else {
                continue;
            };
            let Some(rect) = ViewportSplitter::split(surface, distance_px, visible_count, index)
            else {
                continue;
            };
            let viewport = Extent::new(rect.width, rect.height);

            let mut scope = ScissorScope::bind(ctx, rect);
            let phase = StagePhase::Render { index };

            if main_ready {
                if let Some(stage) = main.as_mut() {
                    let result = stage.render_at(&mut *scope, index, viewport, director);
                    record(sink, &mut report, stage.label(), phase, result);
                }
            }

            for (stage, ready) in overlays.iter_mut().zip(&overlay_ready) {
                if !*ready {
                    continue;
                }
                let result = stage.render_at(&mut *scope, index, viewport, director);
                record(sink, &mut report, stage.label(), phase, result);
            }

            drop(scope);
            report.rendered_views += 1;
        }
        report.skipped_views = visible_count - report.rendered_views;

        // 5. Composite.
        let result = distortion.commit_frame(ctx, surface, visible_count);
        record(sink, &mut report, distortion.label(), StagePhase::CommitFrame, result);

        self.overlay_ready = overlay_ready;
        report
    }
}

impl std::fmt::Debug for StagePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagePipeline")
            .field("overlay_ready", &self.overlay_ready)
            .finish_non_exhaustive()
    }
}

/// Runs `prepare` then `global_update`; returns whether the stage may render views.
fn prepare_stage<C: GraphicsContext>(
    sink: &mut dyn DiagnosticSink,
    report: &mut FrameReport,
    ctx: &mut C,
    stage: &mut BoxedStage<C>,
    surface: Extent,
) -> bool {
    let result = stage.prepare(ctx);
    if !record(sink, report, stage.label(), StagePhase::Prepare, result) {
        return false;
    }
    let result = stage.global_update(surface);
    record(sink, report, stage.label(), StagePhase::GlobalUpdate, result)
}

/// Reports a failed call; returns `true` on success.
pub(crate) fn record(
    sink: &mut dyn DiagnosticSink,
    report: &mut FrameReport,
    stage: &str,
    phase: StagePhase,
    result: Result<(), StageError>,
) -> bool {
    let Err(error) = result else {
        return true;
    };

    report.failures += 1;
    report.context_lost |= error.is_fatal();
    sink.report(&StageFailure {
        stage: stage.to_string(),
        phase,
        error,
    });
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::PixelRect;
    use crate::testing::{
        CollectingSink, Event, FakeDistortion, FakeStage, Journal, RecordingContext,
    };

    struct Fixture {
        journal: Journal,
        sink: CollectingSink,
        pipeline: StagePipeline,
        ctx: RecordingContext,
        distortion: FakeDistortion,
    }

    impl Fixture {
        fn new() -> Self {
            let journal = Journal::default();
            let sink = CollectingSink::default();
            Self {
                pipeline: StagePipeline::new(Box::new(sink.clone())),
                ctx: RecordingContext::default(),
                distortion: FakeDistortion::new(&journal),
                journal,
                sink,
            }
        }

        fn run(
            &mut self,
            layout: FrameLayout,
            main: Option<&mut BoxedStage<RecordingContext>>,
            overlays: &mut [BoxedStage<RecordingContext>],
            directors: &[Director],
        ) -> FrameReport {
            self.pipeline
                .run(&mut self.ctx, layout, &mut self.distortion, main, overlays, directors)
        }
    }

    fn stereo(surface: Extent, distance_px: u32) -> FrameLayout {
        FrameLayout {
            surface,
            visible_count: 2,
            distance_px,
        }
    }

    #[test]
    fn frame_runs_in_documented_order() {
        let mut fx = Fixture::new();
        let mut main: BoxedStage<_> = Box::new(FakeStage::new("video", &fx.journal));
        let mut overlays: Vec<BoxedStage<_>> = vec![
            Box::new(FakeStage::new("hotspot", &fx.journal)),
            Box::new(FakeStage::new("reticle", &fx.journal)),
        ];
        let directors = Director::stereo_pair(0.064);
        let surface = Extent::new(1000, 500);

        let report = fx.run(stereo(surface, 200), Some(&mut main), &mut overlays, &directors);

        let left = PixelRect::new(0, 0, 400, 500);
        let right = PixelRect::new(600, 0, 400, 500);
        let view = Extent::new(400, 500);
        assert_eq!(
            fx.journal.events(),
            vec![
                Event::Prepare("distortion"),
                Event::SetOffset(200),
                Event::BeginFrame(surface, 2),
                Event::Prepare("video"),
                Event::GlobalUpdate("video", surface),
                Event::Prepare("hotspot"),
                Event::GlobalUpdate("hotspot", surface),
                Event::Prepare("reticle"),
                Event::GlobalUpdate("reticle", surface),
                Event::render("video", 0, view, left),
                Event::render("hotspot", 0, view, left),
                Event::render("reticle", 0, view, left),
                Event::render("video", 1, view, right),
                Event::render("hotspot", 1, view, right),
                Event::render("reticle", 1, view, right),
                Event::Commit(surface, 2),
            ]
        );
        assert_eq!(report.rendered_views, 2);
        assert_eq!(report.failures, 0);
        assert_eq!(fx.ctx.scissor(), None);
    }

    #[test]
    fn views_without_director_are_skipped() {
        let mut fx = Fixture::new();
        let mut main: BoxedStage<_> = Box::new(FakeStage::new("video", &fx.journal));
        let directors = Director::stereo_pair(0.064);
        let layout = FrameLayout {
            surface: Extent::new(900, 300),
            visible_count: 3,
            distance_px: 0,
        };

        let report = fx.run(layout, Some(&mut main), &mut [], &directors);

        assert_eq!(fx.journal.rendered_indices("video"), vec![0, 1]);
        assert_eq!(report.rendered_views, 2);
        assert_eq!(report.skipped_views, 1);
        // Two views bound: viewport + scissor on, scissor off.
        let viewports = fx.ctx.viewports();
        assert_eq!(viewports.len(), 2);
        assert!(fx.journal.events().contains(&Event::Commit(layout.surface, 3)));
    }

    #[test]
    fn render_failure_is_contained_to_its_view() {
        let mut fx = Fixture::new();
        let mut main: BoxedStage<_> =
            Box::new(FakeStage::new("video", &fx.journal).fail_render_at(1));
        let mut overlays: Vec<BoxedStage<_>> =
            vec![Box::new(FakeStage::new("reticle", &fx.journal))];
        let directors = [Director::default(); 3];
        let layout = FrameLayout {
            surface: Extent::new(900, 300),
            visible_count: 3,
            distance_px: 0,
        };

        let report = fx.run(layout, Some(&mut main), &mut overlays, &directors);

        assert_eq!(fx.journal.rendered_indices("video"), vec![0, 2]);
        assert_eq!(fx.journal.rendered_indices("reticle"), vec![0, 1, 2]);
        assert!(fx.journal.events().contains(&Event::Commit(layout.surface, 3)));
        assert_eq!(report.failures, 1);
        assert!(!report.context_lost);

        let failures = fx.sink.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].stage, "video");
        assert_eq!(failures[0].phase, StagePhase::Render { index: 1 });
    }

    #[test]
    fn stage_that_fails_to_prepare_sits_out_the_frame() {
        let mut fx = Fixture::new();
        let mut overlays: Vec<BoxedStage<_>> = vec![
            Box::new(FakeStage::new("broken", &fx.journal).fail_prepare()),
            Box::new(FakeStage::new("reticle", &fx.journal)),
        ];
        let directors = Director::stereo_pair(0.064);

        let report = fx.run(stereo(Extent::new(800, 400), 0), None, &mut overlays, &directors);

        assert!(fx.journal.rendered_indices("broken").is_empty());
        assert_eq!(fx.journal.rendered_indices("reticle"), vec![0, 1]);
        assert!(!fx.journal.events().contains(&Event::GlobalUpdate("broken", Extent::new(800, 400))));
        assert_eq!(report.failures, 1);
    }

    #[test]
    fn distortion_failures_do_not_stop_the_frame() {
        let mut fx = Fixture::new();
        fx.distortion = FakeDistortion::new(&fx.journal).fail_begin(StageError::graphics("fbo"));
        let mut main: BoxedStage<_> = Box::new(FakeStage::new("video", &fx.journal));
        let directors = Director::stereo_pair(0.064);

        let report = fx.run(stereo(Extent::new(800, 400), 0), Some(&mut main), &mut [], &directors);

        assert_eq!(fx.journal.rendered_indices("video"), vec![0, 1]);
        assert!(fx.journal.events().contains(&Event::Commit(Extent::new(800, 400), 2)));
        assert_eq!(report.failures, 1);
        assert_eq!(fx.sink.failures()[0].phase, StagePhase::BeginFrame);
    }

    #[test]
    fn context_loss_is_flagged_but_frame_completes() {
        let mut fx = Fixture::new();
        let mut main: BoxedStage<_> = Box::new(
            FakeStage::new("video", &fx.journal)
                .fail_render_at(0)
                .with_error(StageError::ContextLost),
        );
        let directors = Director::stereo_pair(0.064);

        let report = fx.run(stereo(Extent::new(800, 400), 0), Some(&mut main), &mut [], &directors);

        assert!(report.context_lost);
        assert_eq!(fx.journal.rendered_indices("video"), vec![1]);
        assert!(fx.journal.events().contains(&Event::Commit(Extent::new(800, 400), 2)));
    }

    #[test]
    fn no_main_stage_and_no_overlays_still_brackets() {
        let mut fx = Fixture::new();
        let directors = [Director::default()];
        let layout = FrameLayout {
            surface: Extent::new(640, 480),
            visible_count: 1,
            distance_px: 0,
        };

        let report = fx.run(layout, None, &mut [], &directors);

        assert_eq!(
            fx.journal.events(),
            vec![
                Event::Prepare("distortion"),
                Event::SetOffset(0),
                Event::BeginFrame(layout.surface, 1),
                Event::Commit(layout.surface, 1),
            ]
        );
        assert_eq!(report.rendered_views, 1);
        assert_eq!(fx.ctx.viewports(), vec![PixelRect::new(0, 0, 640, 480)]);
    }
}
