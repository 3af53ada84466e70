//! Recording fakes shared by unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use crate::command::CommandDrain;
use crate::coords::{Color, Extent, PixelRect};
use crate::device::{ClearBuffers, GraphicsContext, GraphicsError, UncapturedErrors};
use crate::logging::DiagnosticSink;
use crate::mode::{DisplayModeProvider, DistortionConfig};
use crate::stage::{Director, DistortionStage, Stage, StageError, StageFailure};

/// Calls made on a [`RecordingContext`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum GlCall {
    ClearColor(Color),
    Culling(bool),
    DepthTest(bool),
    Clear(ClearBuffers),
    Viewport(PixelRect),
    Scissor(Option<PixelRect>),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingContext {
    calls: Vec<GlCall>,
    scissor: Option<PixelRect>,
    pending_errors: Vec<GraphicsError>,
    uncaptured: UncapturedErrors,
}

impl RecordingContext {
    pub(crate) fn calls(&self) -> &[GlCall] {
        &self.calls
    }

    pub(crate) fn scissor(&self) -> Option<PixelRect> {
        self.scissor
    }

    pub(crate) fn viewports(&self) -> Vec<PixelRect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                GlCall::Viewport(r) => Some(*r),
                _ => None,
            })
            .collect()
    }

    /// Queues an error returned by the next `check_error`.
    pub(crate) fn push_error(&mut self, err: GraphicsError) {
        self.pending_errors.push(err);
    }

    /// Slot drained by `check_error` once the queued errors are gone.
    pub(crate) fn uncaptured(&self) -> UncapturedErrors {
        self.uncaptured.clone()
    }

    pub(crate) fn forget_calls(&mut self) {
        self.calls.clear();
    }
}

impl GraphicsContext for RecordingContext {
    fn set_clear_color(&mut self, color: Color) {
        self.calls.push(GlCall::ClearColor(color));
    }

    fn set_back_face_culling(&mut self, enabled: bool) {
        self.calls.push(GlCall::Culling(enabled));
    }

    fn set_depth_test(&mut self, enabled: bool) {
        self.calls.push(GlCall::DepthTest(enabled));
    }

    fn clear(&mut self, buffers: ClearBuffers) {
        self.calls.push(GlCall::Clear(buffers));
    }

    fn set_viewport(&mut self, rect: PixelRect) {
        self.calls.push(GlCall::Viewport(rect));
    }

    fn set_scissor(&mut self, rect: Option<PixelRect>) {
        self.scissor = rect;
        self.calls.push(GlCall::Scissor(rect));
    }

    fn check_error(&mut self) -> Result<(), GraphicsError> {
        if !self.pending_errors.is_empty() {
            return Err(self.pending_errors.remove(0));
        }
        match self.uncaptured.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Stage and collaborator activity, in call order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Prepare(&'static str),
    GlobalUpdate(&'static str, Extent),
    Render {
        stage: &'static str,
        index: usize,
        viewport: Extent,
        scissor: Option<PixelRect>,
    },
    SetOffset(u32),
    BeginFrame(Extent, usize),
    Commit(Extent, usize),
    Drain,
}

impl Event {
    pub(crate) fn render(stage: &'static str, index: usize, viewport: Extent, rect: PixelRect) -> Self {
        Self::Render {
            stage,
            index,
            viewport,
            scissor: Some(rect),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    pub(crate) fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    pub(crate) fn rendered_indices(&self, name: &str) -> Vec<usize> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Render { stage, index, .. } if *stage == name => Some(*index),
                _ => None,
            })
            .collect()
    }
}

pub(crate) struct FakeStage {
    name: &'static str,
    journal: Journal,
    fail_prepare: bool,
    fail_render_at: Option<usize>,
    error: StageError,
}

impl FakeStage {
    pub(crate) fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            fail_prepare: false,
            fail_render_at: None,
            error: StageError::graphics("injected"),
        }
    }

    pub(crate) fn fail_prepare(mut self) -> Self {
        self.fail_prepare = true;
        self
    }

    pub(crate) fn fail_render_at(mut self, index: usize) -> Self {
        self.fail_render_at = Some(index);
        self
    }

    pub(crate) fn with_error(mut self, error: StageError) -> Self {
        self.error = error;
        self
    }
}

impl Stage<RecordingContext> for FakeStage {
    fn prepare(&mut self, _ctx: &mut RecordingContext) -> Result<(), StageError> {
        self.journal.push(Event::Prepare(self.name));
        if self.fail_prepare {
            return Err(self.error.clone());
        }
        Ok(())
    }

    fn global_update(&mut self, surface: Extent) -> Result<(), StageError> {
        self.journal.push(Event::GlobalUpdate(self.name, surface));
        Ok(())
    }

    fn render_at(
        &mut self,
        ctx: &mut RecordingContext,
        index: usize,
        viewport: Extent,
        _director: &Director,
    ) -> Result<(), StageError> {
        if self.fail_render_at == Some(index) {
            return Err(self.error.clone());
        }
        self.journal.push(Event::Render {
            stage: self.name,
            index,
            viewport,
            scissor: ctx.scissor(),
        });
        Ok(())
    }

    fn label(&self) -> &str {
        self.name
    }
}

pub(crate) struct FakeDistortion {
    journal: Journal,
    fail_begin: Option<StageError>,
}

impl FakeDistortion {
    pub(crate) fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail_begin: None,
        }
    }

    pub(crate) fn fail_begin(mut self, error: StageError) -> Self {
        self.fail_begin = Some(error);
        self
    }
}

impl Stage<RecordingContext> for FakeDistortion {
    fn prepare(&mut self, _ctx: &mut RecordingContext) -> Result<(), StageError> {
        self.journal.push(Event::Prepare("distortion"));
        Ok(())
    }

    fn global_update(&mut self, _surface: Extent) -> Result<(), StageError> {
        Ok(())
    }

    fn render_at(
        &mut self,
        _ctx: &mut RecordingContext,
        _index: usize,
        _viewport: Extent,
        _director: &Director,
    ) -> Result<(), StageError> {
        Ok(())
    }

    fn label(&self) -> &str {
        "distortion"
    }
}

impl DistortionStage<RecordingContext> for FakeDistortion {
    fn set_offset(&mut self, distance_px: u32) {
        self.journal.push(Event::SetOffset(distance_px));
    }

    fn begin_frame(
        &mut self,
        _ctx: &mut RecordingContext,
        surface: Extent,
        visible_count: usize,
    ) -> Result<(), StageError> {
        self.journal.push(Event::BeginFrame(surface, visible_count));
        match &self.fail_begin {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn commit_frame(
        &mut self,
        _ctx: &mut RecordingContext,
        surface: Extent,
        visible_count: usize,
    ) -> Result<(), StageError> {
        self.journal.push(Event::Commit(surface, visible_count));
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct CollectingSink(Rc<RefCell<Vec<StageFailure>>>);

impl CollectingSink {
    pub(crate) fn failures(&self) -> Vec<StageFailure> {
        self.0.borrow().clone()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, failure: &StageFailure) {
        self.0.borrow_mut().push(failure.clone());
    }
}

/// Display mode whose view count tests can change between frames.
#[derive(Debug, Clone)]
pub(crate) struct FakeDisplay {
    visible: Rc<RefCell<usize>>,
    scale: f32,
}

impl FakeDisplay {
    pub(crate) fn new(visible: usize) -> Self {
        Self {
            visible: Rc::new(RefCell::new(visible)),
            scale: 0.95,
        }
    }

    pub(crate) fn set_visible(&self, visible: usize) {
        *self.visible.borrow_mut() = visible;
    }
}

impl DisplayModeProvider for FakeDisplay {
    fn visible_count(&self) -> usize {
        *self.visible.borrow()
    }

    fn distortion_config(&self) -> DistortionConfig {
        DistortionConfig { scale: self.scale }
    }
}

/// Command drain that records when it ran.
#[derive(Debug, Clone)]
pub(crate) struct RecordingDrain(pub(crate) Journal);

impl CommandDrain for RecordingDrain {
    fn drain_pending(&mut self) -> usize {
        self.0.push(Event::Drain);
        0
    }
}
