use crate::device::GraphicsContext;
use crate::stage::{BoxedStage, Director};

/// What the projection mode contributes to one frame.
///
/// Directors and the main stage come out of a single call so the provider's state is
/// borrowed once per frame.
pub struct ProjectionFrame<'a, C: GraphicsContext> {
    /// One director per view, in view order. Views past the end are skipped.
    pub directors: &'a [Director],
    pub main_stage: Option<&'a mut BoxedStage<C>>,
}

/// Supplies per-view directors and the main stage. Read fresh every frame.
pub trait ProjectionModeProvider<C: GraphicsContext> {
    fn frame(&mut self) -> ProjectionFrame<'_, C>;
}

/// Projection with a fixed set of directors and an optional main stage.
///
/// Directors can be replaced between frames, e.g. from head-tracking updates applied
/// through the command queue.
pub struct StaticProjection<C: GraphicsContext> {
    directors: Vec<Director>,
    main_stage: Option<BoxedStage<C>>,
}

impl<C: GraphicsContext> StaticProjection<C> {
    pub fn new(directors: Vec<Director>, main_stage: Option<BoxedStage<C>>) -> Self {
        Self {
            directors,
            main_stage,
        }
    }

    pub fn directors_mut(&mut self) -> &mut Vec<Director> {
        &mut self.directors
    }
}

impl<C: GraphicsContext> ProjectionModeProvider<C> for StaticProjection<C> {
    fn frame(&mut self) -> ProjectionFrame<'_, C> {
        ProjectionFrame {
            directors: &self.directors,
            main_stage: self.main_stage.as_mut(),
        }
    }
}

impl<C: GraphicsContext> std::fmt::Debug for StaticProjection<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticProjection")
            .field("directors", &self.directors)
            .field("main_stage", &self.main_stage.as_ref().map(|s| s.label().to_string()))
            .finish()
    }
}
