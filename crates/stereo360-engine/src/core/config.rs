use crate::command::CommandDrain;
use crate::device::{FixedState, GraphicsContext};
use crate::lens::LensParams;
use crate::logging::DiagnosticSink;
use crate::mode::{DisplayModeProvider, OverlayProvider, ProjectionModeProvider};
use crate::stage::DistortionStage;

/// Renderer configuration, fixed at construction.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct RendererConfig {
    /// State installed on every created transition.
    pub fixed: FixedState,

    /// Initial lens measurements. `scaling_factor` is replaced by the display mode's
    /// distortion scale.
    pub lens: LensParams,
}

/// Collaborators the renderer reads from every frame.
pub struct RendererParts<C: GraphicsContext> {
    pub display: Box<dyn DisplayModeProvider>,
    pub projection: Box<dyn ProjectionModeProvider<C>>,
    pub overlays: Box<dyn OverlayProvider<C>>,
    pub distortion: Box<dyn DistortionStage<C>>,
    pub commands: Box<dyn CommandDrain>,
    pub diagnostics: Box<dyn DiagnosticSink>,
}
