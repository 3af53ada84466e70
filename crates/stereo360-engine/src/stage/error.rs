use std::fmt;

use crate::device::GraphicsError;

/// Error returned by a stage call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageError {
    /// The graphics API rejected a call made by the stage.
    Graphics(String),
    /// The graphics context is gone; the renderer must be re-created.
    ContextLost,
    /// Any other stage-specific failure.
    Other(String),
}

impl StageError {
    pub fn graphics(msg: impl Into<String>) -> Self {
        Self::Graphics(msg.into())
    }

    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ContextLost)
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Graphics(msg) => write!(f, "graphics error: {msg}"),
            Self::ContextLost => f.write_str("graphics context lost"),
            Self::Other(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for StageError {}

impl From<GraphicsError> for StageError {
    fn from(err: GraphicsError) -> Self {
        match err {
            GraphicsError::Invalid(msg) => Self::Graphics(msg),
            GraphicsError::ContextLost => Self::ContextLost,
        }
    }
}

/// Point of the frame at which a failure happened.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum StagePhase {
    Prepare,
    GlobalUpdate,
    BeginFrame,
    Render { index: usize },
    CommitFrame,
    /// Context error check at the start or end of a frame.
    FrameCheck,
}

impl StagePhase {
    /// Same phase with the view index dropped, for de-duplicating reports.
    pub fn kind(self) -> Self {
        match self {
            Self::Render { .. } => Self::Render { index: 0 },
            other => other,
        }
    }
}

impl fmt::Display for StagePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepare => f.write_str("prepare"),
            Self::GlobalUpdate => f.write_str("global update"),
            Self::BeginFrame => f.write_str("begin frame"),
            Self::Render { index } => write!(f, "render of view {index}"),
            Self::CommitFrame => f.write_str("commit frame"),
            Self::FrameCheck => f.write_str("frame check"),
        }
    }
}

/// A failed stage call, as reported to the diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFailure {
    pub stage: String,
    pub phase: StagePhase,
    pub error: StageError,
}

impl fmt::Display for StageFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stage `{}` failed during {}: {}", self.stage, self.phase, self.error)
    }
}
