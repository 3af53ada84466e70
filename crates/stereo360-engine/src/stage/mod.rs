//! Rendering stages and the per-frame pipeline that sequences them.
//!
//! A frame is bracketed by the distortion stage: it prepares the composite target
//! before any view is drawn and commits it after the last one. In between, every
//! visible view runs the optional main stage followed by the overlay stages in
//! registration order, each clipped to that view's rectangle.

mod director;
mod error;
mod pipeline;
mod traits;

pub use director::Director;
pub use error::{StageError, StageFailure, StagePhase};
pub use pipeline::{FrameLayout, FrameReport, StagePipeline};
pub(crate) use pipeline::record;
pub use traits::{BoxedStage, DistortionStage, Stage};
