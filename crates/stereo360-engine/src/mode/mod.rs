//! Collaborator contracts consumed by the renderer each frame.
//!
//! - the display mode decides how many views are visible
//! - the projection mode supplies one director per view and the main stage
//! - the overlay provider supplies the ordered overlay stages

mod display;
mod overlay;
mod projection;

pub use display::{DisplayMode, DisplayModeProvider, DistortionConfig, SharedDisplayMode};
pub use overlay::{OverlayProvider, OverlayRegistry};
pub use projection::{ProjectionFrame, ProjectionModeProvider, StaticProjection};
