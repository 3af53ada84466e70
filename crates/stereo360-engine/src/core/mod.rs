//! The surface lifecycle controller.
//!
//! [`SurfaceRenderer`] is driven by a host adapter through three transitions:
//! surface created, surface resized and draw frame. It owns the lens geometry and the
//! stage pipeline and reads everything else from its collaborators every frame.

mod config;
mod error;
mod renderer;

pub use config::{RendererConfig, RendererParts};
pub use error::ContextLost;
pub use renderer::SurfaceRenderer;
