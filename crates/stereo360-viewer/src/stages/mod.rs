//! wgpu stages drawn by the viewer.
//!
//! - [`PassthroughDistortion`] brackets the frame; views render straight into the
//!   swapchain image
//! - [`SkyStage`] is the main stage: a procedural panorama traced per pixel
//! - [`ReticleStage`] is an overlay centred in every view

mod common;
mod passthrough;
mod reticle;
mod sky;

pub use passthrough::PassthroughDistortion;
pub use reticle::ReticleStage;
pub use sky::SkyStage;
