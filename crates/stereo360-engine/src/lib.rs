//! Stereo panorama rendering engine.
//!
//! Splits a drawing surface into side-by-side views separated by a gap derived from
//! the physical lens distance, and drives the stage pipeline that renders each view
//! once per frame. Host windowing and wgpu live behind `window` and `device`; the
//! orchestration in `core` and `stage` only sees the [`device::GraphicsContext`] seam.

pub mod command;
pub mod coords;
pub mod core;
pub mod device;
pub mod lens;
pub mod logging;
pub mod mode;
pub mod stage;
pub mod window;

#[cfg(test)]
mod testing;
