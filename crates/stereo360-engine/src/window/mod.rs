//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and Window and translates surface events into the
//! renderer's created, resized and draw transitions.

mod runtime;

pub use runtime::{AppControl, Runtime, RuntimeConfig, ViewerApp};
