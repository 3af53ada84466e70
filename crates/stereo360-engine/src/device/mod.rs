//! Graphics context seam and its wgpu implementation.
//!
//! The orchestration code (`core`, `stage`) only sees [`GraphicsContext`], the small
//! set of fixed-function state it needs: clear color, culling, depth test, clears,
//! viewport and scissor. [`GpuContext`] implements it on top of wgpu by recording
//! that state so stages can apply it to their own render passes.

mod context;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use context::{ClearBuffers, FixedState, GraphicsContext, ScissorScope};
pub use error::{GraphicsError, SurfaceErrorAction, UncapturedErrors};
pub use frame::{FrameTarget, GpuFrame, RasterState};
pub use gpu::GpuContext;
pub use init::GpuInit;
