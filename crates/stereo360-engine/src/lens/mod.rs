//! Lens separation geometry.
//!
//! A head-mounted viewer places its two lenses a fixed physical distance apart. The
//! calculator converts that distance into the pixel gap left between adjacent
//! viewports so each view is centred under its lens.

mod config;
mod geometry;

pub use config::{LensConfig, LensParams};
pub use geometry::{lens_distance_px, LensGeometry};
