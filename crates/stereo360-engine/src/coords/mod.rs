//! Pixel-space geometry shared by the lens calculator, the pipeline and the
//! graphics context.
//!
//! Canonical space:
//! - Physical pixels of the drawing surface
//! - Origin at the surface's lower-left corner for viewport/scissor rectangles
//! - Viewports are laid out horizontally only; every viewport spans the full height

mod color;
mod extent;
mod rect;
mod split;

pub use color::Color;
pub use extent::Extent;
pub use rect::PixelRect;
pub use split::ViewportSplitter;
