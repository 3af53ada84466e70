//! Cross-thread command queue drained on the render thread.
//!
//! Work that must touch render-thread state (switching modes, swapping stages,
//! applying head-tracking) is posted from any thread and runs at the start of the
//! next resize or draw, before any geometry or stage work.

mod queue;

pub use queue::{Command, CommandDrain, CommandQueue, CommandSender};
