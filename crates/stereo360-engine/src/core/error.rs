use std::fmt;

/// The graphics context was lost during a frame.
///
/// The host must re-create its context and re-enter the created transition. Lens
/// configuration survives; the derived gap is recomputed on the next resize.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ContextLost;

impl fmt::Display for ContextLost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("graphics context lost; surface must be re-created")
    }
}

impl std::error::Error for ContextLost {}
