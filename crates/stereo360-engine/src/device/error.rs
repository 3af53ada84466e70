use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Error reported by a graphics context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// The context rejected a call; rendering can continue.
    Invalid(String),
    /// The context is gone; it must be re-created before rendering resumes.
    ContextLost,
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Invalid(msg) => write!(f, "graphics call rejected: {msg}"),
            Self::ContextLost => f.write_str("graphics context lost"),
        }
    }
}

impl std::error::Error for GraphicsError {}

/// Errors raised outside any error scope, held until the next frame check.
///
/// wgpu reports them from its uncaptured-error callback, possibly on another
/// thread. [`take`](Self::take) folds everything recorded since the last call into
/// one [`GraphicsError::Invalid`].
#[derive(Debug, Clone, Default)]
pub struct UncapturedErrors(Arc<Mutex<Vec<String>>>);

impl UncapturedErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, message: impl Into<String>) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.into());
    }

    pub fn take(&self) -> Option<GraphicsError> {
        let messages = std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner));
        match messages.len() {
            0 => None,
            1 => messages.into_iter().next().map(GraphicsError::Invalid),
            n => Some(GraphicsError::Invalid(format!(
                "{} (and {} more)",
                messages[0],
                n - 1
            ))),
        }
    }
}

/// High-level response after a surface acquisition error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; rendering may resume next frame.
    Reconfigured,
    /// Transient error; skip the current frame.
    SkipFrame,
    /// Fatal error (commonly OOM); terminate gracefully.
    Fatal,
}
