//! Logging utilities.
//!
//! Logger initialization plus the diagnostic sink stage failures are reported to.
//! Everything goes through the standard `log` facade.

mod diagnostics;
mod init;

pub use diagnostics::{DiagnosticSink, LogDiagnostics};
pub use init::{init_logging, LoggingConfig};
