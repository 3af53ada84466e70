use std::collections::HashSet;

use crate::stage::{StageFailure, StagePhase};

/// Receiver of stage failures.
///
/// The pipeline reports a failure after the failing call returns and then carries on
/// with the rest of the frame.
pub trait DiagnosticSink {
    fn report(&mut self, failure: &StageFailure);
}

/// Default sink: writes failures to the `log` facade.
///
/// The first failure of a given stage and phase is logged at `warn`; repeats (the
/// same stage failing every frame) drop to `debug`.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    warned: HashSet<(String, StagePhase)>,
    reported: u64,
}

impl LogDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of failures reported so far.
    pub fn reported(&self) -> u64 {
        self.reported
    }
}

impl DiagnosticSink for LogDiagnostics {
    fn report(&mut self, failure: &StageFailure) {
        self.reported += 1;

        let first = self
            .warned
            .insert((failure.stage.clone(), failure.phase.kind()));

        if failure.error.is_fatal() {
            log::error!("{failure}");
        } else if first {
            log::warn!("{failure}");
        } else {
            log::debug!("{failure}");
        }
    }
}
