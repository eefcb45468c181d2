//! Settings shared by every engine.

use std::time::{Duration, Instant};

use crate::error::{CfpqError, Result};

/// Configures a fixed-point run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SolverConfig {
    /// Stop with [`CfpqError::DeadlineExceeded`] once this instant passes. Checked
    /// between passes only.
    pub deadline: Option<Instant>,
}

impl SolverConfig {
    /// Creates a configuration without a deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the deadline to `timeout` from now.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Sets an absolute deadline.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub(crate) fn check_deadline(&self, passes: usize) -> Result<()> {
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => {
                Err(CfpqError::DeadlineExceeded { passes })
            }
            _ => Ok(()),
        }
    }
}

/// Counters collected during one fixed-point run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FixpointStats {
    /// Number of complete passes over the complex rules, including the final
    /// pass that detected no change.
    pub passes: usize,
    /// Number of rule applications that changed some matrix.
    pub changing_applications: usize,
}
