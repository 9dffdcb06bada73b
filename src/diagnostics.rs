//! Collection of non-fatal conditions met during a run.
//!
//! Components receive a `&mut Diagnostics` and report through it instead of
//! writing to shared state. Each warning is also emitted via `tracing`.

use crate::error::CommunityOracleFailure;
use std::fmt;
use thiserror::Error;
use tracing::warn;

/// Non-fatal condition; the run continues deterministically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Warning {
    /// No concept contributed to the similarity of two languages.
    #[error("similarity of '{first}' and '{second}' is undefined (no comparable concept); using 0")]
    UndefinedWeight { first: String, second: String },

    /// A community oracle result was dropped.
    #[error(transparent)]
    OracleFailure(CommunityOracleFailure),

    /// The resolution search stopped at its iteration cap.
    #[error("resolution search '{strategy}' hit max iterations ({iterations}) before converging")]
    ConvergenceFailure { strategy: String, iterations: usize },

    /// A community regroups languages separated at a lower resolution.
    #[error("community {community:?} at resolution {resolution} spans {clades} separated clades")]
    NonNestedCommunity {
        resolution: f64,
        community: Vec<String>,
        clades: usize,
    },

    /// The sweep ended with a group that was never split.
    #[error("group {languages:?} was not resolved by the resolution sweep; flattened")]
    UnresolvedGroup { languages: Vec<String> },
}

impl Warning {
    /// Short kind name, stable across messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Warning::UndefinedWeight { .. } => "undefined-weight",
            Warning::OracleFailure(_) => "oracle-failure",
            Warning::ConvergenceFailure { .. } => "convergence-failure",
            Warning::NonNestedCommunity { .. } => "non-nested-community",
            Warning::UnresolvedGroup { .. } => "unresolved-group",
        }
    }
}

// =#========================================================================#=
// DIAGNOSTICS
// =#========================================================================#=
/// Sink accumulating [Warning]s for the caller.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning and logs it.
    pub fn warn(&mut self, warning: Warning) {
        warn!(kind = warning.kind(), "{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Returns the number of warnings of the given kind.
    pub fn count(&self, kind: &str) -> usize {
        self.warnings.iter().filter(|w| w.kind() == kind).count()
    }

    /// Returns whether a warning of the given kind was recorded.
    pub fn has(&self, kind: &str) -> bool {
        self.count(kind) > 0
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{} warning(s):", self.warnings.len())?;
        for warning in &self.warnings {
            writeln!(f, "  [{}] {}", warning.kind(), warning)?;
        }
        Ok(())
    }
}
