//! Resolution search: which resolutions to evaluate, and when to stop.
//!
//! A [ResolutionSearch] proposes one resolution at a time. After each
//! evaluation by the community oracle it sees the history so far and the
//! latest [Evaluation] and answers with a [Proposal]: the next resolution,
//! or stop with a [SearchOutcome].
//!
//! | Strategy | Next resolution | Converged when |
//! |----------|-----------------|----------------|
//! | [FixedIncrement] | `r + increment` | all singletons |
//! | [DynamicGrowth] | `r * growth_factor` | count stable for `patience` steps, or all singletons |
//! | [AdaptiveTarget] | `r ± step` towards target count, floored | count equals target |
//!
//! All strategies stop with [SearchOutcome::MaxIterationsReached] after
//! `max_iterations` evaluations. Both outcomes leave a usable history.
//!
//! [ResolutionSweep] drives the loop.

mod adaptive;
mod dynamic;
mod fixed;
mod sweep;

pub use adaptive::AdaptiveTarget;
pub use dynamic::DynamicGrowth;
pub use fixed::FixedIncrement;
pub use sweep::{ResolutionSweep, SweepResult};

use crate::config::{SearchConfig, SearchStrategy};
use crate::error::GrapeError;
use crate::model::PartitionHistory;
use std::fmt;

/// Result of evaluating one resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub resolution: f64,
    pub num_communities: usize,
}

/// Terminal state of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The strategy's own stop condition was met.
    Converged,
    /// The iteration budget ran out first.
    MaxIterationsReached,
}

impl fmt::Display for SearchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SearchOutcome::Converged => write!(f, "converged"),
            SearchOutcome::MaxIterationsReached => write!(f, "max iterations reached"),
        }
    }
}

/// Answer of a strategy after an evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Proposal {
    Next(f64),
    Stop(SearchOutcome),
}

/// Strategy proposing successive resolutions.
pub trait ResolutionSearch {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Returns the first resolution to evaluate and resets internal state.
    fn initialize(&mut self) -> f64;

    /// Called once after every evaluation.
    ///
    /// # Arguments
    /// * `history` - All successful steps so far, ordered by resolution
    /// * `latest` - The evaluation just made, or `None` if the oracle failed
    fn propose(&mut self, history: &PartitionHistory, latest: Option<Evaluation>) -> Proposal;

    /// Maximal number of evaluations.
    fn max_iterations(&self) -> usize;
}

impl SearchConfig {
    /// Creates the configured strategy for a universe of `num_languages`
    /// languages; an unset adaptive target means all singletons.
    ///
    /// # Errors
    /// `GrapeError::Configuration` if [SearchConfig::validate] fails.
    pub fn build_strategy(&self, num_languages: usize) -> Result<Box<dyn ResolutionSearch>, GrapeError> {
        self.validate()?;
        let initial = self.initial_value();
        let strategy: Box<dyn ResolutionSearch> = match self.strategy {
            SearchStrategy::Fixed => Box::new(FixedIncrement::new(initial, self.increment, self.max_iterations)),
            SearchStrategy::Dynamic => Box::new(
                DynamicGrowth::new(initial, self.growth_factor, self.max_iterations).with_patience(self.patience),
            ),
            SearchStrategy::Adaptive => Box::new(AdaptiveTarget::new(
                initial,
                self.increment,
                self.target.unwrap_or(num_languages),
                self.floor,
                self.max_iterations,
            )),
        };
        Ok(strategy)
    }
}
