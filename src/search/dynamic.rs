use crate::model::PartitionHistory;
use crate::search::{Evaluation, Proposal, ResolutionSearch, SearchOutcome};

/// Default number of unchanged evaluations that count as stabilized.
pub const DEFAULT_PATIENCE: usize = 3;

/// Multiplies the resolution by a growth factor after every evaluation.
///
/// Converges when the partition is all singletons, or when the number of
/// communities stayed the same (and above one) for `patience` consecutive
/// evaluations. A plateau at a single community is the start of the sweep,
/// not a sign of convergence.
///
/// This is stricter than stopping at the first repeated count: counts of 1
/// never converge, and the default `patience` of [DEFAULT_PATIENCE] needs
/// three repeats. `with_patience(1)` stops at the first repeat above one.
///
/// Prefer [SearchConfig::build_strategy](crate::config::SearchConfig::build_strategy),
/// which reports bad parameters as a configuration error.
#[derive(Debug, Clone)]
pub struct DynamicGrowth {
    initial: f64,
    growth_factor: f64,
    patience: usize,
    max_iterations: usize,
    current: f64,
    iterations: usize,
    last_count: Option<usize>,
    unchanged: usize,
}

impl DynamicGrowth {
    /// # Panics
    /// If `initial` is not positive or `growth_factor` not greater than 1;
    /// the resolution would never move.
    pub fn new(initial: f64, growth_factor: f64, max_iterations: usize) -> Self {
        assert!(initial > 0.0, "Dynamic search needs a positive initial resolution");
        assert!(growth_factor > 1.0, "Dynamic search needs a growth factor > 1");
        DynamicGrowth {
            initial,
            growth_factor,
            patience: DEFAULT_PATIENCE,
            max_iterations,
            current: initial,
            iterations: 0,
            last_count: None,
            unchanged: 0,
        }
    }

    pub fn with_patience(mut self, patience: usize) -> Self {
        self.patience = patience.max(1);
        self
    }
}

impl ResolutionSearch for DynamicGrowth {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn initialize(&mut self) -> f64 {
        self.current = self.initial;
        self.iterations = 0;
        self.last_count = None;
        self.unchanged = 0;
        self.current
    }

    fn propose(&mut self, history: &PartitionHistory, latest: Option<Evaluation>) -> Proposal {
        self.iterations += 1;

        if let Some(evaluation) = latest {
            let count = evaluation.num_communities;
            if count >= history.num_languages() {
                return Proposal::Stop(SearchOutcome::Converged);
            }
            if count > 1 && self.last_count == Some(count) {
                self.unchanged += 1;
            } else {
                self.unchanged = 0;
            }
            self.last_count = Some(count);
            if self.unchanged >= self.patience {
                return Proposal::Stop(SearchOutcome::Converged);
            }
        }
        if self.iterations >= self.max_iterations {
            return Proposal::Stop(SearchOutcome::MaxIterationsReached);
        }

        self.current *= self.growth_factor;
        Proposal::Next(self.current)
    }

    fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}
