use crate::model::PartitionHistory;
use crate::search::{Evaluation, Proposal, ResolutionSearch, SearchOutcome};

/// Evaluates `initial, initial + increment, initial + 2 * increment, ...`
/// until the partition is all singletons.
#[derive(Debug, Clone)]
pub struct FixedIncrement {
    initial: f64,
    increment: f64,
    max_iterations: usize,
    current: f64,
    iterations: usize,
}

impl FixedIncrement {
    pub fn new(initial: f64, increment: f64, max_iterations: usize) -> Self {
        FixedIncrement {
            initial,
            increment,
            max_iterations,
            current: initial,
            iterations: 0,
        }
    }
}

impl ResolutionSearch for FixedIncrement {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn initialize(&mut self) -> f64 {
        self.current = self.initial;
        self.iterations = 0;
        self.current
    }

    fn propose(&mut self, history: &PartitionHistory, latest: Option<Evaluation>) -> Proposal {
        self.iterations += 1;

        if latest.is_some_and(|e| e.num_communities >= history.num_languages()) {
            return Proposal::Stop(SearchOutcome::Converged);
        }
        if self.iterations >= self.max_iterations {
            return Proposal::Stop(SearchOutcome::MaxIterationsReached);
        }

        // Exact multiples of the increment, no accumulated rounding
        self.current = self.initial + self.iterations as f64 * self.increment;
        Proposal::Next(self.current)
    }

    fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}
