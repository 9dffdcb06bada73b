use crate::model::PartitionHistory;
use crate::search::{Evaluation, Proposal, ResolutionSearch, SearchOutcome};

/// Steers the resolution towards a target number of communities.
///
/// Too few communities raise the resolution by `step`, too many lower it,
/// but never below `floor`. Hitting the target exactly converges. After a
/// failed evaluation the last known count is reused; without one the
/// resolution moves up.
#[derive(Debug, Clone)]
pub struct AdaptiveTarget {
    initial: f64,
    step: f64,
    target: usize,
    floor: f64,
    max_iterations: usize,
    current: f64,
    iterations: usize,
    last_count: Option<usize>,
}

impl AdaptiveTarget {
    /// # Arguments
    /// * `initial` - First resolution
    /// * `step` - Amount the resolution changes per evaluation
    /// * `target` - Desired number of communities
    /// * `floor` - Smallest resolution ever proposed after the first
    /// * `max_iterations` - Evaluation budget
    pub fn new(initial: f64, step: f64, target: usize, floor: f64, max_iterations: usize) -> Self {
        AdaptiveTarget {
            initial,
            step,
            target,
            floor,
            max_iterations,
            current: initial,
            iterations: 0,
            last_count: None,
        }
    }

    pub fn target(&self) -> usize {
        self.target
    }
}

impl ResolutionSearch for AdaptiveTarget {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn initialize(&mut self) -> f64 {
        self.current = self.initial;
        self.iterations = 0;
        self.last_count = None;
        self.current
    }

    fn propose(&mut self, _history: &PartitionHistory, latest: Option<Evaluation>) -> Proposal {
        self.iterations += 1;

        if let Some(evaluation) = latest {
            self.last_count = Some(evaluation.num_communities);
        }
        let count = self.last_count;

        if count == Some(self.target) {
            return Proposal::Stop(SearchOutcome::Converged);
        }
        if self.iterations >= self.max_iterations {
            return Proposal::Stop(SearchOutcome::MaxIterationsReached);
        }

        self.current = match count {
            Some(count) if count > self.target => (self.current - self.step).max(self.floor),
            _ => self.current + self.step,
        };
        Proposal::Next(self.current)
    }

    fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}
