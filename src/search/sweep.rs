use crate::community::{CommunityOracle, run_oracle};
use crate::diagnostics::{Diagnostics, Warning};
use crate::error::GrapeError;
use crate::model::{PartitionHistory, PartitionStep, WeightedGraph};
use crate::search::{Evaluation, Proposal, ResolutionSearch, SearchOutcome};
use tracing::{debug, info};

/// Outcome of a resolution sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepResult {
    /// Successful steps, ascending by resolution
    pub history: PartitionHistory,
    pub outcome: SearchOutcome,
    /// Number of oracle evaluations, including failed ones
    pub iterations: usize,
}

/// Drives the loop between a [ResolutionSearch] and a [CommunityOracle].
///
/// Each iteration evaluates one resolution, records the partition and asks
/// the strategy for the next resolution. A failed oracle call drops that
/// step with an [Warning::OracleFailure]; the sweep continues. Running out
/// of iterations is reported as [Warning::ConvergenceFailure] and the
/// partial history is returned.
pub struct ResolutionSweep;

impl ResolutionSweep {
    /// Runs the sweep to completion.
    ///
    /// The loop never exceeds `strategy.max_iterations()` evaluations, even
    /// if the strategy keeps proposing.
    ///
    /// # Errors
    /// [GrapeError::Data] if the strategy proposes a non-finite resolution.
    pub fn run(
        graph: &WeightedGraph,
        oracle: &mut dyn CommunityOracle,
        strategy: &mut dyn ResolutionSearch,
        diagnostics: &mut Diagnostics,
    ) -> Result<SweepResult, GrapeError> {
        let budget = strategy.max_iterations().max(1);
        let mut history = PartitionHistory::new(graph.num_vertices());
        let mut resolution = strategy.initialize();
        let mut iterations = 0;

        info!(
            strategy = strategy.name(),
            oracle = oracle.name(),
            initial = resolution,
            budget,
            "starting resolution sweep"
        );

        let outcome = loop {
            iterations += 1;

            let latest = match run_oracle(oracle, graph, resolution) {
                Ok(partition) => {
                    let num_communities = partition.num_communities();
                    debug!(resolution, num_communities, "evaluated resolution");
                    history.record(PartitionStep::new(resolution, partition))?;
                    Some(Evaluation {
                        resolution,
                        num_communities,
                    })
                }
                Err(failure) => {
                    diagnostics.warn(Warning::OracleFailure(failure));
                    None
                }
            };

            match strategy.propose(&history, latest) {
                Proposal::Stop(outcome) => break outcome,
                Proposal::Next(_) if iterations >= budget => break SearchOutcome::MaxIterationsReached,
                Proposal::Next(next) => {
                    if !next.is_finite() {
                        return Err(GrapeError::Data(format!(
                            "strategy '{}' proposed non-finite resolution {}",
                            strategy.name(),
                            next
                        )));
                    }
                    resolution = next;
                }
            }
        };

        if outcome == SearchOutcome::MaxIterationsReached {
            diagnostics.warn(Warning::ConvergenceFailure {
                strategy: strategy.name().to_string(),
                iterations,
            });
        }
        info!(
            %outcome,
            iterations,
            steps = history.len(),
            "resolution sweep finished"
        );

        Ok(SweepResult {
            history,
            outcome,
            iterations,
        })
    }
}
