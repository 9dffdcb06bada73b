//! Community detection on the similarity graph.
//!
//! The classification core only relies on the contract of
//! [CommunityOracle]: given a graph and a resolution, return groups of
//! vertices. [run_oracle] checks that the groups form a partition before
//! anything downstream sees them.
//!
//! Two oracles are provided, both maximizing modularity with resolution `γ`
//! (see [modularity]):
//! * [Louvain] - stochastic local moving plus aggregation, seedable
//! * [GreedyModularity] - deterministic agglomerative merging
//!
//! Higher resolution favours more, smaller communities.

mod greedy;
mod louvain;

pub use greedy::GreedyModularity;
pub use louvain::Louvain;

use crate::config::CommunityMethod;
use crate::error::CommunityOracleFailure;
use crate::model::{GraphVertex, Partition, WeightedGraph};

/// Partitions a graph at a given resolution.
pub trait CommunityOracle {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Returns groups of vertices; expected, but not trusted, to be
    /// disjoint, non-empty and covering.
    fn detect(&mut self, graph: &WeightedGraph, resolution: f64) -> Vec<Vec<GraphVertex>>;
}

/// Creates the oracle for a configured method.
pub fn oracle_for(method: CommunityMethod, seed: Option<u64>) -> Box<dyn CommunityOracle> {
    match method {
        CommunityMethod::Louvain => Box::new(Louvain::new(seed)),
        CommunityMethod::Greedy => Box::new(GreedyModularity::new()),
    }
}

/// Runs `oracle` and validates its output.
///
/// # Errors
/// [CommunityOracleFailure] if the output is not a partition of the
/// graph's vertices.
pub fn run_oracle(
    oracle: &mut dyn CommunityOracle,
    graph: &WeightedGraph,
    resolution: f64,
) -> Result<Partition, CommunityOracleFailure> {
    let communities = oracle.detect(graph, resolution);
    Partition::new(graph.num_vertices(), communities).map_err(|source| CommunityOracleFailure {
        oracle: oracle.name().to_string(),
        resolution,
        source,
    })
}

/// Modularity of `partition` on `graph` at `resolution`:
/// `Q = Σ_c [ L_c / m - γ (d_c / 2m)² ]`, with `m` the total weight, `L_c`
/// the weight inside community `c` and `d_c` its total strength.
///
/// Returns 0 for a graph without positive weight.
pub fn modularity(graph: &WeightedGraph, partition: &Partition, resolution: f64) -> f64 {
    let m = graph.total_weight();
    if m <= 0.0 {
        return 0.0;
    }

    partition
        .communities()
        .iter()
        .map(|community| {
            let mut inner = 0.0;
            let mut strength = 0.0;
            for (x, &i) in community.iter().enumerate() {
                strength += graph.strength(i);
                for &j in &community[x + 1..] {
                    inner += graph.weight(i, j);
                }
            }
            inner / m - resolution * (strength / (2.0 * m)).powi(2)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PartitionError;

    /// Returns a fixed answer regardless of input.
    struct Scripted(Vec<Vec<GraphVertex>>);

    impl CommunityOracle for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn detect(&mut self, _graph: &WeightedGraph, _resolution: f64) -> Vec<Vec<GraphVertex>> {
            self.0.clone()
        }
    }

    #[test]
    fn test_run_oracle_rejects_missing_vertex() {
        let graph = WeightedGraph::new(3);
        let mut oracle = Scripted(vec![vec![0, 1]]);
        let failure = run_oracle(&mut oracle, &graph, 0.5).unwrap_err();
        assert_eq!(failure.source, PartitionError::MissingLanguage(2));
        assert_eq!(failure.resolution, 0.5);
    }

    #[test]
    fn test_run_oracle_accepts_partition() {
        let graph = WeightedGraph::new(3);
        let mut oracle = Scripted(vec![vec![2], vec![1, 0]]);
        let partition = run_oracle(&mut oracle, &graph, 1.0).unwrap();
        assert_eq!(partition.communities(), &[vec![0, 1], vec![2]]);
    }

    #[test]
    fn test_modularity_of_two_cliques() {
        // Two disconnected edges: perfect split has Q = 0.5 at γ = 1
        let mut graph = WeightedGraph::new(4);
        graph.set_weight(0, 1, 1.0);
        graph.set_weight(2, 3, 1.0);

        let split = Partition::from_assignment(&[0, 0, 1, 1]);
        let whole = Partition::whole(4);
        assert!((modularity(&graph, &split, 1.0) - 0.5).abs() < 1e-12);
        assert!(modularity(&graph, &whole, 1.0).abs() < 1e-12);
    }
}
