//! Greedy agglomerative modularity maximization.

use crate::community::CommunityOracle;
use crate::model::{GraphVertex, WeightedGraph};

/// Minimal modularity increase for a merge
const MERGE_TOLERANCE: f64 = 1e-12;

/// Clauset–Newman–Moore greedy modularity with resolution.
///
/// Starts from singletons and repeatedly merges the pair of connected
/// communities with the largest `ΔQ = 2 (e_ij - γ a_i a_j)`, as long as
/// `ΔQ > 0`. `e_ij` is the fraction of edge weight between the two
/// communities (per direction), `a_i` the fraction of strength in `i`.
/// Ties go to the pair with the smallest indices, so results are
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct GreedyModularity;

impl GreedyModularity {
    pub fn new() -> Self {
        GreedyModularity
    }
}

impl CommunityOracle for GreedyModularity {
    fn name(&self) -> &str {
        "greedy"
    }

    fn detect(&mut self, graph: &WeightedGraph, resolution: f64) -> Vec<Vec<GraphVertex>> {
        let n = graph.num_vertices();
        let m2 = 2.0 * graph.total_weight();
        let mut members: Vec<Vec<GraphVertex>> = (0..n).map(|i| vec![i]).collect();
        if m2 <= 0.0 {
            return members;
        }

        let mut e: Vec<Vec<f64>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 0.0 } else { graph.weight(i, j) / m2 }).collect())
            .collect();
        let mut a: Vec<f64> = (0..n).map(|i| graph.strength(i) / m2).collect();
        let mut alive = vec![true; n];

        loop {
            let mut best: Option<(f64, usize, usize)> = None;
            for i in (0..n).filter(|&i| alive[i]) {
                for j in ((i + 1)..n).filter(|&j| alive[j]) {
                    if e[i][j] <= 0.0 {
                        continue;
                    }
                    let dq = 2.0 * (e[i][j] - resolution * a[i] * a[j]);
                    if best.is_none_or(|(best_dq, _, _)| dq > best_dq) {
                        best = Some((dq, i, j));
                    }
                }
            }

            let (i, j) = match best {
                Some((dq, i, j)) if dq > MERGE_TOLERANCE => (i, j),
                _ => break,
            };

            // Merge j into i
            for k in 0..n {
                if k == i || k == j {
                    continue;
                }
                let joined = e[i][k] + e[j][k];
                e[i][k] = joined;
                e[k][i] = joined;
                e[j][k] = 0.0;
                e[k][j] = 0.0;
            }
            e[i][j] = 0.0;
            e[j][i] = 0.0;
            a[i] += a[j];
            a[j] = 0.0;
            alive[j] = false;

            let moved = std::mem::take(&mut members[j]);
            members[i].extend(moved);
        }

        members.into_iter().filter(|m| !m.is_empty()).collect()
    }
}
