//! Louvain modularity optimization.

use crate::community::CommunityOracle;
use crate::model::{GraphVertex, WeightedGraph};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use tracing::trace;

/// Minimal gain for a move to count as improvement
const GAIN_TOLERANCE: f64 = 1e-12;

/// Louvain method (Blondel et al. 2008) with resolution.
///
/// Alternates two phases until no vertex moves:
/// 1. **Local moving**: visit vertices in random order and move each to the
///    neighbouring community with the best gain
///    `k_i,in - γ · Σ_tot · k_i / 2m`.
/// 2. **Aggregation**: contract communities into vertices.
///
/// Results depend on the visiting order, which is drawn from a [StdRng].
/// With a seed, a sequence of calls is reproducible.
pub struct Louvain {
    rng: StdRng,
}

impl Louvain {
    /// Creates a Louvain oracle; `None` draws the seed from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Louvain { rng }
    }

    /// Phase 1 on one level. Returns the community per node and whether
    /// any node moved.
    fn local_moving(&mut self, level: &Level, resolution: f64) -> (Vec<usize>, bool) {
        let n = level.len();
        let strength: Vec<f64> = (0..n).map(|i| level.strength(i)).collect();
        let m2: f64 = strength.iter().sum();

        let mut community: Vec<usize> = (0..n).collect();
        if m2 <= 0.0 {
            return (community, false);
        }
        let mut total = strength.clone();

        let mut order: Vec<usize> = (0..n).collect();
        order.shuffle(&mut self.rng);

        // Scratch space: weight from the current node into each community
        let mut links = vec![0.0; n];
        let mut touched: Vec<usize> = Vec::new();

        let mut moved_any = false;
        loop {
            let mut moved = false;
            for &i in &order {
                for &(j, w) in &level.adjacency[i] {
                    let c = community[j];
                    if links[c] == 0.0 {
                        touched.push(c);
                    }
                    links[c] += w;
                }

                let current = community[i];
                total[current] -= strength[i];

                let gain = |c: usize, links_to_c: f64| links_to_c - resolution * total[c] * strength[i] / m2;
                let mut best = current;
                let mut best_gain = gain(current, links[current]);
                for &c in &touched {
                    let g = gain(c, links[c]);
                    if g > best_gain + GAIN_TOLERANCE {
                        best = c;
                        best_gain = g;
                    }
                }

                total[best] += strength[i];
                community[i] = best;
                if best != current {
                    moved = true;
                }

                for &c in &touched {
                    links[c] = 0.0;
                }
                touched.clear();
            }

            if !moved {
                break;
            }
            moved_any = true;
        }

        (community, moved_any)
    }
}

impl CommunityOracle for Louvain {
    fn name(&self) -> &str {
        "louvain"
    }

    fn detect(&mut self, graph: &WeightedGraph, resolution: f64) -> Vec<Vec<GraphVertex>> {
        let n = graph.num_vertices();
        let mut level = Level::from_graph(graph);
        // Level node each original vertex currently belongs to
        let mut node_of: Vec<usize> = (0..n).collect();

        let mut passes = 0;
        loop {
            let (community, moved) = self.local_moving(&level, resolution);
            if !moved {
                break;
            }
            let (renumbered, count) = renumber(&community);
            if count == level.len() {
                break;
            }
            for node in node_of.iter_mut() {
                *node = renumbered[*node];
            }
            level = level.aggregate(&renumbered, count);
            passes += 1;
        }
        trace!(resolution, passes, communities = level.len(), "louvain finished");

        let mut groups = vec![Vec::new(); level.len()];
        for (vertex, &node) in node_of.iter().enumerate() {
            groups[node].push(vertex);
        }
        groups
    }
}

/// Maps community labels to `0..count` in order of first appearance.
fn renumber(community: &[usize]) -> (Vec<usize>, usize) {
    let mut new_label = vec![usize::MAX; community.len()];
    let mut count = 0;
    let renumbered = community
        .iter()
        .map(|&c| {
            if new_label[c] == usize::MAX {
                new_label[c] = count;
                count += 1;
            }
            new_label[c]
        })
        .collect();
    (renumbered, count)
}

// =#========================================================================#=
// LEVEL GRAPH
// =#========================================================================#=
/// Graph of one Louvain level; self-loops hold the weight already inside a node.
struct Level {
    adjacency: Vec<Vec<(usize, f64)>>,
    self_loops: Vec<f64>,
}

impl Level {
    fn from_graph(graph: &WeightedGraph) -> Self {
        let n = graph.num_vertices();
        Level {
            adjacency: (0..n).map(|i| graph.neighbors(i).collect()).collect(),
            self_loops: vec![0.0; n],
        }
    }

    fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// Self-loops count twice towards strength.
    fn strength(&self, i: usize) -> f64 {
        self.adjacency[i].iter().map(|&(_, w)| w).sum::<f64>() + 2.0 * self.self_loops[i]
    }

    /// Contracts nodes with equal `community` label (labels `0..count`).
    fn aggregate(&self, community: &[usize], count: usize) -> Level {
        let mut links: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); count];
        let mut self_loops = vec![0.0; count];

        for i in 0..self.len() {
            let ci = community[i];
            self_loops[ci] += self.self_loops[i];
            for &(j, w) in &self.adjacency[i] {
                let cj = community[j];
                if ci == cj {
                    // Visited from both ends
                    self_loops[ci] += w / 2.0;
                } else {
                    *links[ci].entry(cj).or_insert(0.0) += w;
                }
            }
        }

        Level {
            adjacency: links.into_iter().map(|m| m.into_iter().collect()).collect(),
            self_loops,
        }
    }
}
