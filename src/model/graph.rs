//! Complete weighted similarity graph over the language universe.

use crate::model::language_map::LanguageIndex;

/// Index of a vertex in a [WeightedGraph]; vertices are languages.
pub type GraphVertex = LanguageIndex;

// =#========================================================================#=
// WEIGHTED GRAPH
// =#========================================================================#=
/// Undirected, symmetric, loop-free graph with a weight for every pair of
/// vertices, stored as a dense matrix.
///
/// # Invariants
/// - `weight(i, j) == weight(j, i)`
/// - `weight(i, i) == 0`
/// - every weight is finite and non-negative
///
/// A weight of `0` is an edge of weight zero; whether it counts as "no edge"
/// is up to the consumer (see [WeightedGraph::neighbors]).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedGraph {
    num_vertices: usize,
    weights: Vec<f64>,
}

impl WeightedGraph {
    /// Creates a graph on `num_vertices` vertices with all weights zero.
    pub fn new(num_vertices: usize) -> Self {
        WeightedGraph {
            num_vertices,
            weights: vec![0.0; num_vertices * num_vertices],
        }
    }

    /// Sets the weight of the pair `{i, j}`.
    ///
    /// # Panics
    /// Panics if `i == j`, an index is out of bounds, or the weight is
    /// negative or not finite.
    pub fn set_weight(&mut self, i: GraphVertex, j: GraphVertex, weight: f64) {
        assert!(i != j, "Self-loops are not allowed (vertex {})", i);
        assert!(weight >= 0.0 && weight.is_finite(), "Edge weight must be finite and non-negative, got {}", weight);
        let n = self.num_vertices;
        self.weights[i * n + j] = weight;
        self.weights[j * n + i] = weight;
    }

    /// Returns the weight of the pair `{i, j}`.
    pub fn weight(&self, i: GraphVertex, j: GraphVertex) -> f64 {
        self.weights[i * self.num_vertices + j]
    }

    /// Returns the number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    /// Returns the number of unordered pairs with weight strictly above `min_weight`.
    pub fn num_edges(&self, min_weight: f64) -> usize {
        self.pairs().filter(|&(_, _, w)| w > min_weight).count()
    }

    /// Returns the sum of weights of all edges incident to `i`.
    pub fn strength(&self, i: GraphVertex) -> f64 {
        let n = self.num_vertices;
        self.weights[i * n..(i + 1) * n].iter().sum()
    }

    /// Returns the sum of all edge weights (each unordered pair once).
    pub fn total_weight(&self) -> f64 {
        self.pairs().map(|(_, _, w)| w).sum()
    }

    /// Returns an iterator over the neighbours of `i` connected by a
    /// positive weight, as `(neighbour, weight)`.
    pub fn neighbors(&self, i: GraphVertex) -> impl Iterator<Item = (GraphVertex, f64)> + '_ {
        let n = self.num_vertices;
        self.weights[i * n..(i + 1) * n]
            .iter()
            .enumerate()
            .filter(|&(_, &w)| w > 0.0)
            .map(|(j, &w)| (j, w))
    }

    /// Returns an iterator over all unordered pairs `(i, j, weight)` with `i < j`.
    pub fn pairs(&self) -> impl Iterator<Item = (GraphVertex, GraphVertex, f64)> + '_ {
        let n = self.num_vertices;
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j, self.weights[i * n + j])))
    }

    /// Sets every weight at or below `threshold` to zero.
    pub fn prune(&mut self, threshold: f64) {
        for w in self.weights.iter_mut() {
            if *w <= threshold {
                *w = 0.0;
            }
        }
    }
}
