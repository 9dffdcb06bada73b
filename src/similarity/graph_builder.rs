//! Assembly of the complete similarity graph.

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::GrapeError;
use crate::model::WeightedGraph;
use crate::similarity::PairwiseSimilarity;
use tracing::{debug, info};

/// Builds a [WeightedGraph] with an edge for every pair of languages,
/// weighted by a [PairwiseSimilarity].
///
/// Pairs whose similarity is undefined get weight 0 and an
/// [UndefinedWeight](Warning::UndefinedWeight) warning.
///
/// # Example
/// ```
/// use grape::diagnostics::Diagnostics;
/// use grape::model::CognateData;
/// use grape::similarity::{GraphBuilder, UnadjustedSimilarity};
///
/// let data = CognateData::from_triples([
///     ("A", "eye", "1"), ("B", "eye", "1"), ("C", "eye", "2"),
/// ]);
/// let mut diagnostics = Diagnostics::new();
/// let graph = GraphBuilder::new(&UnadjustedSimilarity::new(&data))
///     .build(&mut diagnostics)
///     .unwrap();
/// assert_eq!(graph.weight(0, 1), 1.0);
/// assert_eq!(graph.weight(0, 2), 0.0);
/// ```
pub struct GraphBuilder<'s, S: PairwiseSimilarity> {
    similarity: &'s S,
    prune_threshold: Option<f64>,
}

impl<'s, S: PairwiseSimilarity> GraphBuilder<'s, S> {
    pub fn new(similarity: &'s S) -> Self {
        GraphBuilder {
            similarity,
            prune_threshold: None,
        }
    }

    /// Zeroes every weight at or below `threshold` after construction.
    pub fn with_prune_threshold(mut self, threshold: f64) -> Self {
        self.prune_threshold = Some(threshold);
        self
    }

    /// Computes all pairwise weights.
    ///
    /// # Errors
    /// [GrapeError::Data] if there are fewer than two languages.
    pub fn build(&self, diagnostics: &mut Diagnostics) -> Result<WeightedGraph, GrapeError> {
        let languages = self.similarity.data().languages();
        let n = languages.num_languages();
        if n < 2 {
            return Err(GrapeError::Data(format!(
                "at least two languages are needed to build a graph, found {}",
                n
            )));
        }

        let mut graph = WeightedGraph::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let weight = match self.similarity.score(i, j) {
                    Some(weight) => weight,
                    None => {
                        diagnostics.warn(Warning::UndefinedWeight {
                            first: languages[i].to_string(),
                            second: languages[j].to_string(),
                        });
                        0.0
                    }
                };
                graph.set_weight(i, j, weight);
            }
        }

        if let Some(threshold) = self.prune_threshold {
            graph.prune(threshold);
            debug!(threshold, "pruned low-weight edges");
        }

        info!(
            languages = n,
            edges = graph.num_edges(0.0),
            total_weight = graph.total_weight(),
            "similarity graph built"
        );
        Ok(graph)
    }
}
