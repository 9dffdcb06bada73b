//! Pairwise language similarity from cognate observations.
//!
//! Two measures implement [PairwiseSimilarity]:
//! * [DistanceModel] - per-concept overlap aggregated under a
//!   [SynonymPolicy] and [MissingDataPolicy], then mixed by
//!   `proximity_weight` and `sharing_factor`
//! * [UnadjustedSimilarity] - share of commonly attested concepts on which
//!   two languages share any cognate set
//!
//! [GraphBuilder] turns either into a complete [WeightedGraph](crate::model::WeightedGraph).

mod graph_builder;

pub use graph_builder::GraphBuilder;

use crate::config::{MissingDataPolicy, SynonymPolicy};
use crate::model::{CognateData, CognateIndex, LanguageIndex};

/// A symmetric, deterministic similarity between two languages of a dataset.
pub trait PairwiseSimilarity {
    /// The data the similarity is computed on.
    fn data(&self) -> &CognateData;

    /// Similarity of languages `i` and `j`, or `None` when it is undefined
    /// because no concept could be compared.
    fn score(&self, i: LanguageIndex, j: LanguageIndex) -> Option<f64>;

    /// Similarity with undefined values mapped to 0 (maximal distance).
    fn similarity(&self, i: LanguageIndex, j: LanguageIndex) -> f64 {
        self.score(i, j).unwrap_or(0.0)
    }
}

// =#========================================================================#=
// DISTANCE MODEL
// =#========================================================================#=
/// Adjusted similarity under configurable synonym and missing-data policies.
///
/// For each concept, the overlap of the two languages' cognate sets is
/// scored (1 for every equal pair of identifiers, 0 otherwise) and
/// aggregated over all pairs with the [SynonymPolicy]. A concept missing for
/// either language scores 0, 1, or is skipped, following the
/// [MissingDataPolicy]. The mean over contributing concepts `s` gives the
/// weight `proximity_weight * s + sharing_factor * (1 - s)`.
///
/// # Example
/// ```
/// use grape::config::{MissingDataPolicy, SynonymPolicy};
/// use grape::model::CognateData;
/// use grape::similarity::{DistanceModel, PairwiseSimilarity};
///
/// let data = CognateData::from_triples([
///     ("A", "eye", "1"), ("B", "eye", "1"),
///     ("A", "ear", "2"), ("B", "ear", "3"),
/// ]);
/// let model = DistanceModel::new(&data, SynonymPolicy::Average, MissingDataPolicy::Ignore, 1.0, 0.0);
/// assert_eq!(model.similarity(0, 1), 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceModel<'a> {
    data: &'a CognateData,
    synonyms: SynonymPolicy,
    missing_data: MissingDataPolicy,
    proximity_weight: f64,
    sharing_factor: f64,
}

impl<'a> DistanceModel<'a> {
    pub fn new(
        data: &'a CognateData,
        synonyms: SynonymPolicy,
        missing_data: MissingDataPolicy,
        proximity_weight: f64,
        sharing_factor: f64,
    ) -> Self {
        DistanceModel {
            data,
            synonyms,
            missing_data,
            proximity_weight,
            sharing_factor,
        }
    }

    /// Mean per-concept similarity of `i` and `j` over contributing
    /// concepts, or `None` if no concept contributed.
    pub fn concept_average(&self, i: LanguageIndex, j: LanguageIndex) -> Option<f64> {
        let mut total = 0.0;
        let mut contributing = 0usize;

        for concept in 0..self.data.num_concepts() {
            let score = match (self.data.observations(i, concept), self.data.observations(j, concept)) {
                (Some(a), Some(b)) => Some(overlap(a, b, self.synonyms)),
                _ => match self.missing_data {
                    MissingDataPolicy::MaxDistance => Some(0.0),
                    MissingDataPolicy::Identical => Some(1.0),
                    MissingDataPolicy::Ignore => None,
                },
            };

            if let Some(score) = score {
                total += score;
                contributing += 1;
            }
        }

        if contributing == 0 {
            None
        } else {
            Some(total / contributing as f64)
        }
    }
}

impl PairwiseSimilarity for DistanceModel<'_> {
    fn data(&self) -> &CognateData {
        self.data
    }

    fn score(&self, i: LanguageIndex, j: LanguageIndex) -> Option<f64> {
        self.concept_average(i, j)
            .map(|s| self.proximity_weight * s + self.sharing_factor * (1.0 - s))
    }
}

/// Aggregated overlap of two non-empty, sorted cognate-set lists.
///
/// Pair `(x, y)` scores 1 iff `x == y`; with sorted, duplicate-free lists the
/// number of scoring pairs is the size of the intersection.
fn overlap(a: &[CognateIndex], b: &[CognateIndex], policy: SynonymPolicy) -> f64 {
    let shared = count_shared(a, b);
    let pairs = a.len() * b.len();

    match policy {
        SynonymPolicy::Average => shared as f64 / pairs as f64,
        SynonymPolicy::Min => {
            if shared == pairs {
                1.0
            } else {
                0.0
            }
        }
        SynonymPolicy::Max => {
            if shared > 0 {
                1.0
            } else {
                0.0
            }
        }
    }
}

/// Size of the intersection of two sorted lists.
fn count_shared(a: &[CognateIndex], b: &[CognateIndex]) -> usize {
    let (mut x, mut y, mut shared) = (0, 0, 0);
    while x < a.len() && y < b.len() {
        match a[x].cmp(&b[y]) {
            std::cmp::Ordering::Less => x += 1,
            std::cmp::Ordering::Greater => y += 1,
            std::cmp::Ordering::Equal => {
                shared += 1;
                x += 1;
                y += 1;
            }
        }
    }
    shared
}

// =#========================================================================#=
// UNADJUSTED
// =#========================================================================#=
/// Ratio of concepts with a shared cognate set to concepts attested in both
/// languages. No synonym or missing-data handling.
#[derive(Debug, Clone)]
pub struct UnadjustedSimilarity<'a> {
    data: &'a CognateData,
}

impl<'a> UnadjustedSimilarity<'a> {
    pub fn new(data: &'a CognateData) -> Self {
        UnadjustedSimilarity { data }
    }
}

impl PairwiseSimilarity for UnadjustedSimilarity<'_> {
    fn data(&self) -> &CognateData {
        self.data
    }

    fn score(&self, i: LanguageIndex, j: LanguageIndex) -> Option<f64> {
        let mut shared = 0usize;
        let mut attested = 0usize;

        for concept in 0..self.data.num_concepts() {
            if let (Some(a), Some(b)) = (self.data.observations(i, concept), self.data.observations(j, concept)) {
                attested += 1;
                if count_shared(a, b) > 0 {
                    shared += 1;
                }
            }
        }

        if attested == 0 {
            None
        } else {
            Some(shared as f64 / attested as f64)
        }
    }
}
