//! Synthesis of a classification tree from a partition history.
//!
//! The [TreeSynthesizer] walks the history in ascending resolution and keeps
//! a *frontier* of unresolved branches. At each step every branch is
//! intersected with the step's communities:
//! * one non-empty intersection: nothing happened, the branch stays
//! * several: the branch splits; each group becomes a child, singletons
//!   become leaves and multi-language groups join the next frontier
//!
//! Branch lengths are the resolution distance between the step that created
//! a branch and the step that split it, times [SynthesisOptions::scale],
//! but at least [SynthesisOptions::epsilon]. Groups never split by the end
//! of the sweep are flattened into leaves of length `epsilon`. Finally,
//! [collapse_unary] merges single-child chains.
//!
//! Communities do not have to be nested across steps. Intersecting with the
//! frontier always refines the tree, so a community that regroups
//! languages separated earlier cannot undo that separation; it is only
//! reported as [Warning::NonNestedCommunity].

mod collapse;

pub use collapse::collapse_unary;

use crate::diagnostics::{Diagnostics, Warning};
use crate::error::GrapeError;
use crate::model::{BranchLength, ClassificationTree, LanguageIndex, LanguageMap, PartitionHistory, PartitionStep, VertexIndex};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// Default minimal branch length.
pub const EPSILON: f64 = 1e-8;

/// Default factor from resolution distance to branch length.
pub const SCALE: f64 = 1.0;

/// Branch length parameters of the synthesis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SynthesisOptions {
    pub scale: f64,
    pub epsilon: f64,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        SynthesisOptions {
            scale: SCALE,
            epsilon: EPSILON,
        }
    }
}

/// Unresolved part of the tree: a vertex and the languages still below it.
#[derive(Debug)]
struct Branch {
    vertex: VertexIndex,
    languages: Vec<LanguageIndex>,
    created_at: f64,
}

// =#========================================================================#=
// TREE SYNTHESIZER
// =#========================================================================#=
/// Reconciles a [PartitionHistory] into a [ClassificationTree].
///
/// Identical histories always give identical trees: groups are processed
/// in order of their smallest language index, which is the order of the
/// smallest label in the [LanguageMap].
///
/// # Example
/// ```
/// use grape::diagnostics::Diagnostics;
/// use grape::model::{LanguageMap, PartitionHistory, PartitionStep};
/// use grape::synthesis::TreeSynthesizer;
///
/// let languages = LanguageMap::from_labels(["A", "B", "C", "D"]);
/// let steps = vec![
///     PartitionStep::from_communities(0.5, 4, vec![vec![0, 1], vec![2, 3]]).unwrap(),
///     PartitionStep::from_communities(1.0, 4, vec![vec![0], vec![1], vec![2], vec![3]]).unwrap(),
/// ];
/// let history = PartitionHistory::from_steps(4, steps).unwrap();
///
/// let mut diagnostics = Diagnostics::new();
/// let tree = TreeSynthesizer::default()
///     .synthesize(&history, &languages, &mut diagnostics)
///     .unwrap();
/// assert_eq!(tree.num_leaves(), 4);
/// assert_eq!(tree.root().children().len(), 2);
/// assert!(diagnostics.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TreeSynthesizer {
    options: SynthesisOptions,
}

impl TreeSynthesizer {
    pub fn new(options: SynthesisOptions) -> Self {
        TreeSynthesizer { options }
    }

    pub fn options(&self) -> &SynthesisOptions {
        &self.options
    }

    /// Synthesizes the tree of `history`.
    ///
    /// # Arguments
    /// * `history` - Partition steps; resorted and deduplicated (last wins)
    /// * `languages` - Labels for warnings; must match the history's universe
    /// * `diagnostics` - Receives non-nesting and unresolved-group warnings
    ///
    /// # Returns
    /// A valid tree without unary vertices whose leaves are exactly the
    /// languages.
    ///
    /// # Errors
    /// * [GrapeError::Data] for fewer than two languages or a language map
    ///   of different size
    /// * [GrapeError::Configuration] for non-positive scale or epsilon
    pub fn synthesize(
        &self,
        history: &PartitionHistory,
        languages: &LanguageMap,
        diagnostics: &mut Diagnostics,
    ) -> Result<ClassificationTree, GrapeError> {
        let n = history.num_languages();
        if n < 2 {
            return Err(GrapeError::Data(format!("cannot classify {} language(s); need at least 2", n)));
        }
        if languages.num_languages() != n {
            return Err(GrapeError::Data(format!(
                "language map has {} languages, history covers {}",
                languages.num_languages(),
                n
            )));
        }
        self.check_options()?;

        let steps = normalize(history.steps());
        let start = steps.first().map_or(0.0, |step| step.resolution);

        let mut tree = ClassificationTree::new(n);
        let mut frontier = vec![Branch {
            vertex: tree.root_index(),
            languages: (0..n).collect(),
            created_at: start,
        }];
        // Clade per language: languages in different clades were separated
        let mut clade_of = vec![0usize; n];
        let mut num_clades = 1;

        for step in steps {
            if frontier.is_empty() {
                break;
            }
            self.check_nesting(step, &clade_of, languages, diagnostics);

            let mut next = Vec::with_capacity(frontier.len());
            for branch in frontier {
                let groups = split_by_communities(&branch.languages, step);
                if groups.len() == 1 {
                    next.push(branch);
                    continue;
                }

                let length = self.branch_length(step.resolution - branch.created_at);
                debug!(
                    resolution = step.resolution,
                    vertex = branch.vertex,
                    groups = groups.len(),
                    "split"
                );
                for group in groups {
                    for &language in &group {
                        clade_of[language] = num_clades;
                    }
                    num_clades += 1;

                    if group.len() == 1 {
                        tree.add_leaf(branch.vertex, length, group[0]);
                    } else {
                        let vertex = tree.add_internal(branch.vertex, length, group.clone());
                        next.push(Branch {
                            vertex,
                            languages: group,
                            created_at: step.resolution,
                        });
                    }
                }
            }
            frontier = next;
        }

        // Flatten what the sweep left unresolved
        let epsilon = BranchLength::new(self.options.epsilon);
        for branch in frontier {
            diagnostics.warn(Warning::UnresolvedGroup {
                languages: labels_of(&branch.languages, languages),
            });
            for &language in &branch.languages {
                tree.add_leaf(branch.vertex, epsilon, language);
            }
        }

        let tree = collapse_unary(&tree);
        info!(
            leaves = tree.num_leaves(),
            internal = tree.num_internal(),
            "synthesized classification tree"
        );
        Ok(tree)
    }

    fn check_options(&self) -> Result<(), GrapeError> {
        let SynthesisOptions { scale, epsilon } = self.options;
        if !(scale.is_finite() && scale > 0.0) {
            return Err(GrapeError::Configuration(format!("synthesis scale must be positive, got {}", scale)));
        }
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(GrapeError::Configuration(format!("synthesis epsilon must be positive, got {}", epsilon)));
        }
        Ok(())
    }

    fn branch_length(&self, distance: f64) -> BranchLength {
        BranchLength::new((self.options.scale * distance).max(self.options.epsilon))
    }

    /// Warns about every community spanning more than one clade.
    fn check_nesting(
        &self,
        step: &PartitionStep,
        clade_of: &[usize],
        languages: &LanguageMap,
        diagnostics: &mut Diagnostics,
    ) {
        for community in step.partition.communities() {
            let mut clades: Vec<usize> = community.iter().map(|&l| clade_of[l]).collect();
            clades.sort_unstable();
            clades.dedup();
            if clades.len() > 1 {
                diagnostics.warn(Warning::NonNestedCommunity {
                    resolution: step.resolution,
                    community: labels_of(community, languages),
                    clades: clades.len(),
                });
            }
        }
    }
}

/// Orders steps by resolution and keeps the last of equal resolutions.
fn normalize(steps: &[PartitionStep]) -> Vec<&PartitionStep> {
    let mut sorted: Vec<&PartitionStep> = steps.iter().collect();
    sorted.sort_by(|a, b| a.resolution.total_cmp(&b.resolution));

    let mut normalized: Vec<&PartitionStep> = Vec::with_capacity(sorted.len());
    for step in sorted {
        match normalized.last_mut() {
            Some(last) if last.resolution == step.resolution => *last = step,
            _ => normalized.push(step),
        }
    }
    normalized
}

/// Groups sorted `languages` by community, ordered by smallest member.
fn split_by_communities(languages: &[LanguageIndex], step: &PartitionStep) -> Vec<Vec<LanguageIndex>> {
    let mut slot_of: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<LanguageIndex>> = Vec::new();
    for &language in languages {
        let community = step.partition.community_of(language);
        let slot = *slot_of.entry(community).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(language);
    }
    groups
}

fn labels_of(indices: &[LanguageIndex], languages: &LanguageMap) -> Vec<String> {
    indices.iter().map(|&i| languages[i].to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Partition;

    #[test]
    fn test_normalize_keeps_last_of_equal_resolutions() {
        let a = PartitionStep::new(0.5, Partition::whole(2));
        let b = PartitionStep::new(0.1, Partition::whole(2));
        let c = PartitionStep::new(0.5, Partition::singletons(2));
        let steps = vec![a, b, c];

        let normalized = normalize(&steps);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized[0].resolution, 0.1);
        assert!(normalized[1].partition.is_all_singletons());
    }

    #[test]
    fn test_split_orders_groups_by_smallest_member() {
        let step = PartitionStep::new(1.0, Partition::from_assignment(&[1, 0, 1, 0, 2]));
        let groups = split_by_communities(&[1, 2, 3, 4], &step);
        assert_eq!(groups, vec![vec![1, 3], vec![2], vec![4]]);
    }

    #[test]
    fn test_rejects_invalid_options() {
        let history = PartitionHistory::new(2);
        let languages = LanguageMap::from_labels(["A", "B"]);
        let synthesizer = TreeSynthesizer::new(SynthesisOptions {
            scale: 0.0,
            epsilon: EPSILON,
        });
        let result = synthesizer.synthesize(&history, &languages, &mut Diagnostics::new());
        assert!(matches!(result, Err(GrapeError::Configuration(_))));
    }
}
