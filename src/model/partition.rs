//! Partitions of the language universe and their resolution-ordered history.
//!
//! * [Partition] - disjoint, non-empty, covering communities
//! * [PartitionStep] - a partition together with the resolution it was found at
//! * [PartitionHistory] - steps with strictly increasing resolution

use crate::error::GrapeError;
use crate::model::language_map::LanguageIndex;
use thiserror::Error;

/// Reasons a list of communities fails to be a partition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("community {0} is empty")]
    EmptyCommunity(usize),
    #[error("language {0} appears in more than one community")]
    DuplicateLanguage(LanguageIndex),
    #[error("language {0} is not covered by any community")]
    MissingLanguage(LanguageIndex),
    #[error("language index {0} is out of range")]
    UnknownLanguage(LanguageIndex),
}

// =#========================================================================#=
// PARTITION
// =#========================================================================#=
/// A division of `0..num_languages` into disjoint, non-empty, covering
/// communities.
///
/// Communities are normalized: each is sorted ascending, and communities are
/// ordered by their smallest member. Two partitions with the same grouping
/// therefore compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    communities: Vec<Vec<LanguageIndex>>,
    /// Community position per language
    membership: Vec<usize>,
}

impl Partition {
    /// Validates and normalizes `communities` into a partition of
    /// `0..num_languages`.
    pub fn new(num_languages: usize, mut communities: Vec<Vec<LanguageIndex>>) -> Result<Self, PartitionError> {
        let mut seen = vec![false; num_languages];

        for (position, community) in communities.iter_mut().enumerate() {
            if community.is_empty() {
                return Err(PartitionError::EmptyCommunity(position));
            }
            for &language in community.iter() {
                if language >= num_languages {
                    return Err(PartitionError::UnknownLanguage(language));
                }
                if seen[language] {
                    return Err(PartitionError::DuplicateLanguage(language));
                }
                seen[language] = true;
            }
            community.sort_unstable();
        }

        if let Some(missing) = seen.iter().position(|&s| !s) {
            return Err(PartitionError::MissingLanguage(missing));
        }

        communities.sort_unstable_by_key(|c| c[0]);

        let mut membership = vec![0; num_languages];
        for (position, community) in communities.iter().enumerate() {
            for &language in community {
                membership[language] = position;
            }
        }

        Ok(Partition { communities, membership })
    }

    /// Builds a partition from a community label per language.
    ///
    /// Labels are arbitrary; languages sharing a label form one community.
    pub fn from_assignment(assignment: &[usize]) -> Self {
        let mut labels: Vec<usize> = assignment.to_vec();
        labels.sort_unstable();
        labels.dedup();

        let mut communities = vec![Vec::new(); labels.len()];
        for (language, label) in assignment.iter().enumerate() {
            // Label is present by construction
            if let Ok(position) = labels.binary_search(label) {
                communities[position].push(language);
            }
        }

        communities.sort_unstable_by_key(|c| c[0]);
        let mut membership = vec![0; assignment.len()];
        for (position, community) in communities.iter().enumerate() {
            for &language in community {
                membership[language] = position;
            }
        }

        Partition { communities, membership }
    }

    /// Single community holding every language.
    pub fn whole(num_languages: usize) -> Self {
        Self::from_assignment(&vec![0; num_languages])
    }

    /// Every language in its own community.
    pub fn singletons(num_languages: usize) -> Self {
        Self::from_assignment(&(0..num_languages).collect::<Vec<_>>())
    }

    /// Returns the normalized communities.
    pub fn communities(&self) -> &[Vec<LanguageIndex>] {
        &self.communities
    }

    /// Returns the number of communities.
    pub fn num_communities(&self) -> usize {
        self.communities.len()
    }

    /// Returns the number of languages partitioned.
    pub fn num_languages(&self) -> usize {
        self.membership.len()
    }

    /// Returns the position of the community containing `language`.
    pub fn community_of(&self, language: LanguageIndex) -> usize {
        self.membership[language]
    }

    /// Returns whether every community is a single language.
    pub fn is_all_singletons(&self) -> bool {
        self.communities.len() == self.membership.len()
    }
}

// =#========================================================================#=
// PARTITION STEP
// =#========================================================================#=
/// A partition found at a given resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionStep {
    pub resolution: f64,
    pub partition: Partition,
}

impl PartitionStep {
    pub fn new(resolution: f64, partition: Partition) -> Self {
        PartitionStep { resolution, partition }
    }

    /// Convenience constructor validating raw communities.
    pub fn from_communities(
        resolution: f64,
        num_languages: usize,
        communities: Vec<Vec<LanguageIndex>>,
    ) -> Result<Self, PartitionError> {
        Ok(PartitionStep::new(resolution, Partition::new(num_languages, communities)?))
    }

    pub fn num_communities(&self) -> usize {
        self.partition.num_communities()
    }
}

// =#========================================================================#=
// PARTITION HISTORY
// =#========================================================================#=
/// Partition steps over one language universe, ordered by strictly
/// increasing resolution.
///
/// The history only grows. Recording a step at a resolution already present
/// replaces that step, so the last evaluation at a resolution wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionHistory {
    num_languages: usize,
    steps: Vec<PartitionStep>,
}

impl PartitionHistory {
    /// Creates an empty history over `num_languages` languages.
    pub fn new(num_languages: usize) -> Self {
        PartitionHistory {
            num_languages,
            steps: Vec::new(),
        }
    }

    /// Builds a history from steps in any order.
    ///
    /// Steps are sorted stably by resolution; of several steps sharing a
    /// resolution, the last one given is kept.
    ///
    /// # Errors
    /// [GrapeError::Data] if a resolution is not finite or a step
    /// partitions a different number of languages.
    pub fn from_steps(num_languages: usize, steps: Vec<PartitionStep>) -> Result<Self, GrapeError> {
        let mut history = PartitionHistory::new(num_languages);
        for step in steps {
            history.record(step)?;
        }
        Ok(history)
    }

    /// Inserts `step` at its resolution, replacing any step with the same
    /// resolution.
    ///
    /// # Errors
    /// [GrapeError::Data] if the resolution is not finite or the step
    /// partitions a different number of languages.
    pub fn record(&mut self, step: PartitionStep) -> Result<(), GrapeError> {
        if !step.resolution.is_finite() {
            return Err(GrapeError::Data(format!(
                "partition step has non-finite resolution {}",
                step.resolution
            )));
        }
        if step.partition.num_languages() != self.num_languages {
            return Err(GrapeError::Data(format!(
                "partition step at resolution {} covers {} languages, expected {}",
                step.resolution,
                step.partition.num_languages(),
                self.num_languages
            )));
        }

        match self
            .steps
            .binary_search_by(|s| s.resolution.total_cmp(&step.resolution))
        {
            Ok(position) => self.steps[position] = step,
            Err(position) => self.steps.insert(position, step),
        }
        Ok(())
    }

    /// Returns the steps, ascending by resolution.
    pub fn steps(&self) -> &[PartitionStep] {
        &self.steps
    }

    pub fn num_languages(&self) -> usize {
        self.num_languages
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Returns the step with the highest resolution.
    pub fn last(&self) -> Option<&PartitionStep> {
        self.steps.last()
    }

    /// Returns the step with the lowest resolution.
    pub fn first(&self) -> Option<&PartitionStep> {
        self.steps.first()
    }
}
