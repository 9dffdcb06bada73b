//! Language label module for classification data.
//!
//! - `LanguageMap`: Joined storage and lookup for the language universe `L`.

use std::collections::HashMap;
use std::fmt;

/// Index of a language in a [LanguageMap].
pub type LanguageIndex = usize;

// =#========================================================================#=
// LANGUAGE MAP
// =#========================================================================#=
/// Maps language labels (strings) to compact indices.
///
/// The map is built once from all languages of a dataset and is immutable
/// afterwards, so that every graph, partition and tree over the same data
/// shares one index space. Labels are sorted and deduplicated on
/// construction: index order equals lexicographic label order, which is
/// what makes "smallest language identifier" tie-breaks a plain index
/// comparison.
///
/// # Example
/// ```
/// use grape::model::LanguageMap;
///
/// let languages = LanguageMap::from_labels(["Lithuanian", "Albanian", "Latvian", "Albanian"]);
///
/// assert_eq!(languages.num_languages(), 3);
/// assert_eq!(languages.get_index("Albanian"), Some(0));
/// assert_eq!(languages.get_label(2), Some("Lithuanian"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageMap {
    /// Sorted list of unique labels
    labels: Vec<String>,
    /// Map from label to its index
    map: HashMap<String, LanguageIndex>,
}

impl LanguageMap {
    /// Creates a new LanguageMap from any collection of labels.
    ///
    /// Duplicates are removed and the labels are sorted.
    ///
    /// # Arguments
    /// * `labels` - Language labels, in any order
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut labels: Vec<String> = labels.into_iter().map(|s| s.as_ref().to_string()).collect();
        labels.sort();
        labels.dedup();

        let map = labels
            .iter()
            .enumerate()
            .map(|(index, label)| (label.clone(), index))
            .collect();

        LanguageMap { labels, map }
    }

    /// Retrieves the index for a given label.
    ///
    /// # Returns
    /// `Some(index)` if the label exists, `None` otherwise
    pub fn get_index(&self, label: &str) -> Option<LanguageIndex> {
        self.map.get(label).copied()
    }

    /// Retrieves the label for a given index.
    ///
    /// # Returns
    /// `Some(&str)` if the index is valid, `None` otherwise
    pub fn get_label(&self, index: LanguageIndex) -> Option<&str> {
        self.labels.get(index).map(|s| s.as_str())
    }

    /// Checks if a label exists in the map.
    pub fn contains_label(&self, label: &str) -> bool {
        self.map.contains_key(label)
    }

    /// Returns the number of languages, i.e. `|L|`.
    pub fn num_languages(&self) -> usize {
        self.labels.len()
    }

    /// Returns reference to the (sorted) labels in this map.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Resolves a list of labels to their indices, or `None` if any label is unknown.
    pub fn indices_of<S: AsRef<str>>(&self, labels: &[S]) -> Option<Vec<LanguageIndex>> {
        labels.iter().map(|l| self.get_index(l.as_ref())).collect()
    }
}

impl fmt::Display for LanguageMap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "LanguageMap ({} languages):", self.labels.len())?;
        for (idx, label) in self.labels.iter().enumerate() {
            writeln!(f, "  [{}] {}", idx, label)?;
        }
        Ok(())
    }
}

impl std::ops::Index<LanguageIndex> for LanguageMap {
    type Output = str;

    fn index(&self, index: LanguageIndex) -> &Self::Output {
        &self.labels[index]
    }
}
