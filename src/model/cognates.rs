//! Cognate observations per (language, concept).
//!
//! [CognateData] is the read-only table all similarity computations work on.
//! It is loaded once and never mutated afterwards.

use crate::model::language_map::{LanguageIndex, LanguageMap};
use std::collections::{BTreeSet, HashMap};

/// Index of a concept in [CognateData].
pub type ConceptIndex = usize;

/// Interned cognate-set identifier.
pub type CognateIndex = usize;

// =#========================================================================#=
// COGNATE DATA
// =#========================================================================#=
/// Table of cognate-set assignments, indexed by language and concept.
///
/// Each present entry is a non-empty, sorted set of interned cognate-set
/// identifiers; a set with more than one element expresses synonymy.
/// Absent entries are missing data.
///
/// Languages and concepts are sorted by label, cognate-set identifiers are
/// interned in order of first appearance.
///
/// # Example
/// ```
/// use grape::model::CognateData;
///
/// let data = CognateData::from_triples([
///     ("Gothic", "hand", "hand.1"),
///     ("Latin", "hand", "hand.2"),
///     ("Latin", "hand", "hand.3"),
/// ]);
/// let latin = data.languages().get_index("Latin").unwrap();
/// assert_eq!(data.observations(latin, 0).map(|s| s.len()), Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct CognateData {
    languages: LanguageMap,
    concepts: Vec<String>,
    num_cognate_sets: usize,
    /// Row-major `language * num_concepts + concept`
    table: Vec<Option<Vec<CognateIndex>>>,
}

impl CognateData {
    /// Builds the table from `(language, concept, cognate set)` triples.
    ///
    /// Rows with an empty cognate-set field are treated as missing data, but
    /// still register their language and concept. Repeated rows collapse.
    pub fn from_triples<I, S1, S2, S3>(triples: I) -> Self
    where
        I: IntoIterator<Item = (S1, S2, S3)>,
        S1: AsRef<str>,
        S2: AsRef<str>,
        S3: AsRef<str>,
    {
        let rows: Vec<(String, String, String)> = triples
            .into_iter()
            .map(|(l, c, s)| {
                (
                    l.as_ref().trim().to_string(),
                    c.as_ref().trim().to_string(),
                    s.as_ref().trim().to_string(),
                )
            })
            .collect();

        let languages = LanguageMap::from_labels(rows.iter().map(|(l, _, _)| l.as_str()));
        let concepts: Vec<String> = rows
            .iter()
            .map(|(_, c, _)| c.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let concept_index: HashMap<&str, ConceptIndex> = concepts
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect();

        let num_concepts = concepts.len();
        let mut cells: Vec<BTreeSet<CognateIndex>> =
            vec![BTreeSet::new(); languages.num_languages() * num_concepts];
        let mut interned: HashMap<String, CognateIndex> = HashMap::new();

        for (language, concept, cognate_set) in &rows {
            if cognate_set.is_empty() {
                continue;
            }
            let next_id = interned.len();
            let id = *interned.entry(cognate_set.clone()).or_insert(next_id);

            // Both lookups are infallible: the maps were built from these rows
            if let (Some(l), Some(&c)) = (languages.get_index(language), concept_index.get(concept.as_str())) {
                cells[l * num_concepts + c].insert(id);
            }
        }

        let table = cells
            .into_iter()
            .map(|set| {
                if set.is_empty() {
                    None
                } else {
                    Some(set.into_iter().collect())
                }
            })
            .collect();

        CognateData {
            languages,
            concepts,
            num_cognate_sets: interned.len(),
            table,
        }
    }

    /// Returns the language universe of this table.
    pub fn languages(&self) -> &LanguageMap {
        &self.languages
    }

    /// Returns the number of languages.
    pub fn num_languages(&self) -> usize {
        self.languages.num_languages()
    }

    /// Returns the sorted concept labels.
    pub fn concepts(&self) -> &[String] {
        &self.concepts
    }

    /// Returns the number of concepts.
    pub fn num_concepts(&self) -> usize {
        self.concepts.len()
    }

    /// Returns the number of distinct cognate sets.
    pub fn num_cognate_sets(&self) -> usize {
        self.num_cognate_sets
    }

    /// Returns the cognate sets `language` uses for `concept`,
    /// or `None` if that entry is missing.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    pub fn observations(&self, language: LanguageIndex, concept: ConceptIndex) -> Option<&[CognateIndex]> {
        assert!(concept < self.num_concepts(), "Concept index {} out of bounds", concept);
        self.table[language * self.num_concepts() + concept].as_deref()
    }

    /// Returns the share of (language, concept) cells holding data.
    pub fn coverage(&self) -> f64 {
        if self.table.is_empty() {
            return 0.0;
        }
        let filled = self.table.iter().filter(|cell| cell.is_some()).count();
        filled as f64 / self.table.len() as f64
    }
}
