//! Vertex module for classification tree representation.

use crate::model::language_map::LanguageIndex;
use crate::model::tree::VertexIndex;
use std::fmt;
use std::ops::Deref;

// =#========================================================================#=
// VERTEX
// =#========================================================================#=
/// Represents a vertex (node) in a [ClassificationTree](crate::model::ClassificationTree).
///
/// A vertex can be either:
/// - **Root**: Has children, no parent
/// - **Internal**: Has parent and children, no label
/// - **Leaf**: Has parent and exactly one language, no children
///
/// # Invariants
/// - `index` is index in arena
/// - `branch_length` is non-negative (enforced by [BranchLength])
/// - `leaf_languages` of Root and Internal are sorted and equal the disjoint
///   union of the children's leaf languages once the tree is finalized
/// - Children are owned exclusively: each vertex index appears as child of
///   exactly one vertex
#[derive(PartialEq, Debug, Clone)]
pub enum Vertex {
    /// Root vertex of the tree
    Root {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Ordered child indices
        children: Vec<VertexIndex>,
        /// Length above the root; zero unless absorbed from a collapsed chain
        branch_length: BranchLength,
        /// Languages below this vertex (sorted)
        leaf_languages: Vec<LanguageIndex>,
    },
    /// Internal vertex, a clade of two or more languages
    Internal {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Ordered child indices
        children: Vec<VertexIndex>,
        /// Distance to parent
        branch_length: BranchLength,
        /// Languages below this vertex (sorted)
        leaf_languages: Vec<LanguageIndex>,
    },
    /// Leaf vertex, a single language
    Leaf {
        /// Index of this vertex in the tree arena
        index: VertexIndex,
        /// Index of the parent vertex
        parent: VertexIndex,
        /// Language of this leaf
        language: LanguageIndex,
        /// Distance to parent
        branch_length: BranchLength,
    },
}

impl Vertex {
    pub(crate) fn new_root(index: VertexIndex, leaf_languages: Vec<LanguageIndex>, branch_length: BranchLength) -> Self {
        Vertex::Root {
            index,
            children: Vec::new(),
            branch_length,
            leaf_languages,
        }
    }

    pub(crate) fn new_internal(
        index: VertexIndex,
        parent: VertexIndex,
        branch_length: BranchLength,
        leaf_languages: Vec<LanguageIndex>,
    ) -> Self {
        Vertex::Internal {
            index,
            parent,
            children: Vec::new(),
            branch_length,
            leaf_languages,
        }
    }

    pub(crate) fn new_leaf(index: VertexIndex, parent: VertexIndex, branch_length: BranchLength, language: LanguageIndex) -> Self {
        Vertex::Leaf {
            index,
            parent,
            language,
            branch_length,
        }
    }

    /// Returns the index of this vertex.
    pub fn index(&self) -> VertexIndex {
        match self {
            Vertex::Root { index, .. } | Vertex::Internal { index, .. } | Vertex::Leaf { index, .. } => *index,
        }
    }

    /// Returns the branch length of this vertex.
    pub fn branch_length(&self) -> BranchLength {
        match self {
            Vertex::Root { branch_length, .. }
            | Vertex::Internal { branch_length, .. }
            | Vertex::Leaf { branch_length, .. } => *branch_length,
        }
    }

    /// Returns the language if this is a leaf, else `None`.
    pub fn language(&self) -> Option<LanguageIndex> {
        match self {
            Vertex::Leaf { language, .. } => Some(*language),
            _ => None,
        }
    }

    /// Returns the (sorted) languages in the subtree of this vertex.
    pub fn leaf_languages(&self) -> &[LanguageIndex] {
        match self {
            Vertex::Root { leaf_languages, .. } | Vertex::Internal { leaf_languages, .. } => leaf_languages,
            Vertex::Leaf { language, .. } => std::slice::from_ref(language),
        }
    }

    /// Returns the ordered children; empty for a leaf.
    pub fn children(&self) -> &[VertexIndex] {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => children,
            Vertex::Leaf { .. } => &[],
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<VertexIndex>> {
        match self {
            Vertex::Root { children, .. } | Vertex::Internal { children, .. } => Some(children),
            Vertex::Leaf { .. } => None,
        }
    }

    /// Returns the parent index if this is a non-root vertex, else `None`.
    pub fn parent(&self) -> Option<VertexIndex> {
        match self {
            Vertex::Internal { parent, .. } | Vertex::Leaf { parent, .. } => Some(*parent),
            Vertex::Root { .. } => None,
        }
    }

    /// Returns `true` if this vertex is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(self, Vertex::Leaf { .. })
    }

    /// Returns `true` if this vertex is an internal vertex.
    pub fn is_internal(&self) -> bool {
        matches!(self, Vertex::Internal { .. })
    }

    /// Returns `true` if this vertex is a root.
    pub fn is_root(&self) -> bool {
        matches!(self, Vertex::Root { .. })
    }
}

// =#========================================================================#=
// BRANCH LENGTH
// =#========================================================================#=
/// Branch length in a classification tree, enforced non-negative.
///
/// Measured in units of resolution: the distance between the resolution a
/// clade was split off and the resolution it split itself.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct BranchLength(f64);

impl BranchLength {
    pub const ZERO: BranchLength = BranchLength(0.0);

    /// Creates a new branch length.
    ///
    /// # Panics
    /// Panics if `length` is negative or not finite.
    pub fn new(length: f64) -> Self {
        assert!(length >= 0.0, "Branch length must be non-negative, got {}", length);
        assert!(length.is_finite(), "Branch length must be finite, got {}", length);
        BranchLength(length)
    }
}

impl Deref for BranchLength {
    type Target = f64;
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl std::ops::Add for BranchLength {
    type Output = BranchLength;

    fn add(self, other: BranchLength) -> BranchLength {
        BranchLength(self.0 + other.0)
    }
}

impl fmt::Display for BranchLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
