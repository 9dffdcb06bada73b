//! Provides the classification tree representation.
//!
//! Provides core data structures for representing a synthesized classification:
//! * [ClassificationTree] - Main tree structure using the arena pattern
//! * [VertexIndex] as type used to index vertices in tree
//! * Pre-order and post-order iterators

use crate::model::language_map::{LanguageIndex, LanguageMap};
use crate::model::vertex::{BranchLength, Vertex};

/// Index of a vertex in a tree (arena).
pub type VertexIndex = usize;

// =$========================================================================$=
// TREE
// =$========================================================================$=
/// A rooted, multifurcating classification tree represented using the arena
/// pattern on [Vertex].
///
/// Vertices are stored in a contiguous vector and referenced by
/// [VertexIndex]. Each vertex is owned by exactly one parent through its
/// position in the parent's ordered child list.
///
/// # Structure
/// - The root is created with the tree and covers all languages.
/// - Children are added top-down with [ClassificationTree::add_internal]
///   and [ClassificationTree::add_leaf].
/// - Every vertex records the languages of its subtree and a non-negative
///   [BranchLength].
///
/// Test validity with [`ClassificationTree::is_valid()`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationTree {
    /// Size of the language universe this tree is over
    num_languages: usize,

    /// Vertices of this tree (arena pattern)
    vertices: Vec<Vertex>,

    /// Index of the root of this tree
    root_index: VertexIndex,
}

// ============================================================================
// New, Getters / Accessors, etc. (pub)
// ============================================================================
impl ClassificationTree {
    /// Creates a new tree whose root covers all of `0..num_languages`.
    pub fn new(num_languages: usize) -> Self {
        Self::with_root((0..num_languages).collect(), BranchLength::ZERO, num_languages)
    }

    /// Creates a new tree with a root covering `leaf_languages`.
    ///
    /// # Arguments
    /// * `leaf_languages` - Languages below the root
    /// * `branch_length` - Length above the root
    /// * `num_languages` - Size of the language universe
    pub fn with_root(mut leaf_languages: Vec<LanguageIndex>, branch_length: BranchLength, num_languages: usize) -> Self {
        leaf_languages.sort_unstable();
        let mut vertices = Vec::with_capacity(2 * num_languages.max(1));
        vertices.push(Vertex::new_root(0, leaf_languages, branch_length));
        ClassificationTree {
            num_languages,
            vertices,
            root_index: 0,
        }
    }

    /// Adds an internal vertex as last child of `parent`, returning its index.
    ///
    /// # Panics
    /// Panics if `parent` is out of bounds or a leaf.
    pub fn add_internal(
        &mut self,
        parent: VertexIndex,
        branch_length: BranchLength,
        mut leaf_languages: Vec<LanguageIndex>,
    ) -> VertexIndex {
        leaf_languages.sort_unstable();
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_internal(index, parent, branch_length, leaf_languages));
        self.attach(parent, index);
        index
    }

    /// Adds a leaf as last child of `parent`, returning its index.
    ///
    /// # Panics
    /// Panics if `parent` is out of bounds or a leaf.
    pub fn add_leaf(&mut self, parent: VertexIndex, branch_length: BranchLength, language: LanguageIndex) -> VertexIndex {
        let index = self.vertices.len();
        self.vertices
            .push(Vertex::new_leaf(index, parent, branch_length, language));
        self.attach(parent, index);
        index
    }

    fn attach(&mut self, parent: VertexIndex, child: VertexIndex) {
        match self.vertices[parent].children_mut() {
            Some(children) => children.push(child),
            None => panic!("Cannot attach vertex {} to leaf {}", child, parent),
        }
    }

    /// Returns a reference to the root vertex.
    pub fn root(&self) -> &Vertex {
        &self[self.root_index]
    }

    /// Returns the index of the root.
    pub fn root_index(&self) -> VertexIndex {
        self.root_index
    }

    /// Returns a reference to the vertex at the given index.
    ///
    /// # Panics
    /// Panics if `index` is out of bounds.
    pub fn vertex(&self, index: VertexIndex) -> &Vertex {
        &self[index]
    }

    /// Returns the size of the language universe of this tree.
    pub fn num_languages(&self) -> usize {
        self.num_languages
    }

    /// Returns the number of leaves in this tree.
    pub fn num_leaves(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_leaf()).count()
    }

    /// Returns the number of internal vertices in this tree (excluding the root).
    pub fn num_internal(&self) -> usize {
        self.vertices.iter().filter(|&v| v.is_internal()).count()
    }

    /// Returns the number of vertices in this tree.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the index of the leaf holding `language`, if any.
    pub fn leaf_for(&self, language: LanguageIndex) -> Option<VertexIndex> {
        self.vertices
            .iter()
            .find(|v| v.language() == Some(language))
            .map(|v| v.index())
    }

    /// Returns the sum of all branch lengths below the root.
    pub fn total_branch_length(&self) -> f64 {
        self.vertices
            .iter()
            .filter(|v| !v.is_root())
            .map(|v| *v.branch_length())
            .sum()
    }

    /// Returns whether some non-leaf vertex has exactly one child.
    pub fn has_unary_vertices(&self) -> bool {
        self.vertices
            .iter()
            .any(|v| !v.is_leaf() && v.children().len() == 1)
    }

    /// Returns the distance from the root to the given vertex.
    pub fn depth_of(&self, index: VertexIndex) -> f64 {
        let mut depth = 0.0;
        let mut current = &self[index];
        while let Some(parent) = current.parent() {
            depth += *current.branch_length();
            current = &self[parent];
        }
        depth
    }

    /// Returns the most recent common ancestor of the given languages,
    /// or `None` if `languages` is empty or holds a language not in this tree.
    pub fn mrca(&self, languages: &[LanguageIndex]) -> Option<VertexIndex> {
        let covers = |v: &Vertex| {
            languages
                .iter()
                .all(|l| v.leaf_languages().binary_search(l).is_ok())
        };

        if languages.is_empty() || !covers(self.root()) {
            return None;
        }

        let mut current = self.root_index;
        'descend: loop {
            for &child in self[current].children() {
                if covers(&self[child]) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Returns the path length between the leaves of languages `a` and `b`.
    pub fn patristic_distance(&self, a: LanguageIndex, b: LanguageIndex) -> Option<f64> {
        let leaf_a = self.leaf_for(a)?;
        let leaf_b = self.leaf_for(b)?;
        let ancestor = self.mrca(&[a, b])?;
        let ancestor_depth = self.depth_of(ancestor);
        Some(self.depth_of(leaf_a) + self.depth_of(leaf_b) - 2.0 * ancestor_depth)
    }

    /// Reorders children so that smaller clades come first,
    /// ties broken by smallest language.
    pub fn ladderize(&mut self) {
        let keys: Vec<(usize, LanguageIndex)> = self
            .vertices
            .iter()
            .map(|v| (v.leaf_languages().len(), v.leaf_languages().first().copied().unwrap_or(0)))
            .collect();

        for vertex in self.vertices.iter_mut() {
            if let Some(children) = vertex.children_mut() {
                children.sort_by_key(|&c| keys[c]);
            }
        }
    }
}

// ============================================================================
// Validation (pub)
// ============================================================================
impl ClassificationTree {
    /// Validates the tree structure and the language invariants.
    ///
    /// Checks:
    /// - Root index is valid and points to the only Root vertex
    /// - All vertex indices match their position in the arena
    /// - All child indices are valid, point back to their parent and are
    ///   owned by exactly one parent
    /// - Every non-leaf vertex has children whose leaf languages are
    ///   pairwise disjoint and together equal its own leaf languages
    /// - Every language appears as exactly one leaf, and the root covers
    ///   exactly the language universe
    ///
    /// # Returns
    /// `true` if tree is valid, `false` otherwise
    pub fn is_valid(&self) -> bool {
        if self.root_index >= self.vertices.len() || !self.vertices[self.root_index].is_root() {
            return false;
        }

        let mut owners = vec![0usize; self.vertices.len()];
        let mut leaf_count = vec![0usize; self.num_languages];

        for (index, vertex) in self.vertices.iter().enumerate() {
            // Check vertex index matches its arena position
            if vertex.index() != index {
                return false;
            }

            // Check there is only one root
            if vertex.is_root() && index != self.root_index {
                return false;
            }

            if let Some(language) = vertex.language() {
                if language >= self.num_languages {
                    return false;
                }
                leaf_count[language] += 1;
                continue;
            }

            let children = vertex.children();
            if children.is_empty() {
                return false;
            }

            let mut covered: Vec<LanguageIndex> = Vec::with_capacity(vertex.leaf_languages().len());
            for &child in children {
                if child >= self.vertices.len() || self.vertices[child].parent() != Some(index) {
                    return false;
                }
                owners[child] += 1;
                covered.extend_from_slice(self.vertices[child].leaf_languages());
            }

            // Sorted concatenation equals own set iff children are disjoint and cover it
            covered.sort_unstable();
            if covered != vertex.leaf_languages() {
                return false;
            }
        }

        // Every non-root vertex owned exactly once
        for (index, &count) in owners.iter().enumerate() {
            if (index == self.root_index && count != 0) || (index != self.root_index && count != 1) {
                return false;
            }
        }

        let all_languages: Vec<LanguageIndex> = (0..self.num_languages).collect();
        leaf_count.iter().all(|&c| c == 1) && self.root().leaf_languages() == all_languages.as_slice()
    }
}

impl std::ops::Index<VertexIndex> for ClassificationTree {
    type Output = Vertex;

    fn index(&self, index: VertexIndex) -> &Self::Output {
        &self.vertices[index]
    }
}

// ============================================================================
// Printing (pub)
// ============================================================================
impl ClassificationTree {
    /// Renders a visual representation of the tree.
    ///
    /// # Arguments
    /// * `languages` - Map to show leaf names
    ///
    /// # Example Output
    /// ```text
    /// Tree with 3 leaves (5 vertices total):
    /// [0] Root
    ///   ├─ [1] Internal (branch: 0.400)
    ///   │   ├─ [3] Leaf "A" (branch: 0.500)
    ///   │   └─ [4] Leaf "B" (branch: 0.500)
    ///   └─ [2] Leaf "C" (branch: 0.400)
    /// ```
    pub fn render_ascii(&self, languages: &LanguageMap) -> String {
        let mut out = format!(
            "Tree with {} leaves ({} vertices total):\n",
            self.num_leaves(),
            self.vertices.len()
        );
        out.push_str(&format!("[{}] Root\n", self.root_index));

        let children = self.root().children();
        for (i, &child) in children.iter().enumerate() {
            self.render_vertex(&mut out, child, "  ", i + 1 == children.len(), languages);
        }
        out
    }

    /// Helper function to recursively render a vertex and its children.
    fn render_vertex(&self, out: &mut String, idx: VertexIndex, prefix: &str, is_last: bool, languages: &LanguageMap) {
        let vertex = &self.vertices[idx];
        let connector = if is_last { "└─ " } else { "├─ " };
        let branch_str = format!("(branch: {:.3})", *vertex.branch_length());

        if let Some(language) = vertex.language() {
            let label = languages.get_label(language).unwrap_or("?");
            out.push_str(&format!("{}{}[{}] Leaf \"{}\" {}\n", prefix, connector, idx, label, branch_str));
        } else {
            out.push_str(&format!("{}{}[{}] Internal {}\n", prefix, connector, idx, branch_str));

            let new_prefix = format!("{}{}   ", prefix, if is_last { " " } else { "│" });
            let children = vertex.children();
            for (i, &child) in children.iter().enumerate() {
                self.render_vertex(out, child, &new_prefix, i + 1 == children.len(), languages);
            }
        }
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl ClassificationTree {
    /// Returns an iterator over the tree in post-order (children before parents).
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the tree in pre-order (parents before children).
    ///
    /// Children are visited in their stored order.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Returns an iterator over the leaves, left to right.
    pub fn leaves(&self) -> impl Iterator<Item = &Vertex> {
        self.pre_order_iter().filter(|v| v.is_leaf())
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PostOrderIter<'a> {
    tree: &'a ClassificationTree,
    stack: Vec<(VertexIndex, bool)>, // (index, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a ClassificationTree) -> Self {
        PostOrderIter {
            tree,
            stack: vec![(tree.root_index, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((index, children_visited)) = self.stack.pop() {
            let vertex = &self.tree[index];

            if children_visited || vertex.is_leaf() {
                return Some(vertex);
            }

            self.stack.push((index, true));
            // Push children in reverse, so first child is processed first
            for &child in vertex.children().iter().rev() {
                self.stack.push((child, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PreOrderIter<'a> {
    tree: &'a ClassificationTree,
    stack: Vec<VertexIndex>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a ClassificationTree) -> Self {
        PreOrderIter {
            tree,
            stack: vec![tree.root_index],
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a Vertex;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let vertex = &self.tree[index];

        for &child in vertex.children().iter().rev() {
            self.stack.push(child);
        }

        Some(vertex)
    }
}
