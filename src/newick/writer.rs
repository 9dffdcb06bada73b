//! Newick writing for [ClassificationTree]s.

use crate::io::utils::escape_label;
use crate::model::{ClassificationTree, LanguageMap, VertexIndex};
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Style for serializing a tree to Newick format,
/// controlling how languages are represented in the output string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NewickStyle {
    /// Use escaped language labels from the [LanguageMap]
    #[default]
    Label,
    /// Use 0-based indices (0, 1, 2, ...)
    ZeroIndexed,
    /// Use 1-based indices (1, 2, 3, ...) (as in Nexus files)
    OneIndexed,
}

/// Writes given trees to a file in Newick format, one tree per line.
///
/// # Arguments
/// * `file` - The file to write to
/// * `trees` - Trees to write
/// * `languages` - Language mapping shared by all trees
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file(file: File, trees: &[ClassificationTree], languages: &LanguageMap) -> io::Result<()> {
    let Some(first) = trees.first() else {
        return Ok(());
    };

    let mut writer = BufWriter::new(file);
    let estimated_capacity = estimate_newick_len(NewickStyle::Label, first, languages);
    for tree in trees {
        let newick = to_newick_with_capacity(NewickStyle::Label, tree, languages, estimated_capacity);
        writer.write_all(newick.as_bytes())?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

/// Returns the Newick representation of a tree with closing semicolon.
///
/// Vertices may have any number of children, written in their stored
/// order. Every non-root vertex gets a `:length`; the root only if its
/// branch length is non-zero.
///
/// # Arguments
/// * `tree` - The tree to convert
/// * `languages` - Labels for [NewickStyle::Label]
/// * `style` - The [NewickStyle] used to represent leaves
///
/// # Example
/// ```
/// use grape::model::{BranchLength, ClassificationTree, LanguageMap};
/// use grape::newick::{NewickStyle, to_newick};
///
/// let languages = LanguageMap::from_labels(["Czech", "Polish", "Old Church Slavonic"]);
/// let mut tree = ClassificationTree::new(3);
/// let west = tree.add_internal(0, BranchLength::new(0.5), vec![0, 2]);
/// tree.add_leaf(west, BranchLength::new(1.0), 0);
/// tree.add_leaf(west, BranchLength::new(1.0), 2);
/// tree.add_leaf(0, BranchLength::new(1.5), 1);
///
/// assert_eq!(
///     to_newick(&tree, &languages, NewickStyle::Label),
///     "((Czech:1,Polish:1):0.5,Old_Church_Slavonic:1.5);"
/// );
/// assert_eq!(to_newick(&tree, &languages, NewickStyle::OneIndexed), "((1:1,3:1):0.5,2:1.5);");
/// ```
pub fn to_newick(tree: &ClassificationTree, languages: &LanguageMap, style: NewickStyle) -> String {
    let estimated_capacity = estimate_newick_len(style, tree, languages);
    to_newick_with_capacity(style, tree, languages, estimated_capacity)
}

/// Returns the Newick representation of a tree with pre-allocated capacity.
///
/// Allows estimating the capacity once when writing many similar trees.
pub(crate) fn to_newick_with_capacity(
    style: NewickStyle,
    tree: &ClassificationTree,
    languages: &LanguageMap,
    estimated_capacity: usize,
) -> String {
    // Recursive helper for building the Newick string
    fn build_newick(
        tree: &ClassificationTree,
        newick: &mut String,
        index: VertexIndex,
        style: NewickStyle,
        languages: &LanguageMap,
    ) {
        let vertex = &tree[index];

        if let Some(language) = vertex.language() {
            match style {
                NewickStyle::Label => match languages.get_label(language) {
                    Some(label) => newick.push_str(&escape_label(label)),
                    None => newick.push_str(&language.to_string()),
                },
                NewickStyle::ZeroIndexed => newick.push_str(&language.to_string()),
                NewickStyle::OneIndexed => newick.push_str(&(language + 1).to_string()),
            }
        } else {
            newick.push('(');
            for (i, &child) in vertex.children().iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                build_newick(tree, newick, child, style, languages);
            }
            newick.push(')');
        }

        let branch_length = vertex.branch_length();
        if !vertex.is_root() || *branch_length > 0.0 {
            newick.push(':');
            newick.push_str(&branch_length.to_string());
        }
    }

    let mut newick = String::with_capacity(estimated_capacity);
    build_newick(tree, &mut newick, tree.root_index(), style, languages);
    newick.push(';');
    newick
}

/// Estimates the length of a Newick string for a given tree.
///
/// Accounts for structure, labels/indices, and branch lengths, to
/// pre-allocate string capacity.
pub(crate) fn estimate_newick_len(style: NewickStyle, tree: &ClassificationTree, languages: &LanguageMap) -> usize {
    // Per non-leaf vertex: "()" plus one ',' per extra child
    const INTERNAL_VERTEX_CHARS: usize = 2;
    // Branch lengths: ~20 chars each (e.g., ":0.009529961339106089")
    const BRANCH_LENGTH_CHARS: usize = 20;

    let num_non_leaves = tree.num_vertices() - tree.num_leaves();
    let structure_capacity = num_non_leaves * INTERNAL_VERTEX_CHARS + tree.num_vertices();

    let num_leaves = tree.num_leaves();
    let label_capacity = match style {
        NewickStyle::Label => languages.labels().iter().map(|s| escape_label(s).len()).sum(),
        NewickStyle::ZeroIndexed => calculate_index_digit_capacity(num_leaves, true),
        NewickStyle::OneIndexed => calculate_index_digit_capacity(num_leaves, false),
    };

    let branch_capacity = tree.num_vertices() * BRANCH_LENGTH_CHARS;

    structure_capacity + label_capacity + branch_capacity + BUFFER_CHARS
}

/// Calculates the total number of characters needed to represent all indices.
///
/// # Examples
/// - 14 leaves, 1-indexed (1-14): 9 + 5 * 2 = 19 chars
/// - 10 leaves, 0-indexed (0-9): 10 chars
fn calculate_index_digit_capacity(count: usize, zero_indexed: bool) -> usize {
    let (first, last) = if zero_indexed { (0, count) } else { (1, count + 1) };
    (first..last).map(num_digits).sum()
}

fn num_digits(mut value: usize) -> usize {
    let mut digits = 1;
    while value >= 10 {
        value /= 10;
        digits += 1;
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_digit_capacity() {
        assert_eq!(calculate_index_digit_capacity(0, true), 0);
        assert_eq!(calculate_index_digit_capacity(10, true), 10);
        assert_eq!(calculate_index_digit_capacity(14, false), 19);
        assert_eq!(calculate_index_digit_capacity(102, false), 9 + 180 + 9);
    }
}
