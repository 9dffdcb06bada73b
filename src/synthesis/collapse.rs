use crate::model::{BranchLength, ClassificationTree, VertexIndex};

/// Returns a copy of `tree` without unary vertices.
///
/// Every non-leaf vertex with exactly one child is merged into that child,
/// whose branch length grows by the removed vertex's length. A unary root
/// is replaced by its child, unless that child is a leaf. The result is
/// stored in a fresh, compacted arena; child order is preserved.
pub fn collapse_unary(tree: &ClassificationTree) -> ClassificationTree {
    let mut root = tree.root_index();
    let mut root_length = tree.root().branch_length();
    while let [only] = tree[root].children() {
        if tree[*only].is_leaf() {
            break;
        }
        root = *only;
        root_length = root_length + tree[root].branch_length();
    }

    let mut collapsed =
        ClassificationTree::with_root(tree[root].leaf_languages().to_vec(), root_length, tree.num_languages());

    // (vertex in `tree`, its counterpart in `collapsed`)
    let mut stack: Vec<(VertexIndex, VertexIndex)> = vec![(root, collapsed.root_index())];
    while let Some((source, target)) = stack.pop() {
        for &child in tree[source].children() {
            let (end, length) = follow_chain(tree, child);
            let vertex = &tree[end];
            match vertex.language() {
                Some(language) => {
                    collapsed.add_leaf(target, length, language);
                }
                None => {
                    let copy = collapsed.add_internal(target, length, vertex.leaf_languages().to_vec());
                    stack.push((end, copy));
                }
            }
        }
    }

    collapsed
}

/// Descends from `start` through unary vertices, summing branch lengths.
fn follow_chain(tree: &ClassificationTree, start: VertexIndex) -> (VertexIndex, BranchLength) {
    let mut current = start;
    let mut length = tree[start].branch_length();
    while let [only] = tree[current].children() {
        current = *only;
        length = length + tree[current].branch_length();
    }
    (current, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bl(length: f64) -> BranchLength {
        BranchLength::new(length)
    }

    #[test]
    fn test_merges_unary_chain() {
        // root -> x(0.5) -> y(0.25) -> {0, 1}, root -> 2
        let mut tree = ClassificationTree::new(3);
        let x = tree.add_internal(0, bl(0.5), vec![0, 1]);
        let y = tree.add_internal(x, bl(0.25), vec![0, 1]);
        tree.add_leaf(y, bl(1.0), 0);
        tree.add_leaf(y, bl(1.0), 1);
        tree.add_leaf(0, bl(2.0), 2);
        assert!(tree.has_unary_vertices());

        let collapsed = collapse_unary(&tree);
        assert!(collapsed.is_valid());
        assert!(!collapsed.has_unary_vertices());
        assert_eq!(collapsed.num_vertices(), 5);

        let merged = collapsed.root().children()[0];
        assert_eq!(collapsed[merged].leaf_languages(), &[0, 1]);
        assert_eq!(*collapsed[merged].branch_length(), 0.75);
        assert_eq!(collapsed.total_branch_length(), tree.total_branch_length());
    }

    #[test]
    fn test_unary_root_is_replaced() {
        let mut tree = ClassificationTree::new(2);
        let only = tree.add_internal(0, bl(0.5), vec![0, 1]);
        tree.add_leaf(only, bl(1.0), 0);
        tree.add_leaf(only, bl(1.0), 1);

        let collapsed = collapse_unary(&tree);
        assert!(collapsed.is_valid());
        assert_eq!(collapsed.num_vertices(), 3);
        assert_eq!(*collapsed.root().branch_length(), 0.5);
    }

    #[test]
    fn test_unary_vertex_above_leaf() {
        let mut tree = ClassificationTree::new(2);
        let a = tree.add_internal(0, bl(0.5), vec![0]);
        tree.add_leaf(a, bl(0.25), 0);
        tree.add_leaf(0, bl(1.0), 1);

        let collapsed = collapse_unary(&tree);
        assert!(collapsed.is_valid());
        let leaf = collapsed.leaf_for(0).unwrap();
        assert_eq!(*collapsed[leaf].branch_length(), 0.75);
        assert_eq!(collapsed.num_vertices(), 3);
    }
}
