use grape::model::{BranchLength, ClassificationTree, LanguageMap};
use grape::newick::{NewickStyle, to_newick, write_newick_file};
use std::fs;

fn bl(length: f64) -> BranchLength {
    BranchLength::new(length)
}

/// ((Czech:1,Polish:1):0.5,Old_Church_Slavonic:1.5);
fn slavic() -> (ClassificationTree, LanguageMap) {
    let languages = LanguageMap::from_labels(["Czech", "Polish", "Old Church Slavonic"]);
    let mut tree = ClassificationTree::new(3);
    let west = tree.add_internal(0, bl(0.5), vec![0, 2]);
    tree.add_leaf(west, bl(1.0), 0);
    tree.add_leaf(west, bl(1.0), 2);
    tree.add_leaf(0, bl(1.5), 1);
    (tree, languages)
}

#[test]
fn test_styles() {
    let (tree, languages) = slavic();

    assert_eq!(
        to_newick(&tree, &languages, NewickStyle::Label),
        "((Czech:1,Polish:1):0.5,Old_Church_Slavonic:1.5);"
    );
    assert_eq!(to_newick(&tree, &languages, NewickStyle::ZeroIndexed), "((0:1,2:1):0.5,1:1.5);");
    assert_eq!(to_newick(&tree, &languages, NewickStyle::OneIndexed), "((1:1,3:1):0.5,2:1.5);");
}

#[test]
fn test_multifurcation_and_root_length() {
    let languages = LanguageMap::from_labels(["Ma'di", "Greek (Ancient)", "Hittite", "Luwian"]);
    let mut tree = ClassificationTree::with_root(vec![0, 1, 2, 3], bl(0.25), 4);
    for language in 0..4 {
        tree.add_leaf(0, bl(2.0), language);
    }

    assert_eq!(
        to_newick(&tree, &languages, NewickStyle::Label),
        "('Greek (Ancient)':2,Hittite:2,Luwian:2,'Ma''di':2):0.25;"
    );
}

#[test]
fn test_ladderized_output() {
    let (mut tree, languages) = slavic();
    tree.ladderize();

    assert_eq!(
        to_newick(&tree, &languages, NewickStyle::Label),
        "(Old_Church_Slavonic:1.5,(Czech:1,Polish:1):0.5);"
    );
}

#[test]
fn test_write_newick_file() {
    let (tree, languages) = slavic();
    let mut ladderized = tree.clone();
    ladderized.ladderize();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trees.nwk");
    let file = fs::File::create(&path).unwrap();
    write_newick_file(file, &[tree, ladderized], &languages).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(
        lines,
        vec![
            "((Czech:1,Polish:1):0.5,Old_Church_Slavonic:1.5);",
            "(Old_Church_Slavonic:1.5,(Czech:1,Polish:1):0.5);",
        ]
    );
}

#[test]
fn test_write_no_trees() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.nwk");
    let file = fs::File::create(&path).unwrap();
    write_newick_file(file, &[], &LanguageMap::from_labels(["A"])).unwrap();

    assert!(fs::read_to_string(&path).unwrap().is_empty());
}
