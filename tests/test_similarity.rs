use grape::config::{MissingDataPolicy, SynonymPolicy};
use grape::diagnostics::Diagnostics;
use grape::model::{CognateData, WeightedGraph};
use grape::similarity::{DistanceModel, GraphBuilder, PairwiseSimilarity, UnadjustedSimilarity};

const TOLERANCE: f64 = 1e-12;

/// Four languages over three concepts; A has a synonym for "two",
/// C and D share no attested concept.
fn sample_data() -> CognateData {
    CognateData::from_triples([
        ("A", "ear", "ear-2"),
        ("A", "eye", "eye-1"),
        ("A", "two", "two-5"),
        ("A", "two", "two-6"),
        ("B", "ear", "ear-3"),
        ("B", "eye", "eye-1"),
        ("B", "two", "two-5"),
        ("C", "two", "two-7"),
        ("D", "eye", "eye-1"),
    ])
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < TOLERANCE, "expected {}, got {}", expected, actual);
}

fn raw(data: &CognateData, synonyms: SynonymPolicy, missing: MissingDataPolicy) -> DistanceModel<'_> {
    DistanceModel::new(data, synonyms, missing, 1.0, 0.0)
}

#[test]
fn test_synonym_policies() {
    let data = sample_data();
    let (a, b) = (0, 1);

    let average = raw(&data, SynonymPolicy::Average, MissingDataPolicy::MaxDistance);
    assert_close(average.similarity(a, b), 0.5);

    let min = raw(&data, SynonymPolicy::Min, MissingDataPolicy::MaxDistance);
    assert_close(min.similarity(a, b), 1.0 / 3.0);

    let max = raw(&data, SynonymPolicy::Max, MissingDataPolicy::MaxDistance);
    assert_close(max.similarity(a, b), 2.0 / 3.0);
}

#[test]
fn test_missing_data_policies() {
    let data = sample_data();
    let (a, c) = (0, 2);

    let max_distance = raw(&data, SynonymPolicy::Average, MissingDataPolicy::MaxDistance);
    assert_close(max_distance.similarity(a, c), 0.0);

    let identical = raw(&data, SynonymPolicy::Average, MissingDataPolicy::Identical);
    assert_close(identical.similarity(a, c), 2.0 / 3.0);

    let ignore = raw(&data, SynonymPolicy::Average, MissingDataPolicy::Ignore);
    assert_close(ignore.similarity(a, c), 0.0);
    // Only "eye" is comparable
    assert_close(ignore.similarity(0, 3), 1.0);
}

#[test]
fn test_ignore_without_comparable_concept_is_undefined() {
    let data = sample_data();
    let ignore = raw(&data, SynonymPolicy::Average, MissingDataPolicy::Ignore);

    assert_eq!(ignore.score(2, 3), None);
    assert_eq!(ignore.similarity(2, 3), 0.0);
}

#[test]
fn test_proximity_and_sharing_mix() {
    let data = sample_data();
    let model = DistanceModel::new(&data, SynonymPolicy::Average, MissingDataPolicy::MaxDistance, 0.8, 0.2);

    assert_close(model.similarity(0, 1), 0.5);
    assert_close(model.similarity(0, 2), 0.2);
}

const SYNONYM_POLICIES: [SynonymPolicy; 3] = [SynonymPolicy::Average, SynonymPolicy::Min, SynonymPolicy::Max];
const MISSING_POLICIES: [MissingDataPolicy; 3] = [
    MissingDataPolicy::MaxDistance,
    MissingDataPolicy::Identical,
    MissingDataPolicy::Ignore,
];

#[test]
fn test_similarity_is_symmetric() {
    let data = sample_data();
    let unadjusted = UnadjustedSimilarity::new(&data);

    for synonyms in SYNONYM_POLICIES {
        for missing in MISSING_POLICIES {
            let model = DistanceModel::new(&data, synonyms, missing, 0.8, 0.2);
            for i in 0..4 {
                for j in 0..4 {
                    assert_eq!(model.score(i, j), model.score(j, i), "{:?}/{:?} at ({}, {})", synonyms, missing, i, j);
                }
            }
        }
    }
    for i in 0..4 {
        for j in 0..4 {
            assert_eq!(unadjusted.score(i, j), unadjusted.score(j, i));
        }
    }
}

#[test]
fn test_adjusted_similarity_stays_in_unit_range() {
    let data = sample_data();

    for (proximity, sharing) in [(0.8, 0.2), (0.2, 0.8), (1.0, 0.0), (0.5, 0.5)] {
        for synonyms in SYNONYM_POLICIES {
            for missing in MISSING_POLICIES {
                let model = DistanceModel::new(&data, synonyms, missing, proximity, sharing);
                for i in 0..4 {
                    for j in 0..4 {
                        let s = model.similarity(i, j);
                        assert!(
                            (0.0..=1.0).contains(&s),
                            "{} outside [0, 1] for {:?}/{:?} with weights ({}, {}) at ({}, {})",
                            s, synonyms, missing, proximity, sharing, i, j
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_unadjusted() {
    let data = sample_data();
    let unadjusted = UnadjustedSimilarity::new(&data);

    assert_close(unadjusted.similarity(0, 1), 2.0 / 3.0);
    assert_close(unadjusted.similarity(0, 2), 0.0);
    assert_eq!(unadjusted.score(2, 3), None);
}

#[test]
fn test_graph_builder_reports_undefined_weights() {
    let data = sample_data();
    let model = raw(&data, SynonymPolicy::Average, MissingDataPolicy::Ignore);
    let mut diagnostics = Diagnostics::new();

    let graph = GraphBuilder::new(&model).build(&mut diagnostics).unwrap();

    assert_eq!(graph.num_vertices(), 4);
    assert_eq!(graph.weight(2, 3), 0.0);
    assert_close(graph.weight(0, 1), 0.5);
    assert_close(graph.weight(1, 0), 0.5);
    assert_eq!(diagnostics.count("undefined-weight"), 1);
}

#[test]
fn test_graph_builder_prunes() {
    let data = sample_data();
    let model = DistanceModel::new(&data, SynonymPolicy::Average, MissingDataPolicy::MaxDistance, 0.8, 0.2);
    let mut diagnostics = Diagnostics::new();

    let graph = GraphBuilder::new(&model)
        .with_prune_threshold(0.2)
        .build(&mut diagnostics)
        .unwrap();

    assert_eq!(graph.weight(0, 2), 0.0);
    assert_close(graph.weight(0, 1), 0.5);
    assert!(diagnostics.is_empty());
}

#[test]
fn test_graph_builder_needs_two_languages() {
    let data = CognateData::from_triples([("A", "eye", "1")]);
    let mut diagnostics = Diagnostics::new();

    assert!(GraphBuilder::new(&UnadjustedSimilarity::new(&data)).build(&mut diagnostics).is_err());
}

#[test]
fn test_weighted_graph_accessors() {
    let mut graph = WeightedGraph::new(3);
    graph.set_weight(0, 1, 2.0);
    graph.set_weight(1, 2, 0.5);

    assert_eq!(graph.weight(0, 0), 0.0);
    assert_eq!(graph.strength(1), 2.5);
    assert_eq!(graph.total_weight(), 2.5);
    assert_eq!(graph.num_edges(0.0), 2);
    assert_eq!(graph.neighbors(1).collect::<Vec<_>>(), vec![(0, 2.0), (2, 0.5)]);
    assert_eq!(graph.pairs().count(), 3);
}

#[test]
#[should_panic(expected = "Self-loops")]
fn test_weighted_graph_rejects_self_loop() {
    WeightedGraph::new(2).set_weight(1, 1, 1.0);
}

#[test]
#[should_panic(expected = "finite and non-negative")]
fn test_weighted_graph_rejects_negative_weight() {
    WeightedGraph::new(2).set_weight(0, 1, -0.5);
}
