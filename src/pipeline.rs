//! End-to-end classification: cognate data to tree.

use crate::community::oracle_for;
use crate::config::{GrapeConfig, GraphMethod};
use crate::diagnostics::Diagnostics;
use crate::error::GrapeError;
use crate::model::{ClassificationTree, CognateData, LanguageMap, PartitionHistory, WeightedGraph};
use crate::search::{ResolutionSweep, SearchOutcome};
use crate::similarity::{DistanceModel, GraphBuilder, PairwiseSimilarity, UnadjustedSimilarity};
use crate::synthesis::TreeSynthesizer;
use tracing::info;

/// Everything a classification run produced.
#[derive(Debug, Clone)]
pub struct Classification {
    pub tree: ClassificationTree,
    pub languages: LanguageMap,
    pub history: PartitionHistory,
    pub outcome: SearchOutcome,
    /// Oracle evaluations made by the sweep
    pub iterations: usize,
    pub diagnostics: Diagnostics,
}

/// Classifies the languages of `data`.
///
/// Validates `config`, builds the similarity graph, sweeps the resolution
/// and synthesizes the tree. Conditions that do not prevent a tree are
/// collected in [Classification::diagnostics].
///
/// # Errors
/// * [GrapeError::Configuration] for an invalid configuration
/// * [GrapeError::Data] for fewer than two languages
///
/// # Example
/// ```
/// use grape::config::{CommunityMethod, GrapeConfig};
/// use grape::model::CognateData;
/// use grape::pipeline::classify;
///
/// let data = CognateData::from_triples([
///     ("Danish", "eye", "1"), ("Swedish", "eye", "1"), ("Welsh", "eye", "2"), ("Breton", "eye", "2"),
///     ("Danish", "two", "3"), ("Swedish", "two", "3"), ("Welsh", "two", "4"), ("Breton", "two", "4"),
/// ]);
/// let mut config = GrapeConfig::default();
/// config.community.method = CommunityMethod::Greedy;
///
/// let classification = classify(&data, &config).unwrap();
/// assert_eq!(classification.tree.num_leaves(), 4);
/// assert!(classification.tree.is_valid());
/// ```
pub fn classify(data: &CognateData, config: &GrapeConfig) -> Result<Classification, GrapeError> {
    let n = data.num_languages();
    if n < 2 {
        return Err(GrapeError::Data(format!("cannot classify {} language(s); need at least 2", n)));
    }
    config.validate_for(n)?;

    let mut diagnostics = Diagnostics::new();
    let graph = build_graph(data, config, &mut diagnostics)?;

    let mut oracle = oracle_for(config.community.method, config.community.seed);
    let mut strategy = config.search.build_strategy(n)?;
    let sweep = ResolutionSweep::run(&graph, oracle.as_mut(), strategy.as_mut(), &mut diagnostics)?;

    let tree = TreeSynthesizer::new(config.synthesis.clone()).synthesize(
        &sweep.history,
        data.languages(),
        &mut diagnostics,
    )?;
    info!(
        languages = n,
        steps = sweep.history.len(),
        warnings = diagnostics.warnings().len(),
        "classification finished"
    );

    Ok(Classification {
        tree,
        languages: data.languages().clone(),
        history: sweep.history,
        outcome: sweep.outcome,
        iterations: sweep.iterations,
        diagnostics,
    })
}

/// Builds the similarity graph with the configured method.
pub fn build_graph(
    data: &CognateData,
    config: &GrapeConfig,
    diagnostics: &mut Diagnostics,
) -> Result<WeightedGraph, GrapeError> {
    let graph_config = &config.graph;
    match graph_config.method {
        GraphMethod::Adjusted => {
            let model = DistanceModel::new(
                data,
                graph_config.synonym_policy(),
                graph_config.missing_data_policy(),
                graph_config.proximity_weight,
                graph_config.sharing_factor,
            );
            build_with(&model, graph_config.prune_threshold, diagnostics)
        }
        GraphMethod::Unadjusted => {
            build_with(&UnadjustedSimilarity::new(data), graph_config.prune_threshold, diagnostics)
        }
    }
}

fn build_with<S: PairwiseSimilarity>(
    similarity: &S,
    prune_threshold: Option<f64>,
    diagnostics: &mut Diagnostics,
) -> Result<WeightedGraph, GrapeError> {
    let builder = GraphBuilder::new(similarity);
    match prune_threshold {
        Some(threshold) => builder.with_prune_threshold(threshold).build(diagnostics),
        None => builder.build(diagnostics),
    }
}
