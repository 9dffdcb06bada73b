//! Grape is a library to classify languages hierarchically from cognate
//! data.
//!
//! It builds a weighted similarity graph over the languages, sweeps the
//! resolution parameter of a community detection algorithm, and reconciles
//! the resulting sequence of partitions into a single rooted tree:
//!
//! ```text
//! cognate table ─► DistanceModel ─► WeightedGraph
//!                                      │
//!               ResolutionSearch ⇄ CommunityOracle
//!                                      │
//!                             PartitionHistory ─► TreeSynthesizer ─► ClassificationTree
//! ```
//!
//! Core functionality provided:
//! - [similarity]: pairwise language similarity under synonym and
//!   missing-data policies, and the complete [WeightedGraph](model::WeightedGraph)
//! - [community]: the [CommunityOracle](community::CommunityOracle)
//!   contract with a seedable Louvain and a deterministic greedy oracle
//! - [search]: fixed, dynamic and adaptive resolution strategies and the
//!   sweep driving them
//! - [synthesis]: frontier-based tree synthesis that tolerates non-nested
//!   partitions
//! - Tree model: [ClassificationTree] over a [LanguageMap], arena based,
//!   multifurcating, with branch lengths. See [crate::model].
//! - I/O: cognate table [reader](io), [Newick](newick) and [Nexus](nexus)
//!   writers
//!
//! Only data and configuration errors are fatal ([GrapeError]). Everything
//! else (failed oracle calls, a sweep running out of iterations, groups
//! never split) is recovered from and reported through
//! [Diagnostics](diagnostics::Diagnostics).
//!
//! # Usage patterns
//! 1. Quick API with a [GrapeConfig]: [classify_file] or
//!    [classify](pipeline::classify).
//! 2. Assemble the components yourself for full control, e.g. to plug in
//!    your own [CommunityOracle](community::CommunityOracle) or
//!    [ResolutionSearch](search::ResolutionSearch).
//!
//! ## Example Quick API
//! ```no_run
//! use grape::{GrapeConfig, NewickStyle, classify_file, to_newick};
//!
//! let classification = classify_file("cognates.tsv", &GrapeConfig::default())?;
//! println!("{}", to_newick(&classification.tree, &classification.languages, NewickStyle::Label));
//! # Ok::<(), grape::GrapeError>(())
//! ```
//!
//! ## Example Components
//! ```
//! use grape::community::GreedyModularity;
//! use grape::diagnostics::Diagnostics;
//! use grape::model::CognateData;
//! use grape::search::{FixedIncrement, ResolutionSweep};
//! use grape::similarity::{GraphBuilder, UnadjustedSimilarity};
//! use grape::synthesis::TreeSynthesizer;
//!
//! let data = CognateData::from_triples([
//!     ("Hittite", "water", "1"), ("Luwian", "water", "1"), ("Latin", "water", "2"),
//! ]);
//! let mut diagnostics = Diagnostics::new();
//! let graph = GraphBuilder::new(&UnadjustedSimilarity::new(&data)).build(&mut diagnostics)?;
//!
//! let mut strategy = FixedIncrement::new(0.0, 0.25, 40);
//! let sweep = ResolutionSweep::run(&graph, &mut GreedyModularity::new(), &mut strategy, &mut diagnostics)?;
//!
//! let tree = TreeSynthesizer::default().synthesize(&sweep.history, data.languages(), &mut diagnostics)?;
//! assert_eq!(tree.num_leaves(), 3);
//! # Ok::<(), grape::GrapeError>(())
//! ```

pub mod community;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod io;
pub mod model;
pub mod newick;
pub mod nexus;
pub mod pipeline;
pub mod search;
pub mod similarity;
pub mod synthesis;

pub use crate::config::GrapeConfig;
pub use crate::error::GrapeError;
pub use crate::model::{ClassificationTree, LanguageMap};
pub use crate::newick::{NewickStyle, to_newick};
pub use crate::pipeline::{Classification, classify};

use std::path::Path;

// ============================================================================
// Quick API
// ============================================================================
/// Reads a cognate table and classifies its languages.
///
/// Column names and delimiter are taken from `config.input`; see
/// [io::read_cognate_str] for the format and [pipeline::classify] for the
/// run itself.
///
/// # Errors
/// [GrapeError::Parsing] or [GrapeError::Io] if the table cannot be read,
/// otherwise as [pipeline::classify].
pub fn classify_file<P: AsRef<Path>>(path: P, config: &GrapeConfig) -> Result<Classification, GrapeError> {
    let data = io::read_cognate_file(path, &config.input)?;
    classify(&data, config)
}
