//! Data model for cognate data, similarity graphs, partitions and
//! classification trees.
//!
//! # Flow
//! Data moves through the model types in one direction:
//!
//! | Type | Role |
//! |------|------|
//! | [CognateData] | Cognate sets per (language, concept), loaded once |
//! | [WeightedGraph] | Complete similarity graph over all languages |
//! | [Partition] / [PartitionStep] | Communities found at one resolution |
//! | [PartitionHistory] | Steps ordered by increasing resolution |
//! | [ClassificationTree] | Synthesized tree, leaves are languages |
//!
//! # Language handling
//! All types share one index space given by [LanguageMap]. The map is sorted
//! by label, so index order is label order.
//!
//! # Tree representation
//! [ClassificationTree] uses the arena pattern to store [Vertex] nodes. Each
//! vertex is either a `Root`, `Internal`, or `Leaf`, referenced by
//! [VertexIndex], and trees may be multifurcating.

pub mod cognates;
pub mod graph;
pub mod language_map;
pub mod partition;
pub mod tree;
pub mod vertex;

pub use cognates::{CognateData, CognateIndex, ConceptIndex};
pub use graph::{GraphVertex, WeightedGraph};
pub use language_map::{LanguageIndex, LanguageMap};
pub use partition::{Partition, PartitionError, PartitionHistory, PartitionStep};
pub use tree::{ClassificationTree, VertexIndex};
pub use vertex::{BranchLength, Vertex};
