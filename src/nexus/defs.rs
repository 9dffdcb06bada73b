//! Byte string constants for writing NEXUS files.

pub(crate) const NEXUS_HEADER: &[u8] = b"#NEXUS";

pub(crate) const BLOCK_BEGIN: &[u8] = b"Begin";

pub(crate) const BLOCK_END: &[u8] = b"End;";

// Taxa block
pub(crate) const TAXA: &[u8] = b"TAXA";

pub(crate) const DIMENSIONS: &[u8] = b"Dimensions";

pub(crate) const NTAX: &[u8] = b"ntax";

pub(crate) const TAXLABELS: &[u8] = b"Taxlabels";

// Trees block
pub(crate) const TREES: &[u8] = b"TREES";

pub(crate) const TRANSLATE: &[u8] = b"Translate";

pub(crate) const TREE: &[u8] = b"tree";

/// Name of unnamed trees, followed by their position
pub(crate) const DEFAULT_TREE_NAME: &str = "grape";
