//! NEXUS output for classification trees.
//!
//! [NexusWriter] produces:
//! - the `#NEXUS` header
//! - a `TAXA` block listing all languages
//! - a `TREES` block with a 1-indexed `TRANSLATE` command and one
//!   `tree <name> = <Newick>;` command per tree
//!
//! Labels are escaped as in Newick; a label with an apostrophe is single
//! quoted with the apostrophe doubled, e.g. `Ma'di` becomes `'Ma''di'`.

mod defs;
mod writer;

pub use self::writer::NexusWriter;
