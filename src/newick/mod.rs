//! Newick output for classification trees.
//!
//! # Format
//! Multifurcating Newick with the following grammar:
//! * `tree ::= vertex ';'`
//! * `vertex ::= leaf | internal_vertex`
//! * `internal_vertex ::= '(' vertex (',' vertex)* ')' [branch_length]`
//! * `leaf ::= label branch_length`
//! * `branch_length ::= ':' number`
//!
//! Labels with spaces get underscores; labels with Newick delimiters or
//! quotes are single quoted (see [escape_label](crate::io::utils::escape_label)).
//!
//! # API
//! * [to_newick] - one tree as string, in a chosen [NewickStyle]
//! * [write_newick_file] - several trees, one per line

pub mod writer;

pub use self::writer::{NewickStyle, to_newick, write_newick_file};
