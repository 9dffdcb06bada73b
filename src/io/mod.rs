//! Input of cognate tables and label handling shared by the writers.
//!
//! This module provides:
//! - [read_cognate_file] / [read_cognate_str] - delimited table to [CognateData](crate::model::CognateData)
//! - [ParsingError] / [ParsingErrorType] - errors with line and context
//! - [utils] - label escaping for Newick and Nexus
//!
//! # Format
//! A header row naming the columns, then one row per observation:
//! ```text
//! Language    Parameter   Cognateset
//! Latin       hand        hand-1
//! Oscan       hand        hand-1
//! Latin       two         two-1
//! Oscan       two
//! ```
//! Column names and the delimiter are set in [InputConfig](crate::config::InputConfig).
//! Fields may be quoted with `"`, as in CSV. Input must be UTF-8; convert
//! other encodings (e.g. `iconv -f latin1 -t utf-8`) before reading.

pub mod parsing_error;
mod reader;
pub mod utils;

pub use self::parsing_error::{ParsingError, ParsingErrorType};
pub use self::reader::{read_cognate_file, read_cognate_str};
