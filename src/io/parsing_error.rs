//! Error types for reading cognate tables.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for
//! representing and reporting errors met while reading delimited input.

use thiserror::Error;

/// Default length of context provided by errors from the reader
pub(crate) const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================#=
/// Error types that can occur while reading a cognate table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParsingErrorType {
    #[error("IO error - {0}")]
    IoError(String),
    #[error("Input contains no header row or no data rows")]
    EmptyInput,
    #[error("Header has no column named '{0}'")]
    MissingColumn(String),
    #[error("Row has no value for column '{0}'")]
    MissingField(String),
    #[error("Row has an unclosed double quote")]
    UnclosedQuote,
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================#=
/// Parsing error with contextual information (line and start of its content).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at line {line}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    line: usize,
    context: String,
}

impl ParsingError {
    /// Create a ParsingError for a line (1-based) and its content.
    pub fn at_line(kind: ParsingErrorType, line: usize, content: &str) -> Self {
        Self {
            kind,
            line,
            context: content.chars().take(DEFAULT_CONTEXT_LENGTH).collect(),
        }
    }

    /// Convenience constructor for MissingColumn
    pub fn missing_column(column: &str, line: usize, header: &str) -> Self {
        Self::at_line(ParsingErrorType::MissingColumn(column.to_string()), line, header)
    }

    /// Convenience constructor for MissingField
    pub fn missing_field(column: &str, line: usize, row: &str) -> Self {
        Self::at_line(ParsingErrorType::MissingField(column.to_string()), line, row)
    }

    /// Convenience constructor for UnclosedQuote
    pub fn unclosed_quote(line: usize, row: &str) -> Self {
        Self::at_line(ParsingErrorType::UnclosedQuote, line, row)
    }

    /// Convenience constructor for EmptyInput
    pub fn empty_input(line: usize) -> Self {
        Self::at_line(ParsingErrorType::EmptyInput, line, "")
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the line (1-based) where the error occurred; 0 if unknown
    pub fn line(&self) -> usize {
        self.line
    }

    /// Get the start of the offending line
    pub fn context(&self) -> &str {
        &self.context
    }
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context: {}", context)
    }
}

impl From<std::io::Error> for ParsingError {
    fn from(err: std::io::Error) -> Self {
        ParsingError {
            kind: ParsingErrorType::IoError(err.to_string()),
            line: 0, // No line for IO errors
            context: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line_and_context() {
        let error = ParsingError::missing_field("Cognateset", 7, "Latvian\tten");
        let message = error.to_string();
        assert!(message.starts_with("Row has no value for column 'Cognateset' at line 7"));
        assert!(message.ends_with("Context: Latvian\tten"));
    }

    #[test]
    fn test_context_is_truncated() {
        let long = "x".repeat(2 * DEFAULT_CONTEXT_LENGTH);
        let error = ParsingError::missing_column("Language", 1, &long);
        assert_eq!(error.context().len(), DEFAULT_CONTEXT_LENGTH);
    }
}
