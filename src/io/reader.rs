//! Reader for delimited cognate tables.

use crate::config::{Delimiter, InputConfig};
use crate::io::parsing_error::ParsingError;
use crate::model::CognateData;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Candidates tried by [Delimiter::Auto], in order of preference on ties
const SNIFFED_DELIMITERS: [char; 3] = ['\t', ',', ';'];

/// Reads a cognate table from a file.
///
/// See [read_cognate_str] for the format.
///
/// # Errors
/// [ParsingError] if the file cannot be read or is malformed. A file that
/// is not valid UTF-8 gives `IoError`.
pub fn read_cognate_file<P: AsRef<Path>>(path: P, config: &InputConfig) -> Result<CognateData, ParsingError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    info!(path = %path.display(), bytes = text.len(), "reading cognate table");
    read_cognate_str(&text, config)
}

/// Reads a cognate table from text.
///
/// The first non-blank line is the header. Each further non-blank line is
/// one `(language, concept, cognate set)` observation, taken from the
/// columns named in `config`; other columns are ignored. Fields are trimmed
/// and may be enclosed in double quotes, inside which the delimiter is
/// literal and `""` is one quote. A quoted field cannot span lines. The
/// text must be UTF-8. An empty or absent cognate set
/// marks missing data; several rows for the same language and concept are
/// synonyms.
///
/// # Errors
/// * `EmptyInput` - no header or no data rows
/// * `MissingColumn` - a configured column is not in the header
/// * `MissingField` - a row lacks a language or a concept
/// * `UnclosedQuote` - a row ends inside a quoted field
///
/// # Example
/// ```
/// use grape::config::InputConfig;
/// use grape::io::read_cognate_str;
///
/// let table = "Language,Parameter,Cognateset\n\
///              Latin,hand,1\n\
///              Oscan,hand,1\n\
///              Latin,two,2\n";
/// let data = read_cognate_str(table, &InputConfig::default()).unwrap();
/// assert_eq!(data.num_languages(), 2);
/// assert_eq!(data.num_concepts(), 2);
/// ```
pub fn read_cognate_str(text: &str, config: &InputConfig) -> Result<CognateData, ParsingError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (header_line, header) = lines.next().ok_or_else(|| ParsingError::empty_input(0))?;
    let delimiter = resolve_delimiter(config.delimiter, header);
    debug!(?delimiter, "resolved delimiter");

    let columns = split_row(header, delimiter, header_line)?;
    let position = |name: &str| {
        columns
            .iter()
            .position(|column| *column == name)
            .ok_or_else(|| ParsingError::missing_column(name, header_line, header))
    };
    let language_at = position(&config.language_column)?;
    let concept_at = position(&config.concept_column)?;
    let cognateset_at = position(&config.cognateset_column)?;

    let mut triples = Vec::new();
    for (number, line) in lines {
        let fields = split_row(line, delimiter, number)?;
        let field = |at: usize, name: &str, required: bool| {
            let value = fields.get(at).map(String::as_str).unwrap_or("");
            if required && value.is_empty() {
                Err(ParsingError::missing_field(name, number, line))
            } else {
                Ok(value.to_string())
            }
        };
        let language = field(language_at, &config.language_column, true)?;
        let concept = field(concept_at, &config.concept_column, true)?;
        let cognateset = field(cognateset_at, &config.cognateset_column, false)?;
        triples.push((language, concept, cognateset));
    }

    if triples.is_empty() {
        return Err(ParsingError::empty_input(header_line));
    }

    let data = CognateData::from_triples(triples);
    info!(
        languages = data.num_languages(),
        concepts = data.num_concepts(),
        cognate_sets = data.num_cognate_sets(),
        "read cognate table"
    );
    Ok(data)
}

/// Returns the delimiter to use; `Auto` picks the most frequent candidate
/// in the header, tab if none occurs.
fn resolve_delimiter(delimiter: Delimiter, header: &str) -> char {
    match delimiter {
        Delimiter::Tab => '\t',
        Delimiter::Comma => ',',
        Delimiter::Semicolon => ';',
        Delimiter::Auto => {
            let mut best = ('\t', 0);
            for candidate in SNIFFED_DELIMITERS {
                let count = header.matches(candidate).count();
                if count > best.1 {
                    best = (candidate, count);
                }
            }
            best.0
        }
    }
}

/// Splits a row on `delimiter` and trims each field.
///
/// A field opened with a double quote runs to the matching closing quote;
/// the delimiter is literal inside it and `""` stands for one quote.
/// Text between the closing quote and the next delimiter is kept.
///
/// # Errors
/// `UnclosedQuote` if the row ends inside a quoted field.
fn split_row(line: &str, delimiter: char, number: usize) -> Result<Vec<String>, ParsingError> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if quoted {
            if c != '"' {
                field.push(c);
            } else if chars.next_if_eq(&'"').is_some() {
                field.push('"');
            } else {
                quoted = false;
            }
        } else if c == delimiter {
            fields.push(field.trim().to_string());
            field.clear();
        } else if c == '"' && field.trim().is_empty() {
            field.clear();
            quoted = true;
        } else {
            field.push(c);
        }
    }

    if quoted {
        return Err(ParsingError::unclosed_quote(number, line));
    }
    fields.push(field.trim().to_string());
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ParsingErrorType;

    #[test]
    fn test_sniffs_delimiter() {
        assert_eq!(resolve_delimiter(Delimiter::Auto, "Language\tParameter\tCognateset"), '\t');
        assert_eq!(resolve_delimiter(Delimiter::Auto, "Language;Parameter;Cognateset"), ';');
        assert_eq!(resolve_delimiter(Delimiter::Auto, "Language,Parameter,Cognateset"), ',');
        assert_eq!(resolve_delimiter(Delimiter::Auto, "Language"), '\t');
        assert_eq!(resolve_delimiter(Delimiter::Comma, "a\tb\tc"), ',');
    }

    #[test]
    fn test_split_row_trims_and_unquotes() {
        let fields = split_row("  Latin ,\" Old Irish\",", ',', 1).unwrap();
        assert_eq!(fields, vec!["Latin", "Old Irish", ""]);
    }

    #[test]
    fn test_split_row_keeps_delimiter_inside_quotes() {
        let fields = split_row("\"Irish, Old\",hand,1", ',', 1).unwrap();
        assert_eq!(fields, vec!["Irish, Old", "hand", "1"]);
    }

    #[test]
    fn test_split_row_doubled_quote() {
        let fields = split_row("\"say \"\"hi\"\"\"\tx", '\t', 1).unwrap();
        assert_eq!(fields, vec!["say \"hi\"", "x"]);
    }

    #[test]
    fn test_split_row_inner_quote_is_literal() {
        let fields = split_row("O\"Brien;1", ';', 1).unwrap();
        assert_eq!(fields, vec!["O\"Brien", "1"]);
    }

    #[test]
    fn test_split_row_unclosed_quote() {
        let error = split_row("\"Latin,hand,1", ',', 4).unwrap_err();
        assert_eq!(error.kind(), &ParsingErrorType::UnclosedQuote);
        assert_eq!(error.line(), 4);
    }
}
