//! Utility functions for label escaping in Newick and Nexus output.

/// Characters that force a label into single quotes
const SPECIAL_CHARS: &[char] = &[',', ';', '\t', '\n', '\r', '(', ')', ':', '[', ']', '\''];

/// Checks if a label is enclosed in single quotes.
///
/// # Examples
/// ```
/// # use grape::io::utils::is_single_quoted;
/// assert!(!is_single_quoted("Gothic"));
/// assert!(is_single_quoted("'Old Norse'"));
/// assert!(!is_single_quoted("'"));
/// ```
pub fn is_single_quoted(label: &str) -> bool {
    label.len() >= 2 && label.starts_with('\'') && label.ends_with('\'')
}

/// Checks if a label can be written as is: either single quoted with every
/// internal quote doubled, or free of spaces and special characters.
///
/// # Examples
/// ```
/// # use grape::io::utils::is_escaped;
/// assert!(is_escaped("Old_Irish"));
/// assert!(!is_escaped("Old Irish"));
/// assert!(is_escaped("'Ma''di'"));
/// assert!(!is_escaped("'Ma'di'"));
/// ```
pub fn is_escaped(label: &str) -> bool {
    if is_single_quoted(label) {
        let inner = &label[1..label.len() - 1];
        // Quotes must come in pairs
        inner.split("''").all(|part| !part.contains('\''))
    } else {
        !label.chars().any(|c| c == ' ' || SPECIAL_CHARS.contains(&c))
    }
}

/// Escapes a language label for Newick and Nexus.
///
/// Labels with special characters are wrapped in single quotes, doubling
/// internal quotes. Otherwise spaces become underscores. Escaped labels are
/// returned unchanged.
///
/// # Examples
/// ```
/// # use grape::io::utils::escape_label;
/// assert_eq!(escape_label("Tocharian B"), "Tocharian_B");
/// assert_eq!(escape_label("Greek (Ancient)"), "'Greek (Ancient)'");
/// assert_eq!(escape_label("Ma'di"), "'Ma''di'");
/// assert_eq!(escape_label("'Ma''di'"), "'Ma''di'");
/// assert_eq!(escape_label("'Ma'di'"), "'Ma''di'");
/// ```
pub fn escape_label(label: &str) -> String {
    if is_escaped(label) {
        return label.to_string();
    }
    if is_single_quoted(label) {
        let inner = &label[1..label.len() - 1];
        return quote(&inner.replace("''", "'"));
    }
    if label.contains(SPECIAL_CHARS) {
        quote(label)
    } else {
        label.replace(' ', "_")
    }
}

fn quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
