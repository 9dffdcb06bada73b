use grape::config::{Delimiter, InputConfig};
use grape::io::{ParsingErrorType, read_cognate_file, read_cognate_str};
use std::path::Path;

#[test]
fn test_read_fixture() {
    let path = Path::new("tests/fixtures/small_family.tsv");
    let data = read_cognate_file(path, &InputConfig::default()).unwrap();

    assert_eq!(data.num_languages(), 6);
    assert_eq!(data.num_concepts(), 5);
    assert_eq!(data.num_cognate_sets(), 10);
    assert_eq!(data.coverage(), 1.0);
    assert_eq!(
        data.languages().labels(),
        &["Dutch", "English", "French", "German", "Italian", "Spanish"]
    );
}

#[test]
fn test_missing_file() {
    let error = read_cognate_file("tests/fixtures/no_such_table.tsv", &InputConfig::default()).unwrap_err();
    assert!(matches!(error.kind(), ParsingErrorType::IoError(_)));
}

#[test]
fn test_custom_columns_and_delimiter() {
    let table = "Doculect;Concept;Cogid;Notes\n\
                 \"Old Irish\";fire;1;x\n\
                 Welsh;fire;1;\n\
                 Welsh;fire;2\n\
                 Breton;fire;\n";
    let config = InputConfig {
        language_column: "Doculect".to_string(),
        concept_column: "Concept".to_string(),
        cognateset_column: "Cogid".to_string(),
        delimiter: Delimiter::Semicolon,
    };

    let data = read_cognate_str(table, &config).unwrap();

    assert_eq!(data.languages().labels(), &["Breton", "Old Irish", "Welsh"]);
    let welsh = data.languages().get_index("Welsh").unwrap();
    let breton = data.languages().get_index("Breton").unwrap();
    // Synonyms
    assert_eq!(data.observations(welsh, 0).map(|s| s.len()), Some(2));
    // Empty cognate set is missing data
    assert_eq!(data.observations(breton, 0), None);
}

#[test]
fn test_auto_delimiter_and_blank_lines() {
    let table = "\nLanguage,Parameter,Cognateset\n\nLatin,hand,1\n  \nOscan,hand,1\n";
    let data = read_cognate_str(table, &InputConfig::default()).unwrap();

    assert_eq!(data.num_languages(), 2);
    assert_eq!(data.observations(0, 0), data.observations(1, 0));
}

#[test]
fn test_missing_column() {
    let table = "Language\tConcept\tCognateset\nLatin\thand\t1\n";
    let error = read_cognate_str(table, &InputConfig::default()).unwrap_err();

    assert_eq!(error.kind(), &ParsingErrorType::MissingColumn("Parameter".to_string()));
    assert_eq!(error.line(), 1);
    assert!(error.to_string().contains("Parameter"));
}

#[test]
fn test_missing_language_field() {
    let table = "Language\tParameter\tCognateset\nLatin\thand\t1\n\thand\t2\n";
    let error = read_cognate_str(table, &InputConfig::default()).unwrap_err();

    assert_eq!(error.kind(), &ParsingErrorType::MissingField("Language".to_string()));
    assert_eq!(error.line(), 3);
}

#[test]
fn test_empty_input() {
    let config = InputConfig::default();

    let error = read_cognate_str("", &config).unwrap_err();
    assert_eq!(error.kind(), &ParsingErrorType::EmptyInput);

    let error = read_cognate_str("Language\tParameter\tCognateset\n", &config).unwrap_err();
    assert_eq!(error.kind(), &ParsingErrorType::EmptyInput);
}

#[test]
fn test_quoted_field_with_delimiter() {
    let table = "Language,Parameter,Cognateset\n\
                 \"Irish, Old\",hand,1\n\
                 Latin,hand,1\n\
                 \"Latin\",\"say \"\"two\"\"\",2\n";
    let config = InputConfig {
        delimiter: Delimiter::Comma,
        ..InputConfig::default()
    };

    let data = read_cognate_str(table, &config).unwrap();

    assert_eq!(data.languages().labels(), &["Irish, Old", "Latin"]);
    assert_eq!(data.concepts(), &["hand", "say \"two\""]);
    assert_eq!(data.num_cognate_sets(), 2);
}

#[test]
fn test_unclosed_quote() {
    let table = "Language,Parameter,Cognateset\nLatin,hand,1\n\"Irish, Old,hand,1\n";
    let error = read_cognate_str(table, &InputConfig::default()).unwrap_err();

    assert_eq!(error.kind(), &ParsingErrorType::UnclosedQuote);
    assert_eq!(error.line(), 3);
    assert!(error.context().starts_with("\"Irish"));
}

#[test]
fn test_non_utf8_file() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    // "Français" in Latin-1
    file.write_all(b"Language\tParameter\tCognateset\nFran\xe7ais\thand\t1\n").unwrap();
    file.flush().unwrap();

    let error = read_cognate_file(file.path(), &InputConfig::default()).unwrap_err();
    assert!(matches!(error.kind(), ParsingErrorType::IoError(_)));
}
