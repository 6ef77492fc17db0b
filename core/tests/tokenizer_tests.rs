use sift_core::tokenizer::{is_trim_char, tokenize, TRIM_CHARS};

fn words(text: &str) -> Vec<String> {
    tokenize(text.as_bytes()).collect()
}

#[test]
fn it_strips_edge_punctuation_and_folds_case() {
    assert_eq!(words("Hello, World!!"), vec!["hello", "world"]);
    assert_eq!(words("\"Quoted\" [bracketed] {braced} <angled>"), vec!["quoted", "bracketed", "braced", "angled"]);
}

#[test]
fn it_splits_on_any_ascii_whitespace() {
    assert_eq!(words("a\tb\nc\r\nd  e"), vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn it_does_not_stem_or_drop_stopwords() {
    assert_eq!(words("The running runners"), vec!["the", "running", "runners"]);
}

#[test]
fn every_trim_char_is_stripped() {
    for &b in TRIM_CHARS {
        assert!(is_trim_char(b));
        let field = format!("{c}{c}word{c}", c = b as char);
        assert_eq!(words(&field), vec!["word"], "trim char {:?}", b as char);
    }
    assert!(!is_trim_char(b'a'));
    assert!(!is_trim_char(b' '));
}
