use lazy_static::lazy_static;

/// Characters stripped from both ends of every whitespace-delimited field.
pub const TRIM_CHARS: &[u8] = b".,-~?!\"'`;:()<>[]{}\\|/=_+*&^%$#@";

lazy_static! {
    static ref TRIM_CLASS: [bool; 256] = {
        let mut class = [false; 256];
        for &b in TRIM_CHARS {
            class[b as usize] = true;
        }
        class
    };
}

#[inline]
pub fn is_trim_char(b: u8) -> bool {
    TRIM_CLASS[b as usize]
}

/// Lazy iterator over the normalized terms of a byte buffer.
///
/// Cloning the iterator restarts tokenization from the clone point without
/// touching the underlying content.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a [u8],
}

impl<'a> Iterator for Tokens<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let Some(start) = self.rest.iter().position(|b| !b.is_ascii_whitespace()) else {
                self.rest = &[];
                return None;
            };
            let rest = &self.rest[start..];
            let end = rest.iter().position(u8::is_ascii_whitespace).unwrap_or(rest.len());
            self.rest = &rest[end..];

            let field = trim(&rest[..end]);
            // Fields made only of punctuation are dropped, not indexed as "".
            if field.is_empty() {
                continue;
            }
            return Some(String::from_utf8_lossy(field).to_lowercase());
        }
    }
}

fn trim(field: &[u8]) -> &[u8] {
    let start = field.iter().position(|&b| !is_trim_char(b)).unwrap_or(field.len());
    let end = field.iter().rposition(|&b| !is_trim_char(b)).map_or(start, |i| i + 1);
    &field[start..end]
}

/// Split on ASCII whitespace, trim punctuation from both ends, lower-case.
pub fn tokenize(content: &[u8]) -> Tokens<'_> {
    Tokens { rest: content }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> {
        tokenize(text.as_bytes()).collect()
    }

    #[test]
    fn basic_tokenize() {
        assert_eq!(terms("Hello, World!!"), vec!["hello", "world"]);
    }

    #[test]
    fn interior_punctuation_is_kept() {
        assert_eq!(terms("(don't) e-mail... a.b.c"), vec!["don't", "e-mail", "a.b.c"]);
    }

    #[test]
    fn punctuation_only_fields_are_skipped() {
        assert_eq!(terms("--- dog ... ?!"), vec!["dog"]);
        assert!(terms("  \t\n ").is_empty());
    }

    #[test]
    fn clone_restarts() {
        let mut toks = tokenize(b"one two three");
        assert_eq!(toks.next().as_deref(), Some("one"));
        let replay: Vec<_> = toks.clone().collect();
        let rest: Vec<_> = toks.collect();
        assert_eq!(replay, rest);
        assert_eq!(rest, vec!["two", "three"]);
    }

    #[test]
    fn non_ascii_is_lowercased() {
        assert_eq!(terms("ÉCOLE Straße"), vec!["école", "straße"]);
    }
}
