use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::zones::protected_spans;

static WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?-u:\b)[A-Za-z0-9'_-]+(?-u:\b)").expect("static word regex"));

/// Word token with byte offsets into the original text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub raw: String,
    pub normalized: String,
    pub start: usize,
    pub end: usize,
    pub protected: bool,
}

/// Splits `text` into word tokens using its masked view.
///
/// Words inside excluded zones are dropped rather than replaced, so adjacency
/// is counted in tokens, not characters. Words belonging to a URL, handle, or
/// channel are kept with `protected` set; they act as barriers for proximity
/// scans and are never rewritten.
pub fn tokenize(text: &str, masked: &str) -> Vec<Token> {
    let protected = protected_spans(text);
    let masked = masked.as_bytes();
    let mut tokens = Vec::new();

    for mat in WORD_RE.find_iter(text) {
        let in_protected = protected
            .iter()
            .any(|span| span.start <= mat.start() && mat.start() < span.end);
        let eligible = masked
            .get(mat.range())
            .map_or(false, |slice| slice == mat.as_str().as_bytes());
        if !eligible && !in_protected {
            continue;
        }
        tokens.push(Token {
            raw: mat.as_str().to_string(),
            normalized: mat.as_str().to_lowercase(),
            start: mat.start(),
            end: mat.end(),
            protected: in_protected,
        });
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zones::MaskedText;

    fn tokens_of(text: &str) -> Vec<Token> {
        let masked = MaskedText::new(text);
        tokenize(text, masked.as_str())
    }

    #[test]
    fn splits_words_with_offsets() {
        let tokens = tokens_of("You can't re-run it_now.");
        let raws: Vec<&str> = tokens.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, vec!["You", "can't", "re-run", "it_now"]);
        assert_eq!(tokens[0].normalized, "you");
        assert_eq!((tokens[1].start, tokens[1].end), (4, 9));
        assert!(tokens.iter().all(|t| !t.protected));
    }

    #[test]
    fn drops_words_in_quotes_and_fences() {
        let tokens = tokens_of("hello\n> quoted words\n```\ncode\n```\nbye");
        let raws: Vec<&str> = tokens.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, vec!["hello", "bye"]);
    }

    #[test]
    fn marks_protected_words() {
        let tokens = tokens_of("You https://x.com stupid");
        let flags: Vec<(&str, bool)> = tokens
            .iter()
            .map(|t| (t.raw.as_str(), t.protected))
            .collect();
        assert_eq!(
            flags,
            vec![
                ("You", false),
                ("https", true),
                ("x", true),
                ("com", true),
                ("stupid", false),
            ]
        );
    }

    #[test]
    fn handle_and_channel_words_are_protected() {
        let tokens = tokens_of("ask @sam_lee in #dev-ops");
        let protected: Vec<&str> = tokens
            .iter()
            .filter(|t| t.protected)
            .map(|t| t.raw.as_str())
            .collect();
        assert_eq!(protected, vec!["sam_lee", "dev-ops"]);
    }

    #[test]
    fn ascii_runs_split_at_non_ascii_letters() {
        let tokens = tokens_of("you naïve idiot");
        let raws: Vec<&str> = tokens.iter().map(|t| t.raw.as_str()).collect();
        assert_eq!(raws, vec!["you", "na", "ve", "idiot"]);
        assert_eq!((tokens[2].start, tokens[2].end), (8, 10));
    }

    #[test]
    fn empty_input_has_no_tokens() {
        assert!(tokens_of("").is_empty());
        assert!(tokens_of("  \n\t").is_empty());
    }
}
