//! Excluded-zone masking.
//!
//! Quoted reply lines, fenced code blocks, and protected tokens (URLs,
//! `@handles`, `#channels`) are blanked out in a same-length copy of the input.
//! Every matcher runs against that copy, so nothing inside an excluded zone can
//! ever be reported.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

const BLANK: u8 = b' ';

static PROTECTED_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"https?://\S+").expect("static url regex"),
        Regex::new(r"@[A-Za-z0-9_-]+").expect("static handle regex"),
        Regex::new(r"#[A-Za-z0-9_-]+").expect("static channel regex"),
    ]
});

/// Byte ranges of every URL, `@handle`, and `#channel` in `text`, sorted by start.
pub fn protected_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans: Vec<Range<usize>> = PROTECTED_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(text).map(|m| m.range()))
        .collect();
    spans.sort_by_key(|span| (span.start, span.end));
    spans
}

/// Returns true when `text` contains a URL, handle, or channel token.
pub fn contains_protected(text: &str) -> bool {
    PROTECTED_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Same-length view of a text with every excluded character blanked.
///
/// Excluded characters become one ASCII space per UTF-8 byte, which keeps byte
/// offsets shared between the two views. Newlines are never blanked.
#[derive(Debug, Clone)]
pub struct MaskedText<'a> {
    original: &'a str,
    masked: String,
    protected: Vec<Range<usize>>,
}

impl<'a> MaskedText<'a> {
    pub fn new(original: &'a str) -> Self {
        let mut masked = original.as_bytes().to_vec();

        let mut fenced = false;
        let mut offset = 0usize;
        for line in original.split('\n') {
            let is_fence = line.trim().starts_with("```");
            let excluded = if is_fence {
                fenced = !fenced;
                true
            } else {
                fenced || line.starts_with('>')
            };
            if excluded {
                blank(&mut masked, offset..offset + line.len());
            }
            offset += line.len() + 1;
        }

        let protected = protected_spans(original);
        for span in &protected {
            blank(&mut masked, span.clone());
        }

        // Whole characters were replaced by ASCII bytes, so the buffer stays UTF-8.
        let masked = String::from_utf8(masked)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());

        Self {
            original,
            masked,
            protected,
        }
    }

    pub fn original(&self) -> &'a str {
        self.original
    }

    pub fn as_str(&self) -> &str {
        &self.masked
    }

    pub fn len(&self) -> usize {
        self.masked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masked.is_empty()
    }

    /// Protected token spans found in the unmasked original.
    pub fn protected(&self) -> &[Range<usize>] {
        &self.protected
    }

    /// A range is eligible when the masked bytes equal the original bytes.
    pub fn is_eligible(&self, range: Range<usize>) -> bool {
        if range.start > range.end || range.end > self.masked.len() {
            return false;
        }
        self.masked.as_bytes()[range.clone()] == self.original.as_bytes()[range]
    }

    /// Whether any protected token overlaps `range`.
    pub fn overlaps_protected(&self, range: &Range<usize>) -> bool {
        self.protected
            .iter()
            .any(|span| span.start < range.end && range.start < span.end)
    }
}

/// Blanks every non-newline byte of a character-aligned `range`.
fn blank(bytes: &mut [u8], range: Range<usize>) {
    let end = range.end.min(bytes.len());
    for byte in &mut bytes[range.start.min(end)..end] {
        if *byte != b'\n' {
            *byte = BLANK;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_quoted_lines_only() {
        let text = "keep this\n> drop this\nkeep too";
        let masked = MaskedText::new(text);
        assert_eq!(masked.as_str(), "keep this\n           \nkeep too");
        assert_eq!(masked.len(), text.len());
    }

    #[test]
    fn indented_quote_is_not_a_quote() {
        let masked = MaskedText::new("  > not quoted");
        assert_eq!(masked.as_str(), "  > not quoted");
    }

    #[test]
    fn masks_fenced_blocks_including_markers() {
        let text = "before\n```rust\nlet x = 1;\n```\nafter";
        let masked = MaskedText::new(text);
        assert_eq!(masked.as_str(), "before\n       \n          \n   \nafter");
    }

    #[test]
    fn unterminated_fence_masks_to_end() {
        let text = "ok\n```\nstill code\nmore code";
        let masked = MaskedText::new(text);
        assert_eq!(masked.as_str(), "ok\n   \n          \n         ");
    }

    #[test]
    fn masks_protected_tokens_anywhere() {
        let text = "ping @dev_team in #ops-chat or see https://x.io/a.b";
        let masked = MaskedText::new(text);
        assert!(!masked.as_str().contains('@'));
        assert!(!masked.as_str().contains('#'));
        assert!(!masked.as_str().contains("https"));
        assert!(masked.as_str().starts_with("ping "));
        assert_eq!(masked.protected().len(), 3);
    }

    #[test]
    fn multibyte_characters_keep_byte_length() {
        let text = "> café ☕\nnaïve";
        let masked = MaskedText::new(text);
        assert_eq!(masked.len(), text.len());
        assert!(masked.as_str().ends_with("\nnaïve"));
    }

    #[test]
    fn masking_is_a_fixpoint() {
        let text = "> quoted\n```\ncode\n```\nplain @user text https://a.b\n```\nopen";
        let once = MaskedText::new(text);
        let twice = MaskedText::new(once.as_str());
        assert_eq!(once.as_str(), twice.as_str());
    }

    #[test]
    fn eligibility_tracks_masked_bytes() {
        let text = "hello @bob";
        let masked = MaskedText::new(text);
        assert!(masked.is_eligible(0..5));
        assert!(!masked.is_eligible(6..10));
        assert!(!masked.is_eligible(4..8));
        assert!(!masked.is_eligible(8..40));
    }
}
