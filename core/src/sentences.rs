use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::zones::MaskedText;

/// Half-open byte span of one sentence in the original text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceSpan {
    pub start: usize,
    pub end: usize,
}

impl SentenceSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Splits the eligible parts of a masked text into sentences.
///
/// Terminators are `.`, `!`, `?`, and newline in the masked view. A newline
/// directly after `.`/`!`/`?` belongs to the sentence it follows. Only an
/// eligible, non-whitespace character can open a sentence, so quoted lines and
/// code fences fall outside every span. Each extra terminator in a run like
/// `...` is a sentence of its own.
pub fn segment_masked(masked: &MaskedText<'_>) -> Vec<SentenceSpan> {
    let view = masked.as_str();
    let bytes = view.as_bytes();
    let mut spans: Vec<SentenceSpan> = Vec::new();
    let mut open: Option<usize> = None;

    for (idx, ch) in view.char_indices() {
        let end = idx + ch.len_utf8();
        let start = match open {
            Some(start) => start,
            None if !ch.is_whitespace() && masked.is_eligible(idx..end) => idx,
            None => continue,
        };
        open = Some(start);
        if let Some(span_end) = terminator_end(ch, bytes, end) {
            spans.push(SentenceSpan {
                start,
                end: span_end,
            });
            open = None;
        }
    }

    if let Some(start) = open {
        spans.push(SentenceSpan {
            start,
            end: view.len(),
        });
    }

    spans
}

/// End offset of a sentence closed by `ch`, or `None` when `ch` is not a terminator.
fn terminator_end(ch: char, bytes: &[u8], after: usize) -> Option<usize> {
    match ch {
        '\n' => Some(after),
        '.' | '!' | '?' => {
            if bytes.get(after) == Some(&b'\n') {
                Some(after + 1)
            } else {
                Some(after)
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<&str> {
        let masked = MaskedText::new(text);
        segment_masked(&masked)
            .into_iter()
            .map(|span| &text[span.range()])
            .collect()
    }

    #[test]
    fn splits_on_terminal_punctuation() {
        assert_eq!(
            sentences("Question? Exclamation! Statement."),
            vec!["Question?", "Exclamation!", "Statement."]
        );
    }

    #[test]
    fn unterminated_text_is_one_sentence() {
        let text = "Just one sentence without period";
        assert_eq!(sentences(text), vec![text]);
    }

    #[test]
    fn newline_is_a_boundary_and_is_swallowed_after_punctuation() {
        assert_eq!(
            sentences("First line\nSecond line\nThird line"),
            vec!["First line\n", "Second line\n", "Third line"]
        );
        assert_eq!(sentences("Line.\nNext."), vec!["Line.\n", "Next."]);
    }

    #[test]
    fn repeated_terminators_close_one_sentence_each() {
        assert_eq!(
            sentences("Wait... Really?! Yes."),
            vec!["Wait.", ".", ".", "Really?", "!", "Yes."]
        );
        let masked = MaskedText::new("Wait... ok");
        assert_eq!(
            segment_masked(&masked),
            vec![
                SentenceSpan { start: 0, end: 5 },
                SentenceSpan { start: 5, end: 6 },
                SentenceSpan { start: 6, end: 7 },
                SentenceSpan { start: 8, end: 10 },
            ]
        );
    }

    #[test]
    fn lone_terminator_is_a_sentence() {
        assert_eq!(sentences("?"), vec!["?"]);
        assert_eq!(sentences("ok\n!\n"), vec!["ok\n", "!\n"]);
    }

    #[test]
    fn punctuation_inside_protected_tokens_does_not_split() {
        let text = "Visit https://example.com for more information.";
        assert_eq!(sentences(text), vec![text]);
        let text = "Contact @user_name in #team-channel for updates.";
        assert_eq!(sentences(text), vec![text]);
    }

    #[test]
    fn quoted_and_fenced_lines_fall_outside_spans() {
        assert_eq!(
            sentences("This is my text.\n> This is quoted.\nMore of my text."),
            vec!["This is my text.\n", "More of my text."]
        );
        assert_eq!(
            sentences("Text before.\n```\ncode with periods.\n```\nText after."),
            vec!["Text before.\n", "Text after."]
        );
        assert_eq!(
            sentences(
                "Check https://example.com.\n> Quoted line.\n```\ncode block\n```\nFinal sentence!"
            ),
            vec!["Check https://example.com.\n", "Final sentence!"]
        );
    }

    #[test]
    fn blank_input_has_no_sentences() {
        assert!(sentences("").is_empty());
        assert!(sentences("   \n\t  ").is_empty());
    }
}
