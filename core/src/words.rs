//! Single-word detection: the obscenity scan, the whole-word dictionary scan,
//! and the bounded edit-distance fallback for misspellings.

use std::collections::HashSet;
use std::ops::Range;

use aho_corasick::{AhoCorasick, AhoCorasickBuilder};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::FuzzyConfig;
use crate::dictionary::{
    Boundary, HIGH_IMPACT_TERMS, OBSCENITY_TERMS, SAFE_WORDS, WHITELISTED_TERMS, WORDS,
};
use crate::zones::MaskedText;
use crate::Detection;

const REMOVED: &str = "[removed]";

static WORD_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9_]+").expect("static word run regex"));

pub(crate) static OBSCENITY: Lazy<ObscenityMatcher> = Lazy::new(ObscenityMatcher::build);

/// Leetspeak-aware multi-pattern matcher over a normalized view of the text.
pub(crate) struct ObscenityMatcher {
    blacklist: AhoCorasick,
    terms: Vec<(&'static str, Boundary)>,
    whitelist: AhoCorasick,
}

/// Normalized bytes plus, for each byte, the original range it stands for.
struct Normalized {
    bytes: Vec<u8>,
    sources: Vec<Range<usize>>,
}

/// A blacklist hit mapped back onto the original text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ObscenityMatch {
    pub(crate) span: Range<usize>,
    pub(crate) term: &'static str,
}

impl ObscenityMatcher {
    fn build() -> Self {
        let terms: Vec<(&'static str, Boundary)> = OBSCENITY_TERMS.to_vec();
        let blacklist = AhoCorasickBuilder::new()
            .build(terms.iter().map(|(term, _)| normalize(term).bytes));
        let whitelist =
            AhoCorasickBuilder::new().build(WHITELISTED_TERMS.iter().map(|t| normalize(t).bytes));
        Self {
            blacklist,
            terms,
            whitelist,
        }
    }

    pub(crate) fn has_match(&self, text: &str) -> bool {
        !self.find_all(text).is_empty()
    }

    /// Every blacklist hit in `text`, sorted by span.
    pub(crate) fn find_all(&self, text: &str) -> Vec<ObscenityMatch> {
        let normalized = normalize(text);
        if normalized.bytes.is_empty() {
            return Vec::new();
        }
        let allowed: Vec<Range<usize>> = self
            .whitelist
            .find_overlapping_iter(&normalized.bytes)
            .map(|m| normalized.source_range(m.start(), m.end()))
            .collect();

        let mut found = Vec::new();
        for mat in self.blacklist.find_overlapping_iter(&normalized.bytes) {
            let (term, boundary) = self.terms[mat.pattern()];
            let span = normalized.source_range(mat.start(), mat.end());
            if !boundary_holds(text, &span, boundary) {
                continue;
            }
            if allowed
                .iter()
                .any(|ok| ok.start <= span.start && span.end <= ok.end)
            {
                continue;
            }
            found.push(ObscenityMatch { span, term });
        }
        found.sort_by_key(|m| (m.span.start, m.span.end));
        found.dedup_by(|a, b| a.span == b.span);
        found
    }
}

impl Normalized {
    fn source_range(&self, start: usize, end: usize) -> Range<usize> {
        self.sources[start].start..self.sources[end - 1].end
    }
}

/// ASCII lowercase, leetspeak resolution, and duplicate collapsing.
fn normalize(text: &str) -> Normalized {
    let mut bytes: Vec<u8> = Vec::with_capacity(text.len());
    let mut sources: Vec<Range<usize>> = Vec::with_capacity(text.len());
    let mut run = 0usize;

    for (idx, ch) in text.char_indices() {
        let end = idx + ch.len_utf8();
        let mapped = if ch.is_ascii() {
            resolve_leet(ch.to_ascii_lowercase() as u8)
        } else {
            0
        };
        if mapped.is_ascii_lowercase() && bytes.last() == Some(&mapped) {
            if run >= collapse_limit(mapped) {
                if let Some(last) = sources.last_mut() {
                    last.end = end;
                }
                continue;
            }
            run += 1;
        } else {
            run = 1;
        }
        bytes.push(mapped);
        sources.push(idx..end);
    }

    Normalized { bytes, sources }
}

fn resolve_leet(byte: u8) -> u8 {
    match byte {
        b'4' | b'@' => b'a',
        b'3' => b'e',
        b'1' | b'!' => b'i',
        b'0' => b'o',
        b'5' | b'$' => b's',
        b'7' => b't',
        other => other,
    }
}

fn collapse_limit(byte: u8) -> usize {
    match byte {
        b'b' | b'e' | b'o' | b'l' | b's' | b'g' => 2,
        _ => 1,
    }
}

fn boundary_holds(text: &str, span: &Range<usize>, boundary: Boundary) -> bool {
    let letter_before = text[..span.start]
        .chars()
        .next_back()
        .map_or(false, |c| c.is_ascii_alphabetic());
    let letter_after = text[span.end..]
        .chars()
        .next()
        .map_or(false, |c| c.is_ascii_alphabetic());
    match boundary {
        Boundary::Anywhere => true,
        Boundary::WordStart => !letter_before,
        Boundary::WholeWord => !letter_before && !letter_after,
    }
}

/// Dictionary-driven word detection with the configured fuzzy bounds.
pub(crate) struct WordMatcher {
    fuzzy: FuzzyConfig,
    safe_words: HashSet<String>,
}

impl WordMatcher {
    pub(crate) fn new(fuzzy: FuzzyConfig) -> Self {
        let safe_words = SAFE_WORDS
            .iter()
            .map(|w| w.to_string())
            .chain(fuzzy.extra_safe_words.iter().map(|w| w.to_lowercase()))
            .collect();
        Self { fuzzy, safe_words }
    }

    /// Obscenity hits widened to the dictionary key that contains them.
    pub(crate) fn scan_obscenity(&self, masked: &MaskedText<'_>, out: &mut Vec<Detection>) {
        let text = masked.original();
        for hit in OBSCENITY.find_all(masked.as_str()) {
            if let Some(detection) = widen_obscenity(text, &hit) {
                out.push(detection);
            }
        }
    }

    /// Exact dictionary lookups per word, with the fuzzy tier for unknown words.
    pub(crate) fn scan_words(&self, masked: &MaskedText<'_>, out: &mut Vec<Detection>) {
        let text = masked.original();
        for mat in WORD_RUN_RE.find_iter(masked.as_str()) {
            let Some(original) = text.get(mat.range()) else {
                continue;
            };
            let lower = original.to_lowercase();
            let (key, replacement) = match WORDS.get(&lower) {
                Some(replacement) => (lower.as_str(), replacement),
                None => {
                    if !lower.chars().all(|c| c.is_ascii_alphabetic()) {
                        continue;
                    }
                    let Some(term) = self.fuzzy_term(&lower) else {
                        continue;
                    };
                    let Some(replacement) = WORDS.get(term) else {
                        continue;
                    };
                    (term, replacement)
                }
            };
            out.push(Detection {
                category: WORDS.category_of(key),
                original: original.to_string(),
                replacement: match_case(original, replacement),
                start: mat.start(),
                end: mat.end(),
            });
        }
    }

    /// Closest high-impact term within the edit bounds, if the word is not a
    /// known safe or whitelisted word.
    pub(crate) fn fuzzy_term(&self, word: &str) -> Option<&'static str> {
        let cleaned: String = word.chars().filter(|c| c.is_ascii_alphabetic()).collect();
        let length = cleaned.chars().count();
        if length < self.fuzzy.min_word_length {
            return None;
        }
        if self.safe_words.contains(&cleaned) {
            return None;
        }
        if WHITELISTED_TERMS.iter().any(|term| cleaned.contains(term)) {
            return None;
        }

        let mut best: Option<(usize, &'static str)> = None;
        for &term in HIGH_IMPACT_TERMS {
            if length.abs_diff(term.len()) > self.fuzzy.max_length_delta {
                continue;
            }
            let distance = strsim::levenshtein(&cleaned, term);
            if distance > self.fuzzy.max_edit_distance {
                continue;
            }
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, term));
            }
        }
        best.map(|(_, term)| term)
    }
}

fn widen_obscenity(text: &str, hit: &ObscenityMatch) -> Option<Detection> {
    let token = ascii_word_bounds(text, &hit.span);
    let token_lower: Vec<u8> = text
        .get(token.clone())?
        .bytes()
        .map(|b| resolve_leet(b.to_ascii_lowercase()))
        .collect();
    let match_start = hit.span.start - token.start;
    let match_end = hit.span.end - token.start;

    for &key in WORDS.keys_longest_first() {
        let Some(key_start) = find_containing(&token_lower, key.as_bytes(), match_start, match_end)
        else {
            continue;
        };
        let start = token.start + key_start;
        let end = start + key.len();
        let original = text.get(start..end)?;
        let replacement = WORDS.get(key)?;
        return Some(Detection {
            category: WORDS.category_of(key),
            original: original.to_string(),
            replacement: match_case(original, replacement),
            start,
            end,
        });
    }

    let original = text.get(hit.span.clone())?;
    let lower = original.to_lowercase();
    let (category_key, replacement) = if let Some(replacement) = WORDS.get(&lower) {
        (lower.as_str(), replacement)
    } else if let Some(replacement) = WORDS.get(hit.term) {
        (hit.term, replacement)
    } else {
        (
            lower.as_str(),
            WORDS.closest_replacement(&lower).unwrap_or(REMOVED),
        )
    };
    Some(Detection {
        category: WORDS.category_of(category_key),
        original: original.to_string(),
        replacement: match_case(original, replacement),
        start: hit.span.start,
        end: hit.span.end,
    })
}

/// Offset of an occurrence of `key` in `haystack` that covers `start..end`.
fn find_containing(haystack: &[u8], key: &[u8], start: usize, end: usize) -> Option<usize> {
    if key.is_empty() || key.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(key.len())
        .enumerate()
        .find(|(pos, window)| *window == key && *pos <= start && pos + key.len() >= end)
        .map(|(pos, _)| pos)
}

/// Widens `span` over adjacent ASCII letters.
fn ascii_word_bounds(text: &str, span: &Range<usize>) -> Range<usize> {
    let bytes = text.as_bytes();
    let mut start = span.start;
    while start > 0 && bytes[start - 1].is_ascii_alphabetic() {
        start -= 1;
    }
    let mut end = span.end;
    while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
        end += 1;
    }
    start..end
}

/// Mirrors the casing of `original` onto `replacement`.
pub(crate) fn match_case(original: &str, replacement: &str) -> String {
    if original == original.to_uppercase() {
        return replacement.to_uppercase();
    }
    match original.chars().next() {
        Some(first) if first.is_uppercase() => capitalize_first(replacement),
        _ => replacement.to_string(),
    }
}

pub(crate) fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn matcher() -> WordMatcher {
        WordMatcher::new(FuzzyConfig::default())
    }

    fn scan(text: &str) -> Vec<Detection> {
        let masked = MaskedText::new(text);
        let m = matcher();
        let mut out = Vec::new();
        m.scan_obscenity(&masked, &mut out);
        m.scan_words(&masked, &mut out);
        out
    }

    #[test]
    fn normalizes_leetspeak_and_repeats() {
        let n = normalize("Sh!t FUUUCK a$$");
        assert_eq!(n.bytes, b"shit fuck ass".to_vec());
        assert_eq!(n.sources[5..9].last().map(|r| r.end), Some(11));
    }

    #[test]
    fn finds_obscenity_through_substitutions() {
        let hits = OBSCENITY.find_all("what the fuuuck, sh1t");
        let spans: Vec<Range<usize>> = hits.iter().map(|h| h.span.clone()).collect();
        assert_eq!(spans, vec![9..15, 17..21]);
    }

    #[test]
    fn whole_word_terms_respect_letters() {
        assert!(!OBSCENITY.has_match("classic bass pass"));
        assert!(OBSCENITY.has_match("what an ass"));
        assert!(!OBSCENITY.has_match("scrap the cocktail"));
        assert!(!OBSCENITY.has_match("Scunthorpe shiitake"));
    }

    #[test]
    fn widens_core_match_to_dictionary_key() {
        let found = scan("bullshit");
        assert!(found
            .iter()
            .all(|d| (d.start, d.end) == (0, 8) && d.replacement == "nonsense"));
        assert!(!found.is_empty());
    }

    #[test]
    fn unknown_obscenity_falls_back_to_removed_marker() {
        let found = scan("slut");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].replacement, REMOVED);
        assert_eq!(found[0].category, Category::Profanity);
    }

    #[test]
    fn stretched_obscenity_uses_the_term_replacement() {
        let found = scan("fuuuck");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].original, "fuuuck");
        assert_eq!(found[0].replacement, "heck");
    }

    #[test]
    fn fuzzy_matches_single_edits_only() {
        let m = matcher();
        assert_eq!(m.fuzzy_term("fuk"), Some("fuck"));
        assert_eq!(m.fuzzy_term("shlt"), Some("shit"));
        assert_eq!(m.fuzzy_term("dmn"), Some("damn"));
        assert_eq!(m.fuzzy_term("idoit"), None);
        assert_eq!(m.fuzzy_term("funk"), None);
        assert_eq!(m.fuzzy_term("assess"), None);
        assert_eq!(m.fuzzy_term("duck"), None);
        assert_eq!(m.fuzzy_term("fk"), None);
    }

    #[test]
    fn extra_safe_words_suppress_fuzzy_hits() {
        let m = WordMatcher::new(FuzzyConfig {
            extra_safe_words: vec!["Fuk".into()],
            ..FuzzyConfig::default()
        });
        assert_eq!(m.fuzzy_term("fuk"), None);
    }

    #[test]
    fn case_follows_the_original() {
        assert_eq!(match_case("BULLSHIT", "nonsense"), "NONSENSE");
        assert_eq!(match_case("Bullshit", "nonsense"), "Nonsense");
        assert_eq!(match_case("bullShit", "nonsense"), "nonsense");
        assert_eq!(capitalize_first(""), "");
    }
}
