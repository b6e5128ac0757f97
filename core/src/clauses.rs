//! Token-window detection: loose passive-aggressive sequences and whole-clause
//! rewrites for hostile or frustrated sentences.

use std::collections::HashSet;
use std::ops::Range;

use tracing::trace;

use crate::dictionary::WORDS;
use crate::phrases::match_phrase_case;
use crate::sentences::SentenceSpan;
use crate::tokens::Token;
use crate::zones::MaskedText;
use crate::{Category, Detection};

pub(crate) const ATTACK_REPLACEMENT: &str =
    "I'd like to discuss some concerns about how this is being handled.";
pub(crate) const FRUSTRATION_REPLACEMENT: &str =
    "This situation is concerning. I'd like to explore solutions to address it.";

const ATTACK_TRIGGERS: &[&str] = &["you", "your"];
const FRUSTRATION_TRIGGERS: &[&str] = &["this", "that", "it"];
const FRUSTRATION_TARGETS: &[&str] = &[
    "ridiculous",
    "absurd",
    "unacceptable",
    "terrible",
    "awful",
    "horrible",
    "garbage",
    "trash",
    "useless",
    "worthless",
    "pathetic",
];

/// A multi-word phrase that tolerates filler words between its parts.
struct SequenceRule {
    words: &'static [&'static str],
    replacement: &'static str,
}

const SEQUENCES: &[SequenceRule] = &[
    SequenceRule {
        words: &["just", "checking", "in"],
        replacement: "following up",
    },
    SequenceRule {
        words: &["just", "following", "up"],
        replacement: "following up",
    },
    SequenceRule {
        words: &["per", "my", "last", "email"],
        replacement: "as I mentioned",
    },
    SequenceRule {
        words: &["friendly", "reminder"],
        replacement: "reminder",
    },
    SequenceRule {
        words: &["gentle", "reminder"],
        replacement: "quick note",
    },
];

/// Scores how closely a trigger word is followed by a target word.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyRule {
    pub trigger_tokens: HashSet<String>,
    pub target_tokens: HashSet<String>,
    pub max_distance: usize,
}

impl AdjacencyRule {
    pub fn new<T, U>(triggers: T, targets: U, max_distance: usize) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        U: IntoIterator,
        U::Item: Into<String>,
    {
        Self {
            trigger_tokens: triggers.into_iter().map(Into::into).collect(),
            target_tokens: targets.into_iter().map(Into::into).collect(),
            max_distance,
        }
    }

    /// `you` followed by an insult word.
    pub fn attack(max_distance: usize) -> Self {
        Self::new(
            ATTACK_TRIGGERS.iter().copied(),
            WORDS.insult_words(),
            max_distance,
        )
    }

    /// `this`/`that`/`it` followed by a negative adjective.
    pub fn frustration(max_distance: usize) -> Self {
        Self::new(
            FRUSTRATION_TRIGGERS.iter().copied(),
            FRUSTRATION_TARGETS.iter().copied(),
            max_distance,
        )
    }

    /// Best `1 / (1 + gap)` over all triggers, where `gap` counts the tokens
    /// between a trigger and the first target after it. A protected token ends
    /// the lookahead. Zero when nothing matches.
    pub fn score(&self, tokens: &[&Token]) -> f64 {
        let mut best = 0.0f64;
        for (idx, token) in tokens.iter().enumerate() {
            if token.protected || !self.trigger_tokens.contains(&token.normalized) {
                continue;
            }
            for (gap, next) in tokens[idx + 1..]
                .iter()
                .take(self.max_distance)
                .enumerate()
            {
                if next.protected {
                    break;
                }
                if self.target_tokens.contains(&next.normalized) {
                    best = best.max(1.0 / (1.0 + gap as f64));
                    break;
                }
            }
        }
        best
    }
}

fn sentence_tokens<'t>(tokens: &'t [Token], span: &SentenceSpan) -> Vec<&'t Token> {
    tokens.iter().filter(|t| span.contains(t.start)).collect()
}

/// Loose sequence matches, one sentence at a time.
pub(crate) fn match_sequences(
    masked: &MaskedText<'_>,
    sentences: &[SentenceSpan],
    tokens: &[Token],
    max_gap: usize,
    out: &mut Vec<Detection>,
) {
    let text = masked.original();
    for span in sentences {
        let subset = sentence_tokens(tokens, span);
        for rule in SEQUENCES {
            for (idx, first) in subset.iter().enumerate() {
                if first.protected || first.normalized != rule.words[0] {
                    continue;
                }
                let Some(last) = follow_sequence(&subset, idx, &rule.words[1..], max_gap) else {
                    continue;
                };
                let (start, end) = (first.start, subset[last].end);
                let exact = rule.words.join(" ");
                if masked.as_str()[start..end].to_lowercase() == exact {
                    continue;
                }
                let original = &text[start..end];
                out.push(Detection {
                    category: Category::PassiveAggressive,
                    original: original.to_string(),
                    replacement: match_phrase_case(text, start, original, rule.replacement),
                    start,
                    end,
                });
            }
        }
    }
}

/// Index of the token completing `rest` after `from`, or `None` when the gap
/// budget runs out or a protected token intervenes.
fn follow_sequence(tokens: &[&Token], from: usize, rest: &[&str], max_gap: usize) -> Option<usize> {
    let mut idx = from;
    for word in rest {
        let mut fillers = 0;
        loop {
            idx += 1;
            let token = tokens.get(idx)?;
            if token.protected {
                return None;
            }
            if token.normalized == *word {
                break;
            }
            fillers += 1;
            if fillers > max_gap {
                return None;
            }
        }
    }
    Some(idx)
}

/// Clause rewrites plus the sentences suppressed for carrying protected tokens.
#[derive(Debug, Default)]
pub(crate) struct ClauseOutcome {
    pub(crate) detections: Vec<Detection>,
    pub(crate) skipped: Vec<Range<usize>>,
}

pub(crate) fn detect_clauses(
    masked: &MaskedText<'_>,
    sentences: &[SentenceSpan],
    tokens: &[Token],
    attack: &AdjacencyRule,
    frustration: &AdjacencyRule,
    threshold: f64,
) -> ClauseOutcome {
    let text = masked.original();
    let mut outcome = ClauseOutcome::default();
    let mut matched: Vec<(SentenceSpan, bool)> = Vec::new();

    for span in sentences {
        let subset = sentence_tokens(tokens, span);
        let is_attack = attack.score(&subset) >= threshold;
        if !is_attack && frustration.score(&subset) < threshold {
            continue;
        }
        if masked.overlaps_protected(&span.range()) {
            trace!(start = span.start, end = span.end, "skipping clause with protected token");
            outcome.skipped.push(span.range());
            continue;
        }
        matched.push((*span, is_attack));
    }

    let mut groups: Vec<(usize, usize, bool)> = Vec::new();
    for (span, is_attack) in matched {
        if let Some(group) = groups.last_mut() {
            let gap = group.1..span.start;
            let joined = text[gap.clone()].chars().all(char::is_whitespace)
                && masked.is_eligible(gap);
            if joined {
                group.1 = span.end;
                group.2 |= is_attack;
                continue;
            }
        }
        groups.push((span.start, span.end, is_attack));
    }

    for (start, end, is_attack) in groups {
        let end = start + text[start..end].trim_end().len();
        let (category, replacement) = if is_attack {
            (Category::ClauseAttack, ATTACK_REPLACEMENT)
        } else {
            (Category::ClauseFrustration, FRUSTRATION_REPLACEMENT)
        };
        outcome.detections.push(Detection {
            category,
            original: text[start..end].to_string(),
            replacement: replacement.to_string(),
            start,
            end,
        });
    }

    outcome
}
