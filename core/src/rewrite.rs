use serde::{Deserialize, Serialize};

use crate::{Category, Detection};

const NOTHING_TO_CHANGE: &str = "No changes needed - your text is already professional!";

/// Result of rewriting one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformResult {
    pub original: String,
    pub transformed: String,
    pub changes: Vec<Detection>,
    pub change_count: usize,
}

impl TransformResult {
    pub(crate) fn new(original: &str, changes: Vec<Detection>) -> Self {
        Self {
            original: original.to_string(),
            transformed: assemble(original, &changes),
            change_count: changes.len(),
            changes,
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Splices the replacements of sorted, non-overlapping `detections` into `text`.
///
/// Detections that overlap an earlier one or fall outside `text` are ignored.
pub fn assemble(text: &str, detections: &[Detection]) -> String {
    if detections.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0usize;
    for detection in detections {
        if detection.start < cursor {
            continue;
        }
        let Some(between) = text.get(cursor..detection.start) else {
            continue;
        };
        if text.get(detection.start..detection.end).is_none() {
            continue;
        }
        out.push_str(between);
        out.push_str(&detection.replacement);
        cursor = detection.end;
    }
    out.push_str(&text[cursor..]);
    out
}

/// One-line human summary of what a rewrite changed.
pub fn change_summary(changes: &[Detection]) -> String {
    if changes.is_empty() {
        return NOTHING_TO_CHANGE.to_string();
    }
    let count = |category: Category| changes.iter().filter(|d| d.category == category).count();

    let mut parts = Vec::new();
    let profanity = count(Category::Profanity);
    if profanity > 0 {
        parts.push(format!("{profanity} profanity"));
    }
    for (category, noun) in [
        (Category::Insult, "insult"),
        (Category::Aggressive, "aggressive phrase"),
        (Category::PassiveAggressive, "passive-aggressive phrase"),
        (Category::Sarcasm, "sarcastic phrase"),
        (Category::ClauseAttack, "hostile sentence group"),
        (Category::ClauseFrustration, "frustrated sentence group"),
    ] {
        let n = count(category);
        if n > 0 {
            parts.push(plural(n, noun, &format!("{noun}s")));
        }
    }

    let persuasion: Vec<String> = [
        (Category::PersuasionHedging, "hedging", "hedging"),
        (Category::PersuasionApologies, "apology", "apologies"),
        (Category::PersuasionQualifiers, "qualifier", "qualifiers"),
        (Category::PersuasionCommitments, "commitment", "commitments"),
        (Category::PersuasionValidation, "validation", "validations"),
        (Category::PersuasionFollowups, "follow-up", "follow-ups"),
    ]
    .into_iter()
    .filter_map(|(category, one, many)| {
        let n = count(category);
        (n > 0).then(|| plural(n, one, many))
    })
    .collect();
    if !persuasion.is_empty() {
        parts.push(format!("persuasion ({})", persuasion.join(", ")));
    }

    format!("Transformed {}", parts.join(", "))
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

/// Lays text out as a short email with a greeting and a sign-off.
pub fn format_as_email(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').filter(|l| !l.trim().is_empty()).collect();
    let (Some(first), Some(last)) = (lines.first(), lines.last()) else {
        return text.to_string();
    };

    let mut email = String::new();
    let opening = first.to_lowercase();
    if !["hi", "hello", "dear"].iter().any(|g| opening.starts_with(g)) {
        email.push_str("Hi,\n\n");
    }
    email.push_str(&lines.join("\n\n"));

    let closing = last.to_lowercase();
    if !["thanks", "regards", "best", "sincerely"]
        .iter()
        .any(|s| closing.contains(s))
    {
        email.push_str("\n\nBest regards");
    }
    email
}
