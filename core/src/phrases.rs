//! Category-tagged phrase groups and the phrase scan.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::words::capitalize_first;
use crate::zones::{contains_protected, MaskedText};
use crate::{Category, Detection};

type PhraseTable = &'static [(&'static str, &'static str)];

const AGGRESSIVE: PhraseTable = &[
    (r"\byou always\b", "it sometimes happens that"),
    (r"\byou never\b", "it would be helpful if"),
    (r"\bwhy can't you\b", "would it be possible to"),
    (r"\bwhy don't you\b", "perhaps you could"),
    (r"\bwhy didn't you\b", "I was wondering if you had considered"),
    (r"\bI told you\b", "as I mentioned"),
    (r"\bI already told you\b", "as previously discussed"),
    (r"\bthis is ridiculous\b", "this is unexpected"),
    (r"\bthis is unacceptable\b", "this needs attention"),
    (r"\bI'm sick of\b", "I'd like to address"),
    (r"\bI'm tired of\b", "I'd appreciate if we could change"),
    (r"\bI'm fed up with\b", "I'd like to find a solution for"),
    (r"\bwhat's wrong with you\b", "could you help me understand"),
    (r"\bare you serious\b", "I'd like to clarify"),
    (r"\byou should have\b", "it might have helped to"),
    (r"\byou need to\b", "it would be beneficial to"),
    (r"\byou have to\b", "it would help if you could"),
    (r"\byou must\b", "I'd recommend"),
    (r"\bfigure it out\b", "work through the details"),
    (r"\bget it together\b", "organize things"),
    (r"\bI don't care\b", "I'm flexible on this"),
    (r"\bI don't have time\b", "my schedule is currently limited"),
    (
        r"\bthat's not my job\b",
        "that falls outside my current responsibilities",
    ),
    (
        r"\bthat's not my problem\b",
        "I may not be the best person to address this",
    ),
    (r"\bobviously\b", "as you may know"),
    (r"\bclearly\b", "it appears that"),
];

// "just checking in" and "just following up" live with the follow-ups.
const PASSIVE_AGGRESSIVE: PhraseTable = &[
    (r"\bper my last email\b", "as I mentioned"),
    (r"\bper my previous email\b", "as I noted earlier"),
    (r"\bas per my email\b", "following up on my note"),
    (r"\bas I already mentioned\b", "to reiterate"),
    (r"\bas I said before\b", "to clarify"),
    (r"\bas previously stated\b", "as noted"),
    (r"\bgoing forward\b", "from now on"),
    (r"\bjust to be clear\b", "to ensure alignment"),
    (r"\bI was under the impression\b", "I understood that"),
    (r"\bnot sure if you saw\b", "following up on"),
    (r"\bnot sure if you got\b", "checking in on"),
    (r"\bfriendly reminder\b", "reminder"),
    (r"\bgentle reminder\b", "quick note"),
    (r"\bkindly\b", "please"),
    (
        r"\bwith all due respect\b",
        "I'd like to offer a different perspective",
    ),
    (r"\bno offense,? but\b", "from my perspective"),
    (r"\bnot to be rude,? but\b", "I wanted to mention"),
    (r"\bI find it interesting that\b", "I noticed that"),
    (r"\bthanks for finally\b", "thank you for"),
    (r"\bwhenever you get a chance\b", "when you have time"),
    (r"\bwhenever you have time\b", "at your convenience"),
    (
        r"\bI'll let you figure that out\b",
        "please let me know if you need help",
    ),
    (r"\bthat's fine\b", "that works"),
    (r"\bwhatever you think\b", "I trust your judgment"),
    (r"\bif that's what you want\b", "if you'd prefer that approach"),
];

const SARCASM: PhraseTable = &[
    (r"\boh,?\s+great\.{2,}", "this is concerning"),
    (r"\boh,?\s+wonderful\.{2,}", "I have concerns about this"),
    (r"\bwow,?\s+brilliant\.{2,}", "I'd like to discuss this approach"),
    (r"\byeah,?\s+sure\.{2,}", "I understand"),
    (r"\breal genius\b", "an interesting approach"),
    (r"\bthanks for nothing\b", "I would have appreciated more support"),
    (r"\bthat'?s just perfect\.{2,}", "I have some concerns about this"),
    (r"\bhow convenient\.{2,}", "I notice the timing of this"),
    (r"\bfascinating\.{2,}", "I'd like to understand this better"),
    (r"\bhow original\.{2,}", "this seems familiar"),
    (r"\bwell done\.{2,}", "let's review this"),
    (r"\bslow clap\b", "I have feedback on this"),
    (r"\bgood luck with that\.{2,}", "that approach may be challenging"),
    (r"\bsounds like a plan\.{2,}", "I have concerns about this plan"),
    (r"\bcouldn'?t be happier\.{2,}", "I'm not satisfied with this"),
];

const HEDGING: PhraseTable = &[
    (r"\bi think we should\b", "I recommend we"),
    (r"\bi think\b", "based on my analysis"),
    (r"\bi believe\b", "the evidence suggests"),
    (r"\bi feel like\b", "my assessment is"),
    (r"\bin my opinion\b,?\s*we should\b", "We should"),
    (r"\bi guess\b", "my understanding is"),
    (r"\bmaybe we could\b", "let's consider"),
    (r"\bi could be wrong,?\s+but\s+", "one perspective is "),
    (r"\bi might be wrong,?\s+but\s+", "here's what I'm seeing: "),
    (r"\bi may be wrong,?\s+but\s+", "based on what we know, "),
    (r"\bi might be wrong\b,?\s*", "here's what I'm seeing: "),
    (r"\bi may be wrong\b,?\s*", "based on what we know, "),
];

const APOLOGIES: PhraseTable = &[
    (r"\bsorry to bother you\b,?\s+but\s+", ""),
    (r"\bsorry to bother you\b[,.]?\s*", ""),
    (r"\bsorry,?\s+but\s+", "however "),
    (r"\bI'm no expert,?\s+but\s+", "based on my experience, "),
    (
        r"\bthis might be a stupid question,?\s+but\s+",
        "to clarify, ",
    ),
    (
        r"\bthis might be a silly idea,?\s+but\s+",
        "one approach to consider: ",
    ),
    (r"\bforgive me for asking\b,?\s+but\s+", "I'd like to understand "),
    (r"\bforgive me for asking\b[,.]?\s*", "I'd like to understand "),
    (r"\bI'm just saying\b[,.]?\s*", ""),
];

const QUALIFIERS: PhraseTable = &[
    (r"\bjust wanted to\b", "I'm writing to"),
    (r"\bjust my two cents\b[,:]?\s*", "my recommendation is "),
    (r"\bi just think\b", "I recommend"),
    (r"\bactually,?\s+", ""),
    (r"\bkind of\b\s*", ""),
    (r"\bsort of\b\s*", ""),
    (r"\ba little bit\b\s*", ""),
    (r"\bbasically\b,?\s*", ""),
    (r"\bhonestly\b,?\s*", ""),
    (r"\bto be honest\b,?\s*", ""),
    (r"\bliterally\b,?\s*", ""),
    (r"\bvery good\b", "excellent"),
    (r"\bvery bad\b", "unacceptable"),
    (r"\bvery important\b", "critical"),
    (r"\bvery helpful\b", "invaluable"),
];

const COMMITMENTS: PhraseTable = &[
    (r"\bI'll try to\b", "I will"),
    (r"\bi should be able to\b", "I will"),
    (r"\bhopefully\b,?\s*", "the expectation is that "),
    (r"\bi was wondering if maybe you could\b", "Could you"),
    (r"\bwe're basically going to maybe try\b", "Our plan is"),
];

const VALIDATION: PhraseTable = &[
    (
        r"\bdoes that make sense\b\??",
        "let me know if you have questions",
    ),
    (
        r"\bdid that make sense\b\??",
        "I'm happy to elaborate if helpful",
    ),
    (r"\bif that makes sense\b,?\s*", "to summarize, "),
    (r"\s*,?\s*if that's (okay|ok)\b\.?", ""),
    (r"\s*,\s*right\?", ""),
    (r"\s*,\s*you know\?", ""),
];

const FOLLOWUPS: PhraseTable = &[
    (r"\bjust following up\b", "following up"),
    (r"\bjust checking in\b", "following up"),
    (r"\bhope you're well\b[.!]?\s*", ""),
    (r"\bi hope you're well\b[.!]?\s*", ""),
    (
        r"\bhappy to help with whatever you need\b[.!]?\s*",
        "I can support this. What would be most useful?",
    ),
    (r"\bwhen you get a chance\b,?\s*", ""),
    (r"\bno worries if not\b[,.]?\s*", ""),
    (r"\bfeel free to\b", "please"),
];

/// Built-in groups in scan order.
static BUILTIN_GROUPS: Lazy<Vec<PhraseGroup>> = Lazy::new(|| {
    [
        (Category::Aggressive, AGGRESSIVE),
        (Category::PassiveAggressive, PASSIVE_AGGRESSIVE),
        (Category::PersuasionHedging, HEDGING),
        (Category::PersuasionApologies, APOLOGIES),
        (Category::PersuasionQualifiers, QUALIFIERS),
        (Category::PersuasionCommitments, COMMITMENTS),
        (Category::PersuasionValidation, VALIDATION),
        (Category::PersuasionFollowups, FOLLOWUPS),
        (Category::Sarcasm, SARCASM),
    ]
    .into_iter()
    .map(|(category, table)| PhraseGroup {
        category,
        rules: table
            .iter()
            .map(|&(pattern, replacement)| PhraseRule {
                regex: compile_phrase(pattern).expect("static phrase regex"),
                replacement: replacement.to_string(),
            })
            .collect(),
    })
    .collect()
});

/// Compiles a phrase pattern case-insensitively.
pub(crate) fn compile_phrase(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("(?i){pattern}"))
}

#[derive(Debug, Clone)]
pub(crate) struct PhraseRule {
    pub(crate) regex: Regex,
    pub(crate) replacement: String,
}

/// One category tag and its ordered rules.
#[derive(Debug, Clone)]
pub(crate) struct PhraseGroup {
    pub(crate) category: Category,
    pub(crate) rules: Vec<PhraseRule>,
}

/// Built-in groups with `extra` rules appended to the group of their category.
pub(crate) fn build_groups(extra: Vec<(Category, PhraseRule)>) -> Vec<PhraseGroup> {
    let mut groups = BUILTIN_GROUPS.clone();
    for (category, rule) in extra {
        if let Some(group) = groups.iter_mut().find(|g| g.category == category) {
            group.rules.push(rule);
        }
    }
    groups
}

/// Runs every enabled group over the masked view and reports the matches.
pub(crate) fn scan(
    groups: &[PhraseGroup],
    masked: &MaskedText<'_>,
    sarcasm_mode: bool,
    out: &mut Vec<Detection>,
) {
    let text = masked.original();
    for group in groups {
        if group.category == Category::Sarcasm && !sarcasm_mode {
            continue;
        }
        for rule in &group.rules {
            for mat in rule.regex.find_iter(masked.as_str()) {
                if mat.start() == mat.end() || !masked.is_eligible(mat.range()) {
                    continue;
                }
                let Some(original) = text.get(mat.range()) else {
                    continue;
                };
                if contains_protected(original) {
                    continue;
                }
                out.push(Detection {
                    category: group.category,
                    original: original.to_string(),
                    replacement: match_phrase_case(text, mat.start(), original, &rule.replacement),
                    start: mat.start(),
                    end: mat.end(),
                });
            }
        }
    }
}

/// Uppercase stays uppercase; a match opening a sentence gets a capital.
pub(crate) fn match_phrase_case(
    text: &str,
    start: usize,
    original: &str,
    replacement: &str,
) -> String {
    if original == original.to_uppercase() {
        return replacement.to_uppercase();
    }
    if is_sentence_start(text, start) {
        return capitalize_first(replacement);
    }
    replacement.to_string()
}

/// Whether `start` begins a sentence: only whitespace and opening
/// quotes/brackets separate it from the text start or a terminator.
pub(crate) fn is_sentence_start(text: &str, start: usize) -> bool {
    let mut before = text[..start]
        .chars()
        .rev()
        .skip_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '"' | '\'' | '(' | '[' | '{'));
    match before.next() {
        None => true,
        Some(c) => matches!(c, '.' | '!' | '?' | '\n' | '\r'),
    }
}
