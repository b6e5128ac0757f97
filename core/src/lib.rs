//! Worksafe core rewrite engine.
//! Detects profanity, insults, hostile and passive-aggressive phrasing, and
//! persuasion-weakening hedges in workplace text, and proposes a minimal set
//! of non-overlapping replacements that leave quoted replies, code fences,
//! URLs, handles, and channels untouched.

mod clauses;
mod config;
mod dictionary;
mod phrases;
mod resolve;
mod rewrite;
mod sentences;
mod tokens;
mod words;
mod zones;

use std::ops::Range;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use clauses::AdjacencyRule;
pub use config::{ClauseConfig, Config, ConfigError, CustomPhrase, FuzzyConfig, SequenceConfig};
pub use rewrite::{assemble, change_summary, format_as_email, TransformResult};
pub use sentences::SentenceSpan;
pub use tokens::{tokenize, Token};
pub use zones::MaskedText;

use phrases::{PhraseGroup, PhraseRule};
use words::{WordMatcher, OBSCENITY};

/// Detection category identifiers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[serde(rename = "clause-rewrite-attack")]
    ClauseAttack,
    #[serde(rename = "clause-rewrite-frustration")]
    ClauseFrustration,
    Aggressive,
    PassiveAggressive,
    Sarcasm,
    PersuasionHedging,
    PersuasionApologies,
    PersuasionQualifiers,
    PersuasionCommitments,
    PersuasionValidation,
    PersuasionFollowups,
    Profanity,
    Insult,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::ClauseAttack,
        Category::ClauseFrustration,
        Category::Aggressive,
        Category::PassiveAggressive,
        Category::Sarcasm,
        Category::PersuasionHedging,
        Category::PersuasionApologies,
        Category::PersuasionQualifiers,
        Category::PersuasionCommitments,
        Category::PersuasionValidation,
        Category::PersuasionFollowups,
        Category::Profanity,
        Category::Insult,
    ];

    /// Tie-break rank when candidates share a span; lower wins.
    pub fn priority(self) -> u8 {
        match self {
            Category::ClauseAttack => 0,
            Category::ClauseFrustration => 1,
            Category::Aggressive => 2,
            Category::PassiveAggressive => 3,
            Category::Sarcasm => 4,
            Category::PersuasionHedging => 5,
            Category::PersuasionApologies => 6,
            Category::PersuasionQualifiers => 7,
            Category::PersuasionCommitments => 8,
            Category::PersuasionValidation => 9,
            Category::PersuasionFollowups => 10,
            Category::Profanity => 11,
            Category::Insult => 12,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::ClauseAttack => "clause-rewrite-attack",
            Category::ClauseFrustration => "clause-rewrite-frustration",
            Category::Aggressive => "aggressive",
            Category::PassiveAggressive => "passive-aggressive",
            Category::Sarcasm => "sarcasm",
            Category::PersuasionHedging => "persuasion-hedging",
            Category::PersuasionApologies => "persuasion-apologies",
            Category::PersuasionQualifiers => "persuasion-qualifiers",
            Category::PersuasionCommitments => "persuasion-commitments",
            Category::PersuasionValidation => "persuasion-validation",
            Category::PersuasionFollowups => "persuasion-followups",
            Category::Profanity => "profanity",
            Category::Insult => "insult",
        }
    }

    /// Categories backed by phrase groups, the only ones custom rules may target.
    pub fn is_phrase(self) -> bool {
        !matches!(
            self,
            Category::ClauseAttack
                | Category::ClauseFrustration
                | Category::Profanity
                | Category::Insult
        )
    }

    pub fn is_persuasion(self) -> bool {
        matches!(
            self,
            Category::PersuasionHedging
                | Category::PersuasionApologies
                | Category::PersuasionQualifiers
                | Category::PersuasionCommitments
                | Category::PersuasionValidation
                | Category::PersuasionFollowups
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A proposed replacement over `start..end` (UTF-8 byte offsets) of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    pub category: Category,
    pub original: String,
    pub replacement: String,
    pub start: usize,
    pub end: usize,
}

impl Detection {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectOptions {
    pub sarcasm_mode: bool,
}

/// Compiled rules, reusable across texts and threads.
pub struct Engine {
    config: Config,
    words: WordMatcher,
    phrase_groups: Vec<PhraseGroup>,
    attack: AdjacencyRule,
    frustration: AdjacencyRule,
}

impl Engine {
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut custom = Vec::with_capacity(config.custom_phrases.len());
        for phrase in &config.custom_phrases {
            let regex = phrases::compile_phrase(&phrase.pattern).map_err(|source| {
                ConfigError::InvalidPattern {
                    pattern: phrase.pattern.clone(),
                    source,
                }
            })?;
            custom.push((
                phrase.category,
                PhraseRule {
                    regex,
                    replacement: phrase.replacement.clone(),
                },
            ));
        }
        Ok(Self::build(config, custom))
    }

    fn build(config: Config, custom: Vec<(Category, PhraseRule)>) -> Self {
        Self {
            words: WordMatcher::new(config.fuzzy.clone()),
            phrase_groups: phrases::build_groups(custom),
            attack: AdjacencyRule::attack(config.clause.window),
            frustration: AdjacencyRule::frustration(config.clause.window),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Options carrying the configured defaults.
    pub fn default_options(&self) -> DetectOptions {
        DetectOptions {
            sarcasm_mode: self.config.sarcasm_mode,
        }
    }

    /// Final detections for `text`, sorted by start and non-overlapping.
    pub fn detect(&self, text: &str, options: &DetectOptions) -> Vec<Detection> {
        let masked = MaskedText::new(text);
        let tokens = tokenize(text, masked.as_str());
        let sentences = sentences::segment_masked(&masked);

        let mut candidates = Vec::new();
        self.words.scan_obscenity(&masked, &mut candidates);
        self.words.scan_words(&masked, &mut candidates);
        let word_count = candidates.len();
        phrases::scan(
            &self.phrase_groups,
            &masked,
            options.sarcasm_mode,
            &mut candidates,
        );
        let phrase_count = candidates.len() - word_count;
        clauses::match_sequences(
            &masked,
            &sentences,
            &tokens,
            self.config.sequences.max_gap,
            &mut candidates,
        );
        let sequence_count = candidates.len() - word_count - phrase_count;
        candidates.retain(|d| masked.is_eligible(d.range()));

        let clause_outcome = clauses::detect_clauses(
            &masked,
            &sentences,
            &tokens,
            &self.attack,
            &self.frustration,
            self.config.clause.threshold,
        );
        debug!(
            words = word_count,
            phrases = phrase_count,
            sequences = sequence_count,
            clauses = clause_outcome.detections.len(),
            skipped = clause_outcome.skipped.len(),
            "collected candidates"
        );
        candidates.extend(clause_outcome.detections);

        let selected = resolve::resolve(candidates, &clause_outcome.skipped);
        debug!(selected = selected.len(), "resolved detections");
        selected
    }

    pub fn transform(&self, text: &str, options: &DetectOptions) -> TransformResult {
        TransformResult::new(text, self.detect(text, options))
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(Config::default(), Vec::new())
    }
}

static DEFAULT_ENGINE: Lazy<Engine> = Lazy::new(Engine::default);

/// Detections for `text` under the built-in configuration.
pub fn detect_issues(text: &str, options: &DetectOptions) -> Vec<Detection> {
    DEFAULT_ENGINE.detect(text, options)
}

pub fn transform_text(text: &str) -> TransformResult {
    transform_text_with(text, &DetectOptions::default())
}

pub fn transform_text_with(text: &str, options: &DetectOptions) -> TransformResult {
    DEFAULT_ENGINE.transform(text, options)
}

/// Whether the obscenity matcher fires anywhere in the raw text.
///
/// Excluded zones are not masked here.
pub fn has_profanity(text: &str) -> bool {
    OBSCENITY.has_match(text)
}

pub fn segment_sentences(text: &str) -> Vec<SentenceSpan> {
    sentences::segment_masked(&MaskedText::new(text))
}

pub fn mask_zones(text: &str) -> MaskedText<'_> {
    MaskedText::new(text)
}
