use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Category;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Default for `DetectOptions::sarcasm_mode` in frontends.
    pub sarcasm_mode: bool,
    pub fuzzy: FuzzyConfig,
    pub clause: ClauseConfig,
    pub sequences: SequenceConfig,
    pub custom_phrases: Vec<CustomPhrase>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sarcasm_mode: false,
            fuzzy: FuzzyConfig::default(),
            clause: ClauseConfig::default(),
            sequences: SequenceConfig::default(),
            custom_phrases: Vec::new(),
        }
    }
}

/// Bounds for the misspelling tier of the word matcher.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FuzzyConfig {
    pub max_edit_distance: usize,
    pub min_word_length: usize,
    pub max_length_delta: usize,
    pub extra_safe_words: Vec<String>,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: 1,
            min_word_length: 3,
            max_length_delta: 1,
            extra_safe_words: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClauseConfig {
    /// Tokens scanned after a trigger word.
    pub window: usize,
    /// Minimum adjacency score for a clause rewrite.
    pub threshold: f64,
}

impl Default for ClauseConfig {
    fn default() -> Self {
        Self {
            window: 6,
            threshold: 0.2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SequenceConfig {
    /// Filler tokens allowed between the words of a loose sequence.
    pub max_gap: usize,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self { max_gap: 3 }
    }
}

/// Extra phrase rule appended to the built-in group of `category`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomPhrase {
    pub category: Category,
    pub pattern: String,
    pub replacement: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid phrase pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
    #[error("category `{category}` does not accept phrase rules")]
    UnsupportedCategory { category: Category },
    #[error("clause window must be at least 1")]
    InvalidWindow,
    #[error("clause threshold {value} is outside (0, 1]")]
    InvalidThreshold { value: f64 },
}

impl Config {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.clause.window == 0 {
            return Err(ConfigError::InvalidWindow);
        }
        let threshold = self.clause.threshold;
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(ConfigError::InvalidThreshold { value: threshold });
        }
        for phrase in &self.custom_phrases {
            if !phrase.category.is_phrase() {
                return Err(ConfigError::UnsupportedCategory {
                    category: phrase.category,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_window_and_bad_threshold() {
        let mut config = Config::default();
        config.clause.window = 0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidWindow)));

        let mut config = Config::default();
        config.clause.threshold = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));
        config.clause.threshold = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn word_categories_cannot_take_phrases() {
        let config = Config {
            custom_phrases: vec![CustomPhrase {
                category: Category::Profanity,
                pattern: "heck".into(),
                replacement: "gosh".into(),
            }],
            ..Config::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "category `profanity` does not accept phrase rules"
        );
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"clause": {"window": 4}, "sarcasm_mode": true}"#)
                .expect("config json");
        assert!(config.sarcasm_mode);
        assert_eq!(config.clause.window, 4);
        assert_eq!(config.clause.threshold, 0.2);
        assert_eq!(config.fuzzy, FuzzyConfig::default());
    }
}
