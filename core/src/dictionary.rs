//! Built-in word lists. Loaded once per process and never mutated.

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;

use crate::Category;

const PROFANITY: &[(&str, &str)] = &[
    ("fuck", "heck"),
    ("fucking", "freaking"),
    ("fuckin", "freaking"),
    ("fucked", "messed up"),
    ("motherfucking", "freaking"),
    ("wtf", "what the heck"),
    ("stfu", "please stop"),
    ("shit", "stuff"),
    ("shitty", "lousy"),
    ("bullshit", "nonsense"),
    ("horseshit", "nonsense"),
    ("damn", "darn"),
    ("damned", "darned"),
    ("dammit", "darn it"),
    ("damnit", "darn it"),
    ("goddamn", "gosh darn"),
    ("goddammit", "gosh darn it"),
    ("hell", "heck"),
    ("crap", "junk"),
    ("crappy", "poor"),
    ("pissed", "upset"),
    ("ass", "butt"),
    ("asshole", "jerk"),
    ("assholes", "jerks"),
    ("bitching", "complaining"),
];

const INSULTS: &[(&str, &str)] = &[
    ("idiot", "person"),
    ("idiots", "people"),
    ("idiotic", "unwise"),
    ("stupid", "misguided"),
    ("moron", "person"),
    ("morons", "people"),
    ("moronic", "unwise"),
    ("dumb", "uninformed"),
    ("dumbass", "person"),
    ("imbecile", "person"),
    ("incompetent", "inexperienced"),
    ("loser", "person"),
    ("losers", "people"),
    ("fool", "person"),
    ("fools", "people"),
    ("clown", "person"),
    ("clowns", "people"),
    ("jackass", "person"),
    ("bitch", "person"),
    ("bitchy", "grumpy"),
    ("bastard", "person"),
    ("bastards", "people"),
    ("dick", "jerk"),
    ("dickhead", "jerk"),
    ("prick", "jerk"),
    ("cunt", "person"),
    ("twat", "person"),
    ("wanker", "jerk"),
    ("fucker", "jerk"),
    ("motherfucker", "jerk"),
    ("pathetic", "disappointing"),
    ("useless", "unhelpful"),
    ("worthless", "unhelpful"),
];

/// Where a blacklisted obscenity may sit relative to surrounding letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Boundary {
    Anywhere,
    WordStart,
    WholeWord,
}

/// Obscenity cores for the multi-pattern scan. Matches are widened to a
/// dictionary key afterwards, so `shit` also covers `bullshit`.
pub(crate) const OBSCENITY_TERMS: &[(&str, Boundary)] = &[
    ("fuck", Boundary::Anywhere),
    ("shit", Boundary::Anywhere),
    ("ass", Boundary::WholeWord),
    ("asshole", Boundary::Anywhere),
    ("asshat", Boundary::Anywhere),
    ("dumbass", Boundary::Anywhere),
    ("jackass", Boundary::Anywhere),
    ("bitch", Boundary::Anywhere),
    ("bastard", Boundary::Anywhere),
    ("damn", Boundary::Anywhere),
    ("dammit", Boundary::Anywhere),
    ("cunt", Boundary::Anywhere),
    ("dick", Boundary::WholeWord),
    ("dickhead", Boundary::Anywhere),
    ("cock", Boundary::WholeWord),
    ("prick", Boundary::WholeWord),
    ("piss", Boundary::WordStart),
    ("crap", Boundary::WordStart),
    ("twat", Boundary::WholeWord),
    ("wanker", Boundary::Anywhere),
    ("whore", Boundary::Anywhere),
    ("slut", Boundary::Anywhere),
    ("wtf", Boundary::WholeWord),
    ("stfu", Boundary::WholeWord),
];

/// Innocent words that contain an obscenity core.
pub(crate) const WHITELISTED_TERMS: &[&str] = &[
    "assess",
    "assessed",
    "assesses",
    "assessing",
    "assessment",
    "assessments",
    "assessor",
    "assessors",
    "scunthorpe",
    "shiitake",
    "cocktail",
    "cockpit",
    "peacock",
    "hancock",
    "dickens",
    "dickinson",
    "dickson",
];

/// Terms worth catching when misspelled. Order breaks distance ties.
pub(crate) const HIGH_IMPACT_TERMS: &[&str] = &[
    "fuck", "fucking", "fucked", "shit", "bullshit", "damn", "bitch", "bastard", "asshole",
    "idiot", "stupid", "moron",
];

/// Everyday words one edit away from a high-impact term.
pub(crate) const SAFE_WORDS: &[&str] = &[
    "assess", "asset", "assets", "shell", "craft", "funk", "duck", "luck", "buck", "muck",
    "puck", "tuck", "suck", "yuck", "huck", "ducking", "tucking", "sucking", "bucking",
    "mucking", "pucking", "ducked", "tucked", "sucked", "bucked", "mucked", "shot", "shut",
    "suit", "spit", "slit", "skit", "snit", "smit", "whit", "chit", "shin", "ship", "shim",
    "shiv", "shift", "shirt", "hit", "sit", "dam", "dame", "damp", "darn", "dawn", "dams",
    "dan", "pitch", "ditch", "witch", "hitch", "batch", "botch", "butch", "birch", "fitch",
    "mitch", "dastard", "idiom", "idioms", "boron", "moran", "morn", "moon",
];

/// Merged profanity and insult replacements.
pub(crate) struct WordDictionary {
    entries: Vec<(&'static str, &'static str)>,
    replacements: HashMap<&'static str, &'static str>,
    insults: HashSet<&'static str>,
    keys_longest_first: Vec<&'static str>,
}

impl WordDictionary {
    fn build() -> Self {
        let mut entries: Vec<(&'static str, &'static str)> = Vec::new();
        let mut replacements = HashMap::new();
        for &(key, value) in PROFANITY.iter().chain(INSULTS.iter()) {
            if replacements.insert(key, value).is_none() {
                entries.push((key, value));
            } else if let Some(entry) = entries.iter_mut().find(|(k, _)| *k == key) {
                entry.1 = value;
            }
        }
        let insults = INSULTS.iter().map(|(key, _)| *key).collect();
        let mut keys_longest_first: Vec<&'static str> = entries.iter().map(|(k, _)| *k).collect();
        keys_longest_first.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            entries,
            replacements,
            insults,
            keys_longest_first,
        }
    }

    pub(crate) fn get(&self, word: &str) -> Option<&'static str> {
        self.replacements.get(word).copied()
    }

    pub(crate) fn category_of(&self, word: &str) -> Category {
        if self.insults.contains(word) {
            Category::Insult
        } else {
            Category::Profanity
        }
    }

    pub(crate) fn keys_longest_first(&self) -> &[&'static str] {
        &self.keys_longest_first
    }

    /// Insult keys, the target set for hostile "you ..." clauses.
    pub(crate) fn insult_words(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.insults.iter().copied()
    }

    /// Loose containment lookup used when a scan hit has no exact key.
    /// Over-matches on short keys.
    pub(crate) fn closest_replacement(&self, word: &str) -> Option<&'static str> {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_ascii_lowercase())
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(key, _)| cleaned.contains(key) || key.contains(cleaned.as_str()))
            .map(|(_, value)| *value)
    }
}

pub(crate) static WORDS: Lazy<WordDictionary> = Lazy::new(WordDictionary::build);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insult_keys_are_categorized() {
        assert_eq!(WORDS.get("idiots"), Some("people"));
        assert_eq!(WORDS.category_of("idiots"), Category::Insult);
        assert_eq!(WORDS.category_of("bullshit"), Category::Profanity);
    }

    #[test]
    fn keys_are_sorted_longest_first() {
        let keys = WORDS.keys_longest_first();
        assert!(keys.windows(2).all(|w| w[0].len() >= w[1].len()));
        assert_eq!(keys.len(), PROFANITY.len() + INSULTS.len());
    }

    #[test]
    fn closest_replacement_uses_containment() {
        assert_eq!(WORDS.closest_replacement("shitshow"), Some("stuff"));
        assert_eq!(WORDS.closest_replacement("slut"), None);
        assert_eq!(WORDS.closest_replacement("123"), None);
    }

    #[test]
    fn fuzzy_lists_do_not_collide_with_dictionary() {
        for word in SAFE_WORDS {
            assert!(WORDS.get(word).is_none(), "{word} is both safe and flagged");
        }
        for term in HIGH_IMPACT_TERMS {
            assert!(WORDS.get(term).is_some(), "{term} has no replacement");
        }
    }
}
