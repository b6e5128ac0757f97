use std::cmp::Ordering;
use std::collections::HashSet;
use std::ops::Range;

use crate::Detection;

/// Picks a non-overlapping subset of `candidates`, sorted by start.
///
/// Candidates are deduplicated by span and category, ordered by start, longest
/// span first, then category priority, then name and replacement, and accepted
/// greedily against the last accepted one. Anything touching a `skipped` range
/// is dropped afterwards.
pub(crate) fn resolve(candidates: Vec<Detection>, skipped: &[Range<usize>]) -> Vec<Detection> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Detection> = candidates
        .into_iter()
        .filter(|d| d.start < d.end && seen.insert((d.start, d.end, d.category)))
        .collect();
    unique.sort_by(compare);

    let mut selected: Vec<Detection> = Vec::with_capacity(unique.len());
    for candidate in unique {
        if let Some(last) = selected.last() {
            if overlaps(&candidate.range(), &last.range()) {
                continue;
            }
        }
        selected.push(candidate);
    }

    selected.retain(|d| !skipped.iter().any(|range| overlaps(&d.range(), range)));
    selected
}

fn compare(a: &Detection, b: &Detection) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.end.cmp(&a.end))
        .then_with(|| a.category.priority().cmp(&b.category.priority()))
        .then_with(|| a.category.name().cmp(b.category.name()))
        .then_with(|| a.replacement.cmp(&b.replacement))
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Category;

    fn det(category: Category, start: usize, end: usize, replacement: &str) -> Detection {
        Detection {
            category,
            original: String::new(),
            replacement: replacement.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn longer_span_wins_at_same_start() {
        let picked = resolve(
            vec![
                det(Category::Profanity, 0, 4, "heck"),
                det(Category::ClauseAttack, 0, 20, "clause"),
                det(Category::Insult, 10, 16, "misguided"),
            ],
            &[],
        );
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].category, Category::ClauseAttack);
    }

    #[test]
    fn priority_breaks_identical_spans() {
        let picked = resolve(
            vec![
                det(Category::Insult, 3, 9, "b"),
                det(Category::Aggressive, 3, 9, "a"),
            ],
            &[],
        );
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].category, Category::Aggressive);
    }

    #[test]
    fn duplicates_collapse_to_first_seen() {
        let picked = resolve(
            vec![
                det(Category::Profanity, 0, 8, "nonsense"),
                det(Category::Profanity, 0, 8, "other"),
                det(Category::Profanity, 9, 13, "darn"),
            ],
            &[],
        );
        let replacements: Vec<&str> = picked.iter().map(|d| d.replacement.as_str()).collect();
        assert_eq!(replacements, vec!["nonsense", "darn"]);
    }

    #[test]
    fn greedy_walk_checks_only_last_selected() {
        let picked = resolve(
            vec![
                det(Category::Aggressive, 0, 5, "a"),
                det(Category::Aggressive, 4, 8, "b"),
                det(Category::Aggressive, 6, 9, "c"),
            ],
            &[],
        );
        let spans: Vec<(usize, usize)> = picked.iter().map(|d| (d.start, d.end)).collect();
        assert_eq!(spans, vec![(0, 5), (6, 9)]);
    }

    #[test]
    fn skipped_ranges_remove_selected_candidates() {
        let picked = resolve(
            vec![
                det(Category::Insult, 2, 8, "misguided"),
                det(Category::Profanity, 20, 24, "heck"),
            ],
            &[0..15],
        );
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].start, 20);
    }
}
