//! Currency code suggestions for partial input.
//!
//! Matching is delegated to the skim scorer; prefix and substring hits are
//! ranked above fuzzy-only hits so that typing "eu" lands on EUR rather
//! than some scattered match.

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

/// Returns candidate codes matching `query`, best first.
pub fn top_matches<'a, I>(query: &str, candidates: I, limit: usize) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if query.trim().is_empty() || limit == 0 {
        return Vec::new();
    }

    let query = query.trim();
    let query_lower = query.to_lowercase();
    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(&'a str, u8, i64)> = Vec::new();
    for candidate in candidates {
        let lower = candidate.to_lowercase();
        let tier = if lower.starts_with(&query_lower) {
            2
        } else if lower.contains(&query_lower) {
            1
        } else {
            0
        };
        match matcher.fuzzy_match(candidate, query) {
            Some(score) => scored.push((candidate, tier, score)),
            None if tier > 0 => scored.push((candidate, tier, 0)),
            None => {}
        }
    }

    scored.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| b.2.cmp(&a.2))
            .then_with(|| a.0.cmp(b.0))
    });
    scored.truncate(limit);

    scored.into_iter().map(|(candidate, _, _)| candidate).collect()
}

/// Auto-selects the code for `query`: the exact (case-insensitive) match if
/// present, otherwise the top suggestion.
pub fn resolve<'a>(query: &str, candidates: &[&'a str]) -> Option<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(exact) = candidates
        .iter()
        .find(|candidate| candidate.eq_ignore_ascii_case(query))
    {
        return Some(exact);
    }

    top_matches(query, candidates.iter().copied(), 1)
        .into_iter()
        .next()
}
