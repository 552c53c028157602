//! Lexical relevance ranking for local stores.

use crate::model::MemoryItem;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Terms shorter than this carry too little signal to score.
const MIN_TERM_CHARS: usize = 3;

/// Lower-cased alphanumeric terms of a text.
fn terms(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|term| term.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_lowercase)
        .collect()
}

/// Count of distinct query terms present in the content.
///
/// Terms match on a shared prefix of at least `MIN_TERM_CHARS` characters so
/// that simple inflections (`tree`/`trees`) still overlap.
fn overlap(query_terms: &HashSet<String>, content: &str) -> usize {
    let content_terms = terms(content);
    query_terms
        .iter()
        .filter(|query_term| {
            content_terms
                .iter()
                .any(|content_term| stem_match(query_term, content_term))
        })
        .count()
}

fn stem_match(a: &str, b: &str) -> bool {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    long.starts_with(short)
}

/// Order items by relevance to the query, newest first on ties, capped at `limit`.
///
/// Items without any overlapping term stay eligible; no threshold is applied.
pub(crate) fn rank(query: &str, items: Vec<MemoryItem>, limit: usize) -> Vec<MemoryItem> {
    let query_terms = terms(query);
    let mut scored = items
        .into_iter()
        .map(|item| (overlap(&query_terms, &item.content), item))
        .collect::<Vec<_>>();
    scored.sort_by(|(score_a, item_a), (score_b, item_b)| {
        match score_b.cmp(score_a) {
            Ordering::Equal => item_b.created_at.cmp(&item_a.created_at),
            other => other,
        }
    });
    scored.truncate(limit);
    scored.into_iter().map(|(_, item)| item).collect()
}
