//! # List Filtering
//!
//! Turns a raw search-field string plus the caller's items into the list to
//! display. No term → everything in natural order. A term → fuzzy-ranked
//! subset, best match first.
//!
//! Nothing is cached: results are recomputed from whatever items the caller
//! passes in on every call.

use crate::core::fuzzy::Matcher;

/// Highest fuzzy score an item may have and still be shown.
pub const DEFAULT_THRESHOLD: f64 = 0.45;

/// Anything that can be searched by a text key.
pub trait Filterable {
    fn filter_key(&self) -> &str;
}

impl Filterable for String {
    fn filter_key(&self) -> &str {
        self
    }
}

impl Filterable for &str {
    fn filter_key(&self) -> &str {
        self
    }
}

/// A trimmed, lowercased search term. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn normalize(raw: Option<&str>) -> Self {
        Self(raw.map(|s| s.trim().to_lowercase()).unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Filters and ranks `items` with the default threshold.
pub fn filter<T>(term: &SearchTerm, items: &[T]) -> Vec<T>
where
    T: Filterable + Ord + Clone,
{
    filter_with_threshold(term, items, DEFAULT_THRESHOLD)
}

pub fn filter_with_threshold<T>(term: &SearchTerm, items: &[T], threshold: f64) -> Vec<T>
where
    T: Filterable + Ord + Clone,
{
    if items.is_empty() {
        return Vec::new();
    }

    if term.is_empty() {
        let mut sorted = items.to_vec();
        sorted.sort();
        return sorted;
    }

    let matcher = Matcher::default();
    let mut scored: Vec<(&T, f64)> = items
        .iter()
        .filter_map(|item| {
            matcher
                .score(term.as_str(), item.filter_key())
                .filter(|score| *score <= threshold)
                .map(|score| (item, score))
        })
        .collect();

    // sort_by is stable: equal scores keep input order
    scored.sort_by(|a, b| a.1.total_cmp(&b.1));
    scored.into_iter().map(|(item, _)| item.clone()).collect()
}

/// Search state for one list screen.
#[derive(Debug, Clone)]
pub struct FilterSession {
    term: SearchTerm,
    threshold: f64,
}

impl Default for FilterSession {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FilterSession {
    pub fn new(threshold: f64) -> Self {
        Self {
            term: SearchTerm::default(),
            threshold,
        }
    }

    /// Takes the raw search-field text (None when the field is cleared).
    pub fn update_search_term(&mut self, raw: Option<&str>) {
        self.term = SearchTerm::normalize(raw);
    }

    pub fn term(&self) -> &SearchTerm {
        &self.term
    }

    pub fn results<T>(&self, items: &[T]) -> Vec<T>
    where
        T: Filterable + Ord + Clone,
    {
        filter_with_threshold(&self.term, items, self.threshold)
    }
}
