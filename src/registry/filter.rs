//! Letter filter.
//!
//! # Responsibilities
//! - Narrow the registry to countries containing every letter of a query
//! - Order results for presentation
//!
//! # Design Decisions
//! - AND semantics across letters, not substring matching of the whole query
//! - Case folded on both sides; names are pre-folded in the registry
//! - Non-letters are matched literally, no special-casing
//! - Empty query narrows nothing and yields the full registry
//! - Filtering is total: no matches is an empty Vec, never an error

use crate::registry::types::{fold_case, Country, Entry, Registry};

/// Countries whose name contains every character of `letters`, in registry order.
pub fn filter(letters: &str, registry: &Registry) -> Vec<Country> {
    let mut matched: Vec<&Entry> = registry.entries().iter().collect();

    let mut buf = [0u8; 4];
    for letter in letters.chars() {
        if matched.is_empty() {
            break;
        }
        let needle = fold_case(letter.encode_utf8(&mut buf));
        matched.retain(|entry| entry.folded.contains(needle.as_str()));
    }

    matched.into_iter().map(|e| e.country.clone()).collect()
}

/// Stable ascending sort by name, using ordinal byte comparison.
pub fn sort_by_name(countries: &mut [Country]) {
    countries.sort_by(|a, b| a.name.cmp(&b.name));
}

impl Registry {
    /// Filter and sort in one step, as the HTTP handlers present results.
    pub fn matching(&self, letters: &str) -> Vec<Country> {
        let mut matches = filter(letters, self);
        sort_by_name(&mut matches);
        matches
    }
}
