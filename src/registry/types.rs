//! Registry types and error definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// A single country, identified only by its display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Country {
    pub name: String,
}

impl Country {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Renders as `{Name}`, the record form shown on the HTML page.
impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.name)
    }
}

/// Fold text for case-insensitive comparison, one character at a time.
///
/// Each character is uppercased and then lowercased, so case variants such as
/// `Σ`, `σ` and final `ς` fold to the same text wherever they appear.
pub fn fold_case(text: &str) -> String {
    text.chars()
        .flat_map(char::to_uppercase)
        .flat_map(char::to_lowercase)
        .collect()
}

/// Registry entry with its name case-folded ahead of time.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) country: Country,
    pub(crate) folded: String,
}

/// Immutable snapshot of every country known to the service.
///
/// Built once during startup and shared read-only between request handlers.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Build a registry from a list of countries.
    pub fn new(countries: Vec<Country>) -> Self {
        let entries = countries
            .into_iter()
            .map(|country| Entry {
                folded: fold_case(&country.name),
                country,
            })
            .collect();
        Self { entries }
    }

    /// Number of countries in the registry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the countries in load order.
    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.entries.iter().map(|e| &e.country)
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }
}

impl FromIterator<Country> for Registry {
    fn from_iter<I: IntoIterator<Item = Country>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Errors that can occur while loading the registry.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The configured registry URL is not a valid URL.
    #[error("Invalid registry URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Connection or transfer failed.
    #[error("Registry request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The fetch did not complete before the deadline.
    #[error("Registry fetch timed out after {0} seconds")]
    Timeout(u64),

    /// The registry answered with a non-success status.
    #[error("Registry returned HTTP {0}")]
    Status(u16),

    /// The body is not a `{key: {item: [..]}}` document.
    #[error("Malformed registry body: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record carried no items, so there is no country to take.
    #[error("Registry record '{0}' has no items")]
    EmptyRecord(String),
}

/// Result type for registry loading.
pub type LoadResult<T> = Result<T, LoadError>;
