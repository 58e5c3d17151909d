//! Registry loading from the remote country register.
//!
//! # Responsibilities
//! - Issue the single GET against the configured register endpoint
//! - Enforce a deadline on the whole fetch
//! - Parse `{key: {item: [{name}, ..]}}` records into countries
//!
//! # Design Decisions
//! - Only the first item of each record is kept; later items are dropped
//! - Malformed bodies are load errors, never an empty registry
//! - No retries: one failed load is fatal to startup

use serde::Deserialize;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

use crate::config::RegistryConfig;
use crate::registry::types::{Country, LoadError, LoadResult, Registry};

/// Anything that can produce the registry during startup.
pub trait RegistrySource {
    /// Fetch and parse the full registry. Called exactly once.
    fn fetch_registry(&self) -> impl Future<Output = LoadResult<Registry>> + Send;
}

/// In-memory source, used when the registry is already at hand.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistrySource {
    countries: Vec<Country>,
}

impl StaticRegistrySource {
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }
}

impl RegistrySource for StaticRegistrySource {
    fn fetch_registry(&self) -> impl Future<Output = LoadResult<Registry>> + Send {
        let countries = self.countries.clone();
        async move { Ok(Registry::new(countries)) }
    }
}

/// Source backed by the remote register over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRegistrySource {
    client: reqwest::Client,
    url: Url,
    deadline: Duration,
}

impl HttpRegistrySource {
    /// Create a source for the configured endpoint.
    pub fn new(config: &RegistryConfig) -> LoadResult<Self> {
        let url = registry_url(config)?;
        let deadline = Duration::from_secs(config.timeout_secs);

        let mut builder = reqwest::Client::builder()
            .connect_timeout(deadline)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url,
            deadline,
        })
    }

    /// The full URL that will be fetched, page parameters included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn fetch_body(&self) -> LoadResult<Vec<u8>> {
        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(body.to_vec())
    }

    fn classify(&self, err: reqwest::Error) -> LoadError {
        if err.is_timeout() {
            LoadError::Timeout(self.deadline.as_secs())
        } else {
            LoadError::Request(err)
        }
    }
}

impl RegistrySource for HttpRegistrySource {
    fn fetch_registry(&self) -> impl Future<Output = LoadResult<Registry>> + Send {
        async move {
            tracing::info!(url = %self.url, timeout_secs = self.deadline.as_secs(), "Fetching country registry");
            let started = Instant::now();

            let body = match timeout(self.deadline, self.fetch_body()).await {
                Ok(result) => result?,
                Err(_) => return Err(LoadError::Timeout(self.deadline.as_secs())),
            };

            let countries = parse_records(&body)?;

            tracing::info!(
                countries = countries.len(),
                bytes = body.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Country registry fetched"
            );

            Ok(Registry::new(countries))
        }
    }
}

/// Build the register URL with its page parameters.
pub fn registry_url(config: &RegistryConfig) -> LoadResult<Url> {
    Url::parse_with_params(
        &config.url,
        &[
            ("page-index", config.page_index.to_string()),
            ("page-size", config.page_size.to_string()),
        ],
    )
    .map_err(|source| LoadError::InvalidUrl {
        url: config.url.clone(),
        source,
    })
}

#[derive(Debug, Deserialize)]
struct Record {
    item: Vec<Country>,
}

/// Parse a register body into countries, one per record.
///
/// Each record holds a list of items; only the first one is taken. Records
/// come back ordered by their key.
pub fn parse_records(body: &[u8]) -> LoadResult<Vec<Country>> {
    let records: BTreeMap<String, Record> = serde_json::from_slice(body)?;

    records
        .into_iter()
        .map(|(key, record)| {
            record
                .item
                .into_iter()
                .next()
                .ok_or(LoadError::EmptyRecord(key))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_takes_first_item_only() {
        let body = br#"{
            "GB": {"index-entry-number": "6", "item": [
                {"country": "GB", "name": "United Kingdom", "official-name": "The United Kingdom"},
                {"country": "GB", "name": "Great Britain"}
            ]},
            "DE": {"item": [{"name": "Germany"}]}
        }"#;

        let countries = parse_records(body).unwrap();
        assert_eq!(
            countries,
            vec![Country::new("Germany"), Country::new("United Kingdom")]
        );
    }

    #[test]
    fn test_parse_empty_object() {
        assert!(parse_records(b"{}").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_malformed_body() {
        assert!(matches!(parse_records(b"<html>"), Err(LoadError::Parse(_))));
        assert!(matches!(parse_records(b"[]"), Err(LoadError::Parse(_))));
        assert!(matches!(
            parse_records(br#"{"GB": {"entries": []}}"#),
            Err(LoadError::Parse(_))
        ));
        assert!(matches!(
            parse_records(br#"{"GB": {"item": [{"official-name": "x"}]}}"#),
            Err(LoadError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_record() {
        let body = br#"{"DE": {"item": [{"name": "Germany"}]}, "XX": {"item": []}}"#;
        match parse_records(body) {
            Err(LoadError::EmptyRecord(key)) => assert_eq!(key, "XX"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_registry_url_carries_page_parameters() {
        let config = RegistryConfig::default();
        let url = registry_url(&config).unwrap();
        assert_eq!(
            url.as_str(),
            "https://country.register.gov.uk/records.json?page-index=1&page-size=999"
        );
    }

    #[test]
    fn test_registry_url_rejects_garbage() {
        let config = RegistryConfig {
            url: "not a url".into(),
            ..RegistryConfig::default()
        };
        assert!(matches!(
            registry_url(&config),
            Err(LoadError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_static_source() {
        let source = StaticRegistrySource::new(vec![Country::new("Chad")]);
        let registry = source.fetch_registry().await.unwrap();
        assert_eq!(registry.len(), 1);
    }
}
