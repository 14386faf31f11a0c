//! Downloads the raw web-font catalog.

use std::{error::Error, fmt, io, path::Path, path::PathBuf};

use reqwest::StatusCode;
use serde_json::Value;
use tracing::info;

/// Catalog endpoint of the public web-fonts API.
pub const DEFAULT_CATALOG_ENDPOINT: &str = "https://www.googleapis.com/webfonts/v1/webfonts";

#[derive(Debug)]
pub enum FetchError {
    MissingApiKey,
    Http(reqwest::Error),
    Status(StatusCode),
    InvalidCatalog(String),
    Write { path: PathBuf, source: io::Error },
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "an API key is required to fetch the font catalog"),
            Self::Http(err) => write!(f, "font catalog request failed: {err}"),
            Self::Status(status) => write!(f, "font catalog request returned HTTP {status}"),
            Self::InvalidCatalog(message) => write!(f, "unexpected font catalog payload: {message}"),
            Self::Write { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
        }
    }
}

impl Error for FetchError {}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        // Strip the URL so the API key never ends up in a diagnostic.
        Self::Http(err.without_url())
    }
}

/// Fetches the font catalog with an API key and persists it verbatim.
#[derive(Clone)]
pub struct CatalogFetcher {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl fmt::Debug for CatalogFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogFetcher")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl CatalogFetcher {
    /// Creates a fetcher for the default endpoint.
    ///
    /// # Errors
    /// Returns `FetchError::MissingApiKey` if the key is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(FetchError::MissingApiKey);
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_CATALOG_ENDPOINT.to_string(),
            api_key,
        })
    }

    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Issues the catalog request and returns the decoded body.
    ///
    /// # Errors
    /// Returns `FetchError` on transport failure, a non-success status, or a
    /// body without an `items` array.
    pub async fn fetch(&self) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        let catalog: Value = response.json().await?;
        validate_catalog(&catalog)?;
        Ok(catalog)
    }

    /// Fetches the catalog and writes it to `path`, replacing any existing file.
    ///
    /// Nothing is written unless the fetch fully succeeds.
    ///
    /// # Errors
    /// Returns `FetchError` if the fetch or the write fails.
    pub async fn fetch_to_file(&self, path: &Path) -> Result<usize, FetchError> {
        let catalog = self.fetch().await?;
        let families = family_count(&catalog);
        let json = serde_json::to_string_pretty(&catalog)
            .map_err(|err| FetchError::InvalidCatalog(err.to_string()))?;
        tokio::fs::write(path, json)
            .await
            .map_err(|source| FetchError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        info!(families, path = %path.display(), "saved font catalog");
        Ok(families)
    }
}

/// Checks that a catalog body carries an `items` array.
///
/// # Errors
/// Returns `FetchError::InvalidCatalog` otherwise.
pub fn validate_catalog(catalog: &Value) -> Result<(), FetchError> {
    match catalog.get("items") {
        Some(Value::Array(_)) => Ok(()),
        Some(_) => Err(FetchError::InvalidCatalog("`items` is not an array".to_string())),
        None => Err(FetchError::InvalidCatalog("missing `items`".to_string())),
    }
}

fn family_count(catalog: &Value) -> usize {
    catalog
        .get("items")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn blank_api_key_is_rejected() {
        assert!(matches!(CatalogFetcher::new("  "), Err(FetchError::MissingApiKey)));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let fetcher = CatalogFetcher::new("secret-key").expect("fetcher");
        let rendered = format!("{fetcher:?}");
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains(DEFAULT_CATALOG_ENDPOINT));
    }

    #[test]
    fn catalog_requires_items_array() {
        assert!(validate_catalog(&json!({"items": []})).is_ok());
        assert!(matches!(
            validate_catalog(&json!({"items": {}})),
            Err(FetchError::InvalidCatalog(_))
        ));
        assert!(matches!(
            validate_catalog(&json!({"error": {"code": 400}})),
            Err(FetchError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn counts_families() {
        assert_eq!(family_count(&json!({"items": [{}, {}]})), 2);
        assert_eq!(family_count(&json!({})), 0);
    }

    #[tokio::test]
    async fn unreachable_endpoint_leaves_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("google-fonts.json");
        std::fs::write(&path, "{\"items\": []}").expect("seed catalog");

        let fetcher = CatalogFetcher::new("key")
            .expect("fetcher")
            .with_endpoint("http://127.0.0.1:9/webfonts");
        let err = fetcher
            .fetch_to_file(&path)
            .await
            .expect_err("closed port should fail");
        assert!(matches!(err, FetchError::Http(_)));

        let content = std::fs::read_to_string(&path).expect("catalog still present");
        assert_eq!(content, "{\"items\": []}");
    }
}
