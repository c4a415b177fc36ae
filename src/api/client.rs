//! HTTP client for the Clubhouse read-only endpoints

use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::api::{Api, ApiError};
use crate::config;
use crate::model::{Epic, SearchPage};

/// Connection settings for [`ApiClient`]
///
/// Passed in explicitly rather than read from ambient globals so tests can
/// point a client at a local server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            timeout: config::HTTP_TIMEOUT,
        }
    }
}

/// Blocking client for the list and search endpoints
pub struct ApiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    /// Validate the base URL and build the underlying HTTP client
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        Url::parse(&config.base_url).map_err(|source| ApiError::BaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let mut base_url = config.base_url;
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url,
            token: config.token,
        })
    }

    /// URL for an entity collection: `{base}/{version}/{entity}?token={token}`
    fn entity_url(&self, entity: &str) -> String {
        format!(
            "{base}{version}/{entity}?token={token}",
            base = self.base_url,
            version = config::API_VERSION,
            entity = entity,
            token = self.token,
        )
    }

    /// URL for a server-issued continuation path
    ///
    /// The `next` token starts with a `/`, so the base URL's trailing slash is
    /// stripped before appending. Tokens arrive HTML-entity-escaped.
    fn continuation_url(&self, token: &str) -> String {
        format!(
            "{base}{path}&token={token}",
            base = self.base_url.trim_end_matches('/'),
            path = unescape_entities(token),
            token = self.token,
        )
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        request: reqwest::blocking::RequestBuilder,
        endpoint: &str,
    ) -> Result<T, ApiError> {
        debug!(endpoint, "issuing GET");
        let response = request.send().map_err(|source| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response.json().map_err(|source| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source,
        })
    }
}

impl Api for ApiClient {
    fn list_epics(&self) -> Result<Vec<Epic>, ApiError> {
        let request = self.http.get(self.entity_url("epics"));
        self.get_json(request, "epics")
    }

    fn search_stories(&self, query: &str, page_size: usize) -> Result<SearchPage, ApiError> {
        let request = self
            .http
            .get(self.entity_url("search/stories"))
            .query(&[("page_size", page_size.to_string()), ("query", query.to_string())]);
        self.get_json(request, "search/stories")
    }

    fn next_page(&self, token: &str) -> Result<SearchPage, ApiError> {
        let request = self.http.get(self.continuation_url(token));
        self.get_json(request, "search/stories (continuation)")
    }
}

/// Decode the HTML entities the API uses in continuation paths
fn unescape_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        ApiClient::new(ClientConfig::new("https://api.example.com/", "tok123")).unwrap()
    }

    #[test]
    fn entity_url_includes_version_and_token() {
        let client = test_client();
        assert_eq!(
            client.entity_url("epics"),
            "https://api.example.com/api/v2/epics?token=tok123"
        );
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = ApiClient::new(ClientConfig::new("https://api.example.com", "t")).unwrap();
        assert_eq!(
            client.entity_url("epics"),
            "https://api.example.com/api/v2/epics?token=t"
        );
    }

    #[test]
    fn continuation_url_strips_trailing_slash_and_unescapes() {
        let client = test_client();
        assert_eq!(
            client.continuation_url("/api/v2/search/stories?next=abc&amp;page_size=25"),
            "https://api.example.com/api/v2/search/stories?next=abc&page_size=25&token=tok123"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = ApiClient::new(ClientConfig::new("not a url", "t"));
        assert!(matches!(result, Err(ApiError::BaseUrl { .. })));
    }

    #[test]
    fn unescape_handles_common_entities() {
        assert_eq!(unescape_entities("a&amp;b&lt;c&gt;d"), "a&b<c>d");
        assert_eq!(unescape_entities("plain"), "plain");
    }
}
