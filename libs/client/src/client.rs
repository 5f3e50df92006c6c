//! HTTP core: URL building, bearer auth, error translation and caching

use reqwest::{Method, Url};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    cache::ResponseCache,
    error::{ClientError, ClientResult},
    token::TokenStore,
    tracker::RequestTracker,
};

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Query parameters as name/value pairs
pub type Query<'a> = &'a [(&'a str, &'a str)];

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    tokens: TokenStore,
    cache: ResponseCache,
    tracker: RequestTracker,
}

impl ApiClient {
    /// Client for the server at `base_url`, e.g. `http://localhost:10000`
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_token_store(base_url, TokenStore::new())
    }

    pub fn with_token_store(base_url: &str, tokens: TokenStore) -> ClientResult<Self> {
        Self::build(base_url, tokens, REQUEST_TIMEOUT)
    }

    pub fn build(base_url: &str, tokens: TokenStore, timeout: Duration) -> ClientResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Configuration(format!("{base_url}: {e}")))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ClientError::Configuration(format!(
                "unsupported scheme {}",
                base_url.scheme()
            )));
        }
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            tokens,
            cache: ResponseCache::default(),
            tracker: RequestTracker::new(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Absolute URL of an `/api` route
    pub(crate) fn endpoint(&self, path: &str, query: Query<'_>) -> ClientResult<Url> {
        let mut url = self
            .base_url
            .join(&format!("api{path}"))
            .map_err(|e| ClientError::Configuration(format!("{path}: {e}")))?;
        let pairs: Vec<_> = query.iter().filter(|(_, value)| !value.is_empty()).collect();
        if !pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(pairs.iter().map(|(name, value)| (*name, *value)));
        }
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query<'_>) -> ClientResult<T> {
        let url = self.endpoint(path, query)?;
        let body = self.send(Method::GET, url, None).await?;
        Ok(serde_json::from_value(body)?)
    }

    /// GET served from the response cache while the entry is fresh
    pub async fn get_cached<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Query<'_>,
    ) -> ClientResult<T> {
        let url = self.endpoint(path, query)?;
        let key = ResponseCache::key("GET", url.path(), url.query());
        if let Some(body) = self.cache.get(&key).await {
            return Ok(serde_json::from_value(body)?);
        }

        let body = self.send(Method::GET, url, None).await?;
        self.cache.put(key, body.clone()).await;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.send_json(Method::POST, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        self.send_json(Method::PUT, path, Some(serde_json::to_value(body)?))
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.send_json(Method::DELETE, path, None).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ClientResult<T> {
        let url = self.endpoint(path, &[])?;
        let body = self.send(method, url, body).await?;
        Ok(serde_json::from_value(body)?)
    }

    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> ClientResult<Value> {
        let _in_flight = self.tracker.begin();
        debug!("{} {}", method, url);

        let token = self.tokens.get();
        let mut request = self.http.request(method, url);
        if let Some(token) = &token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        if (200..300).contains(&status) {
            return Ok(body);
        }
        Err(self.translate(status, &body, token.is_some()))
    }

    /// Map a non-success answer onto the error shown to the user
    fn translate(&self, status: u16, body: &Value, sent_token: bool) -> ClientError {
        let message = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}"));

        match status {
            401 if sent_token => {
                warn!("Token rejected by the server, clearing session");
                self.tokens.clear();
                ClientError::SessionExpired
            }
            403 => ClientError::Forbidden,
            500.. => ClientError::Server { status },
            _ => ClientError::Api { status, message },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:10000").unwrap()
    }

    #[test]
    fn test_endpoint_prefixes_api_and_skips_blank_params() {
        let url = client()
            .endpoint("/blogs", &[("page", "2"), ("search", ""), ("tags", "rust,go")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:10000/api/blogs?page=2&tags=rust%2Cgo"
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        assert!(matches!(
            ApiClient::new("ftp://example.com"),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_translate() {
        let api = client();
        api.tokens().set("stale");

        let err = api.translate(401, &json!({"message": "Not authorized, token failed"}), true);
        assert!(matches!(err, ClientError::SessionExpired));
        assert!(!api.tokens().is_authenticated());

        let err = api.translate(401, &json!({"message": "Invalid credentials"}), false);
        assert_eq!(err.to_string(), "Invalid credentials");

        assert!(matches!(api.translate(403, &Value::Null, true), ClientError::Forbidden));
        assert!(matches!(
            api.translate(502, &Value::Null, true),
            ClientError::Server { status: 502 }
        ));
        assert_eq!(api.translate(404, &Value::Null, false).to_string(), "HTTP 404");
    }
}
