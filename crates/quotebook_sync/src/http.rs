//! HTTP remote source implementation.
//!
//! The actual HTTP client is abstracted via a trait so the decoding and
//! status handling can be tested without a network.

use crate::config::SyncConfig;
use crate::error::{SyncError, SyncResult};
use crate::remote::{RemoteRecord, RemoteSource};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use tracing::debug;

/// A raw HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response body.
    pub body: String,
}

impl HttpResponse {
    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual HTTP transport.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends a GET request and returns the response.
    ///
    /// Errors are reserved for requests that got no response at all.
    async fn get(&self, url: &str) -> Result<HttpResponse, String>;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a client whose requests give up after `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the TLS backend cannot be initialized.
    pub fn new(config: &SyncConfig) -> SyncResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("quotebook/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SyncError::transport(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| e.to_string())?;
        Ok(HttpResponse { status, body })
    }
}

/// Remote source that GETs a JSON array of records from one endpoint.
#[derive(Debug, Clone)]
pub struct HttpRemoteSource<C: HttpClient> {
    endpoint: String,
    client: C,
}

impl HttpRemoteSource<ReqwestClient> {
    /// Creates a reqwest-backed source for `config.endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the client cannot be built.
    pub fn from_config(config: &SyncConfig) -> SyncResult<Self> {
        Ok(Self::new(config.endpoint.clone(), ReqwestClient::new(config)?))
    }
}

impl<C: HttpClient> HttpRemoteSource<C> {
    /// Creates a source for `endpoint` using `client`.
    pub fn new(endpoint: impl Into<String>, client: C) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Returns the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl<C: HttpClient> RemoteSource for HttpRemoteSource<C> {
    async fn fetch_records(&self, limit: usize) -> SyncResult<Vec<RemoteRecord>> {
        let response = self
            .client
            .get(&self.endpoint)
            .await
            .map_err(SyncError::transport)?;

        if !response.is_success() {
            return Err(SyncError::http_status(response.status));
        }

        let mut records: Vec<RemoteRecord> =
            serde_json::from_str(&response.body).map_err(|e| SyncError::Parse(e.to_string()))?;
        let received = records.len();
        records.truncate(limit);

        debug!(
            endpoint = %self.endpoint,
            received,
            kept = records.len(),
            "fetched remote records"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct TestClient {
        response: Mutex<Result<HttpResponse, String>>,
        requested: Mutex<Vec<String>>,
    }

    impl TestClient {
        fn answering(status: u16, body: &str) -> Self {
            Self {
                response: Mutex::new(Ok(HttpResponse {
                    status,
                    body: body.to_string(),
                })),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn unreachable() -> Self {
            Self {
                response: Mutex::new(Err("connection refused".into())),
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HttpClient for TestClient {
        async fn get(&self, url: &str) -> Result<HttpResponse, String> {
            self.requested.lock().push(url.to_string());
            self.response.lock().clone()
        }
    }

    const ENDPOINT: &str = "http://remote.test/posts";

    #[tokio::test]
    async fn decodes_records_and_applies_limit() {
        let body = r#"[
            {"userId":1,"id":1,"title":"one","body":"x"},
            {"userId":1,"id":2,"title":"two","body":"y"},
            {"userId":1,"id":3,"title":"three","body":"z"}
        ]"#;
        let source = HttpRemoteSource::new(ENDPOINT, TestClient::answering(200, body));

        let records = source.fetch_records(2).await.unwrap();
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["one", "two"]);
        assert_eq!(source.client.requested.lock().as_slice(), &[ENDPOINT]);
    }

    #[tokio::test]
    async fn empty_array_is_empty_result() {
        let source = HttpRemoteSource::new(ENDPOINT, TestClient::answering(200, "[]"));
        assert!(source.fetch_records(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_transport_error() {
        let source = HttpRemoteSource::new(ENDPOINT, TestClient::answering(500, "oops"));

        let err = source.fetch_records(5).await.unwrap_err();
        assert!(matches!(
            err,
            SyncError::Transport {
                status: Some(500),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn network_failure_is_transport_error() {
        let source = HttpRemoteSource::new(ENDPOINT, TestClient::unreachable());

        let err = source.fetch_records(5).await.unwrap_err();
        assert!(matches!(err, SyncError::Transport { status: None, .. }));
    }

    #[tokio::test]
    async fn undecodable_body_is_parse_error() {
        for body in ["not json", r#"{"title":"one"}"#, r#"[{"title":5}]"#] {
            let source = HttpRemoteSource::new(ENDPOINT, TestClient::answering(200, body));
            let err = source.fetch_records(5).await.unwrap_err();
            assert!(matches!(err, SyncError::Parse(_)), "body: {body}");
        }
    }

    #[test]
    fn success_range() {
        let response = |status| HttpResponse {
            status,
            body: String::new(),
        };
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(!response(199).is_success());
        assert!(!response(301).is_success());
        assert!(!response(404).is_success());
    }
}
