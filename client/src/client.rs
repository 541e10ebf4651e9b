use crate::{Error, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CACHE_CONTROL, CONTENT_TYPE, USER_AGENT},
    Client as HttpClient, StatusCode,
};
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;
use vegas_types::casino::{
    HEADER_ACCEPT, HEADER_CACHE_CONTROL, HEADER_CONTENT_TYPE, HEADER_USER_AGENT,
};

/// Default timeout for connections and requests
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers a browser session attaches to every game request.
pub fn session_headers() -> HeaderMap {
    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(HEADER_CONTENT_TYPE));
    headers.insert(USER_AGENT, HeaderValue::from_static(HEADER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static(HEADER_ACCEPT));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(HEADER_CACHE_CONTROL));
    headers
}

/// Outcome of a request that reached the server.
///
/// Non-2xx statuses are not errors here; callers decide what a status means.
#[derive(Clone, Debug)]
pub struct Response {
    pub status: StatusCode,
    pub body: String,
    pub elapsed: Duration,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Casino API client
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct Client {
    http_client: HttpClient,
}

impl Client {
    /// Create a new client
    pub fn new(timeout: Duration) -> Result<Self> {
        let http_client = HttpClient::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(60))
            .tcp_keepalive(Duration::from_secs(30))
            .build()?;
        Ok(Self { http_client })
    }

    /// POST a pre-encoded JSON body. Each request is sent exactly once.
    pub async fn post(&self, url: &str, headers: &HeaderMap, body: Vec<u8>) -> Result<Response> {
        let url = parse_url(url)?;
        debug!(%url, len = body.len(), "Posting");

        let start = Instant::now();
        let response = self
            .http_client
            .post(url)
            .headers(headers.clone())
            .body(body)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(Response {
            status,
            body,
            elapsed: start.elapsed(),
        })
    }
}

fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::InvalidScheme(scheme.to_string())),
    }
}
