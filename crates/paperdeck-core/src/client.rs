//! Backend trait and the reqwest implementation for the papers API.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::request::PaperRequest;
use crate::{Config, FetchError, Paper};

/// Boxed future returned by [`PaperSource::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Vec<Paper>, FetchError>> + Send + 'a>>;

/// Anything that can answer a [`PaperRequest`] with a page of papers.
pub trait PaperSource: Send + Sync {
    /// Short name for logs (e.g. the backend host).
    fn name(&self) -> &str;

    fn fetch<'a>(&'a self, request: &'a PaperRequest) -> FetchFuture<'a>;
}

/// Talks to the real backend over HTTP.
pub struct HttpPaperSource {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpPaperSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("paperdeck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, base_url, timeout))
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Self::new(config.base_url.clone(), config.timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl PaperSource for HttpPaperSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn fetch<'a>(&'a self, request: &'a PaperRequest) -> FetchFuture<'a> {
        Box::pin(async move {
            let url = request.url(&self.base_url)?;
            tracing::debug!(%url, fresh = request.is_fresh(), "fetching papers");

            let resp = self
                .client
                .get(&url)
                .timeout(self.timeout)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                return Err(FetchError::Status(status.as_u16()));
            }

            let body = resp.bytes().await?;
            let papers: Vec<Paper> = serde_json::from_slice(&body)?;
            tracing::debug!(%url, count = papers.len(), "papers received");
            Ok(papers)
        })
    }
}
