use crate::Result;
use ohno::{IntoAppError, bail};
use url::Url;

/// Retrieves a remote document as text.
///
/// One GET, no retries, no timeout beyond the transport's own. The
/// enrichment pipeline is generic over this trait; tests substitute canned
/// fetchers.
#[expect(async_fn_in_trait, reason = "the pipeline is generic over the fetcher; no dyn use")]
pub trait PageFetcher {
    /// Fetch `url` and return the response body.
    ///
    /// # Errors
    ///
    /// Fails on transport errors and non-success status codes.
    async fn fetch(&self, url: &Url) -> Result<String>;
}

/// [`PageFetcher`] over a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the crate user-agent.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("pkgdex")
            .build()
            .into_app_err("unable to create HTTP client")?;

        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .into_app_err_with(|| format!("could not fetch '{url}'"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("fetching '{url}' returned HTTP {status}");
        }

        resp.text()
            .await
            .into_app_err_with(|| format!("could not read response body from '{url}'"))
    }
}
