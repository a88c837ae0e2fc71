//! Minimal repository-host API client.
//!
//! Queries the host's JSON API for the handful of fields enrichment needs:
//! repository core info plus the collaborator and contributor lists. Only
//! the fields we read are deserialized.

use crate::Result;
use crate::model::Participants;
use core::fmt::{Display, Formatter};
use ohno::{IntoAppError, bail};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

const LOG_TARGET: &str = "   hosting";

/// `owner/name` repository identifier, parsed from a repository URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    owner: String,
    name: String,
}

impl RepoRef {
    /// Parse the first two path segments of a repository URL, stripping a
    /// trailing `.git` from the name.
    ///
    /// # Errors
    ///
    /// Fails when the URL has no owner/name path.
    pub fn parse(url: &Url) -> Result<Self> {
        let segments: Vec<_> = url.path_segments().map(Iterator::collect).unwrap_or_default();

        if segments.len() < 2 || segments[0].is_empty() || segments[1].is_empty() {
            bail!("invalid repository URL: '{url}'");
        }

        Ok(Self {
            owner: segments[0].to_owned(),
            name: segments[1].trim_end_matches(".git").to_owned(),
        })
    }

    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Display for RepoRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Repository fields enrichment reads. GitHub reports human watchers as
/// `subscribers_count`; older API shapes use `watchers_count`.
#[derive(Debug, Deserialize)]
struct Repository {
    #[serde(default)]
    subscribers_count: Option<i64>,
    #[serde(default)]
    watchers_count: Option<i64>,
    #[serde(default)]
    forks_count: Option<u32>,
    #[serde(default)]
    description: Option<String>,
}

/// A collaborator or contributor entry; only the login matters.
#[derive(Debug, Deserialize)]
struct Account {
    login: String,
}

/// Metadata derived from the repository host for one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMetadata {
    pub watchers: u64,
    pub forks: u64,
    pub description: String,
    /// Deduplicated, order-preserving union of collaborators and
    /// contributors.
    pub participants: Participants,
}

/// Repository-host API client.
#[derive(Debug, Clone)]
pub struct HostClient {
    client: reqwest::Client,
    base_url: String,
}

impl HostClient {
    /// Create a client for the host API at `base_url`, optionally
    /// authenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(token: Option<&str>, base_url: impl Into<String>) -> Result<Self> {
        use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

        let mut client_builder = reqwest::Client::builder().user_agent("pkgdex");

        if let Some(t) = token {
            let mut auth_val = HeaderValue::from_str(&format!("token {t}"))?;
            auth_val.set_sensitive(true);

            let mut headers = HeaderMap::new();
            let _ = headers.insert(AUTHORIZATION, auth_val);

            client_builder = client_builder.default_headers(headers);
        }

        Ok(Self {
            client: client_builder.build()?,
            base_url: base_url.into(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query the host for one repository's metadata: core info, then
    /// collaborators, then contributors, one request at a time.
    ///
    /// # Errors
    ///
    /// Transport and API errors propagate; they are never swallowed here.
    pub async fn repo_metadata(&self, repo: &RepoRef) -> Result<RepoMetadata> {
        log::info!(target: LOG_TARGET, "querying host for repository '{repo}'");

        let base = format!("{}/repos/{}/{}", self.base_url, repo.owner(), repo.name());

        let repository: Repository = self.get_json(&base).await?;
        let collaborators: Vec<Account> = self.get_json(&format!("{base}/collaborators")).await?;
        let contributors: Vec<Account> = self.get_json(&format!("{base}/contributors")).await?;

        let participants = Participants::from_iter_dedup(
            collaborators
                .into_iter()
                .chain(contributors)
                .map(|account| account.login),
        );

        Ok(RepoMetadata {
            watchers: repository
                .subscribers_count
                .or(repository.watchers_count)
                .and_then(|count| u64::try_from(count).ok())
                .unwrap_or(0),
            forks: u64::from(repository.forks_count.unwrap_or(0)),
            description: repository.description.unwrap_or_default(),
            participants,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .into_app_err_with(|| format!("could not query '{url}'"))?;

        let status = resp.status();
        if !status.is_success() {
            bail!("querying '{url}' returned HTTP {status}");
        }

        resp.json().await.into_app_err_with(|| format!("malformed JSON from '{url}'"))
    }
}
