//! Save-time metadata enrichment.
//!
//! Every package save refreshes derived metadata from two independent
//! sources:
//!
//! - the package-index detail page (download count, current version),
//!   resolving a listing page to the project's detail page first if needed;
//! - the repository host's API (watchers, forks, description, participants),
//!   when the package's host has an integration.
//!
//! [`Enricher::refresh`] is the explicitly invokable operation; it performs
//! up to three sequential fetches on the index side plus three host API
//! calls and nothing else: no retries, no caching, no fan-out.
//! [`Enricher::save`] runs refresh under a [`FailurePolicy`] and then
//! delegates to the storage seam.

pub mod extract;

mod fetch;
mod hosting;
mod index;

pub use fetch::{HttpFetcher, PageFetcher};
pub use hosting::{HostClient, RepoMetadata, RepoRef};
pub use index::IndexData;

use crate::model::{HostKind, Package, PackageStore, RepoHost};
use core::fmt::{Display, Formatter};
use ohno::{EnrichableExt, app_err};
use url::Url;

const LOG_TARGET: &str = "    enrich";

/// Why an enrichment pass failed.
#[derive(Debug)]
pub enum EnrichError {
    /// The index URL could not be resolved to a versioned project page:
    /// the listing had no link for this project, or the detail page had no
    /// version descriptor.
    NoVersionFound(Url),

    /// Transport or protocol failure talking to an external source.
    Other(ohno::AppError),
}

impl EnrichError {
    #[must_use]
    pub const fn is_no_version_found(&self) -> bool {
        matches!(self, Self::NoVersionFound(_))
    }

    fn into_app_error(self, slug: &str) -> ohno::AppError {
        match self {
            Self::NoVersionFound(url) => app_err!("no version found for index URL '{url}' while saving '{slug}'"),
            Self::Other(e) => e.enrich(format!("enriching package '{slug}'")),
        }
    }
}

impl Display for EnrichError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NoVersionFound(url) => write!(f, "no version found for index URL '{url}'"),
            Self::Other(e) => write!(f, "{e}"),
        }
    }
}

/// What a save does when enrichment fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Any enrichment failure aborts the save; nothing is written.
    #[default]
    Strict,

    /// Enrichment failures are logged and the previously stored values ride
    /// along; the write proceeds.
    Lenient,
}

/// Sequences the fetchers, extractors, and host client to refresh a
/// package's derived fields, then hands the record to the store.
#[derive(Debug, Clone)]
pub struct Enricher<F = HttpFetcher> {
    fetcher: F,
    hosting: HostClient,
    policy: FailurePolicy,
}

impl Enricher<HttpFetcher> {
    /// Create an enricher with the default HTTP fetcher and the GitHub API,
    /// optionally authenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built.
    pub fn new(github_token: Option<&str>) -> crate::Result<Self> {
        let api_base = HostKind::GitHub.api_base().expect("GitHub always has an API base");

        Ok(Self::with_parts(
            HttpFetcher::new()?,
            HostClient::new(github_token, api_base)?,
            FailurePolicy::default(),
        ))
    }
}

impl<F: PageFetcher> Enricher<F> {
    /// Assemble an enricher from explicit parts. Tests use this to point the
    /// fetcher and host client at local servers.
    pub const fn with_parts(fetcher: F, hosting: HostClient, policy: FailurePolicy) -> Self {
        Self {
            fetcher,
            hosting,
            policy,
        }
    }

    /// Refresh the package's derived fields from live external sources.
    ///
    /// The index step and the repository step run independently: a failure
    /// in one never prevents the other from being applied. Fields touched by
    /// a failed step keep their previous values; the unsupported-host case
    /// zeroes the repository fields instead, because "no repository data" is
    /// a valid answer, not a failure.
    ///
    /// # Errors
    ///
    /// Returns the index-step error first if both steps failed.
    pub async fn refresh(&self, package: &mut Package, host: Option<&RepoHost>) -> Result<(), EnrichError> {
        let mut first_error = None;

        if package.has_index_entry() {
            match index::fetch_index_data(&self.fetcher, &package.index_url).await {
                Ok(data) => {
                    package.index_downloads = data.downloads;
                    package.index_version = data.version;
                }
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "index enrichment for '{}' failed: {e}", package.slug);
                    first_error = Some(e);
                }
            }
        }

        match repo_target(package, host) {
            Some(repo_url) => match RepoRef::parse(repo_url) {
                Ok(repo) => match self.hosting.repo_metadata(&repo).await {
                    Ok(metadata) => {
                        package.repo_watchers = metadata.watchers;
                        package.repo_forks = metadata.forks;
                        package.repo_description = metadata.description;
                        package.participants = metadata.participants;
                    }
                    Err(e) => {
                        log::warn!(target: LOG_TARGET, "repository enrichment for '{}' failed: {e:#}", package.slug);
                        first_error.get_or_insert(EnrichError::Other(e));
                    }
                },
                Err(e) => {
                    log::warn!(target: LOG_TARGET, "repository URL of '{}' is unusable: {e:#}", package.slug);
                    first_error.get_or_insert(EnrichError::Other(e));
                }
            },
            None => {
                package.repo_watchers = 0;
                package.repo_forks = 0;
                package.repo_description.clear();
                package.participants.clear();
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Refresh the package under this enricher's [`FailurePolicy`], then
    /// write it through the store.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Strict`], any enrichment failure aborts the
    /// save and nothing is written. Store errors always propagate.
    pub async fn save<S: PackageStore>(&self, store: &mut S, package: &mut Package, host: Option<&RepoHost>) -> crate::Result<()> {
        if let Err(e) = self.refresh(package, host).await {
            match self.policy {
                FailurePolicy::Strict => return Err(e.into_app_error(&package.slug)),
                FailurePolicy::Lenient => {
                    log::warn!(target: LOG_TARGET, "saving '{}' with stale derived fields: {e}", package.slug);
                }
            }
        }

        store.upsert(package)
    }
}

/// The repository URL to enrich from, if the support gate passes: host
/// present, marked supported, kind has an integration, and the package has a
/// repository URL.
fn repo_target<'a>(package: &'a Package, host: Option<&RepoHost>) -> Option<&'a Url> {
    if host.is_some_and(RepoHost::has_integration) {
        package.repo_url.as_ref()
    } else {
        None
    }
}
