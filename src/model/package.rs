use super::{PackageExample, Participants};
use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;
use url::Url;

/// Placeholder index root meaning "no index entry configured". A package
/// whose index URL equals this root is never scraped.
pub const DEFAULT_INDEX_URL: &str = "http://pypi.python.org/pypi/";

static DEFAULT_INDEX: LazyLock<Url> = LazyLock::new(|| Url::parse(DEFAULT_INDEX_URL).expect("invalid DEFAULT_INDEX_URL"));

/// A cataloged package.
///
/// Created with title, slug, and category; everything under "derived
/// metadata" below is refreshed from live external sources on every save and
/// is not authoritative user input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub title: String,
    pub slug: String,
    /// Slug of the owning [`super::Category`] (required).
    pub category: String,
    /// Title of the [`super::RepoHost`] the package is developed on, if any.
    pub repo_host: Option<String>,
    pub repo_url: Option<Url>,

    // Derived metadata: repository side.
    pub repo_description: String,
    pub repo_watchers: u64,
    pub repo_forks: u64,
    pub repo_commits: u64,
    pub participants: Participants,

    // Derived metadata: index side.
    pub index_url: Url,
    pub index_version: String,
    pub index_downloads: u64,

    /// Slugs of related packages. Symmetric; maintained through
    /// [`super::PackageStore::relate`].
    pub related: BTreeSet<String>,
    pub examples: Vec<PackageExample>,

    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Package {
    #[must_use]
    pub fn new(title: impl Into<String>, slug: &str, category: &str) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            slug: super::normalize_slug(slug),
            category: super::normalize_slug(category),
            repo_host: None,
            repo_url: None,
            repo_description: String::new(),
            repo_watchers: 0,
            repo_forks: 0,
            repo_commits: 0,
            participants: Participants::new(),
            index_url: DEFAULT_INDEX.clone(),
            index_version: String::new(),
            index_downloads: 0,
            related: BTreeSet::new(),
            examples: Vec::new(),
            created: now,
            modified: now,
        }
    }

    #[must_use]
    pub fn with_repo(mut self, host_title: impl Into<String>, repo_url: Url) -> Self {
        self.repo_host = Some(host_title.into());
        self.repo_url = Some(repo_url);
        self
    }

    #[must_use]
    pub fn with_index_url(mut self, index_url: Url) -> Self {
        self.index_url = index_url;
        self
    }

    /// Whether an index entry is configured, i.e. the index URL differs from
    /// the placeholder root.
    #[must_use]
    pub fn has_index_entry(&self) -> bool {
        self.index_url != *DEFAULT_INDEX
    }

    /// Examples that passed moderation.
    pub fn active_examples(&self) -> impl Iterator<Item = &PackageExample> {
        self.examples.iter().filter(|example| example.active)
    }
}

impl Display for Package {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.title)
    }
}
