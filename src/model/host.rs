use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumString};
use url::Url;

/// Known hosting services a [`RepoHost`] can point at.
///
/// The kind is the capability tag that selects enrichment logic: only kinds
/// with an API base have an integration. Adding a service means adding a
/// variant here and teaching `api_base` where its API lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, StrumDisplay, EnumString)]
pub enum HostKind {
    GitHub,
    Bitbucket,
    Launchpad,
    Other,
}

impl HostKind {
    /// Base API URL for kinds that have an enrichment integration.
    #[must_use]
    pub const fn api_base(self) -> Option<&'static str> {
        match self {
            Self::GitHub => Some("https://api.github.com"),
            Self::Bitbucket | Self::Launchpad | Self::Other => None,
        }
    }
}

/// An external hosted version-control service packages can live on.
///
/// Maintained administratively. `supported` is the admin toggle; whether
/// enrichment logic actually exists is a property of the kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoHost {
    pub title: String,
    pub description: String,
    pub url: Url,
    pub kind: HostKind,
    pub supported: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl RepoHost {
    /// Create a host entry. `supported` starts out false until an admin
    /// flips it.
    #[must_use]
    pub fn new(title: impl Into<String>, url: Url, kind: HostKind) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            description: String::new(),
            url,
            kind,
            supported: false,
            created: now,
            modified: now,
        }
    }

    #[must_use]
    pub fn supported(mut self) -> Self {
        self.supported = true;
        self
    }

    /// True when saving a package on this host can query a repository API.
    #[must_use]
    pub fn has_integration(&self) -> bool {
        self.supported && self.kind.api_base().is_some()
    }
}

impl Display for RepoHost {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if self.supported {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{} (unsupported)", self.title)
        }
    }
}
