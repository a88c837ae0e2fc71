use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use url::Url;

/// A user-submitted example of a package in use (a site, an app, a demo).
///
/// The `active` flag gates public visibility; moderators deactivate links
/// that don't pass review. Examples are never auto-modified by enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageExample {
    pub title: String,
    pub url: Url,
    pub active: bool,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl PackageExample {
    #[must_use]
    pub fn new(title: impl Into<String>, url: Url) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            url,
            active: true,
            created: now,
            modified: now,
        }
    }
}

impl Display for PackageExample {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.title)
    }
}
