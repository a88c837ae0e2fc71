use chrono::{DateTime, Utc};
use core::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

/// A catalog category (e.g. "App", "Framework", "Utility").
///
/// Categories are created and maintained administratively. Identity is the
/// slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

impl Category {
    #[must_use]
    pub fn new(title: impl Into<String>, slug: &str) -> Self {
        let now = Utc::now();
        Self {
            title: title.into(),
            slug: super::normalize_slug(slug),
            description: String::new(),
            created: now,
            modified: now,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.title)
    }
}
