use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Order-preserving deduplicated set of participant identifiers.
///
/// Participants are the union of a repository's collaborators and
/// contributors. The storage boundary serializes the set as a single
/// comma-joined string, which is also the form the rest of the application
/// historically stored; in memory it is an explicit set so callers never
/// re-split or re-dedup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participants(Vec<String>);

impl Participants {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build from an iterator, keeping the first occurrence of each
    /// identifier.
    pub fn from_iter_dedup<I>(iter: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut participants = Self::new();
        for item in iter {
            participants.push(item);
        }
        participants
    }

    /// Add an identifier unless it is already present or empty.
    pub fn push(&mut self, id: impl Into<String>) {
        let id = id.into();
        if !id.is_empty() && !self.0.contains(&id) {
            self.0.push(id);
        }
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The comma-joined storage form.
    #[must_use]
    pub fn to_joined(&self) -> String {
        self.0.join(",")
    }

    /// Parse the comma-joined storage form, deduplicating and dropping empty
    /// segments.
    #[must_use]
    pub fn from_joined(joined: &str) -> Self {
        Self::from_iter_dedup(joined.split(','))
    }
}

impl Serialize for Participants {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_joined())
    }
}

impl<'de> Deserialize<'de> for Participants {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let joined = String::deserialize(deserializer)?;
        Ok(Self::from_joined(&joined))
    }
}
