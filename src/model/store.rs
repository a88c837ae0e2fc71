use super::{Category, Package, RepoHost};
use crate::Result;
use chrono::Utc;
use ohno::bail;
use std::collections::BTreeMap;

/// Storage seam for packages.
///
/// The surrounding application implements this against its real persistence
/// layer; [`MemoryStore`] is the in-process implementation. Implementations
/// own write synchronization and must refresh `modified` on every write.
pub trait PackageStore {
    /// Insert or update a package keyed by slug.
    fn upsert(&mut self, package: &Package) -> Result<()>;

    /// Fetch a package by slug.
    fn get(&self, slug: &str) -> Option<Package>;

    /// Record that two packages relate to each other. The relation is
    /// symmetric: both packages list each other afterwards.
    fn relate(&mut self, a: &str, b: &str) -> Result<()>;
}

/// In-memory store holding the full catalog. Categories and hosts are
/// admin-maintained, so they get plain upsert/lookup methods outside the
/// [`PackageStore`] seam.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    categories: BTreeMap<String, Category>,
    hosts: BTreeMap<String, RepoHost>,
    packages: BTreeMap<String, Package>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert_category(&mut self, category: Category) {
        let _ = self.categories.insert(category.slug.clone(), category);
    }

    #[must_use]
    pub fn category(&self, slug: &str) -> Option<&Category> {
        self.categories.get(slug)
    }

    /// Hosts are keyed by title, which is how packages reference them.
    pub fn upsert_host(&mut self, host: RepoHost) {
        let _ = self.hosts.insert(host.title.clone(), host);
    }

    #[must_use]
    pub fn host(&self, title: &str) -> Option<&RepoHost> {
        self.hosts.get(title)
    }

    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }
}

impl PackageStore for MemoryStore {
    fn upsert(&mut self, package: &Package) -> Result<()> {
        if !self.categories.contains_key(&package.category) {
            bail!("unknown category '{}' for package '{}'", package.category, package.slug);
        }
        if let Some(host_title) = &package.repo_host
            && !self.hosts.contains_key(host_title)
        {
            bail!("unknown repository host '{host_title}' for package '{}'", package.slug);
        }

        let mut stored = package.clone();
        stored.modified = Utc::now();
        let _ = self.packages.insert(stored.slug.clone(), stored);
        Ok(())
    }

    fn get(&self, slug: &str) -> Option<Package> {
        self.packages.get(slug).cloned()
    }

    fn relate(&mut self, a: &str, b: &str) -> Result<()> {
        if !self.packages.contains_key(a) {
            bail!("unknown package '{a}'");
        }
        if !self.packages.contains_key(b) {
            bail!("unknown package '{b}'");
        }
        if a != b {
            let _ = self.packages.get_mut(a).expect("checked above").related.insert(b.to_owned());
            let _ = self.packages.get_mut(b).expect("checked above").related.insert(a.to_owned());
        }

        Ok(())
    }
}
