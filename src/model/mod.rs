//! Catalog entities and the storage seam.
//!
//! Four entities make up the catalog: [`Category`] and [`RepoHost`] are
//! maintained administratively and rarely change; [`Package`] is created by
//! users with minimal fields and then enriched on every save; a package's
//! [`PackageExample`]s are user-submitted and gated behind moderator
//! approval. Persistence itself is the surrounding application's concern:
//! [`PackageStore`] is the seam it implements, and [`MemoryStore`] is the
//! in-process implementation used by tests and embedders.

mod category;
mod example;
mod host;
mod package;
mod participants;
mod store;

pub use category::Category;
pub use example::PackageExample;
pub use host::{HostKind, RepoHost};
pub use package::{DEFAULT_INDEX_URL, Package};
pub use participants::Participants;
pub use store::{MemoryStore, PackageStore};

/// Lowercase a slug the way the admin form promises ("slugs will be
/// lowercased").
fn normalize_slug(slug: &str) -> String {
    slug.trim().to_lowercase()
}
