//! pkgdex crate
//!
//! Data model and save-time metadata enrichment for a package catalog. The
//! catalog tracks packages by category, and every save refreshes a package's
//! derived metadata from two live sources: the package-index page it is
//! published on (download count, current version) and the repository host it
//! is developed on (watchers, forks, description, participants).
//!
//! The persistence layer, web frontend, and user management live in the
//! surrounding application; this crate exposes the entities, a storage seam,
//! and the enrichment pipeline.

/// Result type alias using `ohno::AppError` as the default error type.
pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod enrich;
pub mod model;
