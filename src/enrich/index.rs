use super::EnrichError;
use super::extract;
use super::fetch::PageFetcher;
use url::Url;

const LOG_TARGET: &str = "     index";

/// Literal marker distinguishing an "Index of Packages" listing from a
/// project detail page.
const LISTING_MARKER: &str = "Index of Packages";

/// Everything index enrichment derives for one package. Produced whole or
/// not at all; a failure never leaves partial index data behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexData {
    pub downloads: u64,
    pub version: String,
}

/// Fetch the index page for `index_url`, resolving a listing page to the
/// project's detail page if needed, and extract download count and current
/// version.
///
/// # Errors
///
/// [`EnrichError::NoVersionFound`] when the listing carries no link for this
/// project, or the detail page carries no descriptor link, or the descriptor
/// carries no revision. [`EnrichError::Other`] on transport failures.
pub(super) async fn fetch_index_data<F: PageFetcher>(fetcher: &F, index_url: &Url) -> Result<IndexData, EnrichError> {
    let mut page = fetcher.fetch(index_url).await.map_err(EnrichError::Other)?;

    // A bare project URL can land on a disambiguation listing instead of the
    // detail page; chase the per-project link before extracting anything.
    if page.contains(LISTING_MARKER) {
        let project = project_name(index_url).ok_or_else(|| EnrichError::NoVersionFound(index_url.clone()))?;
        log::debug!(target: LOG_TARGET, "'{index_url}' is a package listing, looking for project '{project}'");

        let Some(link) = extract::project_link(&page, project) else {
            return Err(EnrichError::NoVersionFound(index_url.clone()));
        };
        let detail_url = index_url.join(&link).map_err(|e| EnrichError::Other(ohno::AppError::new(e)))?;

        log::debug!(target: LOG_TARGET, "following listing link to '{detail_url}'");
        page = fetcher.fetch(&detail_url).await.map_err(EnrichError::Other)?;
    }

    // Absent download cell is a valid "zero downloads" page, not a failure.
    let downloads = extract::download_count(&page).unwrap_or_else(|| {
        log::debug!(target: LOG_TARGET, "'{index_url}' does not expose a download count");
        0
    });

    let Some(link) = extract::descriptor_link(&page) else {
        return Err(EnrichError::NoVersionFound(index_url.clone()));
    };
    let descriptor_url = index_url
        .join(&link.replace("&amp;", "&"))
        .map_err(|e| EnrichError::Other(ohno::AppError::new(e)))?;

    let doc = fetcher.fetch(&descriptor_url).await.map_err(EnrichError::Other)?;
    let Some(version) = extract::revision(&doc) else {
        return Err(EnrichError::NoVersionFound(index_url.clone()));
    };

    Ok(IndexData {
        downloads,
        version: version.to_owned(),
    })
}

/// Final path segment of the trailing-slash-stripped index URL.
fn project_name(index_url: &Url) -> Option<&str> {
    let name = index_url.path().trim_end_matches('/').rsplit('/').next().unwrap_or_default();

    (!name.is_empty()).then_some(name)
}
