//! Stateless text-pattern matchers for the index pages and descriptor
//! documents the enrichment pipeline fetches.
//!
//! Matching is structural substring work, not document parsing: each matcher
//! looks for one fixed fragment shape, and when a document contains several
//! candidates the first occurrence wins.

use regex::Regex;
use std::sync::LazyLock;

/// Right-aligned numeric table cell holding the download count.
static DOWNLOADS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<td style="text-align: right;">[0-9]+</td>"#).expect("invalid downloads pattern"));

/// Action-query link to the machine-readable descriptor document for the
/// currently published version.
static DESCRIPTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/pypi\?:action=doap&amp;name=[A-Za-z0-9._-]+&amp;version=[A-Za-z0-9._-]+").expect("invalid descriptor pattern")
});

/// Revision element inside a descriptor document.
static REVISION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<revision>[A-Za-z0-9._-]+</revision>").expect("invalid revision pattern"));

/// Extract the download count from an index detail page.
///
/// `None` means the page doesn't expose downloads at all (some projects hide
/// them); callers treat that as zero rather than as a failure.
#[must_use]
pub fn download_count(page: &str) -> Option<u64> {
    let cell = DOWNLOADS_RE.find(page)?.as_str();
    cell.strip_prefix(r#"<td style="text-align: right;">"#)?
        .strip_suffix("</td>")?
        .parse()
        .ok()
}

/// Find the descriptor-document link on an index detail page.
///
/// Returns the raw href fragment as it appears in the markup (entity-escaped
/// ampersands included). Absence means the page carries no version
/// descriptor, which the orchestrator treats as a hard failure.
#[must_use]
pub fn descriptor_link(page: &str) -> Option<&str> {
    DESCRIPTOR_RE.find(page).map(|found| found.as_str())
}

/// Extract the revision string from a descriptor document.
#[must_use]
pub fn revision(doc: &str) -> Option<&str> {
    REVISION_RE
        .find(doc)?
        .as_str()
        .strip_prefix("<revision>")?
        .strip_suffix("</revision>")
}

/// Find the link to `project`'s detail page on an "Index of Packages"
/// listing and return its href path (`/pypi/<project>/<version>`).
#[must_use]
pub fn project_link(page: &str, project: &str) -> Option<String> {
    let pattern = format!(r#"<a href="(/pypi/{}/[A-Za-z0-9._-]+)">"#, regex::escape(project));
    let link_re = Regex::new(&pattern).expect("invalid project link pattern");

    link_re.captures(page).map(|caps| caps[1].to_owned())
}
