//! End-to-end enrichment tests against local mock servers: index pages,
//! descriptor documents, and the repository-host API all served by wiremock.

use pkgdex::enrich::{Enricher, FailurePolicy, HostClient, HttpFetcher};
use pkgdex::model::{Category, HostKind, MemoryStore, Package, PackageStore, Participants, RepoHost};
use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DETAIL_PAGE: &str = concat!(
    r#"<table><tr><td>Downloads</td><td style="text-align: right;">1234</td></tr></table>"#,
    r#"<a href="/pypi?:action=doap&amp;name=foo&amp;version=1.0">DOAP record</a>"#,
);
const DOAP_DOC: &str = "<rdf:RDF><Version><revision>2.3.1</revision></Version></rdf:RDF>";

fn store_with_fixtures() -> (MemoryStore, RepoHost) {
    let mut store = MemoryStore::new();
    store.upsert_category(Category::new("Apps", "apps"));

    let host = RepoHost::new("GitHub", Url::parse("https://github.com/").unwrap(), HostKind::GitHub).supported();
    store.upsert_host(host.clone());

    (store, host)
}

fn enricher(server: &MockServer, policy: FailurePolicy) -> Enricher {
    Enricher::with_parts(
        HttpFetcher::new().unwrap(),
        HostClient::new(None, server.uri()).unwrap(),
        policy,
    )
}

async fn mount_index_detail(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/pypi/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pypi"))
        .and(query_param("name", "foo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOAP_DOC))
        .mount(server)
        .await;
}

async fn mount_github_repo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/brosner/foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "subscribers_count": 430,
            "forks_count": 79,
            "description": "A generic foo application",
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/brosner/foo/collaborators"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "login": "a" }, { "login": "b" }])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos/brosner/foo/contributors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "login": "b" }, { "login": "c" }])))
        .mount(server)
        .await;
}

fn foo_package(server: &MockServer) -> Package {
    Package::new("foo", "foo", "apps")
        .with_repo("GitHub", Url::parse("https://github.com/brosner/foo").unwrap())
        .with_index_url(Url::parse(&format!("{}/pypi/foo", server.uri())).unwrap())
}

#[tokio::test]
async fn test_save_enriches_from_index_and_repository() {
    let server = MockServer::start().await;
    mount_index_detail(&server).await;
    mount_github_repo(&server).await;

    let (mut store, host) = store_with_fixtures();
    let enricher = enricher(&server, FailurePolicy::Strict);
    let mut package = foo_package(&server);

    enricher.save(&mut store, &mut package, Some(&host)).await.unwrap();

    let stored = store.get("foo").unwrap();
    assert_eq!(stored.index_downloads, 1234);
    assert_eq!(stored.index_version, "2.3.1");
    assert_eq!(stored.repo_watchers, 430);
    assert_eq!(stored.repo_forks, 79);
    assert_eq!(stored.repo_description, "A generic foo application");
    assert_eq!(stored.participants.to_joined(), "a,b,c");
}

#[tokio::test]
async fn test_save_resolves_listing_page_to_detail() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/foo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<h1>Index of Packages</h1><a href="/pypi/foo/1.0">foo 1.0</a>"#),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pypi/foo/1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DETAIL_PAGE))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/pypi"))
        .and(query_param("name", "foo"))
        .respond_with(ResponseTemplate::new(200).set_body_string(DOAP_DOC))
        .mount(&server)
        .await;

    let (mut store, _) = store_with_fixtures();
    let enricher = enricher(&server, FailurePolicy::Strict);
    let mut package = Package::new("foo", "foo", "apps")
        .with_index_url(Url::parse(&format!("{}/pypi/foo", server.uri())).unwrap());

    enricher.save(&mut store, &mut package, None).await.unwrap();

    let stored = store.get("foo").unwrap();
    assert_eq!(stored.index_downloads, 1234);
    assert_eq!(stored.index_version, "2.3.1");
}

#[tokio::test]
async fn test_strict_save_aborts_on_no_version_found() {
    let server = MockServer::start().await;
    // Listing page with no link for this project.
    Mock::given(method("GET"))
        .and(path("/pypi/foo"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<h1>Index of Packages</h1><a href="/pypi/bar/1.0">bar 1.0</a>"#),
        )
        .mount(&server)
        .await;

    let (mut store, _) = store_with_fixtures();

    // Seed the store with an earlier state of the record.
    let mut previous = Package::new("foo", "foo", "apps");
    previous.index_version = "0.9".into();
    previous.index_downloads = 7;
    store.upsert(&previous).unwrap();

    let enricher = enricher(&server, FailurePolicy::Strict);
    let mut package = Package::new("foo", "foo", "apps")
        .with_index_url(Url::parse(&format!("{}/pypi/foo", server.uri())).unwrap());

    let err = enricher.save(&mut store, &mut package, None).await.unwrap_err();
    assert!(format!("{err:#}").contains("no version found"));

    // Nothing was committed.
    let stored = store.get("foo").unwrap();
    assert_eq!(stored.index_version, "0.9");
    assert_eq!(stored.index_downloads, 7);
}

#[tokio::test]
async fn test_lenient_save_keeps_previous_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pypi/foo"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (mut store, _) = store_with_fixtures();
    let enricher = enricher(&server, FailurePolicy::Lenient);

    let mut package = Package::new("foo", "foo", "apps")
        .with_index_url(Url::parse(&format!("{}/pypi/foo", server.uri())).unwrap());
    package.index_version = "0.9".into();
    package.index_downloads = 7;

    enricher.save(&mut store, &mut package, None).await.unwrap();

    let stored = store.get("foo").unwrap();
    assert_eq!(stored.index_version, "0.9");
    assert_eq!(stored.index_downloads, 7);
}

#[tokio::test]
async fn test_placeholder_index_url_is_never_fetched() {
    // No mocks mounted: any fetch would fail the strict save.
    let server = MockServer::start().await;

    let (mut store, _) = store_with_fixtures();
    let enricher = enricher(&server, FailurePolicy::Strict);

    let mut package = Package::new("foo", "foo", "apps");
    package.index_version = "untouched".into();
    package.index_downloads = 3;

    enricher.save(&mut store, &mut package, None).await.unwrap();

    let stored = store.get("foo").unwrap();
    assert_eq!(stored.index_version, "untouched");
    assert_eq!(stored.index_downloads, 3);
}

#[tokio::test]
async fn test_unsupported_host_zeroes_repository_fields() {
    let server = MockServer::start().await;

    let mut store = MemoryStore::new();
    store.upsert_category(Category::new("Apps", "apps"));
    let host = RepoHost::new("Sourceforge", Url::parse("https://sourceforge.net/").unwrap(), HostKind::Other);
    store.upsert_host(host.clone());

    let enricher = enricher(&server, FailurePolicy::Strict);
    let mut package = Package::new("foo", "foo", "apps")
        .with_repo("Sourceforge", Url::parse("https://sourceforge.net/projects/foo").unwrap());
    package.repo_watchers = 99;
    package.repo_forks = 9;
    package.repo_description = "stale".into();
    package.participants = Participants::from_iter_dedup(["alice"]);

    enricher.save(&mut store, &mut package, Some(&host)).await.unwrap();

    let stored = store.get("foo").unwrap();
    assert_eq!(stored.repo_watchers, 0);
    assert_eq!(stored.repo_forks, 0);
    assert_eq!(stored.repo_description, "");
    assert_eq!(stored.participants.to_joined(), "");
}

#[tokio::test]
async fn test_repository_failure_still_applies_index_data() {
    let server = MockServer::start().await;
    mount_index_detail(&server).await;
    Mock::given(method("GET"))
        .and(path("/repos/brosner/foo"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (_, host) = store_with_fixtures();
    let enricher = enricher(&server, FailurePolicy::Strict);
    let mut package = foo_package(&server);

    // Index data lands on the in-memory record even though the save as a
    // whole fails under the strict policy.
    let err = enricher.refresh(&mut package, Some(&host)).await.unwrap_err();
    assert!(!err.is_no_version_found());
    assert_eq!(package.index_version, "2.3.1");
    assert_eq!(package.index_downloads, 1234);
    assert_eq!(package.repo_watchers, 0);
}
