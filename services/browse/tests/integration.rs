//! Integration tests for the repository browser

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use browse::BrowseService;
use indoc::indoc;
use layout::LayoutProviderRegistry;
use repository::ConfigurationFile;
use serde_json::Value;
use storage::{LocalDriver, MemoryStorage, MultiBackend};
use tower::ServiceExt;

const CONFIG: &str = indoc! {r#"
    [storages.storage0.repositories.releases]
    layout = "Maven 2"
    location = "memory://storage0/releases"
    policy = "release"

    [storages.storage0.repositories.snapshots]
    layout = "Maven 2"
    location = "memory://storage0/snapshots"
    policy = "snapshot"

    [storages.storage0.repositories.nuget]
    layout = "NuGet"
    location = "memory://storage0/nuget"

    [storages.storage-common-proxies]
"#};

const LEAF: &str = "org/carlspring/strongbox/browse/test-browsing/1.1";

const BASE: &str = "http://localhost:48080";

async fn fixture() -> axum::Router {
    let memory = MemoryStorage::with_buckets(&["storage0"]);
    for file in [
        "test-browsing-1.1.jar",
        "test-browsing-1.1.jar.md5",
        "test-browsing-1.1.jar.sha1",
        "test-browsing-1.1.pom",
        "test-browsing-1.1.pom.md5",
        "test-browsing-1.1.pom.sha1",
        "test-browsing-1.1.jar.part",
    ] {
        memory
            .insert("storage0", format!("releases/{LEAF}/{file}"), b"content".to_vec())
            .await;
    }
    memory
        .insert(
            "storage0",
            "releases/org/carlspring/strongbox/browse/test-browsing/maven-metadata.xml",
            b"<metadata/>".to_vec(),
        )
        .await;
    memory
        .insert("storage0", "releases/.trash/old.jar", b"old".to_vec())
        .await;

    let file: ConfigurationFile = toml_edit::de::from_str(CONFIG).unwrap();
    let configuration = file.build(&LayoutProviderRegistry::builtin()).unwrap();

    BrowseService::builder()
        .configuration(configuration)
        .backends(MultiBackend::new().with(memory))
        .base_url(BASE)
        .build()
        .router()
}

async fn get(app: &axum::Router, uri: &str, json: bool) -> (StatusCode, String) {
    let mut request = Request::builder().uri(uri);
    if json {
        request = request.header(header::ACCEPT, "application/json");
    }

    let response = app
        .clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn names(listing: &Value, key: &str) -> Vec<String> {
    listing[key]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["name"].as_str().unwrap().to_owned())
        .collect()
}

#[tokio::test]
async fn test_storages() {
    let app = fixture().await;

    for uri in ["/storages", "/storages/"] {
        let (status, body) = get(&app, uri, true).await;
        assert_eq!(status, StatusCode::OK);
        let listing: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            names(&listing, "directories"),
            ["storage-common-proxies", "storage0"]
        );
        assert!(names(&listing, "files").is_empty());

        let (status, html) = get(&app, uri, false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("storage0"));
        assert!(html.contains(&format!(r#"href="{BASE}/storages/storage0/""#)));
    }
}

#[tokio::test]
async fn test_repositories() {
    let app = fixture().await;

    for uri in ["/storages/storage0", "/storages/storage0/"] {
        let (status, body) = get(&app, uri, true).await;
        assert_eq!(status, StatusCode::OK);
        let listing: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            names(&listing, "directories"),
            ["nuget", "releases", "snapshots"]
        );

        let (status, html) = get(&app, uri, false).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains(&format!(r#"href="{BASE}/storages/storage0/releases/""#)));
    }

    let (status, body) = get(&app, "/storages/storage-common-proxies", true).await;
    assert_eq!(status, StatusCode::OK);
    let listing: Value = serde_json::from_str(&body).unwrap();
    assert!(names(&listing, "directories").is_empty());
}

#[tokio::test]
async fn test_repository_contents() {
    let app = fixture().await;

    for uri in [
        "/storages/storage0/releases",
        "/storages/storage0/releases/",
    ] {
        let (status, body) = get(&app, uri, true).await;
        assert_eq!(status, StatusCode::OK);
        let listing: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(names(&listing, "directories"), ["org"]);
        assert!(names(&listing, "files").is_empty());
    }

    let uri = format!("/storages/storage0/releases/{LEAF}/");
    let (status, body) = get(&app, &uri, true).await;
    assert_eq!(status, StatusCode::OK);
    let listing: Value = serde_json::from_str(&body).unwrap();
    let files = names(&listing, "files");
    assert_eq!(files.len(), 6);
    assert_eq!(files[0], "test-browsing-1.1.jar");
    assert!(files.contains(&"test-browsing-1.1.pom.sha1".to_owned()));
    assert!(!files.iter().any(|f| f.ends_with(".part")));
    assert_eq!(listing["files"][0]["size"], 7);

    let (status, html) = get(&app, &uri, false).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(&format!(
        r#"href="{BASE}/storages/storage0/releases/{LEAF}/test-browsing-1.1.jar""#
    )));

    let (status, body) = get(
        &app,
        "/storages/storage0/releases/org/carlspring/strongbox/browse/test-browsing",
        true,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let listing: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(names(&listing, "directories"), ["1.1"]);
    assert_eq!(names(&listing, "files"), ["maven-metadata.xml"]);
}

#[tokio::test]
async fn test_not_found() {
    let app = fixture().await;

    let mut bodies = Vec::new();
    for uri in [
        "/storages/storagefoo",
        "/storages/storage0/repofoo",
        "/storages/storage0/releases/foo/bar",
        "/storages/storage0/releases/.trash",
        "/storages/storagefoo/releases/org",
    ] {
        for json in [true, false] {
            let (status, body) = get(&app, uri, json).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            bodies.push(body);
        }
    }

    let error: Value = serde_json::from_str(&bodies[0]).unwrap();
    assert_eq!(error["errors"][0]["code"], "NOT_FOUND");
    assert!(bodies.iter().all(|body| body == &bodies[0]));
}

#[tokio::test]
async fn test_traversal_is_rejected() {
    let app = fixture().await;

    for uri in [
        "/storages/storage0/releases/../snapshots",
        "/storages/storage0/releases/org/../org",
        "/storages/storage0/releases/org/%2e%2e/%2e%2e",
        "/storages/storage0/releases/..",
    ] {
        let (status, _) = get(&app, uri, true).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn test_snippets() {
    let app = fixture().await;

    let (status, body) = get(
        &app,
        "/api/snippets/storage0/nuget/Org.Carlspring.Strongbox.NuGet.Snippet/1.0/Org.Carlspring.Strongbox.NuGet.Snippet.1.0.nupkg?formatter=nuget",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "<dependency id=\"Org.Carlspring.Strongbox.NuGet.Snippet\" version=\"1.0\" />\n"
    );

    let (status, body) = get(
        &app,
        &format!("/api/snippets/storage0/releases/{LEAF}/test-browsing-1.1.jar?formatter=gradle"),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "implementation \"org.carlspring.strongbox.browse:test-browsing:1.1\"\n"
    );

    // The nuget formatter does not exist for Maven 2.
    let (status, body) = get(
        &app,
        &format!("/api/snippets/storage0/releases/{LEAF}/test-browsing-1.1.jar?formatter=nuget"),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["errors"][0]["code"], "PROVIDER_UNKNOWN");

    let (status, body) = get(
        &app,
        "/api/snippets/storage0/releases/not/an/artifact?formatter=maven",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["errors"][0]["code"], "ARTIFACT_PATH_INVALID");

    let (status, _) = get(
        &app,
        "/api/snippets/storagefoo/releases/a/b/1.0/b-1.0.jar?formatter=maven",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_formatters() {
    let app = fixture().await;

    let (status, body) = get(&app, "/api/formatters/NuGet", true).await;
    assert_eq!(status, StatusCode::OK);
    let formatters: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        formatters,
        serde_json::json!({"layout": "NuGet", "formatters": ["nuget", "paket"]})
    );

    let (status, body) = get(&app, "/api/formatters/Maven%202", true).await;
    assert_eq!(status, StatusCode::OK);
    let formatters: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        formatters["formatters"],
        serde_json::json!(["gradle", "ivy", "leiningen", "maven", "sbt"])
    );

    let (status, _) = get(&app, "/api/formatters/PyPI", true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_local_storage() {
    let dir = tempfile::tempdir().unwrap();
    let root = camino::Utf8PathBuf::from_path_buf(dir.path().to_owned()).unwrap();
    let leaf = root.join("storage0/npm/@example/widget/1.0.0");
    std::fs::create_dir_all(&leaf).unwrap();
    std::fs::create_dir_all(root.join("storage0/npm/.temp")).unwrap();
    std::fs::write(leaf.join("widget-1.0.0.tgz"), b"tarball").unwrap();
    std::fs::write(leaf.join("package.json"), b"{}").unwrap();
    std::fs::write(leaf.join("widget-1.0.0.tgz.lock"), b"").unwrap();

    let file: ConfigurationFile = toml_edit::de::from_str(indoc! {r#"
        [storages.storage0.repositories.npm]
        layout = "npm"
        location = "local://storage0/npm"
    "#})
    .unwrap();
    let app = BrowseService::builder()
        .configuration(file.build(&LayoutProviderRegistry::builtin()).unwrap())
        .backends(MultiBackend::new().with(LocalDriver::new(root)))
        .build()
        .router();

    let (status, body) = get(&app, "/storages/storage0/npm/", true).await;
    assert_eq!(status, StatusCode::OK);
    let listing: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(names(&listing, "directories"), ["@example"]);

    let (status, body) = get(&app, "/storages/storage0/npm/@example/widget/1.0.0", true).await;
    assert_eq!(status, StatusCode::OK);
    let listing: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        names(&listing, "files"),
        ["package.json", "widget-1.0.0.tgz"]
    );

    let (status, html) = get(&app, "/storages/storage0/npm/@example/widget/1.0.0", false).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains(r#"href="/storages/storage0/npm/@example/widget/1.0.0/widget-1.0.0.tgz""#));

    let (status, body) = get(
        &app,
        "/api/snippets/storage0/npm/@example/widget/1.0.0/widget-1.0.0.tgz?formatter=yarn",
        false,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "yarn add @example/widget@1.0.0\n");
}

#[tokio::test]
async fn test_reconfigure() {
    let service = BrowseService::builder()
        .backends(MultiBackend::new().with(MemoryStorage::with_buckets(&["storage0"])))
        .build();
    let app = service.router();

    let (status, _) = get(&app, "/storages/storage0", true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let file: ConfigurationFile = toml_edit::de::from_str(CONFIG).unwrap();
    service.reconfigure(file.build(&LayoutProviderRegistry::builtin()).unwrap());

    let (status, body) = get(&app, "/storages/storage0", true).await;
    assert_eq!(status, StatusCode::OK);
    let listing: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(
        names(&listing, "directories"),
        ["nuget", "releases", "snapshots"]
    );
}

#[tokio::test]
async fn test_empty_repository_root() {
    let app = fixture().await;

    // Nothing has been deployed to the snapshots repository yet.
    for uri in [
        "/storages/storage0/snapshots",
        "/storages/storage0/snapshots/",
    ] {
        let (status, body) = get(&app, uri, true).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        let listing: Value = serde_json::from_str(&body).unwrap();
        assert!(names(&listing, "directories").is_empty());
        assert!(names(&listing, "files").is_empty());

        let (status, html) = get(&app, uri, false).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert!(html.contains("Index of /storages/storage0/snapshots"));
    }

    let (status, _) = get(&app, "/storages/storage0/snapshots/org", true).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unserved_scheme_is_a_server_error() {
    let file: ConfigurationFile = toml_edit::de::from_str(indoc! {r#"
        [storages.storage0.repositories.releases]
        layout = "Maven 2"
        location = "s3://storage0/releases"
    "#})
    .unwrap();
    let app = BrowseService::builder()
        .configuration(file.build(&LayoutProviderRegistry::builtin()).unwrap())
        .backends(MultiBackend::new().with(MemoryStorage::with_buckets(&["storage0"])))
        .build()
        .router();

    let (status, body) = get(&app, "/storages/storage0/releases/", true).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["errors"][0]["code"], "STORAGE_FAILED");
    assert_eq!(error["errors"][0]["message"], "internal error");
}

#[tokio::test]
async fn test_snippet_without_formatter() {
    let app = fixture().await;

    let (status, body) = get(
        &app,
        &format!("/api/snippets/storage0/releases/{LEAF}/test-browsing-1.1.jar"),
        false,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["errors"][0]["code"], "QUERY_INVALID");
}
