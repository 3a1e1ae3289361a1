mod common;

use std::sync::Arc;

use tinyserve::http::mime::ExtensionMap;
use tinyserve::http::path::PathResolver;
use tinyserve::http::request::{Method, Request, RequestBuilder};
use tinyserve::http::response::{NOT_FOUND_BODY, StatusCode};
use tinyserve::http::router::Router;
use tinyserve::server::ServerState;

fn router(root: &std::path::Path) -> Router {
    let state = Arc::new(ServerState::new("test", vec!["owner@example.com".to_string()]));
    Router::new(state, PathResolver::new(root, root.join("images"), root.join("misc")))
}

#[tokio::test]
async fn test_serves_misc_text_file() {
    let site = common::site();
    let response = router(site.path()).handle(&Request::get("/misc/textfile.txt")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, "text/plain");
    assert_eq!(response.body, b"hello".to_vec());
}

#[tokio::test]
async fn test_serves_asset_from_images_root() {
    let site = common::site();
    let response = router(site.path()).handle(&Request::get("/assets/logo.png")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, "image/png");
    assert_eq!(response.body, common::PNG_BYTES.to_vec());
}

#[tokio::test]
async fn test_root_serves_index() {
    let site = common::site();
    let router = router(site.path());

    let root = router.handle(&Request::get("/")).await;
    let index = router.handle(&Request::get("/index.html")).await;

    assert_eq!(root.status, StatusCode::Ok);
    assert_eq!(root.content_type, "text/html");
    assert_eq!(root.body, common::INDEX_HTML.to_vec());
    assert_eq!(root.body, index.body);
}

#[tokio::test]
async fn test_missing_files_are_404_in_every_namespace() {
    let site = common::site();
    let router = router(site.path());

    for path in ["/nope", "/assets/nope.png", "/misc/nope.txt", "/assets/", "/misc/"] {
        let response = router.handle(&Request::get(path)).await;
        assert_eq!(response.status, StatusCode::NotFound, "{path}");
        assert_eq!(response.content_type, "text/html");
        assert_eq!(response.body, NOT_FOUND_BODY.to_vec());
    }
}

#[tokio::test]
async fn test_directory_is_404() {
    let site = common::site();
    let router = router(site.path());

    assert_eq!(router.handle(&Request::get("/docs")).await.status, StatusCode::NotFound);
    assert_eq!(router.handle(&Request::get("/images/")).await.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_disallowed_types_are_415() {
    let site = common::site();
    let router = router(site.path());

    for path in ["/assets/photo.jpg", "/misc/archive.zip", "/data.json"] {
        let response = router.handle(&Request::get(path)).await;
        assert_eq!(response.status, StatusCode::UnsupportedMediaType, "{path}");
        assert_eq!(response.content_type, "text/plain");
    }
}

#[tokio::test]
async fn test_traversal_is_404() {
    let site = common::site();
    let router = router(site.path());

    for path in [
        "/assets/../../etc/passwd",
        "/assets/../index.html",
        "/misc/../about.html",
        "/../etc/passwd",
        "//etc/passwd",
    ] {
        let response = router.handle(&Request::get(path)).await;
        assert_eq!(response.status, StatusCode::NotFound, "{path}");
        assert_eq!(response.body, NOT_FOUND_BODY.to_vec());
    }
}

#[cfg(unix)]
#[tokio::test]
async fn test_symlink_out_of_root_is_404() {
    let site = common::site();
    let outside = tempfile::tempdir().unwrap();
    std::fs::write(outside.path().join("secret.txt"), b"secret").unwrap();
    std::os::unix::fs::symlink(
        outside.path().join("secret.txt"),
        site.path().join("misc/link.txt"),
    )
    .unwrap();

    let response = router(site.path()).handle(&Request::get("/misc/link.txt")).await;
    assert_eq!(response.status, StatusCode::NotFound);
}

#[cfg(unix)]
#[tokio::test]
async fn test_unreadable_file_is_500_without_details() {
    use std::os::unix::fs::PermissionsExt;

    let site = common::site();
    let locked = site.path().join("misc/locked.txt");
    std::fs::write(&locked, b"secret").unwrap();
    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();

    // Permission bits do not stop root.
    if std::fs::read(&locked).is_ok() {
        return;
    }

    let response = router(site.path()).handle(&Request::get("/misc/locked.txt")).await;

    assert_eq!(response.status, StatusCode::InternalServerError);
    assert_eq!(response.content_type, "text/plain");
    let body = String::from_utf8(response.body).unwrap();
    assert!(!body.contains("locked.txt"));
    assert!(!body.contains(&*site.path().to_string_lossy()));

    std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o644)).unwrap();
}

#[tokio::test]
async fn test_non_get_methods_are_405() {
    let site = common::site();
    let router = router(site.path());

    for method in [Method::POST, Method::PUT, Method::DELETE, Method::HEAD, Method::Other("BREW".into())] {
        let req = RequestBuilder::new().method(method).path("/index.html").build().unwrap();
        let response = router.handle(&req).await;
        assert_eq!(response.status, StatusCode::MethodNotAllowed);
        assert_eq!(response.content_type, "text/plain");
    }
}

#[tokio::test]
async fn test_every_request_is_counted() {
    let site = common::site();
    let router = router(site.path());

    router.handle(&Request::get("/")).await;
    router.handle(&Request::get("/nope")).await;
    let post = RequestBuilder::new().method(Method::POST).path("/").build().unwrap();
    router.handle(&post).await;

    assert_eq!(router.state().request_count(), 3);
}

#[tokio::test]
async fn test_debug_report() {
    let site = common::site();
    let router = router(site.path());

    router.handle(&Request::get("/")).await;
    let response = router.handle(&Request::get("/debug")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.content_type, "application/json");

    let value: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
    assert_eq!(value["name"], "test");
    assert_eq!(value["connections"], 2);
    assert!(value["uptime"].as_u64().is_some());
    assert_eq!(value["owners"], serde_json::json!(["owner@example.com"]));
}

#[tokio::test]
async fn test_injected_content_type_resolver() {
    let site = common::site();
    let root = site.path();
    let state = Arc::new(ServerState::new("test", vec![]));
    let types = ExtensionMap::new().with("jpg", "image/png").with("txt", "text/csv");
    let router = Router::with_resolver(
        state,
        PathResolver::new(root, root.join("images"), root.join("misc")),
        Arc::new(types),
    );

    let jpg = router.handle(&Request::get("/assets/photo.jpg")).await;
    assert_eq!(jpg.status, StatusCode::Ok);
    assert_eq!(jpg.content_type, "image/png");

    let txt = router.handle(&Request::get("/misc/textfile.txt")).await;
    assert_eq!(txt.status, StatusCode::UnsupportedMediaType);

    let html = router.handle(&Request::get("/about.html")).await;
    assert_eq!(html.status, StatusCode::UnsupportedMediaType);
}
