use std::io;
use std::sync::Arc;

use porthole::app::AppState;
use porthole::config::Config;
use porthole::fs::{File, FileSystem, FsError, MemoryFs, NodeKind, Stat};
use porthole::http::connection::{Connection, Dispatch};
use porthole::http::parser::ParserLimits;
use porthole::http::request::{Method, Request, RequestBuilder};
use porthole::http::response::{Response, StatusCode};
use porthole::routing::{
    ApiRouter, MatchKind, RedirectKind, RedirectRegistry, StaticMount, StaticRouter, handlers,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

fn app_with_mounts(statics: Vec<StaticRouter>) -> AppState {
    let mut api = ApiRouter::new("/api", 5);
    api.add(Method::GET, "/echo", handlers::echo).unwrap();
    api.add(Method::POST, "/echo", handlers::echo).unwrap();

    let mut redirects = RedirectRegistry::new(5);
    redirects
        .add("/old", "/public/", MatchKind::Exact, false, RedirectKind::Permanent)
        .unwrap();
    redirects
        .add("/blog", "/public/blog", MatchKind::SegmentPrefix, true, RedirectKind::Temporary)
        .unwrap();

    AppState::new(api, statics, redirects)
}

fn app() -> AppState {
    let fs = MemoryFs::new()
        .with_file("index.html", "<h1>home</h1>")
        .with_file("app.js", "run()");
    app_with_mounts(vec![StaticRouter::new(StaticMount::new(
        "/public",
        Arc::new(fs),
    ))])
}

fn get(path: &str) -> Request {
    RequestBuilder::new()
        .method(Method::GET)
        .path(path)
        .build()
        .unwrap()
}

fn dispatch(app: &AppState, req: &Request) -> Response {
    let mut resp = Response::default();
    app.dispatch(req, &mut resp).unwrap();
    resp
}

async fn serve_raw(app: &AppState, raw: &[u8]) -> (anyhow::Result<()>, String) {
    let (mut client, server) = tokio::io::duplex(64 * 1024);
    client.write_all(raw).await.unwrap();

    let mut conn = Connection::new(server, ParserLimits::default());
    let result = conn.run(app).await;
    drop(conn);

    let mut out = Vec::new();
    client.read_to_end(&mut out).await.unwrap();
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_echo_end_to_end() {
    let (result, text) = serve_raw(&app(), b"GET /api/echo HTTP/1.1\r\nHost: x\r\n\r\n").await;

    result.unwrap();
    assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(text.contains("Content-Type: text/plain; charset=UTF-8\r\n"));
    assert!(text.contains("Content-Length: 13\r\n"));
    assert!(text.ends_with("\r\n\r\nGET /api/echo"));
}

#[tokio::test]
async fn test_static_file_end_to_end() {
    let (result, text) = serve_raw(&app(), b"GET /public/app.js HTTP/1.1\r\n\r\n").await;

    result.unwrap();
    assert!(text.contains("Content-Type: text/javascript\r\n"));
    assert!(text.ends_with("run()"));
}

#[tokio::test]
async fn test_redirect_end_to_end() {
    let (result, text) = serve_raw(&app(), b"GET /old HTTP/1.1\r\n\r\n").await;

    result.unwrap();
    assert!(text.starts_with("HTTP/1.1 301 Moved Permanently\r\n"));
    assert!(text.contains("Location: /public/\r\n"));
    assert!(text.contains("Content-Length: 0\r\n"));
}

#[test]
fn test_redirect_with_tail() {
    let resp = dispatch(&app(), &get("/blog/2024/hello"));

    assert_eq!(resp.status, StatusCode::Found);
    assert_eq!(resp.header("Location"), Some("/public/blog/2024/hello"));
}

#[test]
fn test_unrouted_path_is_not_found() {
    let resp = dispatch(&app(), &get("/nowhere"));

    assert_eq!(resp.status, StatusCode::NotFound);
    assert_eq!(resp.body.as_bytes(), b"Not found\n");
}

#[test]
fn test_api_is_tried_before_mounts() {
    let fs = MemoryFs::new().with_file("api/echo", "shadowed");
    let app = app_with_mounts(vec![StaticRouter::new(StaticMount::new("/", Arc::new(fs)))]);

    let resp = dispatch(&app, &get("/api/echo"));

    assert_eq!(resp.body.as_bytes(), b"GET /api/echo");
}

#[test]
fn test_mounts_tried_in_order() {
    let first = MemoryFs::new().with_file("a.txt", "first");
    let second = MemoryFs::new().with_file("a.txt", "second");
    let app = app_with_mounts(vec![
        StaticRouter::new(StaticMount::new("/files", Arc::new(first))),
        StaticRouter::new(StaticMount::new("/files", Arc::new(second))),
    ]);

    let resp = dispatch(&app, &get("/files/a.txt"));

    assert_eq!(resp.body.as_bytes(), b"first");
}

#[test]
fn test_mount_shadows_redirect() {
    let fs = MemoryFs::new();
    let app = app_with_mounts(vec![StaticRouter::new(StaticMount::new("/old", Arc::new(fs)))]);

    let resp = dispatch(&app, &get("/old"));

    assert_eq!(resp.status, StatusCode::NotFound);
    assert!(resp.header("Location").is_none());
}

struct UnreadableFs;

impl FileSystem for UnreadableFs {
    fn stat(&self, _path: &str) -> Result<Stat, FsError> {
        Ok(Stat {
            size: 8,
            kind: NodeKind::File,
        })
    }

    fn open(&self, _path: &str) -> Result<Box<dyn File>, FsError> {
        Err(FsError::Io(io::Error::from(io::ErrorKind::PermissionDenied)))
    }
}

#[tokio::test]
async fn test_router_failure_becomes_500() {
    let app = app_with_mounts(vec![StaticRouter::new(StaticMount::new(
        "/broken",
        Arc::new(UnreadableFs),
    ))]);

    let mut resp = Response::default();
    assert!(app.dispatch(&get("/broken/x"), &mut resp).is_err());
    assert_eq!(resp.status, StatusCode::InternalServerError);

    let (result, text) = serve_raw(&app, b"GET /broken/x HTTP/1.1\r\n\r\n").await;
    assert!(result.is_err());
    assert!(text.starts_with("HTTP/1.1 500 Internal Server Error\r\n"));
}

#[test]
fn test_from_config_builds_routes_and_mount_roots() {
    let dir = tempfile::TempDir::new().unwrap();
    let root = dir.path().join("site");
    let yaml = format!(
        "mounts:\n  - prefix: /site\n    root: \"{}\"\nredirects:\n  rules:\n    - from: /home\n      to: /site/\n      match: exact\n",
        root.display()
    );
    let cfg = Config::from_yaml(&yaml).unwrap();

    let app = AppState::from_config(&cfg).unwrap();

    assert!(root.is_dir());
    assert_eq!(app.api().prefix(), "/api");
    assert_eq!(app.api().routes().len(), 2);
    assert_eq!(app.redirects().len(), 1);

    std::fs::write(root.join("index.html"), "<p>disk</p>").unwrap();
    let resp = dispatch(&app, &get("/site/"));
    assert_eq!(resp.body.as_bytes(), b"<p>disk</p>");

    let resp = dispatch(&app, &get("/home"));
    assert_eq!(resp.status, StatusCode::Found);
}

#[test]
fn test_from_config_rejects_bad_redirect() {
    let cfg = Config::from_yaml(
        "mounts: []\nredirects:\n  rules:\n    - from: /a\n      to: /b\n      match: exact\n      append_tail: true\n",
    )
    .unwrap();

    let err = AppState::from_config(&cfg).err().unwrap();

    assert!(format!("{err:#}").contains("exact redirect rules cannot append a tail"));
}
