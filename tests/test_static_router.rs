use std::io;
use std::sync::Arc;

use porthole::fs::{File, FileSystem, FsError, MemoryFs, NodeKind, Stat};
use porthole::http::request::{Method, Request, RequestBuilder};
use porthole::http::response::{Body, Response, StatusCode};
use porthole::routing::{Outcome, StaticMount, StaticRouter};

fn site() -> MemoryFs {
    MemoryFs::new()
        .with_file("index.html", "<h1>home</h1>")
        .with_file("app.js", "run()")
        .with_file("style.CSS", "body{}")
        .with_file("notes.txt", "plain")
        .with_file("data.json", "{}")
        .with_file("blob.bin", vec![0u8, 1, 2])
        .with_file("empty.txt", "")
        .with_file("docs/index.html", "<h1>docs</h1>")
        .with_file("big.txt", "0123456789")
}

fn router() -> StaticRouter {
    StaticRouter::new(StaticMount::new("/public", Arc::new(site())))
}

fn get(path: &str) -> Request {
    RequestBuilder::new()
        .method(Method::GET)
        .path(path)
        .build()
        .unwrap()
}

fn serve(router: &StaticRouter, req: &Request) -> (Outcome, Response) {
    let mut resp = Response::default();
    let outcome = router.handle(req, &mut resp).unwrap();
    (outcome, resp)
}

#[test]
fn test_serves_file_with_media_type() {
    let (outcome, resp) = serve(&router(), &get("/public/app.js"));

    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.content_type.as_deref(), Some("text/javascript"));
    assert_eq!(resp.body.as_bytes(), b"run()");
    assert!(resp.body.is_owned());
}

#[test]
fn test_media_types_by_extension() {
    let cases = [
        ("/public/notes.txt", "text/plain; charset=UTF-8"),
        ("/public/data.json", "application/json; charset=UTF-8"),
        ("/public/style.CSS", "text/css"),
        ("/public/blob.bin", "application/octet-stream"),
    ];

    for (path, expected) in cases {
        let (_, resp) = serve(&router(), &get(path));
        assert_eq!(resp.content_type.as_deref(), Some(expected), "{path}");
    }
}

#[test]
fn test_mount_root_serves_index() {
    for path in ["/public", "/public/", "/public/?v=2"] {
        let (outcome, resp) = serve(&router(), &get(path));

        assert_eq!(outcome, Outcome::Handled, "{path}");
        assert_eq!(resp.body.as_bytes(), b"<h1>home</h1>", "{path}");
        assert_eq!(
            resp.content_type.as_deref(),
            Some("text/html; charset=UTF-8")
        );
    }
}

#[test]
fn test_directory_with_trailing_slash_serves_index() {
    let (_, resp) = serve(&router(), &get("/public/docs/"));

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.body.as_bytes(), b"<h1>docs</h1>");
}

#[test]
fn test_directory_without_slash_is_not_found() {
    let (outcome, resp) = serve(&router(), &get("/public/docs"));

    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(resp.status, StatusCode::NotFound);
}

#[test]
fn test_missing_file_is_not_found() {
    let (outcome, resp) = serve(&router(), &get("/public/nope.html"));

    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(resp.status, StatusCode::NotFound);
    assert_eq!(resp.body.as_bytes(), b"Not found\n");
}

#[test]
fn test_query_and_fragment_are_ignored() {
    let (_, resp) = serve(&router(), &get("/public/notes.txt?download=1#top"));

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.body.as_bytes(), b"plain");
}

#[test]
fn test_paths_outside_mount_are_not_mine() {
    for path in ["/", "/publicity", "/api/echo"] {
        let (outcome, _) = serve(&router(), &get(path));
        assert_eq!(outcome, Outcome::NotMine, "{path}");
    }
}

#[test]
fn test_non_get_is_method_not_allowed() {
    let req = RequestBuilder::new()
        .method(Method::POST)
        .path("/public/app.js")
        .body("x")
        .build()
        .unwrap();

    let (outcome, resp) = serve(&router(), &req);

    assert_eq!(outcome, Outcome::Handled);
    assert_eq!(resp.status, StatusCode::MethodNotAllowed);
}

#[test]
fn test_file_over_limit_is_forbidden() {
    let router = StaticRouter::new(StaticMount::new("/public", Arc::new(site())).max_bytes(4));

    let (_, big) = serve(&router, &get("/public/big.txt"));
    let (_, small) = serve(&router, &get("/public/data.json"));

    assert_eq!(big.status, StatusCode::Forbidden);
    assert_eq!(big.body.as_bytes(), b"File too large\n");
    assert_eq!(small.status, StatusCode::Ok);
}

#[test]
fn test_zero_length_file_has_empty_body() {
    let (_, resp) = serve(&router(), &get("/public/empty.txt"));

    assert_eq!(resp.status, StatusCode::Ok);
    assert_eq!(resp.body, Body::Empty);
    assert_eq!(resp.content_length(), 0);
}

#[test]
fn test_traversal_is_not_found() {
    let (_, resp) = serve(&router(), &get("/public/../secret"));

    assert_eq!(resp.status, StatusCode::NotFound);
}

#[test]
fn test_custom_index_and_trailing_slash_prefix() {
    let fs = MemoryFs::new().with_file("home.htm", "hi");
    let router = StaticRouter::new(StaticMount::new("/site/", Arc::new(fs)).index("home.htm"));

    assert_eq!(router.mount().prefix, "/site");
    let (_, resp) = serve(&router, &get("/site/"));
    assert_eq!(resp.body.as_bytes(), b"hi");
    assert_eq!(
        resp.content_type.as_deref(),
        Some("text/html; charset=UTF-8")
    );
}

/// Stats every path as a 4-byte file but cannot open anything.
struct BrokenFs;

impl FileSystem for BrokenFs {
    fn stat(&self, _path: &str) -> Result<Stat, FsError> {
        Ok(Stat {
            size: 4,
            kind: NodeKind::File,
        })
    }

    fn open(&self, _path: &str) -> Result<Box<dyn File>, FsError> {
        Err(FsError::Io(io::Error::other("disk on fire")))
    }
}

#[test]
fn test_open_failure_is_an_error() {
    let router = StaticRouter::new(StaticMount::new("/public", Arc::new(BrokenFs)));
    let mut resp = Response::default();

    let err = router
        .handle(&get("/public/a.txt"), &mut resp)
        .unwrap_err();

    assert!(format!("{err:#}").contains("open a.txt"));
}
