//! Static file serving
//!
//! Maps a URL prefix onto a [`FileSystem`] and answers GET requests with whole
//! files, classified by extension.

use std::sync::Arc;

use anyhow::Context;

use crate::fs::{self, FileSystem, NodeKind};
use crate::http::mime::MediaType;
use crate::http::request::{Method, Request};
use crate::http::response::{Body, Response, ResponseBuilder, StatusCode};
use crate::routing::{Outcome, RouteResult, strip_segment_prefix};

pub const DEFAULT_INDEX: &str = "index.html";

/// A URL prefix backed by a filesystem.
#[derive(Clone)]
pub struct StaticMount {
    pub prefix: String,
    pub fs: Arc<dyn FileSystem>,
    pub index: String,
    /// Largest file served, in bytes; 0 means unlimited.
    pub max_bytes: u64,
}

impl StaticMount {
    pub fn new(prefix: &str, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            fs,
            index: DEFAULT_INDEX.to_string(),
            max_bytes: 0,
        }
    }

    pub fn index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    pub fn max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }
}

pub struct StaticRouter {
    mount: StaticMount,
}

impl StaticRouter {
    pub fn new(mount: StaticMount) -> Self {
        Self { mount }
    }

    pub fn mount(&self) -> &StaticMount {
        &self.mount
    }

    pub fn handle(&self, request: &Request, response: &mut Response) -> RouteResult {
        let Some(rest) = strip_segment_prefix(&request.path, &self.mount.prefix) else {
            return Ok(Outcome::NotMine);
        };

        if request.method != Method::GET {
            *response = Response::text(StatusCode::MethodNotAllowed, "Method not allowed\n");
            return Ok(Outcome::Handled);
        }

        let rel_path = relative_path(rest, &self.mount.index);

        let stat = match self.mount.fs.stat(&rel_path) {
            Ok(stat) if stat.kind == NodeKind::File => stat,
            Ok(_) | Err(_) => {
                tracing::debug!(path = %rel_path, "Static file not found");
                *response = Response::not_found();
                return Ok(Outcome::Handled);
            }
        };

        let too_large = usize::try_from(stat.size).is_err()
            || (self.mount.max_bytes > 0 && stat.size > self.mount.max_bytes);
        if too_large {
            tracing::debug!(
                path = %rel_path,
                size = stat.size,
                max = self.mount.max_bytes,
                "Static file over size limit"
            );
            *response = Response::text(StatusCode::Forbidden, "File too large\n");
            return Ok(Outcome::Handled);
        }

        let body = if stat.size == 0 {
            Body::Empty
        } else {
            Body::from(self.read_file(&rel_path, stat.size as usize)?)
        };

        *response = ResponseBuilder::new(StatusCode::Ok)
            .media(MediaType::from_path(&rel_path))
            .body(body)
            .build();
        Ok(Outcome::Handled)
    }

    fn read_file(&self, rel_path: &str, size: usize) -> anyhow::Result<Vec<u8>> {
        let mut file = self
            .mount
            .fs
            .open(rel_path)
            .with_context(|| format!("open {rel_path}"))?;

        let mut buf = vec![0u8; size];
        let read = fs::read_all(file.as_mut(), &mut buf);
        let closed = file.close();

        let n = read.with_context(|| format!("read {rel_path}"))?;
        closed.with_context(|| format!("close {rel_path}"))?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// Path below the mount: one leading `/` removed, query and fragment cut off,
/// and the index file appended for directory-like paths.
pub fn relative_path(rest: &str, index: &str) -> String {
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    let end = rest.find(['?', '#']).unwrap_or(rest.len());
    let rest = &rest[..end];

    if rest.is_empty() || rest.ends_with('/') {
        format!("{rest}{index}")
    } else {
        rest.to_string()
    }
}
