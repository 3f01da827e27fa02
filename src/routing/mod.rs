//! Request routing
//!
//! Routers are tried in order; each answers [`Outcome::Handled`] after filling
//! the response, [`Outcome::NotMine`] to pass, or an error for a technical
//! failure.

pub mod api;
pub mod handlers;
pub mod redirect;
pub mod static_files;

pub use api::ApiRouter;
pub use redirect::{MatchKind, RedirectKind, RedirectRegistry};
pub use static_files::{StaticMount, StaticRouter};

/// Result of offering a request to a router.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Handled,
    NotMine,
}

pub type RouteResult = anyhow::Result<Outcome>;

/// Returns the part of `path` after `prefix`, if `path` starts with `prefix`
/// at a segment boundary. An empty prefix matches everything.
pub fn strip_segment_prefix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(prefix)?;
    if prefix.is_empty() || rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_prefix_boundaries() {
        assert_eq!(strip_segment_prefix("/api/echo", "/api"), Some("/echo"));
        assert_eq!(strip_segment_prefix("/api", "/api"), Some(""));
        assert_eq!(strip_segment_prefix("/apix", "/api"), None);
        assert_eq!(strip_segment_prefix("/other", "/api"), None);
        assert_eq!(strip_segment_prefix("/anything", ""), Some("/anything"));
    }
}
