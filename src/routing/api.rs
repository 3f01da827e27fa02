use thiserror::Error;

use crate::http::request::{Method, Request};
use crate::http::response::{Response, StatusCode};
use crate::routing::{Outcome, RouteResult, strip_segment_prefix};

/// Route handler: fills `response` or fails.
pub type Handler = fn(&Request, &mut Response) -> anyhow::Result<()>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route table is full ({capacity} routes)")]
    CapacityExhausted { capacity: usize },
}

#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    pub path: String,
    pub handler: Handler,
}

/// Insertion-ordered route table under a path prefix.
#[derive(Debug, Clone)]
pub struct ApiRouter {
    prefix: String,
    routes: Vec<Route>,
    capacity: usize,
}

impl ApiRouter {
    /// A trailing `/` on `prefix` is ignored; an empty prefix claims every path.
    pub fn new(prefix: &str, capacity: usize) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            routes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Appends a route. Duplicates are accepted; the earlier one always wins.
    pub fn add(
        &mut self,
        method: Method,
        path: impl Into<String>,
        handler: Handler,
    ) -> Result<(), RouteError> {
        if self.routes.len() >= self.capacity {
            return Err(RouteError::CapacityExhausted {
                capacity: self.capacity,
            });
        }
        self.routes.push(Route {
            method,
            path: path.into(),
            handler,
        });
        Ok(())
    }

    /// Runs the first route whose method and post-prefix path match.
    ///
    /// Requests outside the prefix are [`Outcome::NotMine`]. Inside the prefix
    /// an unknown route is answered with 404 and counts as handled.
    pub fn handle(&self, request: &Request, response: &mut Response) -> RouteResult {
        let Some(rest) = strip_segment_prefix(&request.path, &self.prefix) else {
            return Ok(Outcome::NotMine);
        };

        let route = self
            .routes
            .iter()
            .find(|r| r.method == request.method && r.path == rest);

        match route {
            Some(route) => {
                tracing::debug!(method = %request.method, path = %route.path, "API route matched");
                (route.handler)(request, response)?;
            }
            None => {
                *response = Response::text(StatusCode::NotFound, "API route not found\n");
            }
        }
        Ok(Outcome::Handled)
    }
}
