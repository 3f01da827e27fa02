//! Application state
//!
//! Built once before the first connection and read-only afterwards; every
//! connection borrows it as its dispatcher.

use std::sync::Arc;

use anyhow::Context;

use crate::config::Config;
use crate::fs::PosixFs;
use crate::http::connection::Dispatch;
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::routing::{
    ApiRouter, Outcome, RedirectRegistry, StaticMount, StaticRouter, handlers,
};

pub struct AppState {
    api: ApiRouter,
    statics: Vec<StaticRouter>,
    redirects: RedirectRegistry,
}

impl AppState {
    pub fn new(api: ApiRouter, statics: Vec<StaticRouter>, redirects: RedirectRegistry) -> Self {
        Self {
            api,
            statics,
            redirects,
        }
    }

    /// Registers the built-in API routes, opens one POSIX-backed mount per
    /// configured mount (creating missing roots) and loads redirect rules.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let mut api = ApiRouter::new(&cfg.api.prefix, cfg.api.capacity);
        api.add(Method::GET, "/echo", handlers::echo)?;
        api.add(Method::POST, "/echo", handlers::echo)?;

        let mut statics = Vec::with_capacity(cfg.mounts.len());
        for mount in &cfg.mounts {
            let fs = PosixFs::new(&mount.root);
            fs.ensure_root()
                .with_context(|| format!("preparing root {}", mount.root.display()))?;
            let router = StaticRouter::new(
                StaticMount::new(&mount.prefix, Arc::new(fs))
                    .index(mount.index.clone())
                    .max_bytes(mount.max_bytes),
            );
            tracing::info!(
                prefix = %router.mount().prefix,
                root = %mount.root.display(),
                index = %router.mount().index,
                "Static mount ready"
            );
            statics.push(router);
        }

        let mut redirects = RedirectRegistry::new(cfg.redirects.capacity);
        for rule in &cfg.redirects.rules {
            redirects
                .add(&rule.from, &rule.to, rule.match_kind, rule.append_tail, rule.kind)
                .with_context(|| format!("redirect rule {} -> {}", rule.from, rule.to))?;
        }

        Ok(Self::new(api, statics, redirects))
    }

    pub fn api(&self) -> &ApiRouter {
        &self.api
    }

    pub fn redirects(&self) -> &RedirectRegistry {
        &self.redirects
    }

    /// API router, then static mounts in order, then redirects, then 404.
    fn route(&self, request: &Request, response: &mut Response) -> anyhow::Result<()> {
        if self.api.handle(request, response)? == Outcome::Handled {
            return Ok(());
        }

        for router in &self.statics {
            if router.handle(request, response)? == Outcome::Handled {
                return Ok(());
            }
        }

        *response = match self.redirects.lookup(&request.path) {
            Some(found) => {
                tracing::debug!(
                    path = %request.path,
                    location = %found.target,
                    status = found.kind.status().as_u16(),
                    "Redirecting"
                );
                Response::redirect(found.kind.status(), found.target.into_owned())
            }
            None => Response::not_found(),
        };
        Ok(())
    }
}

impl Dispatch for AppState {
    fn dispatch(&self, request: &Request, response: &mut Response) -> anyhow::Result<()> {
        self.route(request, response).inspect_err(|_| {
            *response = Response::internal_error();
        })
    }
}
