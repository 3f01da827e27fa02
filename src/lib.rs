//! Porthole - single-shot HTTP/1.1 server core
//!
//! Parses one request per connection without an external HTTP library,
//! dispatches it through an API router, static-file mounts and a redirect
//! registry, and writes back a `Connection: close` response.

pub mod app;
pub mod config;
pub mod fs;
pub mod http;
pub mod routing;
pub mod server;
