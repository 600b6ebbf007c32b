//! # Runtime
//!
//! Everything a generated server links against. Generated modules import this
//! module and nothing else from `sigroute`, so the library crate they wrap
//! is their only other dependency.
//!
//! ## Request flow
//!
//! ```text
//! TCP ─▶ HttpServer (one coroutine per connection)
//!          └─▶ RouteTable::call ── exact path lookup ──▶ 404 JSON if unknown
//!                 └─▶ handler(method, body)
//!                        ├─ method != POST      ─▶ 405, no body
//!                        ├─ read_body / decode  ─▶ 400 envelope
//!                        └─ call wrapped fn     ─▶ 200 / 500 envelope, or raw payload
//! ```
//!
//! Handlers share no mutable state; the route table is immutable once built.

mod envelope;
mod http_server;
mod service;

pub use envelope::{decode, encode, read_body, Envelope, Reply};
pub use http_server::{HttpServer, ServerHandle};
pub use service::{route_paths, Handler, Route, RouteTable};

pub use crate::logging::init_logging;
pub use crate::runtime_config::RuntimeConfig;

// Re-exported so generated modules need no direct dependencies of their own.
pub use anyhow::Result;
pub use serde;
pub use serde_json;
pub use serde_json::Value;
pub use tracing;

use anyhow::{anyhow, Context};
use tracing::info;

/// Start serving `routes` and block until the server stops.
///
/// `SIGROUTE_ADDR` overrides `default_addr`; `SIGROUTE_STACK_SIZE` sets the
/// coroutine stack size.
pub fn serve(default_addr: &str, routes: &[Route]) -> Result<()> {
    let config = RuntimeConfig::from_env();
    may::config().set_stack_size(config.stack_size);

    let addr = config.bind_addr(default_addr);
    let table = RouteTable::new(routes);
    info!(%addr, routes = table.len(), stack_size = config.stack_size, "starting server");
    let handle = HttpServer(table)
        .start(addr)
        .with_context(|| format!("Failed to bind {addr}"))?;
    handle
        .join()
        .map_err(|_| anyhow!("server coroutine panicked"))
}
