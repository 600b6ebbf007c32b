use may_minihttp::{HttpService, Request, Response};
use std::collections::HashMap;
use std::io::{self, Read};
use std::sync::Arc;
use tracing::debug;

use super::envelope::{status_reason, Reply};

/// A generated handler: receives the request method and body, never panics on
/// bad input.
pub type Handler = fn(&str, &mut dyn Read) -> Reply;

/// One `/api/<name>` registration.
#[derive(Clone, Copy)]
pub struct Route {
    pub path: &'static str,
    pub handler: Handler,
}

impl Route {
    pub const fn new(path: &'static str, handler: Handler) -> Self {
        Route { path, handler }
    }
}

impl std::fmt::Debug for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route").field("path", &self.path).finish()
    }
}

/// Comma-separated list of registered paths, in registration order.
pub fn route_paths(routes: &[Route]) -> String {
    routes
        .iter()
        .map(|route| route.path)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Exact-path dispatch over a fixed set of routes.
///
/// Cloned per connection by the server; the table itself is shared and
/// immutable.
#[derive(Clone)]
pub struct RouteTable {
    routes: Arc<HashMap<&'static str, Handler>>,
}

impl RouteTable {
    /// Build the table; when a path is registered twice the first handler wins.
    pub fn new(routes: &[Route]) -> Self {
        let mut table = HashMap::with_capacity(routes.len());
        for route in routes {
            table.entry(route.path).or_insert(route.handler);
        }
        RouteTable {
            routes: Arc::new(table),
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn handler(&self, path: &str) -> Option<Handler> {
        let path = path.split('?').next().unwrap_or("/");
        self.routes.get(path).copied()
    }

    /// Run the handler registered for `path`, or `None` for an unknown path.
    pub fn dispatch(&self, method: &str, path: &str, body: &mut dyn Read) -> Option<Reply> {
        let handler = self.handler(path)?;
        Some(handler(method, body))
    }
}

impl HttpService for RouteTable {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let method = req.method().to_string();
        let path = req.path().to_string();

        let Some(handler) = self.handler(&path) else {
            debug!(%method, %path, "no route");
            res.status_code(404, status_reason(404));
            res.header("Content-Type: application/json");
            res.body_vec(
                serde_json::json!({ "error": "Not Found", "method": method, "path": path })
                    .to_string()
                    .into_bytes(),
            );
            return Ok(());
        };

        let mut body = req.body();
        let reply = handler(&method, &mut body);
        debug!(%method, %path, status = reply.status(), "handled");
        reply.write_to(res);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn echo(method: &str, body: &mut dyn Read) -> Reply {
        if method != "POST" {
            return Reply::method_not_allowed();
        }
        match super::super::envelope::read_body(body) {
            Ok(bytes) => Reply::data(&String::from_utf8_lossy(&bytes)),
            Err(reply) => reply,
        }
    }

    fn fail(_: &str, _: &mut dyn Read) -> Reply {
        Reply::failure("second")
    }

    const ROUTES: &[Route] = &[
        Route::new("/api/echo", echo),
        Route::new("/api/echo", fail),
    ];

    #[test]
    fn test_exact_path_dispatch() {
        let table = RouteTable::new(ROUTES);
        assert_eq!(table.len(), 1);
        let reply = table
            .dispatch("POST", "/api/echo", &mut Cursor::new(b"hi".to_vec()))
            .unwrap();
        assert_eq!(reply.envelope().unwrap().data, "hi");
        assert!(table.dispatch("POST", "/api/Echo", &mut io::empty()).is_none());
        assert!(table.dispatch("POST", "/api/echo/", &mut io::empty()).is_none());
    }

    #[test]
    fn test_query_string_is_ignored() {
        let table = RouteTable::new(ROUTES);
        assert!(table.handler("/api/echo?x=1").is_some());
    }

    #[test]
    fn test_method_is_passed_through() {
        let table = RouteTable::new(ROUTES);
        let reply = table.dispatch("GET", "/api/echo", &mut io::empty()).unwrap();
        assert_eq!(reply, Reply::MethodNotAllowed);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(route_paths(ROUTES), "/api/echo, /api/echo");
        assert_eq!(route_paths(&[]), "");
    }
}
