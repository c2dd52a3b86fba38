//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. The router is itself a
//! [`Dispatch`] link, so a middleware can wrap the whole routing table.

use std::collections::HashMap;
use std::sync::Arc;

use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::handler::{BoxFuture, Dispatch, Handler, HandlerRef};
use crate::request::Request;
use crate::response::Response;

/// The application router.
///
/// Build it once at startup, then turn it into a [`HandlerRef`] with
/// [`Router::into_handler_ref`] and hand it to middleware or [`Server::serve`](crate::Server::serve).
pub struct Router {
    routes: HashMap<Method, MatchitRouter<HandlerRef>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + path pair. Returns `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them:
    ///
    /// ```rust,no_run
    /// # use reqlog::{Method, Request, Response, Router};
    /// # async fn get_user(_: Request) -> Response { Response::text("") }
    /// # async fn create_user(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::GET,  "/users/{id}", get_user)
    ///     .on(Method::POST, "/users",      create_user);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route or conflicts with one already
    /// registered for `method`.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.route(method, path, handler.into_handler_ref())
    }

    /// Like [`on`](Router::on), for a link that is already a [`HandlerRef`]
    /// (for instance a route wrapped in its own middleware).
    pub fn route(mut self, method: Method, path: &str, handler: HandlerRef) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn into_handler_ref(self) -> HandlerRef {
        Arc::new(self)
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(HandlerRef, HashMap<String, String>)> {
        let matched = self.routes.get(method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((Arc::clone(matched.value), params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

impl Dispatch for Router {
    fn call(&self, mut req: Request) -> BoxFuture {
        match self.lookup(req.method(), req.uri().path()) {
            Some((handler, params)) => {
                req.params = params;
                handler.call(req)
            }
            None => Box::pin(async { Response::status(StatusCode::NOT_FOUND) }),
        }
    }
}
