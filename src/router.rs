//! Radix-tree request router, keyed on canonical paths.
//!
//! Routes are registered without base path or locale segment: the page at
//! `/fr/oidc-client/2` and `/de/oidc-client/2` is one route,
//! `/oidc-client/{page}`. The middleware computes the canonical path before
//! lookup ever happens, so a handler serves every locale of its page and
//! reads the language from [`Request::locale`](crate::Request::locale).

use std::collections::HashMap;
use std::sync::Arc;

use http::Method;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};

/// The application router.
///
/// One radix tree per HTTP method — O(path-length) lookup. Build it once at
/// startup; pass it to [`Server::serve`](crate::Server::serve). Each
/// [`Router::on`] call returns `self` so registrations chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Register a handler for a method + canonical-path pair. Returns
    /// `self` for chaining.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves
    /// them:
    ///
    /// ```rust,no_run
    /// # use lenga::{Method, Request, Response, Router};
    /// # async fn home(_: Request) -> Response { Response::text("") }
    /// # async fn client_page(_: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::GET, "/", home)
    ///     .on(Method::GET, "/oidc-client/{page}", client_page);
    /// ```
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: &Method,
        canonical_path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(canonical_path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched
            .params
            .iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
