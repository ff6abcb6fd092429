//! # lenga
//!
//! Locale-negotiation middleware for hyper services behind a reverse proxy.
//!
//! ## The contract
//!
//! Every page URL carries an explicit, supported locale segment —
//! `/fr/second-page`, never `/second-page`. lenga enforces that contract at
//! the front door so nothing downstream has to think about it:
//!
//! - **Negotiation** — cookie, then weighted `Accept-Language`, then the
//!   configured fallback. Malformed input falls through silently; no
//!   request is ever rejected for locale reasons.
//! - **Redirect** — a path without a locale prefix gets a `307` to
//!   `{base_path}/{locale}{path}`. Infrastructure prefixes (API namespace,
//!   static assets) are structurally exempt, so redirect loops cannot
//!   happen.
//! - **Canonical path** — the base path and locale segment are stripped and
//!   the result travels to handlers in the `x-r-path` header, so routes are
//!   registered once, not once per language.
//! - **Cookie tracking** — when a same-origin `Referer` already shows a
//!   locale, it is persisted in the `i18next` cookie and later requests
//!   skip negotiation entirely.
//!
//! The decision core is a pure function ([`LocaleMiddleware::plan`]): no
//! I/O, no locks, no cross-request state beyond the immutable
//! startup-loaded [`LocaleSet`].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use lenga::{Config, LocaleMiddleware, LocaleSet, Method, Request, Response, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), lenga::Error> {
//!     let locales = LocaleSet::new(["en", "fr", "de"], "en")?;
//!     let middleware = LocaleMiddleware::new(Config::new(locales));
//!
//!     let app = Router::new()
//!         .on(Method::GET, "/", home)
//!         .on(Method::GET, "/second-page", second_page);
//!
//!     Server::bind("0.0.0.0:3000").serve(middleware, app).await
//! }
//!
//! async fn home(req: Request) -> Response {
//!     // `/fr/` and `/de/` both land here; the locale rides on the request.
//!     Response::html(format!("<h1>home ({})</h1>", req.locale()))
//! }
//!
//! async fn second_page(req: Request) -> Response {
//!     Response::html(format!("<a href=\"/{}/\">back</a>", req.locale()))
//! }
//! ```

mod config;
mod error;
mod handler;
mod locale;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;
pub mod negotiate;
pub mod path;

pub use config::Config;
pub use error::Error;
pub use handler::Handler;
pub use locale::{LocaleCode, LocaleSet};
pub use middleware::{
    CANONICAL_PATH_HEADER, LOCALE_COOKIE, LocaleMiddleware, Plan, RequestContext,
};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;

// Re-exported so applications do not need a direct `http` dependency for
// the common cases.
pub use http::{Method, StatusCode};
