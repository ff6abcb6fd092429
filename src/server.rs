//! HTTP server, request dispatch, and graceful shutdown.
//!
//! # Graceful shutdown and Kubernetes
//!
//! When Kubernetes terminates a pod it sends **SIGTERM** and waits
//! `terminationGracePeriodSeconds` (default 30 s) before sending SIGKILL.
//!
//! The server reacts by:
//! 1. Immediately stopping `listener.accept()` — no new connections are made.
//! 2. Letting every in-flight connection task run to completion.
//! 3. Returning from [`Server::serve`], which lets `main` exit cleanly.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{ACCEPT_LANGUAGE, HeaderValue, REFERER};
use http::{HeaderMap, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::error::Error;
use crate::middleware::{
    CANONICAL_PATH_HEADER, LOCALE_COOKIE, LocaleMiddleware, Plan, RequestContext,
};
use crate::request::{Request, cookie_value};
use crate::response::Response;
use crate::router::Router;

/// The HTTP server.
pub struct Server {
    addr: std::net::SocketAddr,
}

impl Server {
    /// Configures the server to bind to `addr` when [`serve`](Server::serve)
    /// is called.
    ///
    /// # Panics
    ///
    /// Panics if `addr` is not a valid `host:port` string.
    pub fn bind(addr: &str) -> Self {
        let addr = addr.parse().expect("invalid socket address");
        Self { addr }
    }

    /// Starts accepting connections, running every request through the
    /// locale middleware before it reaches `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve(self, middleware: LocaleMiddleware, router: Router) -> Result<(), Error> {
        let listener = TcpListener::bind(self.addr).await?;

        // Shared read-only across connection tasks: the middleware holds the
        // startup-loaded LocaleSet, the router holds the routing table.
        let middleware = Arc::new(middleware);
        let router = Arc::new(router);

        info!(addr = %self.addr, "lenga listening");

        // JoinSet tracks every spawned connection task so we can wait for
        // them all to finish during graceful shutdown.
        let mut tasks = tokio::task::JoinSet::new();

        let shutdown = shutdown_signal();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // `biased` makes select! check arms top-to-bottom. Shutdown
                // first, so a SIGTERM immediately stops accepting.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let middleware = Arc::clone(&middleware);
                    let router = Arc::clone(&router);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        // Called once per request on the connection, not
                        // once per connection.
                        let svc = service_fn(move |req| {
                            let middleware = Arc::clone(&middleware);
                            let router = Arc::clone(&router);
                            async move { dispatch(middleware, router, req).await }
                        });

                        // `auto::Builder` handles both HTTP/1.1 and HTTP/2,
                        // whatever the client negotiates.
                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet does not
                // grow without bound on long-running servers.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Drain: wait for every in-flight connection before returning.
        while tasks.join_next().await.is_some() {}

        info!("lenga stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Core hot path: one request in, one plan, one response out.
///
/// The error type is [`Infallible`](std::convert::Infallible) — every
/// failure mode has a defined HTTP answer, hyper never sees an error.
async fn dispatch(
    middleware: Arc<LocaleMiddleware>,
    router: Arc<Router>,
    req: hyper::Request<hyper::body::Incoming>,
) -> Result<http::Response<Full<Bytes>>, std::convert::Infallible> {
    let (parts, body) = req.into_parts();
    let path = parts.uri.path().to_owned();

    let ctx = RequestContext {
        path: &path,
        cookie_locale: cookie_value(&parts.headers, LOCALE_COOKIE),
        accept_language: header_str(&parts.headers, ACCEPT_LANGUAGE.as_str()),
        referer: header_str(&parts.headers, REFERER.as_str()),
    };

    let (locale, canonical_path, set_cookie) = match middleware.plan(&ctx) {
        // Terminal: the redirect response never carries the canonical-path
        // header or a cookie write.
        Plan::Redirect { location } => {
            return Ok(Response::redirect(&location).into_inner());
        }
        Plan::Forward { locale, canonical_path, set_cookie } => {
            (locale, canonical_path, set_cookie)
        }
    };

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!("failed to read request body: {e}");
            return Ok(Response::status(StatusCode::BAD_REQUEST).into_inner());
        }
    };

    // Rebuild the outgoing request rather than mutating the inbound one:
    // all original headers preserved, canonical path added on top.
    let mut headers = parts.headers;
    match HeaderValue::from_str(&canonical_path) {
        Ok(value) => {
            headers.insert(CANONICAL_PATH_HEADER, value);
        }
        Err(e) => debug!("canonical path not header-safe: {e}"),
    }

    let response = match router.lookup(&parts.method, &canonical_path) {
        Some((handler, params)) => {
            let request = Request {
                method: parts.method,
                path,
                canonical_path,
                locale,
                headers,
                body,
                params,
            };
            handler.call(request).await
        }
        None => Response::status(StatusCode::NOT_FOUND),
    };

    // Cookie writing and header injection are independent: the scheduled
    // cookie rides on whatever response the handler produced.
    let response = match set_cookie {
        Some(code) => response.with_cookie(LOCALE_COOKIE, code.as_str()),
        None => response,
    };

    Ok(response.into_inner())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this listens for both **SIGTERM** (sent by `kubectl` and the
/// Kubernetes control plane) and **SIGINT** (Ctrl-C, for local dev).
/// On Windows only Ctrl-C is available.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let sigterm = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
