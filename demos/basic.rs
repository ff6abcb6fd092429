//! Minimal lenga example — a three-page site served in three languages.
//!
//! Run with:
//!   RUST_LOG=debug cargo run --example basic
//!
//! Try:
//!   curl -i http://localhost:3000/second-page
//!       → 307, location: /en/second-page
//!   curl -i -H 'accept-language: fr;q=0.9,en;q=0.8' http://localhost:3000/
//!       → 307, location: /fr/
//!   curl -i -H 'referer: http://localhost:3000/de/' http://localhost:3000/de/second-page
//!       → 200, set-cookie: i18next=de; Path=/; SameSite=Lax
//!   curl -i http://localhost:3000/api/ping
//!       → no redirect, excluded prefix

use lenga::{Config, LocaleMiddleware, LocaleSet, Method, Request, Response, Router, Server};

#[tokio::main]
async fn main() -> Result<(), lenga::Error> {
    tracing_subscriber::fmt::init();

    // Or: Config::from_env()? with LENGA_SUPPORTED_LOCALES=en,fr,de
    let locales = LocaleSet::new(["en", "fr", "de"], "en")?;
    let middleware = LocaleMiddleware::new(Config::new(locales));

    // Routes are canonical paths: no base path, no locale segment.
    let app = Router::new()
        .on(Method::GET, "/", home)
        .on(Method::GET, "/second-page", second_page)
        .on(Method::GET, "/oidc-client/{page}", oidc_client);

    Server::bind("0.0.0.0:3000").serve(middleware, app).await
}

async fn home(req: Request) -> Response {
    let lng = req.locale();
    Response::html(format!(
        "<h1>home ({lng})</h1><a href=\"/{lng}/second-page\">second page</a>"
    ))
}

async fn second_page(req: Request) -> Response {
    Response::html(format!(
        "<h1>second page</h1><p>canonical: {}</p>",
        req.canonical_path()
    ))
}

// GET /oidc-client/{page} — one route, every language.
async fn oidc_client(req: Request) -> Response {
    let page = req.param("page").unwrap_or("0");
    Response::html(format!("<h1>client page {page} ({})</h1>", req.locale()))
}
