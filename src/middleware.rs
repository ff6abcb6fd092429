//! The locale-negotiation pipeline.
//!
//! Per request: negotiate a locale, enforce the locale prefix on the URL
//! (redirecting when it is missing), compute the canonical path, and decide
//! whether the referer earns a cookie write. The whole decision is a pure
//! function from a [`RequestContext`] to a [`Plan`] — no I/O, no shared
//! mutable state, bounded by input length. The server applies the plan.

use tracing::debug;

use crate::config::Config;
use crate::locale::LocaleCode;
use crate::negotiate;
use crate::path;

/// Cookie persisting the resolved locale across navigations. Site-wide.
pub const LOCALE_COOKIE: &str = "i18next";

/// Request header carrying the canonical path to downstream handlers.
pub const CANONICAL_PATH_HEADER: &str = "x-r-path";

/// The locale-relevant slice of one inbound request. Borrowed, read-only,
/// discarded when the request completes.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestContext<'a> {
    /// Raw request path, base path still attached.
    pub path: &'a str,
    /// Value of the locale cookie, if the client sent one.
    pub cookie_locale: Option<&'a str>,
    /// Raw `Accept-Language` header value.
    pub accept_language: Option<&'a str>,
    /// Raw `Referer` header value.
    pub referer: Option<&'a str>,
}

/// The outcome of the pipeline for one request.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Plan {
    /// The path carries no supported locale prefix: send the client to
    /// `location` and stop. No header injection, no cookie write.
    Redirect { location: String },
    /// Forward to the downstream handler.
    Forward {
        /// The locale this request is served in: the path's own locale
        /// segment when present, otherwise the negotiated one.
        locale: LocaleCode,
        /// Locale-agnostic path, injected as [`CANONICAL_PATH_HEADER`].
        canonical_path: String,
        /// Cookie write scheduled by the referer, if its locale differs
        /// from what the client already presented.
        set_cookie: Option<LocaleCode>,
    },
}

/// The middleware itself: configuration plus the [`plan`](Self::plan)
/// decision. Cheap to share behind an `Arc`; holds nothing mutable.
#[derive(Clone, Debug)]
pub struct LocaleMiddleware {
    config: Config,
}

impl LocaleMiddleware {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs the full decision for one request: negotiate, then either
    /// redirect (terminal) or canonicalise, inspect the referer, and
    /// forward. No step is ever revisited, and every input has a defined
    /// outcome.
    pub fn plan(&self, ctx: &RequestContext<'_>) -> Plan {
        let base = self.config.base();
        let locales = self.config.locales();
        let path = path::strip_base(ctx.path, base);

        // Infrastructure traffic passes through untouched. Checked first so
        // an unprefixed `/api/...` can never enter the redirect branch.
        if self.config.is_excluded(path) {
            return Plan::Forward {
                locale: negotiate::resolve(ctx.cookie_locale, ctx.accept_language, locales),
                canonical_path: path::canonicalize(ctx.path, base, locales),
                set_cookie: None,
            };
        }

        match path::locale_prefix(path, locales) {
            None => {
                let resolved = negotiate::resolve(ctx.cookie_locale, ctx.accept_language, locales);
                let location = format!("{base}/{resolved}{path}");
                debug!(%resolved, %location, "locale missing from path, redirecting");
                Plan::Redirect { location }
            }
            Some(in_path) => {
                let locale = in_path.clone();
                let canonical_path = path::canonicalize(ctx.path, base, locales);

                let set_cookie = ctx
                    .referer
                    .and_then(|referer| path::referer_locale(referer, base, locales))
                    .filter(|code| {
                        !ctx.cookie_locale
                            .is_some_and(|c| c.trim().eq_ignore_ascii_case(code.as_str()))
                    })
                    .cloned();
                if let Some(code) = &set_cookie {
                    debug!(locale = %code, "scheduling locale cookie from referer");
                }

                Plan::Forward { locale, canonical_path, set_cookie }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::LocaleSet;

    fn middleware(base: &str) -> LocaleMiddleware {
        let locales = LocaleSet::new(["en", "fr", "de"], "en").unwrap();
        LocaleMiddleware::new(Config::new(locales).base_path(base))
    }

    fn ctx(path: &str) -> RequestContext<'_> {
        RequestContext { path, ..Default::default() }
    }

    #[test]
    fn unprefixed_path_redirects_to_negotiated_locale() {
        let mw = middleware("");
        let plan = mw.plan(&RequestContext {
            path: "/second-page",
            cookie_locale: Some("fr"),
            ..Default::default()
        });
        assert_eq!(plan, Plan::Redirect { location: "/fr/second-page".to_owned() });
    }

    #[test]
    fn redirect_target_includes_base_path() {
        let mw = middleware("/app");
        let plan = mw.plan(&ctx("/app/second-page"));
        assert_eq!(plan, Plan::Redirect { location: "/app/en/second-page".to_owned() });
    }

    #[test]
    fn root_redirects_to_bare_locale() {
        let mw = middleware("");
        let plan = mw.plan(&ctx("/"));
        assert_eq!(plan, Plan::Redirect { location: "/en/".to_owned() });
    }

    #[test]
    fn prefixed_path_forwards_with_canonical_header_value() {
        let mw = middleware("/app");
        match mw.plan(&ctx("/app/fr/oidc-client/2")) {
            Plan::Forward { locale, canonical_path, set_cookie } => {
                assert_eq!(locale.as_str(), "fr");
                assert_eq!(canonical_path, "/oidc-client/2");
                assert_eq!(set_cookie, None);
            }
            plan => panic!("expected forward, got {plan:?}"),
        }
    }

    #[test]
    fn path_locale_outranks_negotiation_on_forward() {
        let mw = middleware("");
        let plan = mw.plan(&RequestContext {
            path: "/de/about",
            cookie_locale: Some("fr"),
            ..Default::default()
        });
        match plan {
            Plan::Forward { locale, .. } => assert_eq!(locale.as_str(), "de"),
            plan => panic!("expected forward, got {plan:?}"),
        }
    }

    #[test]
    fn excluded_prefixes_never_redirect() {
        let mw = middleware("");
        for path in ["/api/token", "/assets/logo.svg", "/favicon.ico", "/sw.js"] {
            match mw.plan(&ctx(path)) {
                Plan::Forward { set_cookie, .. } => assert_eq!(set_cookie, None),
                plan => panic!("{path} should forward, got {plan:?}"),
            }
        }
    }

    #[test]
    fn excluded_check_runs_against_base_stripped_path() {
        let mw = middleware("/app");
        assert!(matches!(mw.plan(&ctx("/app/api/token")), Plan::Forward { .. }));
    }

    #[test]
    fn locale_like_word_still_redirects() {
        // `/enable` is not locale-prefixed even though it starts with "en".
        let mw = middleware("");
        let plan = mw.plan(&ctx("/enable"));
        assert_eq!(plan, Plan::Redirect { location: "/en/enable".to_owned() });
    }

    #[test]
    fn referer_schedules_cookie_when_none_stored() {
        let mw = middleware("");
        let plan = mw.plan(&RequestContext {
            path: "/fr/oidc-client",
            referer: Some("https://example.com/fr/second-page"),
            ..Default::default()
        });
        match plan {
            Plan::Forward { set_cookie, .. } => {
                assert_eq!(set_cookie.unwrap().as_str(), "fr");
            }
            plan => panic!("expected forward, got {plan:?}"),
        }
    }

    #[test]
    fn referer_matching_stored_cookie_writes_nothing() {
        let mw = middleware("");
        let plan = mw.plan(&RequestContext {
            path: "/fr/oidc-client",
            cookie_locale: Some("fr"),
            referer: Some("https://example.com/fr/second-page"),
            ..Default::default()
        });
        match plan {
            Plan::Forward { set_cookie, .. } => assert_eq!(set_cookie, None),
            plan => panic!("expected forward, got {plan:?}"),
        }
    }

    #[test]
    fn referer_differing_from_cookie_reschedules() {
        let mw = middleware("");
        let plan = mw.plan(&RequestContext {
            path: "/de/about",
            cookie_locale: Some("fr"),
            referer: Some("https://example.com/de/home"),
            ..Default::default()
        });
        match plan {
            Plan::Forward { set_cookie, .. } => {
                assert_eq!(set_cookie.unwrap().as_str(), "de");
            }
            plan => panic!("expected forward, got {plan:?}"),
        }
    }

    #[test]
    fn missing_referer_changes_nothing() {
        let mw = middleware("");
        let with = mw.plan(&ctx("/fr/x"));
        let without = mw.plan(&RequestContext { path: "/fr/x", referer: None, ..Default::default() });
        assert_eq!(with, without);
    }

    #[test]
    fn every_supported_locale_round_trips_through_redirect() {
        let mw = middleware("");
        for code in ["en", "fr", "de"] {
            let plan = mw.plan(&RequestContext {
                path: "/second-page",
                cookie_locale: Some(code),
                ..Default::default()
            });
            assert_eq!(plan, Plan::Redirect { location: format!("/{code}/second-page") });
        }
    }
}
