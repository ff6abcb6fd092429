//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method};

use crate::locale::LocaleCode;

/// An incoming HTTP request, as seen by a handler.
///
/// Built fresh for every forwarded request — the hyper request is never
/// mutated in place. By the time a handler runs, the middleware has already
/// resolved the locale and the canonical path; both are right here, no
/// header re-parsing required.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) canonical_path: String,
    pub(crate) locale: LocaleCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The raw request path, base path and locale segment still attached.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The locale-agnostic path this request was routed on. Always starts
    /// with `/`.
    pub fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// The locale this request is served in.
    pub fn locale(&self) -> &LocaleCode {
        &self.locale
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Header value as a string, `None` if absent or not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Value of a named cookie from the `Cookie` header(s).
    pub fn cookie(&self, name: &str) -> Option<&str> {
        cookie_value(&self.headers, name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns a named route parameter.
    ///
    /// For a route `/oidc-client/{page}`, `req.param("page")` on canonical
    /// path `/oidc-client/2` returns `Some("2")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Finds `name` across every `Cookie` header. Pairs are `name=value`
/// separated by `;`; malformed pairs are skipped.
pub(crate) fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    #[test]
    fn cookie_value_finds_named_pair() {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::COOKIE,
            HeaderValue::from_static("theme=dark; i18next=fr; session=abc"),
        );
        assert_eq!(cookie_value(&headers, "i18next"), Some("fr"));
        assert_eq!(cookie_value(&headers, "session"), Some("abc"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_value_spans_multiple_headers() {
        let mut headers = HeaderMap::new();
        headers.append(http::header::COOKIE, HeaderValue::from_static("a=1"));
        headers.append(http::header::COOKIE, HeaderValue::from_static("i18next=de"));
        assert_eq!(cookie_value(&headers, "i18next"), Some("de"));
    }

    #[test]
    fn malformed_pairs_are_skipped() {
        let mut headers = HeaderMap::new();
        headers.insert(http::header::COOKIE, HeaderValue::from_static("garbage; i18next=en"));
        assert_eq!(cookie_value(&headers, "i18next"), Some("en"));
    }
}
