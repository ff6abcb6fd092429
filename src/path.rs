//! Path canonicalisation and locale-segment extraction.
//!
//! Locale segments are matched as whole path segments only. Supported
//! locale `en` is present in `/en/about` and `/en`, but not in `/enable`
//! — a prefix check over raw bytes would corrupt the latter.

use http::Uri;

use crate::locale::{LocaleCode, LocaleSet};

/// Removes a literal `base_path` prefix from `path`.
///
/// The prefix only counts when it ends on a segment boundary: with base
/// path `/app`, `/app/x` strips to `/x` but `/application` is untouched.
/// An exhausted path degrades to `/`.
pub(crate) fn strip_base<'a>(path: &'a str, base_path: &str) -> &'a str {
    if base_path.is_empty() {
        return path;
    }
    match path.strip_prefix(base_path) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => path,
    }
}

/// The supported locale carried as the first segment of `path`, if any.
///
/// Full-segment, case-insensitive match against the exact supported codes:
/// `/fr/x` yields `fr`, while `/fr-CA/x` only matches if `fr-ca` itself is
/// in the supported set.
pub fn locale_prefix<'a>(path: &str, locales: &'a LocaleSet) -> Option<&'a LocaleCode> {
    let first = path.strip_prefix('/')?.split('/').next()?;
    locales
        .supported()
        .iter()
        .find(|code| code.as_str().eq_ignore_ascii_case(first))
}

/// Strips `base_path` and a leading supported-locale segment from `path`,
/// yielding the locale-agnostic canonical path.
///
/// Always begins with `/`; a fully-consumed path yields `/`. Only the
/// first segment is examined, and only one segment is ever removed —
/// repeated application is a no-op, and a deeper segment that happens to
/// spell a locale code (`/fr/docs/en`) survives.
pub fn canonicalize(path: &str, base_path: &str, locales: &LocaleSet) -> String {
    let path = strip_base(path, base_path);

    let Some(code) = locale_prefix(path, locales) else {
        return if path.is_empty() { "/".to_owned() } else { path.to_owned() };
    };

    match &path[1 + code.as_str().len()..] {
        "" => "/".to_owned(),
        rest => rest.to_owned(),
    }
}

/// Extracts the locale already visible in a `Referer` value.
///
/// Accepts absolute URLs and bare paths; anything that fails to parse is
/// treated as no signal at all.
pub fn referer_locale<'a>(
    referer: &str,
    base_path: &str,
    locales: &'a LocaleSet,
) -> Option<&'a LocaleCode> {
    let uri: Uri = referer.trim().parse().ok()?;
    locale_prefix(strip_base(uri.path(), base_path), locales)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> LocaleSet {
        LocaleSet::new(["en", "fr", "de"], "en").unwrap()
    }

    #[test]
    fn strips_locale_segment() {
        assert_eq!(canonicalize("/fr/oidc-client/2", "", &locales()), "/oidc-client/2");
    }

    #[test]
    fn strips_base_path_then_locale() {
        assert_eq!(canonicalize("/app/fr/oidc-client/2", "/app", &locales()), "/oidc-client/2");
    }

    #[test]
    fn bare_locale_becomes_root() {
        assert_eq!(canonicalize("/fr", "", &locales()), "/");
        assert_eq!(canonicalize("/app/fr", "/app", &locales()), "/");
    }

    #[test]
    fn locale_like_words_survive() {
        assert_eq!(canonicalize("/enable", "", &locales()), "/enable");
        assert_eq!(canonicalize("/fresh/start", "", &locales()), "/fresh/start");
    }

    #[test]
    fn only_the_first_segment_is_stripped() {
        assert_eq!(canonicalize("/fr/docs/en", "", &locales()), "/docs/en");
    }

    #[test]
    fn idempotent_on_prefixed_paths() {
        let once = canonicalize("/fr/second-page", "", &locales());
        let twice = canonicalize(&once, "", &locales());
        assert_eq!(once, twice);
    }

    #[test]
    fn base_prefix_requires_segment_boundary() {
        assert_eq!(strip_base("/application", "/app"), "/application");
        assert_eq!(strip_base("/app/x", "/app"), "/x");
        assert_eq!(strip_base("/app", "/app"), "/");
    }

    #[test]
    fn locale_prefix_is_case_insensitive() {
        assert_eq!(locale_prefix("/FR/page", &locales()).unwrap().as_str(), "fr");
    }

    #[test]
    fn regional_segment_does_not_match_base_code() {
        assert_eq!(locale_prefix("/fr-CA/page", &locales()), None);
    }

    #[test]
    fn referer_locale_from_absolute_url() {
        let set = locales();
        let found = referer_locale("https://example.com/fr/second-page", "", &set);
        assert_eq!(found.unwrap().as_str(), "fr");
    }

    #[test]
    fn referer_locale_honours_base_path() {
        let set = locales();
        let found = referer_locale("https://example.com/app/de/x", "/app", &set);
        assert_eq!(found.unwrap().as_str(), "de");
    }

    #[test]
    fn malformed_referer_is_no_signal() {
        let set = locales();
        assert_eq!(referer_locale("http://exa mple/fr", "", &set), None);
        assert_eq!(referer_locale("", "", &set), None);
    }

    #[test]
    fn referer_without_locale_is_no_signal() {
        let set = locales();
        assert_eq!(referer_locale("https://example.com/about", "", &set), None);
    }
}
