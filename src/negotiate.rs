//! Locale negotiation: cookie, then `Accept-Language`, then fallback.

use tracing::trace;

use crate::locale::{LocaleCode, LocaleSet};

/// Resolves the best-fit locale for one request.
///
/// Priority order, first match wins:
///
/// 1. the locale cookie, if its value matches a supported code;
/// 2. weighted `Accept-Language` negotiation against the supported set;
/// 3. the configured fallback.
///
/// Never fails: malformed or unsupported values in either signal fall
/// through silently to the next source.
pub fn resolve(
    cookie: Option<&str>,
    accept_language: Option<&str>,
    locales: &LocaleSet,
) -> LocaleCode {
    if let Some(code) = cookie.and_then(|value| locales.matched(value)) {
        trace!(locale = %code, "resolved from cookie");
        return code.clone();
    }

    if let Some(code) = accept_language.and_then(|header| negotiate(header, locales)) {
        trace!(locale = %code, "resolved from accept-language");
        return code.clone();
    }

    locales.fallback().clone()
}

/// Picks the supported code best satisfying an `Accept-Language` value.
///
/// Entries are `tag` or `tag;q=0.8`, comma-separated. Missing quality
/// defaults to 1.0; entries with an unparsable quality are dropped. Ties
/// keep header order (the sort is stable), so `de, en` prefers `de`.
fn negotiate<'a>(header: &str, locales: &'a LocaleSet) -> Option<&'a LocaleCode> {
    let mut weighted: Vec<(&str, f32)> = Vec::new();

    for entry in header.split(',') {
        let mut parts = entry.split(';').map(str::trim);
        let tag = match parts.next() {
            Some(tag) if !tag.is_empty() => tag,
            _ => continue,
        };

        let quality = match parts.find_map(|p| p.strip_prefix("q=")) {
            Some(raw) => match raw.parse::<f32>() {
                Ok(q) if (0.0..=1.0).contains(&q) => q,
                _ => continue,
            },
            None => 1.0,
        };

        if quality > 0.0 {
            weighted.push((tag, quality));
        }
    }

    weighted.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    weighted.into_iter().find_map(|(tag, _)| locales.matched(tag))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locales() -> LocaleSet {
        LocaleSet::new(["en", "fr", "de"], "en").unwrap()
    }

    #[test]
    fn cookie_wins_over_header() {
        let resolved = resolve(Some("fr"), Some("de"), &locales());
        assert_eq!(resolved.as_str(), "fr");
    }

    #[test]
    fn unsupported_cookie_falls_through_to_header() {
        let resolved = resolve(Some("ja"), Some("de"), &locales());
        assert_eq!(resolved.as_str(), "de");
    }

    #[test]
    fn regional_cookie_matches_supported_base() {
        let resolved = resolve(Some("fr-CA"), None, &locales());
        assert_eq!(resolved.as_str(), "fr");
    }

    #[test]
    fn header_quality_ordering() {
        let set = LocaleSet::new(["en", "fr"], "en").unwrap();
        let resolved = resolve(None, Some("de;q=0.9,en;q=0.8"), &set);
        assert_eq!(resolved.as_str(), "en");
    }

    #[test]
    fn higher_quality_supported_entry_wins() {
        let resolved = resolve(None, Some("en;q=0.7,de;q=0.9"), &locales());
        assert_eq!(resolved.as_str(), "de");
    }

    #[test]
    fn ties_keep_header_order() {
        let resolved = resolve(None, Some("de,fr"), &locales());
        assert_eq!(resolved.as_str(), "de");
    }

    #[test]
    fn wildcard_entry_matches_priority_locale() {
        let set = LocaleSet::new(["fr", "en"], "en").unwrap();
        let resolved = resolve(None, Some("ja,*;q=0.5"), &set);
        assert_eq!(resolved.as_str(), "fr");
    }

    #[test]
    fn malformed_quality_entries_are_dropped() {
        let resolved = resolve(None, Some("de;q=banana,fr;q=0.5"), &locales());
        assert_eq!(resolved.as_str(), "fr");
    }

    #[test]
    fn zero_quality_never_matches() {
        let resolved = resolve(None, Some("de;q=0"), &locales());
        assert_eq!(resolved.as_str(), "en");
    }

    #[test]
    fn no_signals_yields_fallback() {
        let resolved = resolve(None, None, &locales());
        assert_eq!(resolved.as_str(), "en");
    }

    #[test]
    fn garbage_header_yields_fallback() {
        let resolved = resolve(None, Some(";;,,;q=,"), &locales());
        assert_eq!(resolved.as_str(), "en");
    }
}
