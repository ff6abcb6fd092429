//! Validated locale codes and the supported-locale set.
//!
//! Locale values never float around as loose strings. A [`LocaleCode`] can
//! only be constructed through validation, and membership questions go
//! through [`LocaleSet`] — the one place that knows which locales the site
//! actually serves and in which priority order.

use std::fmt;

use crate::error::Error;

// ── LocaleCode ────────────────────────────────────────────────────────────────

/// A validated locale tag, e.g. `en`, `fr`, `pt-br`.
///
/// Stored lowercase. The primary subtag is 2–3 ASCII letters; further
/// subtags (region, script) are ASCII alphanumeric. Comparison against raw
/// header values is case-insensitive — see [`LocaleSet::matched`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct LocaleCode(String);

impl LocaleCode {
    /// Validates and normalises a locale tag.
    pub fn new(tag: &str) -> Result<Self, Error> {
        let tag = tag.trim();
        if tag.is_empty() {
            return Err(Error::config("locale code must not be empty"));
        }

        let mut subtags = tag.split('-');
        let primary = subtags.next().unwrap_or("");
        if !(2..=3).contains(&primary.len()) || !primary.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::config(format!("invalid locale code `{tag}`")));
        }
        for subtag in subtags {
            if subtag.is_empty() || !subtag.bytes().all(|b| b.is_ascii_alphanumeric()) {
                return Err(Error::config(format!("invalid locale code `{tag}`")));
            }
        }

        Ok(Self(tag.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The language subtag alone: `pt-br` → `pt`.
    fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for LocaleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LocaleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ── LocaleSet ─────────────────────────────────────────────────────────────────

/// The immutable set of locales a deployment serves.
///
/// Insertion order is match priority: when several supported codes could
/// satisfy a request signal, the one listed first wins. Built once at
/// startup and shared read-only for the process lifetime.
///
/// ```rust
/// use lenga::LocaleSet;
///
/// let locales = LocaleSet::new(["en", "fr", "de"], "en").unwrap();
/// assert_eq!(locales.fallback().as_str(), "en");
/// ```
#[derive(Clone, Debug)]
pub struct LocaleSet {
    supported: Vec<LocaleCode>,
    fallback: LocaleCode,
}

impl LocaleSet {
    /// Builds the set from raw tags. Fails if any tag is invalid, the list
    /// is empty, or the fallback is not itself supported.
    pub fn new<I, S>(supported: I, fallback: &str) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let supported = supported
            .into_iter()
            .map(|tag| LocaleCode::new(tag.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if supported.is_empty() {
            return Err(Error::config("supported locale list must not be empty"));
        }

        let fallback = LocaleCode::new(fallback)?;
        if !supported.contains(&fallback) {
            return Err(Error::config(format!(
                "fallback locale `{fallback}` is not in the supported set"
            )));
        }

        Ok(Self { supported, fallback })
    }

    /// Supported codes in priority order.
    pub fn supported(&self) -> &[LocaleCode] {
        &self.supported
    }

    pub fn fallback(&self) -> &LocaleCode {
        &self.fallback
    }

    /// Resolves a raw tag from a cookie or `Accept-Language` entry to a
    /// supported code, or `None` if nothing fits.
    ///
    /// Matching is tolerant the way negotiation libraries are: an exact
    /// case-insensitive match wins, otherwise the first supported code
    /// sharing the tag's primary language subtag (so `fr-CA` matches
    /// supported `fr`, and `pt` matches supported `pt-br`). The wildcard
    /// `*` matches the highest-priority supported code.
    pub fn matched(&self, tag: &str) -> Option<&LocaleCode> {
        let tag = tag.trim();
        if tag.is_empty() {
            return None;
        }
        if tag == "*" {
            return self.supported.first();
        }

        if let Some(exact) = self
            .supported
            .iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(tag))
        {
            return Some(exact);
        }

        let primary = tag.split('-').next().unwrap_or(tag);
        self.supported
            .iter()
            .find(|code| code.primary().eq_ignore_ascii_case(primary))
    }
}
