//! Middleware configuration.
//!
//! Built once at startup, immutable afterwards. Construct directly with the
//! builder methods, or from the environment with [`Config::from_env`].

use crate::error::Error;
use crate::locale::LocaleSet;

/// Prefixes that never redirect: reverse-proxied API traffic and static
/// assets served next to the pages.
const DEFAULT_EXCLUDED: &[&str] = &["/api", "/assets", "/favicon.ico", "/sw.js"];

/// Locale middleware configuration.
///
/// ```rust
/// use lenga::{Config, LocaleSet};
///
/// let config = Config::new(LocaleSet::new(["en", "fr"], "en")?)
///     .base_path("/app")
///     .exclude("/metrics");
/// # Ok::<(), lenga::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    locales: LocaleSet,
    base_path: String,
    excluded_prefixes: Vec<String>,
}

impl Config {
    pub fn new(locales: LocaleSet) -> Self {
        Self {
            locales,
            base_path: String::new(),
            excluded_prefixes: DEFAULT_EXCLUDED.iter().map(|p| (*p).to_owned()).collect(),
        }
    }

    /// Reads configuration from the environment. Every variable is
    /// optional; nothing here is fatal except an invalid locale list.
    ///
    /// | Variable | Meaning | Default |
    /// |---|---|---|
    /// | `LENGA_SUPPORTED_LOCALES` | comma-separated, priority order | `en` |
    /// | `LENGA_FALLBACK_LOCALE` | must be in the supported list | first supported |
    /// | `LENGA_BASE_PATH` (alias `BASEPATH`) | literal URL prefix | empty |
    /// | `LENGA_EXCLUDED_PREFIXES` | comma-separated path prefixes | `/api,/assets,/favicon.ico,/sw.js` |
    pub fn from_env() -> Result<Self, Error> {
        let supported_raw =
            std::env::var("LENGA_SUPPORTED_LOCALES").unwrap_or_else(|_| "en".to_owned());
        let supported: Vec<String> = supported_raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect();
        let fallback = std::env::var("LENGA_FALLBACK_LOCALE")
            .ok()
            .or_else(|| supported.first().cloned())
            .unwrap_or_else(|| "en".to_owned());

        let mut config = Self::new(LocaleSet::new(&supported, fallback.trim())?);

        if let Ok(base) = std::env::var("LENGA_BASE_PATH").or_else(|_| std::env::var("BASEPATH")) {
            config = config.base_path(&base);
        }
        if let Ok(excluded) = std::env::var("LENGA_EXCLUDED_PREFIXES") {
            config.excluded_prefixes = excluded
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect();
        }

        Ok(config)
    }

    /// Sets the literal URL prefix the whole site is mounted under.
    ///
    /// Normalised so that `""`, `"/"` and a trailing slash all behave:
    /// the stored value is either empty or `/something` with no trailing
    /// slash.
    pub fn base_path(mut self, base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_end_matches('/');
        self.base_path = if trimmed.is_empty() || trimmed == "/" {
            String::new()
        } else if trimmed.starts_with('/') {
            trimmed.to_owned()
        } else {
            format!("/{trimmed}")
        };
        self
    }

    /// Adds a path prefix that is never redirected.
    pub fn exclude(mut self, prefix: &str) -> Self {
        self.excluded_prefixes.push(prefix.to_owned());
        self
    }

    /// Replaces the excluded-prefix list entirely.
    pub fn excluded_prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_prefixes = prefixes.into_iter().map(Into::into).collect();
        self
    }

    pub fn locales(&self) -> &LocaleSet {
        &self.locales
    }

    pub fn base(&self) -> &str {
        &self.base_path
    }

    /// Whether a (base-stripped) path belongs to infrastructure traffic
    /// that must pass through untouched.
    pub(crate) fn is_excluded(&self, path: &str) -> bool {
        self.excluded_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::new(LocaleSet::new(["en", "fr"], "en").unwrap())
    }

    #[test]
    fn base_path_normalisation() {
        assert_eq!(config().base_path("").base(), "");
        assert_eq!(config().base_path("/").base(), "");
        assert_eq!(config().base_path("/app/").base(), "/app");
        assert_eq!(config().base_path("app").base(), "/app");
    }

    #[test]
    fn default_exclusions_cover_infrastructure() {
        let config = config();
        assert!(config.is_excluded("/api/token"));
        assert!(config.is_excluded("/favicon.ico"));
        assert!(!config.is_excluded("/second-page"));
    }

    #[test]
    fn exclude_appends_and_replace_overrides() {
        let config = config().exclude("/metrics");
        assert!(config.is_excluded("/metrics"));
        assert!(config.is_excluded("/api/x"));

        let config = config.excluded_prefixes(["/only"]);
        assert!(config.is_excluded("/only/this"));
        assert!(!config.is_excluded("/api/x"));
    }

    #[test]
    fn from_env_defaults_are_never_fatal() {
        // Untouched environment: single `en` locale, empty base path.
        let config = Config::from_env().unwrap();
        assert_eq!(config.base(), "");
        assert_eq!(config.locales().fallback().as_str(), "en");
    }
}
