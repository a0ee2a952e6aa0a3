//! Localization of product names and other catalogue strings.
//!
//! Dictionaries are flat JSON objects mapping the source (English) text to
//! its translation, one file per locale: `i18n/de_DE.json`, `i18n/fr.json`.
//! They are loaded once at startup.
//!
//! Lookup order for `translate(text, de_DE)`: the `de_DE` dictionary, then
//! `de`, then the text itself.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

/// Longest locale tag accepted from a request.
const MAX_LOCALE_LEN: usize = 16;

/// Errors loading locale dictionaries.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dictionary {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A normalized locale tag such as `en`, `de_DE` or `zh_CN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale(String);

impl Locale {
    /// Normalize a locale tag: `de-de` and `DE_de` both become `de_DE`.
    ///
    /// Returns `None` for empty, wildcard, overlong or non-alphabetic tags.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag.is_empty() || tag.len() > MAX_LOCALE_LEN {
            return None;
        }

        let mut parts = tag.split(['-', '_']);
        let language = parts.next()?;
        if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }

        let mut normalized = language.to_ascii_lowercase();
        if let Some(region) = parts.next() {
            if region.is_empty() || !region.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
            normalized.push('_');
            normalized.push_str(&region.to_ascii_uppercase());
        }
        if parts.next().is_some() {
            return None;
        }

        Some(Self(normalized))
    }

    /// Pick the request locale: `language` cookie, then the first
    /// `Accept-Language` entry, then `fallback`.
    #[must_use]
    pub fn negotiate(cookie: Option<&str>, accept_language: Option<&str>, fallback: &Self) -> Self {
        cookie
            .and_then(Self::parse)
            .or_else(|| accept_language.and_then(first_accept_language))
            .unwrap_or_else(|| fallback.clone())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The language part without region: `de` for `de_DE`.
    #[must_use]
    pub fn language(&self) -> &str {
        self.0.split('_').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// First usable tag of an `Accept-Language` header, ignoring quality values.
fn first_accept_language(header: &str) -> Option<Locale> {
    header
        .split(',')
        .filter_map(|entry| entry.split(';').next())
        .find_map(Locale::parse)
}

/// Translation dictionaries keyed by locale.
#[derive(Debug, Clone)]
pub struct Translator {
    dictionaries: HashMap<String, HashMap<String, String>>,
    default_locale: Locale,
}

impl Translator {
    /// A translator without dictionaries; every lookup returns its input.
    #[must_use]
    pub fn identity(default_locale: Locale) -> Self {
        Self {
            dictionaries: HashMap::new(),
            default_locale,
        }
    }

    /// Build a translator from in-memory dictionaries.
    #[must_use]
    pub fn from_dictionaries(
        dictionaries: HashMap<String, HashMap<String, String>>,
        default_locale: Locale,
    ) -> Self {
        Self {
            dictionaries,
            default_locale,
        }
    }

    /// Load every `<locale>.json` file in `dir`.
    ///
    /// A missing directory is not an error: the translator then returns
    /// every text unchanged. Files whose stem is not a valid locale tag are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `I18nError` if the directory or a dictionary cannot be read,
    /// or a dictionary is not a flat JSON object of strings.
    pub fn load(dir: &Path, default_locale: Locale) -> Result<Self, I18nError> {
        if !dir.is_dir() {
            tracing::warn!(dir = %dir.display(), "i18n directory not found, translations disabled");
            return Ok(Self::identity(default_locale));
        }

        let io_err = |path: &Path| {
            let path = path.display().to_string();
            move |source| I18nError::Io { path, source }
        };

        let mut dictionaries = HashMap::new();
        for entry in std::fs::read_dir(dir).map_err(io_err(dir))? {
            let path = entry.map_err(io_err(dir))?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(locale) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(Locale::parse)
            else {
                tracing::debug!(path = %path.display(), "Skipping non-locale file");
                continue;
            };

            let content = std::fs::read_to_string(&path).map_err(io_err(path.as_path()))?;
            let dictionary: HashMap<String, String> =
                serde_json::from_str(&content).map_err(|source| I18nError::Parse {
                    path: path.display().to_string(),
                    source,
                })?;

            tracing::debug!(locale = %locale, entries = dictionary.len(), "Loaded dictionary");
            dictionaries.insert(locale.0, dictionary);
        }

        tracing::info!(locales = dictionaries.len(), "Translations loaded");
        Ok(Self::from_dictionaries(dictionaries, default_locale))
    }

    #[must_use]
    pub const fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Translate `text` into `locale`, falling back to its language and then
    /// to `text` itself.
    #[must_use]
    pub fn translate(&self, text: &str, locale: &Locale) -> String {
        [locale.as_str(), locale.language()]
            .into_iter()
            .filter_map(|key| self.dictionaries.get(key))
            .find_map(|dictionary| dictionary.get(text))
            .map_or_else(|| text.to_string(), Clone::clone)
    }
}
