//! Translation tables and the currently selected language.

use std::collections::HashMap;

use thiserror::Error;

/// The language that is active at startup, and the one consulted when a key is missing from
/// the active language
pub const FALLBACK_LOCALE: &str = "en";

/// The translation tables that are compiled into packsmith: `(code, display name, json)`
const BUNDLED: &[(&str, &str, &str)] = &[
    ("en", "English", include_str!("../locales/en.json")),
    ("pt", "Português", include_str!("../locales/pt.json")),
    ("ru", "Русский", include_str!("../locales/ru.json")),
    ("zh-CN", "简体中文", include_str!("../locales/zh-CN.json")),
];

/// The possible ways that loading or selecting a locale could fail
#[derive(Debug, Error)]
pub enum LocaleError {
    /// The language has no translation table
    #[error("locale '{0}' has not been loaded")]
    NotLoaded(String),
    /// A translation table wasn't a flat JSON object of strings
    #[error("translation table for '{code}' is malformed: {source}")]
    Malformed {
        /// The language whose table failed to parse
        code: String,
        /// The underlying parse error
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone)]
struct Table {
    code: String,
    name: String,
    strings: HashMap<String, String>,
}

/// Every loaded translation table, along with the language currently selected
#[derive(Debug, Clone)]
pub struct Locales {
    /// Tables in the order they were loaded (this is the order of the language menu)
    tables: Vec<Table>,
    language: String,
    fallback: String,
}

impl Locales {
    /// Creates an empty set of tables.  `fallback` is selected, but it is the caller's job to
    /// [`register`](Self::register) a table for it.
    pub fn new(fallback: &str) -> Self {
        Locales {
            tables: Vec::new(),
            language: fallback.to_owned(),
            fallback: fallback.to_owned(),
        }
    }

    /// Loads every translation table that ships with packsmith
    pub fn bundled() -> Result<Self, LocaleError> {
        let mut locales = Locales::new(FALLBACK_LOCALE);
        for (code, name, json) in BUNDLED {
            locales.load_json(code, name, json)?;
        }
        Ok(locales)
    }

    /// Adds (or replaces) the translation table for `code`
    pub fn register(&mut self, code: &str, name: &str, strings: HashMap<String, String>) {
        log::trace!("Registering {} translations for '{}'", strings.len(), code);
        let table = Table {
            code: code.to_owned(),
            name: name.to_owned(),
            strings,
        };
        match self.tables.iter_mut().find(|t| t.code == code) {
            Some(existing) => *existing = table,
            None => self.tables.push(table),
        }
    }

    /// Parses a flat JSON object of `key -> text` and registers it under `code`
    pub fn load_json(&mut self, code: &str, name: &str, json: &str) -> Result<(), LocaleError> {
        let strings = serde_json::from_str(json).map_err(|source| LocaleError::Malformed {
            code: code.to_owned(),
            source,
        })?;
        self.register(code, name, strings);
        Ok(())
    }

    /// Returns `true` if a table for `code` has been loaded
    pub fn is_loaded(&self, code: &str) -> bool {
        self.tables.iter().any(|t| t.code == code)
    }

    /// The currently selected language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Selects a loaded language
    pub fn set_language(&mut self, code: &str) -> Result<(), LocaleError> {
        if !self.is_loaded(code) {
            return Err(LocaleError::NotLoaded(code.to_owned()));
        }
        self.language = code.to_owned();
        Ok(())
    }

    /// The loaded languages as `(code, display name)` pairs
    pub fn languages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tables.iter().map(|t| (t.code.as_str(), t.name.as_str()))
    }

    /// Looks up `key` in the selected language, then in the fallback language.  If neither has
    /// it, the key itself is returned.
    pub fn get(&self, key: &str) -> String {
        self.lookup(&self.language, key)
            .or_else(|| self.lookup(&self.fallback, key))
            .unwrap_or(key)
            .to_owned()
    }

    fn lookup(&self, code: &str, key: &str) -> Option<&str> {
        self.tables
            .iter()
            .find(|t| t.code == code)?
            .strings
            .get(key)
            .map(String::as_str)
    }
}
