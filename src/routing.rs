//! Keeps the navigation history and the active document kind in step.
//!
//! Selecting a kind pushes a history entry; moving through the history switches kinds without
//! pushing.  Paths look like `{base}{kind}`, and anything that doesn't name a registered kind
//! falls back to the default kind.

use crate::core::DocumentKind;
use crate::registry::ModelRegistry;
use crate::session::{Session, SessionError, SwitchReport};

/// A navigation history, such as a browser's
pub trait History {
    /// Adds a new entry after the current one, discarding any forward entries
    fn push(&mut self, path: String);

    /// The path of the current entry
    fn current(&self) -> &str;
}

/// A [`History`] held in memory, with back/forward
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    /// Creates a history whose only entry is `initial`
    pub fn new(initial: impl Into<String>) -> Self {
        MemoryHistory {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    /// Moves one entry back, returning the new current path
    pub fn back(&mut self) -> Option<&str> {
        self.index = self.index.checked_sub(1)?;
        Some(&self.entries[self.index])
    }

    /// Moves one entry forward, returning the new current path
    pub fn forward(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    /// The number of entries, including forward ones
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history has at least one entry
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl History for MemoryHistory {
    fn push(&mut self, path: String) {
        self.entries.truncate(self.index + 1);
        self.entries.push(path);
        self.index += 1;
    }

    fn current(&self) -> &str {
        &self.entries[self.index]
    }
}

/// Translates between history paths and document kinds
#[derive(Debug, Clone)]
pub struct Router {
    base_path: String,
    default_kind: DocumentKind,
}

impl Router {
    /// Creates a router for paths under `base_path`.  `default_kind` is used for any path that
    /// doesn't name a kind.
    pub fn new(base_path: &str, default_kind: DocumentKind) -> Self {
        let mut base_path = base_path.to_owned();
        if !base_path.ends_with('/') {
            base_path.push('/');
        }
        Router {
            base_path,
            default_kind,
        }
    }

    /// The kind named by a path, if it names one.  The query string and fragment are ignored,
    /// as is the base path.  The kind is the last non-empty segment.
    pub fn kind_from_path(&self, path: &str) -> Option<DocumentKind> {
        let path = path.split(|c: char| c == '?' || c == '#').next().unwrap_or("");
        let relative = path
            .strip_prefix(self.base_path.as_str())
            .or_else(|| {
                // The base without its trailing '/', but only on a segment boundary
                path.strip_prefix(self.base_path.trim_end_matches('/'))
                    .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            })
            .unwrap_or(path);
        relative
            .split('/')
            .filter(|s| !s.is_empty())
            .last()
            .map(DocumentKind::from)
    }

    /// The history path of a kind
    pub fn path_for(&self, kind: &DocumentKind) -> String {
        format!("{}{}", self.base_path, kind)
    }

    /// The kind to show when the history is at `path`
    pub fn initial_kind(&self, registry: &ModelRegistry, path: &str) -> DocumentKind {
        match self.kind_from_path(path) {
            Some(kind) if registry.contains(kind.as_str()) => kind,
            _ => self.default_kind.clone(),
        }
    }

    /// A user picked `kind`.  The views are switched first and then a history entry is pushed.
    /// An unknown kind changes nothing.
    pub fn select(
        &self,
        session: &mut Session,
        history: &mut dyn History,
        kind: &str,
    ) -> Result<SwitchReport, SessionError> {
        let report = session.switch_kind(kind)?;
        history.push(self.path_for(&report.kind));
        Ok(report)
    }

    /// The history moved to `path` (e.g. back/forward).  Switches to the kind it names, or to
    /// the default kind if it doesn't name a registered one.  Never pushes.
    pub fn navigate(
        &self,
        session: &mut Session,
        path: &str,
    ) -> Result<SwitchReport, SessionError> {
        let kind = self.initial_kind(session.registry(), path);
        log::debug!("Navigated to '{}', showing '{}'", path, kind);
        session.switch_kind(kind.as_str())
    }
}
