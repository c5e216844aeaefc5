//! Small types shared by every part of packsmith.

mod key_display;
mod path;

pub use key_display::{keystrokes_to_string, KeyDisplay};
pub use path::Path;

use std::fmt::{Display, Formatter};

/// The identifier of a kind of document, e.g. `loot-table` or `predicate`.  The set of valid
/// kinds is closed and defined by whatever was put into the
/// [`ModelRegistry`](crate::registry::ModelRegistry) at startup.
#[derive(Debug, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct DocumentKind(String);

impl DocumentKind {
    /// Creates a new `DocumentKind` from its identifier
    pub fn new(id: impl Into<String>) -> Self {
        DocumentKind(id.into())
    }

    /// The identifier of this kind, as it appears in paths and locale keys
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The locale key of the title shown while this kind is active
    pub fn title_key(&self) -> String {
        format!("title.{}", self.0)
    }
}

impl From<&str> for DocumentKind {
    fn from(s: &str) -> Self {
        DocumentKind::new(s)
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DocumentKind {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
