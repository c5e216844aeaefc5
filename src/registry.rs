//! The mapping from [`DocumentKind`] to the [`DataModel`] that holds that kind of document.

use std::rc::Rc;

use thiserror::Error;

use crate::core::DocumentKind;
use crate::model::{DataModel, ModelRef};
use crate::schema::builtin;

/// A document kind was requested that isn't in the registry
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("unknown document kind '{0}'")]
pub struct UnknownKind(pub DocumentKind);

/// A kind was registered twice
#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("document kind '{0}' is already registered")]
pub struct DuplicateKind(pub DocumentKind);

/// Owns one [`DataModel`] per document kind.  Filled once at startup, after which it is only
/// ever read.  Entries keep the order in which they were registered.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    entries: Vec<(DocumentKind, ModelRef)>,
}

impl ModelRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry containing a fresh model for every built-in kind
    pub fn with_builtin_kinds(max_undo_depth: usize) -> Self {
        Self::with_kinds(builtin::KINDS, max_undo_depth)
    }

    /// Registers a built-in model for each of `kinds`.  Kinds without a built-in schema, and
    /// repeats, are logged and skipped.
    fn with_kinds(kinds: &[&str], max_undo_depth: usize) -> Self {
        let mut registry = Self::new();
        for kind in kinds {
            let schema = match builtin::schema_for(kind) {
                Some(schema) => schema,
                None => {
                    log::warn!("No built-in schema for kind '{}', skipping it", kind);
                    continue;
                }
            };
            let model = DataModel::new(schema, max_undo_depth);
            if let Err(e) = registry.register(DocumentKind::from(*kind), model) {
                log::warn!("Skipping built-in kind: {}", e);
            }
        }
        registry
    }

    /// Adds a model under `kind`.  A kind can only be registered once.
    pub fn register(&mut self, kind: DocumentKind, model: DataModel) -> Result<ModelRef, DuplicateKind> {
        if self.contains(kind.as_str()) {
            return Err(DuplicateKind(kind));
        }
        log::trace!("Registering model for '{}'", kind);
        let model = Rc::new(model);
        self.entries.push((kind, model.clone()));
        Ok(model)
    }

    /// Returns the model registered under `kind`
    pub fn get(&self, kind: &str) -> Result<&ModelRef, UnknownKind> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == kind)
            .map(|(_, m)| m)
            .ok_or_else(|| UnknownKind(DocumentKind::from(kind)))
    }

    /// Returns `true` if a model is registered under `kind`
    pub fn contains(&self, kind: &str) -> bool {
        self.entries.iter().any(|(k, _)| k.as_str() == kind)
    }

    /// Iterates over the registered kinds, in registration order
    pub fn kinds(&self) -> impl Iterator<Item = &DocumentKind> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterates over every registered model, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentKind, &ModelRef)> {
        self.entries.iter().map(|(k, m)| (k, m))
    }

    /// The number of registered kinds
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{DuplicateKind, ModelRegistry, UnknownKind};
    use crate::core::DocumentKind;
    use crate::model::DataModel;
    use crate::schema::{builtin, Node, NodeSchema};

    use std::rc::Rc;

    #[test]
    fn register_and_get() {
        let mut registry = ModelRegistry::new();
        assert!(registry.is_empty());
        let model = registry
            .register(
                DocumentKind::from("a"),
                DataModel::new(NodeSchema::new("a", Node::Any), 10),
            )
            .unwrap();
        assert!(Rc::ptr_eq(registry.get("a").unwrap(), &model));
        assert_eq!(
            registry.get("b").unwrap_err(),
            UnknownKind(DocumentKind::from("b"))
        );
        assert_eq!(
            registry
                .register(
                    DocumentKind::from("a"),
                    DataModel::new(NodeSchema::new("a", Node::Any), 10)
                )
                .unwrap_err(),
            DuplicateKind(DocumentKind::from("a"))
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn every_builtin_kind_is_registered() {
        let registry = ModelRegistry::with_builtin_kinds(10);
        assert_eq!(registry.len(), builtin::KINDS.len());
        for kind in builtin::KINDS {
            assert!(registry.contains(kind), "'{}' missing", kind);
        }
    }

    #[test]
    fn unknown_and_repeated_kinds_are_skipped() {
        let kinds = ["predicate", "no-such-kind", "predicate", "advancement"];
        let registry = ModelRegistry::with_kinds(&kinds, 10);
        let kinds: Vec<&str> = registry.kinds().map(|k| k.as_str()).collect();
        assert_eq!(kinds, vec!["predicate", "advancement"]);
    }

    #[test]
    fn builtin_kinds_keep_order() {
        let registry = ModelRegistry::with_builtin_kinds(10);
        let kinds: Vec<&str> = registry.kinds().map(|k| k.as_str()).collect();
        assert_eq!(
            kinds,
            vec![
                "loot-table",
                "predicate",
                "advancement",
                "dimension",
                "dimension-type",
                "sandbox"
            ]
        );
    }
}
