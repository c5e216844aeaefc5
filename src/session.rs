//! The session controller: which document is active, which language is active, and keeping
//! every [`View`] pointed at the active document.

use std::collections::BTreeMap;

use serde_json::Value;
use thiserror::Error;

use crate::core::{DocumentKind, Path};
use crate::locale::{LocaleError, Locales};
use crate::model::{EditError, ModelRef};
use crate::registry::{ModelRegistry, UnknownKind};
use crate::view::{View, ViewError};

/// The possible ways a session operation could fail.  Failing operations leave the session
/// exactly as it was.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The requested document kind isn't registered
    #[error(transparent)]
    UnknownKind(#[from] UnknownKind),
    /// The requested locale isn't loaded
    #[error(transparent)]
    Locale(#[from] LocaleError),
    /// An edit of the active document was invalid
    #[error(transparent)]
    Edit(#[from] EditError),
    /// The active document couldn't be serialised
    #[error("failed to export document: {0}")]
    Export(#[from] serde_json::Error),
}

/// A view which failed to switch to a new model.  The failure is isolated to that view.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ViewFailure {
    /// The position of the view in registration order
    pub index: usize,
    /// The name of the view
    pub view: String,
    /// What went wrong
    pub error: ViewError,
}

/// The outcome of a successful [`Session::switch_kind`]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SwitchReport {
    /// The kind that is now active
    pub kind: DocumentKind,
    /// How many views were told about the new model (including the ones that failed)
    pub notified: usize,
    /// The views that failed to switch
    pub failures: Vec<ViewFailure>,
}

impl SwitchReport {
    /// Returns `true` if every view switched successfully
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One entry of a selection menu
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct MenuEntry {
    /// The identifier of the entry (a document kind or a locale code)
    pub key: String,
    /// The localised text of the entry
    pub label: String,
    /// Whether this entry is the active one
    pub selected: bool,
}

/// All the localised text that depends on the active kind and the active locale
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Labels {
    /// The title of the active kind
    pub title: String,
    /// The kind selector, in registration order
    pub kinds: Vec<MenuEntry>,
    /// The language selector, in load order
    pub languages: Vec<MenuEntry>,
    /// Static interface text, keyed by locale key
    pub text: BTreeMap<String, String>,
}

impl Labels {
    /// The localised static text for `key`, or the key itself if it was never registered
    pub fn text<'s>(&'s self, key: &'s str) -> &'s str {
        self.text.get(key).map(String::as_str).unwrap_or(key)
    }
}

/// Collects everything a [`Session`] is made of.  Views can only be added here, so the set of
/// views is fixed once the session has started.
pub struct SessionBuilder {
    registry: ModelRegistry,
    locales: Locales,
    views: Vec<Box<dyn View>>,
    static_keys: Vec<String>,
}

impl SessionBuilder {
    /// Starts building a session over `registry`, translated by `locales`
    pub fn new(registry: ModelRegistry, locales: Locales) -> Self {
        SessionBuilder {
            registry,
            locales,
            views: Vec::new(),
            static_keys: Vec::new(),
        }
    }

    /// Adds a view.  Views are notified in the order they were added.
    pub fn view(mut self, view: impl View + 'static) -> Self {
        self.views.push(Box::new(view));
        self
    }

    /// Registers locale keys of static interface text, available through [`Labels::text`]
    pub fn static_text(mut self, keys: &[&str]) -> Self {
        self.static_keys.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    /// Starts the session with `kind` active, pointing every view at its model and rendering it
    pub fn start(self, kind: &str) -> Result<Session, SessionError> {
        let model = self.registry.get(kind)?.clone();
        let mut session = Session {
            active: (DocumentKind::from(kind), model),
            registry: self.registry,
            locales: self.locales,
            views: self.views,
            static_keys: self.static_keys,
            labels: Labels::default(),
        };
        let language = session.locales.language().to_owned();
        session.switch_locale(&language)?;
        log::info!("Session started on '{}' in '{}'", kind, language);
        Ok(session)
    }
}

/// The single owner of the active kind, the active locale and the list of views.
///
/// Every operation takes `&mut self` and runs to completion before returning, so a switch can
/// never start while the views are still being told about a previous one.
pub struct Session {
    registry: ModelRegistry,
    locales: Locales,
    views: Vec<Box<dyn View>>,
    /// The active kind and its model.  The kind is always registered in `registry`.
    active: (DocumentKind, ModelRef),
    static_keys: Vec<String>,
    labels: Labels,
}

impl Session {
    /* STATE */

    /// The kind of the document currently being edited
    pub fn active_kind(&self) -> &DocumentKind {
        &self.active.0
    }

    /// The model of the document currently being edited
    pub fn active_model(&self) -> &ModelRef {
        &self.active.1
    }

    /// The currently selected locale
    pub fn locale(&self) -> &str {
        self.locales.language()
    }

    /// All the loaded translation tables
    pub fn locales(&self) -> &Locales {
        &self.locales
    }

    /// The localised labels of the current kind and locale
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Every registered model
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// The number of views that get told about switches
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /* SWITCHING */

    /// Makes `kind` the active document kind.
    ///
    /// Every view is pointed at the new model, in registration order.  A view that fails is
    /// reported in the returned [`SwitchReport`] but doesn't stop the others.  The new model is
    /// then invalidated so that every view renders it straight away, and the labels are
    /// refreshed.  An unknown `kind` leaves everything untouched.
    pub fn switch_kind(&mut self, kind: &str) -> Result<SwitchReport, SessionError> {
        let model = self.registry.get(kind)?.clone();
        log::debug!("Switching from '{}' to '{}'", self.active.0, kind);
        self.active = (DocumentKind::from(kind), model.clone());

        let mut failures = Vec::new();
        for (index, view) in self.views.iter_mut().enumerate() {
            if let Err(error) = view.set_model(model.clone()) {
                log::warn!("View '{}' failed to show '{}': {}", view.name(), kind, error);
                failures.push(ViewFailure {
                    index,
                    view: view.name().to_owned(),
                    error,
                });
            }
        }
        model.invalidate();
        self.refresh_labels();

        Ok(SwitchReport {
            kind: self.active.0.clone(),
            notified: self.views.len(),
            failures,
        })
    }

    /// Changes the interface language.  The active document, its value and its history are
    /// left untouched; the views and labels are refreshed as if the active kind had been
    /// selected again.
    pub fn switch_locale(&mut self, locale: &str) -> Result<SwitchReport, SessionError> {
        self.locales.set_language(locale)?;
        log::debug!("Locale is now '{}'", locale);
        self.relocalize();
        let kind = self.active.0.clone();
        self.switch_kind(kind.as_str())
    }

    /// Re-translates every piece of static interface text
    fn relocalize(&mut self) {
        let locales = &self.locales;
        self.labels.text = self
            .static_keys
            .iter()
            .map(|k| (k.clone(), locales.get(k)))
            .collect();
    }

    /// Re-translates the title and the menus for the active kind and locale
    fn refresh_labels(&mut self) {
        let active = &self.active.0;
        let locales = &self.locales;
        self.labels.title = locales.get(&active.title_key());
        self.labels.kinds = self
            .registry
            .kinds()
            .map(|k| MenuEntry {
                key: k.to_string(),
                label: locales.get(k.as_str()),
                selected: k == active,
            })
            .collect();
        self.labels.languages = locales
            .languages()
            .map(|(code, name)| MenuEntry {
                key: code.to_owned(),
                label: name.to_owned(),
                selected: code == locales.language(),
            })
            .collect();
    }

    /* EDITING */

    /// Replaces the active document with its schema's default.  This can be undone.
    pub fn reset_active(&mut self) {
        let model = self.active_model();
        model.reset(model.schema().default_value());
    }

    /// Undoes the last change to the active document.  Returns `false` if there was nothing to
    /// undo, which isn't an error.
    pub fn undo_active(&mut self) -> bool {
        let undone = self.active_model().undo();
        if !undone {
            log::debug!("Nothing to undo in '{}'", self.active.0);
        }
        undone
    }

    /// Redoes the last undone change to the active document.  Returns `false` if there was
    /// nothing to redo, which isn't an error.
    pub fn redo_active(&mut self) -> bool {
        let redone = self.active_model().redo();
        if !redone {
            log::debug!("Nothing to redo in '{}'", self.active.0);
        }
        redone
    }

    /// Writes `value` at `path` in the active document
    pub fn set_active(&mut self, path: &Path, value: Value) -> Result<(), SessionError> {
        Ok(self.active_model().set(path, value)?)
    }

    /// Removes the value at `path` in the active document
    pub fn remove_active(&mut self, path: &Path) -> Result<Value, SessionError> {
        Ok(self.active_model().remove(path)?)
    }

    /* EXPORT */

    /// The active document as UTF-8 JSON with the schema's key order, two-space indentation and
    /// a trailing newline.
    pub fn export_active(&self) -> Result<String, SessionError> {
        let model = self.active_model();
        export(model.schema().canonicalize(&model.value()))
    }
}

/// Serialises a document the way [`Session::export_active`] does
pub fn export(value: Value) -> Result<String, SessionError> {
    let mut text = serde_json::to_string_pretty(&value)?;
    text.push('\n');
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionBuilder, SessionError};
    use crate::core::{DocumentKind, Path};
    use crate::locale::Locales;
    use crate::model::{DataModel, ModelRef};
    use crate::registry::ModelRegistry;
    use crate::schema::{builtin::KINDS, Field, Node, NodeSchema};
    use crate::view::{source::SourceRenderer, Surface, SurfaceView, View, ViewError};

    use std::cell::RefCell;
    use std::rc::Rc;

    use serde_json::json;

    /// A view that records every model it is given, and optionally refuses them all
    struct RecordingView {
        seen: Rc<RefCell<Vec<ModelRef>>>,
        fail: bool,
    }

    impl RecordingView {
        fn new(fail: bool) -> (Self, Rc<RefCell<Vec<ModelRef>>>) {
            let seen = Rc::new(RefCell::new(Vec::new()));
            (
                RecordingView {
                    seen: seen.clone(),
                    fail,
                },
                seen,
            )
        }
    }

    impl View for RecordingView {
        fn set_model(&mut self, model: ModelRef) -> Result<(), ViewError> {
            if self.fail {
                return Err(ViewError::Rejected {
                    view: "recording".to_owned(),
                    reason: "always fails".to_owned(),
                });
            }
            self.seen.borrow_mut().push(model);
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn builtin_session() -> Session {
        SessionBuilder::new(
            ModelRegistry::with_builtin_kinds(100),
            Locales::bundled().unwrap(),
        )
        .start("loot-table")
        .unwrap()
    }

    fn last_seen(seen: &Rc<RefCell<Vec<ModelRef>>>) -> ModelRef {
        seen.borrow().last().cloned().expect("view was never notified")
    }

    #[test]
    fn views_observe_the_registered_model() {
        let (view, seen) = RecordingView::new(false);
        let mut session = SessionBuilder::new(
            ModelRegistry::with_builtin_kinds(100),
            Locales::bundled().unwrap(),
        )
        .view(view)
        .start("loot-table")
        .unwrap();
        // Starting the session is a switch to the initial kind
        assert_eq!(seen.borrow().len(), 1);

        for kind in KINDS {
            let report = session.switch_kind(kind).unwrap();
            assert!(report.is_clean());
            assert_eq!(report.kind, DocumentKind::from(*kind));
            let registered = session.registry().get(kind).unwrap();
            assert!(Rc::ptr_eq(&last_seen(&seen), registered));
            assert!(Rc::ptr_eq(session.active_model(), registered));
            assert_eq!(session.active_kind().as_str(), *kind);
        }
    }

    #[test]
    fn unknown_kind_changes_nothing() {
        let (view, seen) = RecordingView::new(false);
        let mut session = SessionBuilder::new(
            ModelRegistry::with_builtin_kinds(100),
            Locales::bundled().unwrap(),
        )
        .view(view)
        .start("predicate")
        .unwrap();
        let labels = session.labels().clone();

        match session.switch_kind("recipe") {
            Err(SessionError::UnknownKind(e)) => assert_eq!(e.0, DocumentKind::from("recipe")),
            other => panic!("expected UnknownKind, got {:?}", other),
        }
        assert_eq!(session.active_kind().as_str(), "predicate");
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(session.labels(), &labels);
    }

    #[test]
    fn unknown_initial_kind() {
        let result = SessionBuilder::new(
            ModelRegistry::with_builtin_kinds(100),
            Locales::bundled().unwrap(),
        )
        .start("recipe");
        assert!(matches!(result, Err(SessionError::UnknownKind(_))));
    }

    #[test]
    fn failing_view_is_isolated() {
        let (first, first_seen) = RecordingView::new(false);
        let (broken, _) = RecordingView::new(true);
        let (third, third_seen) = RecordingView::new(false);
        let mut session = SessionBuilder::new(
            ModelRegistry::with_builtin_kinds(100),
            Locales::bundled().unwrap(),
        )
        .view(first)
        .view(broken)
        .view(third)
        .start("loot-table")
        .unwrap();

        let report = session.switch_kind("predicate").unwrap();
        assert_eq!(report.notified, 3);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert_eq!(report.failures[0].view, "recording");

        let predicate = session.registry().get("predicate").unwrap();
        assert!(Rc::ptr_eq(&last_seen(&first_seen), predicate));
        assert!(Rc::ptr_eq(&last_seen(&third_seen), predicate));
        assert_eq!(session.active_kind().as_str(), "predicate");
    }

    #[test]
    fn switch_renders_straight_away() {
        let source = Surface::new("source", SourceRenderer);
        let mut session = SessionBuilder::new(
            ModelRegistry::with_builtin_kinds(100),
            Locales::bundled().unwrap(),
        )
        .view(SurfaceView::new(&source))
        .start("loot-table")
        .unwrap();
        assert!(source.text().contains("minecraft:stone"));

        session.switch_kind("predicate").unwrap();
        assert_eq!(
            source.text(),
            serde_json::to_string_pretty(&*session.active_model().value()).unwrap()
        );
        // Edits made to a model that is no longer active don't reach the surface
        let renders = source.render_count();
        session
            .registry()
            .get("loot-table")
            .unwrap()
            .reset(json!({}));
        assert_eq!(source.render_count(), renders);
    }

    #[test]
    fn empty_undo_is_a_noop() {
        let mut session = builtin_session();
        let before = session.active_model().value().clone();
        assert!(!session.undo_active());
        assert!(!session.redo_active());
        assert_eq!(*session.active_model().value(), before);
        assert_eq!(session.active_model().version(), 0);
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut session = builtin_session();
        session
            .set_active(&Path::parse("/pools/0/rolls"), json!(4))
            .unwrap();
        let after_edit = session.active_model().value().clone();
        assert!(session.undo_active());
        assert_eq!(
            session.active_model().value()["pools"][0]["rolls"],
            json!(1)
        );
        assert!(session.redo_active());
        assert_eq!(*session.active_model().value(), after_edit);
    }

    #[test]
    fn reset_then_undo() {
        let mut session = builtin_session();
        session
            .set_active(&Path::parse("/type"), json!("minecraft:chest"))
            .unwrap();
        let before_reset = session.active_model().value().clone();
        session.reset_active();
        assert_eq!(
            *session.active_model().value(),
            session.active_model().schema().default_value()
        );
        assert!(session.undo_active());
        assert_eq!(*session.active_model().value(), before_reset);
    }

    #[test]
    fn reset_from_the_default_is_still_undoable() {
        let mut session = builtin_session();
        let initial = session.active_model().value().clone();
        session.reset_active();
        assert!(session.undo_active());
        assert_eq!(*session.active_model().value(), initial);
        assert!(!session.undo_active());
    }

    #[test]
    fn history_is_per_kind() {
        let mut session = builtin_session();
        session.set_active(&Path::parse("/type"), json!("x")).unwrap();
        session.switch_kind("predicate").unwrap();
        // The predicate has no history of its own
        assert!(!session.undo_active());
        session.switch_kind("loot-table").unwrap();
        // ... and the loot table's history survived the round trip
        assert!(session.undo_active());
        assert!(session.active_model().value().get("type").is_none());
    }

    #[test]
    fn locale_switch_keeps_documents() {
        let (view, seen) = RecordingView::new(false);
        let mut session = SessionBuilder::new(
            ModelRegistry::with_builtin_kinds(100),
            Locales::bundled().unwrap(),
        )
        .view(view)
        .static_text(&["undo", "redo"])
        .start("loot-table")
        .unwrap();
        session.set_active(&Path::parse("/type"), json!("x")).unwrap();
        session.set_active(&Path::parse("/type"), json!("y")).unwrap();
        session.undo_active();

        let snapshot = |s: &Session| -> Vec<_> {
            s.registry()
                .iter()
                .map(|(_, m)| (m.value().clone(), m.version(), m.undo_depth(), m.redo_depth()))
                .collect()
        };
        let before = snapshot(&session);
        assert_eq!(session.labels().text("undo"), "Undo");

        let report = session.switch_locale("ru").unwrap();
        assert!(report.is_clean());
        assert_eq!(snapshot(&session), before);
        assert_eq!(session.locale(), "ru");
        assert_eq!(session.active_kind().as_str(), "loot-table");
        assert_eq!(session.labels().title, "Генератор таблиц добычи");
        assert_eq!(session.labels().text("undo"), "Отменить");
        // The views were re-pointed at the same model
        assert_eq!(seen.borrow().len(), 2);
        assert!(Rc::ptr_eq(&last_seen(&seen), session.active_model()));

        // Redo still works after the locale switch
        assert!(session.redo_active());
        assert_eq!(session.active_model().value()["type"], json!("y"));
    }

    #[test]
    fn unknown_locale_is_rejected() {
        let mut session = builtin_session();
        assert!(matches!(
            session.switch_locale("de"),
            Err(SessionError::Locale(_))
        ));
        assert_eq!(session.locale(), "en");
    }

    #[test]
    fn labels_follow_kind_and_locale() {
        let mut session = builtin_session();
        assert_eq!(session.labels().title, "Loot Table Generator");
        session.switch_kind("dimension-type").unwrap();
        session.switch_locale("pt").unwrap();
        let labels = session.labels();
        assert_eq!(labels.title, "Gerador de Tipo de Dimensão");
        let selected: Vec<&str> = labels
            .kinds
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(selected, vec!["dimension-type"]);
        assert_eq!(labels.kinds[0].label, "Tabela de Saque");
        let language: Vec<&str> = labels
            .languages
            .iter()
            .filter(|e| e.selected)
            .map(|e| e.label.as_str())
            .collect();
        assert_eq!(language, vec!["Português"]);
        // Unregistered static text falls back to its key
        assert_eq!(labels.text("quit"), "quit");
    }

    #[test]
    fn export_uses_schema_order() {
        let mut registry = ModelRegistry::new();
        registry
            .register(
                DocumentKind::from("pair"),
                DataModel::with_value(
                    NodeSchema::new(
                        "pair",
                        Node::record(vec![
                            Field::optional("a", Node::Number),
                            Field::optional("b", Node::Number),
                        ]),
                    ),
                    json!({ "b": 1, "a": 2 }),
                    10,
                ),
            )
            .unwrap();
        let session = SessionBuilder::new(registry, Locales::bundled().unwrap())
            .start("pair")
            .unwrap();
        assert_eq!(session.export_active().unwrap(), "{\n  \"a\": 2,\n  \"b\": 1\n}\n");
        // Exporting doesn't touch the document
        assert_eq!(
            serde_json::to_string(&*session.active_model().value()).unwrap(),
            r#"{"b":1,"a":2}"#
        );
    }

    #[test]
    fn export_default_loot_table() {
        let session = builtin_session();
        assert_eq!(
            session.export_active().unwrap(),
            r#"{
  "pools": [
    {
      "rolls": 1,
      "entries": [
        {
          "type": "minecraft:item",
          "name": "minecraft:stone"
        }
      ]
    }
  ]
}
"#
        );
    }
}
