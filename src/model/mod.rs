//! The observable, versioned document that every view renders.

mod history;

pub use history::History;

use std::cell::{Cell, Ref, RefCell};
use std::fmt::{Debug, Formatter};
use std::rc::{Rc, Weak};

use serde_json::Value;
use thiserror::Error;

use crate::core::Path;
use crate::schema::Schema;

/// Shared handle to a [`DataModel`].  The registry, the session and every view observing the
/// model all hold the same instance.
pub type ModelRef = Rc<DataModel>;

/// Something that wants to hear about changes to a [`DataModel`]
pub trait ModelObserver {
    /// Called after every mutation, reset, undo and redo, and whenever the model is explicitly
    /// [`invalidate`](DataModel::invalidate)d.  Implementations should re-read the model.
    fn model_invalidated(&self, model: &DataModel);
}

/// Returned by [`DataModel::subscribe`] and used to [`DataModel::unsubscribe`] again.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ObserverId(u64);

/// The possible ways an edit could fail
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum EditError {
    /// The parent of the edited location doesn't exist
    #[error("nothing exists at {0}")]
    NoSuchValue(Path),
    /// The parent of the edited location is a scalar and can't hold children
    #[error("the value at {0} can't contain other values")]
    NotAContainer(Path),
    /// A path segment under an array wasn't a usable index
    #[error("'{index}' is not a valid index into the list at {path}")]
    BadIndex {
        /// The path of the array
        path: Path,
        /// The offending segment
        index: String,
    },
    /// Removing the root of a document is not possible (reset it instead)
    #[error("the root of a document can't be removed")]
    RemoveRoot,
}

struct State {
    history: History,
    /// Advances on every mutation, reset, undo and redo
    version: u64,
}

/// A mutable, observable, versioned JSON document along with the [`Schema`] it follows.
///
/// All methods take `&self`: a model is shared between the registry and the views observing it,
/// and is only ever touched from one thread.  Observers are notified after the internal borrow
/// has been released, so they are free to read the model while handling the notification.
pub struct DataModel {
    schema: Box<dyn Schema>,
    state: RefCell<State>,
    observers: RefCell<Vec<(ObserverId, Weak<dyn ModelObserver>)>>,
    next_observer_id: Cell<u64>,
}

impl DataModel {
    /// Creates a model holding the schema's default value
    pub fn new(schema: impl Schema + 'static, max_undo_depth: usize) -> Self {
        let value = schema.default_value();
        Self::with_value(schema, value, max_undo_depth)
    }

    /// Creates a model holding `value`, with an empty history
    pub fn with_value(schema: impl Schema + 'static, value: Value, max_undo_depth: usize) -> Self {
        DataModel {
            schema: Box::new(schema),
            state: RefCell::new(State {
                history: History::new(value, max_undo_depth),
                version: 0,
            }),
            observers: RefCell::new(Vec::new()),
            next_observer_id: Cell::new(0),
        }
    }

    /* READING */

    /// The schema of this document
    pub fn schema(&self) -> &dyn Schema {
        self.schema.as_ref()
    }

    /// The current content of this document.  The returned guard must be dropped before the
    /// model is mutated.
    pub fn value(&self) -> Ref<'_, Value> {
        Ref::map(self.state.borrow(), |s| s.history.current())
    }

    /// A counter which advances every time the value changes
    pub fn version(&self) -> u64 {
        self.state.borrow().version
    }

    /// How many changes can currently be undone
    pub fn undo_depth(&self) -> usize {
        self.state.borrow().history.undo_depth()
    }

    /// How many changes can currently be redone
    pub fn redo_depth(&self) -> usize {
        self.state.borrow().history.redo_depth()
    }

    /* EDITING */

    /// Writes `new_value` at `path`, creating the last segment if needed.  Writing to an array
    /// index equal to its length (or to `-`) appends.
    pub fn set(&self, path: &Path, new_value: Value) -> Result<(), EditError> {
        let (parent_path, last) = match path.split_last() {
            Some(split) => split,
            None => {
                self.commit(new_value);
                return Ok(());
            }
        };
        let mut value = self.value().clone();
        match parent_path.resolve_mut(&mut value) {
            Some(Value::Object(map)) => {
                map.insert(last.to_owned(), new_value);
            }
            Some(Value::Array(items)) => {
                let len = items.len();
                let index = if last == "-" {
                    Some(len)
                } else {
                    index_of(last, len + 1)
                };
                match index {
                    Some(i) if i < len => items[i] = new_value,
                    Some(_) => items.push(new_value),
                    None => {
                        return Err(EditError::BadIndex {
                            path: parent_path,
                            index: last.to_owned(),
                        })
                    }
                }
            }
            Some(_) => return Err(EditError::NotAContainer(parent_path)),
            None => return Err(EditError::NoSuchValue(parent_path)),
        }
        self.commit(value);
        Ok(())
    }

    /// Removes the value at `path`, returning it.  Object keys after the removed one keep their
    /// order.
    pub fn remove(&self, path: &Path) -> Result<Value, EditError> {
        let (parent_path, last) = path.split_last().ok_or(EditError::RemoveRoot)?;
        let mut value = self.value().clone();
        let removed = match parent_path.resolve_mut(&mut value) {
            Some(Value::Object(map)) => {
                let removed = map
                    .get(last)
                    .cloned()
                    .ok_or_else(|| EditError::NoSuchValue(path.clone()))?;
                *map = std::mem::take(map)
                    .into_iter()
                    .filter(|(k, _)| k != last)
                    .collect();
                removed
            }
            Some(Value::Array(items)) => {
                let i = index_of(last, items.len()).ok_or_else(|| EditError::BadIndex {
                    path: parent_path.clone(),
                    index: last.to_owned(),
                })?;
                items.remove(i)
            }
            Some(_) => return Err(EditError::NotAContainer(parent_path)),
            None => return Err(EditError::NoSuchValue(parent_path)),
        };
        self.commit(value);
        Ok(removed)
    }

    /// Replaces the whole document.  This is an ordinary, undoable edit.
    pub fn reset(&self, value: Value) {
        log::debug!("Resetting {} document", self.schema.name());
        self.commit(value);
    }

    /// Move one step back in the history.  Returns `false` (and does nothing else) if there is
    /// nothing to undo.
    pub fn undo(&self) -> bool {
        self.step(|h| h.undo())
    }

    /// Move one step forward in the history.  Returns `false` (and does nothing else) if there is
    /// nothing to redo.
    pub fn redo(&self) -> bool {
        self.step(|h| h.redo())
    }

    fn step(&self, f: impl FnOnce(&mut History) -> bool) -> bool {
        let moved = {
            let mut state = self.state.borrow_mut();
            let moved = f(&mut state.history);
            if moved {
                state.version += 1;
            }
            moved
        };
        if moved {
            self.invalidate();
        }
        moved
    }

    fn commit(&self, value: Value) {
        {
            let mut state = self.state.borrow_mut();
            state.history.commit(value);
            state.version += 1;
        }
        self.invalidate();
    }

    /* OBSERVERS */

    /// Tell every observer to re-read this model, without changing it
    pub fn invalidate(&self) {
        let observers: Vec<Rc<dyn ModelObserver>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|(_, o)| o.strong_count() > 0);
            observers.iter().filter_map(|(_, o)| o.upgrade()).collect()
        };
        log::trace!(
            "Invalidating {} document ({} observers)",
            self.schema.name(),
            observers.len()
        );
        for o in observers {
            o.model_invalidated(self);
        }
    }

    /// Register an observer.  The model only keeps a weak reference, so dropping the observer
    /// is enough to stop notifications.
    pub fn subscribe(&self, observer: Weak<dyn ModelObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer_id.get());
        self.next_observer_id.set(id.0 + 1);
        self.observers.borrow_mut().push((id, observer));
        id
    }

    /// Stop notifying an observer.  Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ObserverId) {
        self.observers.borrow_mut().retain(|(i, _)| *i != id);
    }

    /// The number of live observers
    pub fn observer_count(&self) -> usize {
        self.observers
            .borrow()
            .iter()
            .filter(|(_, o)| o.strong_count() > 0)
            .count()
    }
}

impl Debug for DataModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataModel")
            .field("schema", &self.schema.name())
            .field("version", &self.version())
            .field("value", &*self.value())
            .finish()
    }
}

/// Parses an array index that must be below `bound`.  `-` is never an index of an existing
/// element, so it isn't accepted here.
fn index_of(segment: &str, bound: usize) -> Option<usize> {
    let index = segment.parse::<usize>().ok()?;
    (index < bound).then(|| index)
}

#[cfg(test)]
mod tests {
    use super::{DataModel, EditError, ModelObserver};
    use crate::core::Path;
    use crate::schema::{Field, Node, NodeSchema};

    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use serde_json::{json, Value};

    fn model() -> DataModel {
        let schema = NodeSchema::new(
            "test",
            Node::record(vec![
                Field::required("name", Node::Str).default(json!("x")),
                Field::required("items", Node::list(Node::Number)),
            ]),
        );
        DataModel::new(schema, 100)
    }

    /// Records the value seen at every notification
    #[derive(Default)]
    struct Recorder {
        seen: RefCell<Vec<(Value, u64)>>,
    }

    impl ModelObserver for Recorder {
        fn model_invalidated(&self, model: &DataModel) {
            self.seen
                .borrow_mut()
                .push((model.value().clone(), model.version()));
        }
    }

    #[test]
    fn starts_at_default() {
        let m = model();
        assert_eq!(*m.value(), json!({ "name": "x", "items": [] }));
        assert_eq!(m.version(), 0);
        assert_eq!((m.undo_depth(), m.redo_depth()), (0, 0));
    }

    #[test]
    fn set_and_remove() {
        let m = model();
        m.set(&Path::parse("/items/0"), json!(4)).unwrap();
        m.set(&Path::parse("/items/-"), json!(5)).unwrap();
        m.set(&Path::parse("/items/0"), json!(3)).unwrap();
        m.set(&Path::parse("/extra"), json!(true)).unwrap();
        assert_eq!(
            *m.value(),
            json!({ "name": "x", "items": [3, 5], "extra": true })
        );
        assert_eq!(m.version(), 4);

        assert_eq!(m.remove(&Path::parse("/name")).unwrap(), json!("x"));
        assert_eq!(
            serde_json::to_string(&*m.value()).unwrap(),
            r#"{"items":[3,5],"extra":true}"#
        );
        assert_eq!(m.remove(&Path::parse("/items/0")).unwrap(), json!(3));
        assert_eq!(*m.value(), json!({ "items": [5], "extra": true }));
    }

    #[test]
    fn failed_edits_change_nothing() {
        let m = model();
        for (path, err) in vec![
            ("/nope/a", EditError::NoSuchValue(Path::parse("/nope"))),
            ("/name/a", EditError::NotAContainer(Path::parse("/name"))),
            (
                "/items/7",
                EditError::BadIndex {
                    path: Path::parse("/items"),
                    index: "7".to_owned(),
                },
            ),
        ] {
            assert_eq!(m.set(&Path::parse(path), json!(1)), Err(err));
        }
        assert_eq!(m.remove(&Path::root()), Err(EditError::RemoveRoot));
        assert_eq!(
            m.remove(&Path::parse("/missing")),
            Err(EditError::NoSuchValue(Path::parse("/missing")))
        );
        assert_eq!(m.version(), 0);
        assert_eq!(m.undo_depth(), 0);
    }

    #[test]
    fn dash_appends_but_never_names_an_element() {
        let m = model();
        m.set(&Path::parse("/items/-"), json!(4)).unwrap();
        assert_eq!(*m.value(), json!({ "name": "x", "items": [4] }));
        assert_eq!(
            m.remove(&Path::parse("/items/-")),
            Err(EditError::BadIndex {
                path: Path::parse("/items"),
                index: "-".to_owned(),
            })
        );
        assert_eq!(*m.value(), json!({ "name": "x", "items": [4] }));
    }

    #[test]
    fn undo_redo_round_trip() {
        let m = model();
        m.set(&Path::parse("/name"), json!("y")).unwrap();
        let after_edit = m.value().clone();
        assert!(m.undo());
        assert_eq!(*m.value(), json!({ "name": "x", "items": [] }));
        assert!(m.redo());
        assert_eq!(*m.value(), after_edit);
        assert_eq!(m.version(), 3);
    }

    #[test]
    fn empty_undo_is_a_noop() {
        let m = model();
        let before = m.value().clone();
        assert!(!m.undo());
        assert!(!m.redo());
        assert_eq!(*m.value(), before);
        assert_eq!(m.version(), 0);
    }

    #[test]
    fn reset_is_undoable() {
        let m = model();
        m.set(&Path::parse("/name"), json!("edited")).unwrap();
        let before_reset = m.value().clone();
        m.reset(m.schema().default_value());
        assert_eq!(*m.value(), json!({ "name": "x", "items": [] }));
        assert!(m.undo());
        assert_eq!(*m.value(), before_reset);
    }

    #[test]
    fn observers_are_notified() {
        let m = model();
        let recorder = Rc::new(Recorder::default());
        let weak: Weak<dyn ModelObserver> = Rc::downgrade(&(recorder.clone() as Rc<dyn ModelObserver>));
        let id = m.subscribe(weak);
        assert_eq!(m.observer_count(), 1);

        m.set(&Path::parse("/name"), json!("a")).unwrap();
        m.invalidate();
        m.undo();
        assert_eq!(
            *recorder.seen.borrow(),
            vec![
                (json!({ "name": "a", "items": [] }), 1),
                (json!({ "name": "a", "items": [] }), 1),
                (json!({ "name": "x", "items": [] }), 2),
            ]
        );

        // A no-op undo doesn't notify anyone
        m.undo();
        assert_eq!(recorder.seen.borrow().len(), 3);

        m.unsubscribe(id);
        m.invalidate();
        assert_eq!(recorder.seen.borrow().len(), 3);
        assert_eq!(m.observer_count(), 0);
    }

    #[test]
    fn dropped_observers_are_forgotten() {
        let m = model();
        let recorder: Rc<dyn ModelObserver> = Rc::new(Recorder::default());
        m.subscribe(Rc::downgrade(&recorder));
        assert_eq!(m.observer_count(), 1);
        drop(recorder);
        assert_eq!(m.observer_count(), 0);
        m.invalidate();
    }
}
