//! Everything that can show a [`DataModel`].
//!
//! The session only knows about the [`View`] trait.  The concrete views that packsmith ships
//! are all [`SurfaceView`]s: a `SurfaceView` keeps a [`Surface`] subscribed to whichever model
//! it was last pointed at, and the surface re-renders itself (through a [`Render`]er) every time
//! that model is invalidated.  The frontend holds the surfaces and draws their tokens.

pub mod display_token;
pub mod errors;
pub mod source;
pub mod tree;

use std::cell::{Cell, Ref, RefCell};
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::model::{DataModel, ModelObserver, ModelRef, ObserverId};
use display_token::{tokens_to_text, DisplayToken};

/// The possible ways that pointing a view at a new model could fail
#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ViewError {
    /// The surface that the view draws onto no longer exists
    #[error("the surface of view '{0}' has been closed")]
    SurfaceClosed(String),
    /// The view refused to show the model
    #[error("view '{view}' rejected the model: {reason}")]
    Rejected {
        /// The name of the view
        view: String,
        /// Why the model was rejected
        reason: String,
    },
}

/// Anything that can be told to observe a different [`DataModel`].
///
/// `set_model` must be safe to call at any time, must fully replace the previously observed
/// model and must not keep the old model alive afterwards.
pub trait View {
    /// Start observing `model` instead of whatever was observed before
    fn set_model(&mut self, model: ModelRef) -> Result<(), ViewError>;

    /// A short name used when reporting failures
    fn name(&self) -> &str {
        "view"
    }
}

/// Turns the current state of a model into something that can be drawn
pub trait Render {
    /// Render the model's current value
    fn render(&self, model: &DataModel) -> Vec<DisplayToken>;
}

/// The drawable output of one view.  Surfaces are re-rendered whenever the model they are
/// subscribed to is invalidated.
pub struct Surface {
    name: &'static str,
    renderer: Box<dyn Render>,
    tokens: RefCell<Vec<DisplayToken>>,
    /// The version of the model that `tokens` was rendered from
    rendered_version: Cell<Option<u64>>,
    render_count: Cell<usize>,
}

impl Surface {
    /// Creates a blank surface which draws with `renderer`
    pub fn new(name: &'static str, renderer: impl Render + 'static) -> Rc<Self> {
        Rc::new(Surface {
            name,
            renderer: Box::new(renderer),
            tokens: RefCell::new(Vec::new()),
            rendered_version: Cell::new(None),
            render_count: Cell::new(0),
        })
    }

    /// The name of this surface
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The tokens of the last render
    pub fn tokens(&self) -> Ref<'_, Vec<DisplayToken>> {
        self.tokens.borrow()
    }

    /// The tokens of the last render, as plain text
    pub fn text(&self) -> String {
        tokens_to_text(&self.tokens())
    }

    /// The model version that the surface last rendered, or `None` if it never rendered
    pub fn rendered_version(&self) -> Option<u64> {
        self.rendered_version.get()
    }

    /// How many times this surface has been rendered
    pub fn render_count(&self) -> usize {
        self.render_count.get()
    }
}

impl ModelObserver for Surface {
    fn model_invalidated(&self, model: &DataModel) {
        let tokens = self.renderer.render(model);
        *self.tokens.borrow_mut() = tokens;
        self.rendered_version.set(Some(model.version()));
        self.render_count.set(self.render_count.get() + 1);
    }
}

/// A [`View`] which keeps a [`Surface`] subscribed to the model it observes
pub struct SurfaceView {
    name: &'static str,
    surface: Weak<Surface>,
    observed: Option<(ModelRef, ObserverId)>,
}

impl SurfaceView {
    /// Creates a view that draws onto `surface`.  The view doesn't keep the surface alive.
    pub fn new(surface: &Rc<Surface>) -> Self {
        SurfaceView {
            name: surface.name(),
            surface: Rc::downgrade(surface),
            observed: None,
        }
    }

    /// The model currently being observed
    pub fn observed(&self) -> Option<&ModelRef> {
        self.observed.as_ref().map(|(m, _)| m)
    }

    fn detach(&mut self) {
        if let Some((model, id)) = self.observed.take() {
            model.unsubscribe(id);
        }
    }
}

impl View for SurfaceView {
    fn set_model(&mut self, model: ModelRef) -> Result<(), ViewError> {
        self.detach();
        let surface = self
            .surface
            .upgrade()
            .ok_or_else(|| ViewError::SurfaceClosed(self.name.to_owned()))?;
        let observer: Rc<dyn ModelObserver> = surface;
        let id = model.subscribe(Rc::downgrade(&observer));
        self.observed = Some((model, id));
        Ok(())
    }

    fn name(&self) -> &str {
        self.name
    }
}

impl Drop for SurfaceView {
    fn drop(&mut self) {
        self.detach();
    }
}
