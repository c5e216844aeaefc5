//! Definition of the state machine of packsmith's editor modes

use super::keystroke_log::Category;
use super::Editor;

use std::borrow::Cow;

use crossterm::event::KeyEvent;

/// A trait which should be implemented for every `State` in packsmith's state machine.
///
/// The current states are:
/// - [`Quit`]
/// - [`crate::editor::normal_mode::State`]
/// - [`crate::editor::command_mode::State`]
/// - `crate::editor::IntermediateState` (link doesn't work because `IntermediateState` is private)
pub trait State {
    /// Consume a keystroke, returning the `State` after this transition along with an optional
    /// entry for the keystroke log
    fn transition(
        self: Box<Self>,
        key: KeyEvent,
        editor: &mut Editor,
    ) -> (Box<dyn State>, Option<(String, Category)>);

    /// Return the keystroke buffer that should be displayed in the status bar
    fn keystroke_buffer(&self) -> Cow<'_, str> {
        Cow::from("")
    }

    /// The name of this mode, shown in the status bar
    fn name(&self) -> &'static str;

    /// Returns `true` if packsmith should quit.  By default, this returns `false`.  This should
    /// **only** be `true` for [`Quit`].
    fn is_quit(&self) -> bool {
        false
    }
}

/// The [`State`] that packsmith enters to quit the mainloop and exit
#[derive(Debug, Copy, Clone)]
pub struct Quit;

impl State for Quit {
    fn transition(
        self: Box<Self>,
        _key: KeyEvent,
        _editor: &mut Editor,
    ) -> (Box<dyn State>, Option<(String, Category)>) {
        (self, None)
    }

    fn name(&self) -> &'static str {
        "QUIT"
    }

    fn is_quit(&self) -> bool {
        true
    }
}
