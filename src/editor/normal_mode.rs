//! The code for 'normal-mode', where every keystroke is a command, similar to that of Vim

use super::keystroke_log::Category;
use super::{command_mode, log_entry, state, Editor};
use crate::core::KeyDisplay;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// The possible keystrokes typed by the user in normal mode.  Each `CmdType` can be mapped to an
/// individual key in [`KeyMap`](crate::config::KeyMap).
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum CmdType {
    /// Quit packsmith
    Quit,
    /// Start typing a `:` command
    CommandMode,
    /// Undo the last change to the active document
    Undo,
    /// Redo a change to the active document
    Redo,
    /// Replace the active document with its default
    Reset,
    /// Switch to the next document kind
    NextKind,
    /// Switch to the previous document kind
    PrevKind,
    /// Switch to the next language
    NextLocale,
    /// Go back in the navigation history
    Back,
    /// Go forward in the navigation history
    Forward,
    /// Copy the exported document into the clipboard register
    Copy,
    /// Write the exported document to the download file
    Download,
    /// Flip between the dark and light themes
    ToggleTheme,
    /// Show or hide the source pane
    ToggleSource,
    /// Show or hide the error pane
    ToggleErrors,
}

impl CmdType {
    /// Returns a lower-case summary string of the given keystroke
    pub fn summary_string(&self) -> &'static str {
        match self {
            CmdType::Quit => "quit",
            CmdType::CommandMode => "command mode",
            CmdType::Undo => "undo",
            CmdType::Redo => "redo",
            CmdType::Reset => "reset",
            CmdType::NextKind => "next kind",
            CmdType::PrevKind => "previous kind",
            CmdType::NextLocale => "next language",
            CmdType::Back => "back",
            CmdType::Forward => "forward",
            CmdType::Copy => "copy",
            CmdType::Download => "download",
            CmdType::ToggleTheme => "toggle theme",
            CmdType::ToggleSource => "toggle source",
            CmdType::ToggleErrors => "toggle errors",
        }
    }

    /// Returns the [`Category`] of this keystroke
    pub fn category(&self) -> Category {
        match self {
            CmdType::Quit => Category::Quit,
            CmdType::CommandMode => Category::Mode,
            CmdType::Undo | CmdType::Redo => Category::History,
            CmdType::Reset => Category::Edit,
            CmdType::NextKind | CmdType::PrevKind | CmdType::Back | CmdType::Forward => {
                Category::Switch
            }
            CmdType::NextLocale => Category::Locale,
            CmdType::Copy | CmdType::Download => Category::IO,
            CmdType::ToggleTheme | CmdType::ToggleSource | CmdType::ToggleErrors => {
                Category::Display
            }
        }
    }
}

/// Terminals report upper-case letters (and back-tab) with the shift modifier set, but the
/// keymap stores them without it
fn normalize(mut key: KeyEvent) -> KeyEvent {
    if matches!(key.code, KeyCode::Char(_) | KeyCode::BackTab) {
        key.modifiers.remove(KeyModifiers::SHIFT);
    }
    key
}

/// The [`State`](state::State) that packsmith is in when every keystroke is a command
#[derive(Debug, Copy, Clone, Default)]
pub struct State;

impl state::State for State {
    fn transition(
        self: Box<Self>,
        key: KeyEvent,
        editor: &mut Editor,
    ) -> (Box<dyn state::State>, Option<(String, Category)>) {
        let cmd = match editor.config().keymap.get(&normalize(key)) {
            Some(cmd) => *cmd,
            None => {
                return (
                    self,
                    Some((
                        format!("undefined key '{}'", key.compact_string()),
                        Category::Undefined,
                    )),
                )
            }
        };

        let result = match cmd {
            // Mode changes are handled here, since they change the state rather than the editor
            CmdType::Quit => {
                return (
                    Box::new(state::Quit),
                    Some(("quit packsmith".to_owned(), Category::Quit)),
                )
            }
            CmdType::CommandMode => {
                return (
                    Box::new(command_mode::State::default()),
                    Some(("enter command mode".to_owned(), Category::Mode)),
                )
            }
            CmdType::Undo => editor.undo(),
            CmdType::Redo => editor.redo(),
            CmdType::Reset => editor.reset(),
            CmdType::NextKind => editor.cycle_kind(true),
            CmdType::PrevKind => editor.cycle_kind(false),
            CmdType::NextLocale => editor.cycle_locale(),
            CmdType::Back => editor.back(),
            CmdType::Forward => editor.forward(),
            CmdType::Copy => editor.copy(),
            CmdType::Download => editor.download(None),
            CmdType::ToggleTheme => editor.toggle_theme(),
            CmdType::ToggleSource => editor.toggle_source(),
            CmdType::ToggleErrors => editor.toggle_errors(),
        };
        (self, Some(log_entry(result, cmd.category())))
    }

    fn name(&self) -> &'static str {
        "NORMAL"
    }
}

#[cfg(test)]
mod tests {
    use super::State;
    use crate::editor::keystroke_log::Category;
    use crate::editor::state::State as _;
    use crate::editor::tests::editor;

    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use serde_json::json;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn ctrl_z_and_ctrl_y() {
        let (mut editor, _dir) = editor();
        editor
            .set(&crate::core::Path::parse("/type"), json!("x"))
            .unwrap();

        let state = Box::new(State);
        let (state, entry) =
            state.transition(press(KeyCode::Char('z'), KeyModifiers::CONTROL), &mut editor);
        assert_eq!(entry.unwrap().1, Category::History);
        assert!(editor.session().active_model().value().get("type").is_none());

        let (state, _) =
            state.transition(press(KeyCode::Char('y'), KeyModifiers::CONTROL), &mut editor);
        assert_eq!(editor.session().active_model().value()["type"], json!("x"));
        assert_eq!(state.name(), "NORMAL");
    }

    #[test]
    fn shifted_keys() {
        let (mut editor, _dir) = editor();
        let (_, entry) = Box::new(State).transition(
            press(KeyCode::Char('L'), KeyModifiers::SHIFT),
            &mut editor,
        );
        assert_eq!(entry.unwrap().1, Category::Locale);
        assert_eq!(editor.session().locale(), "pt");
    }

    #[test]
    fn mode_changes() {
        let (mut editor, _dir) = editor();
        let (state, _) =
            Box::new(State).transition(press(KeyCode::Char(':'), KeyModifiers::NONE), &mut editor);
        assert_eq!(state.name(), "COMMAND");

        let (state, entry) =
            Box::new(State).transition(press(KeyCode::Char('q'), KeyModifiers::NONE), &mut editor);
        assert!(state.is_quit());
        assert_eq!(entry.unwrap().1, Category::Quit);
    }

    #[test]
    fn undefined_key() {
        let (mut editor, _dir) = editor();
        let (state, entry) =
            Box::new(State).transition(press(KeyCode::Char('Z'), KeyModifiers::SHIFT), &mut editor);
        assert_eq!(
            entry,
            Some(("undefined key 'Z'".to_owned(), Category::Undefined))
        );
        assert!(!state.is_quit());
    }

    #[test]
    fn tab_cycles_kinds() {
        let (mut editor, _dir) = editor();
        let tab = press(KeyCode::Tab, KeyModifiers::NONE);
        let (state, _) = Box::new(State).transition(tab, &mut editor);
        assert_eq!(editor.session().active_kind().as_str(), "predicate");
        let (_, _) = state.transition(press(KeyCode::BackTab, KeyModifiers::SHIFT), &mut editor);
        assert_eq!(editor.session().active_kind().as_str(), "loot-table");
        assert_eq!(editor.history().len(), 3);
    }
}
