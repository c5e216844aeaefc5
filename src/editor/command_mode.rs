//! The code for 'command-mode', where a whole line is typed after `:` and run on `<CR>`

use super::keystroke_log::Category;
use super::{log_entry, normal_mode, state, Editor, EditorError};
use crate::core::Path;

use std::borrow::Cow;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent};
use serde_json::Value;
use thiserror::Error;

/// The [`State`](state::State) that packsmith is in while a command line is being typed
#[derive(Debug, Clone, Default)]
pub struct State {
    buffer: String,
}

impl state::State for State {
    fn transition(
        mut self: Box<Self>,
        key: KeyEvent,
        editor: &mut Editor,
    ) -> (Box<dyn state::State>, Option<(String, Category)>) {
        match key.code {
            KeyCode::Esc => (
                Box::new(normal_mode::State),
                Some(("cancel command".to_owned(), Category::Mode)),
            ),
            // Deleting past the start of the line leaves command mode, like in Vim
            KeyCode::Backspace if self.buffer.is_empty() => (
                Box::new(normal_mode::State),
                Some(("cancel command".to_owned(), Category::Mode)),
            ),
            KeyCode::Backspace => {
                self.buffer.pop();
                (self, None)
            }
            KeyCode::Char(c) => {
                self.buffer.push(c);
                (self, None)
            }
            KeyCode::Enter => {
                let entry = match parse_command(&self.buffer) {
                    Ok(Command::Quit) => {
                        return (
                            Box::new(state::Quit),
                            Some(("quit packsmith".to_owned(), Category::Quit)),
                        )
                    }
                    Ok(command) => {
                        let category = command.category();
                        log_entry(execute(command, editor), category)
                    }
                    Err(e) => {
                        log::warn!("{}", e);
                        (e.to_string(), Category::Undefined)
                    }
                };
                (Box::new(normal_mode::State), Some(entry))
            }
            _ => (self, None),
        }
    }

    fn keystroke_buffer(&self) -> Cow<'_, str> {
        Cow::from(format!(":{}", self.buffer))
    }

    fn name(&self) -> &'static str {
        "COMMAND"
    }
}

/// A fully parsed command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `kind <kind>`: switch to another document kind
    Kind(String),
    /// `lang <code>`: switch the interface language
    Lang(String),
    /// `set <path> <json>`: write a value into the active document
    Set(Path, Value),
    /// `rm <path>`: remove a value from the active document
    Remove(Path),
    /// `w [file]`: write the exported document to a file
    Write(Option<PathBuf>),
    /// `copy`: copy the exported document into the clipboard register
    Copy,
    /// `reset`: replace the active document with its default
    Reset,
    /// `undo`
    Undo,
    /// `redo`
    Redo,
    /// `theme`: flip between the dark and light themes
    Theme,
    /// `source`: show or hide the source pane
    Source,
    /// `errors`: show or hide the error pane
    Errors,
    /// `back`: go back in the navigation history
    Back,
    /// `forward`: go forward in the navigation history
    Forward,
    /// `q`: quit packsmith
    Quit,
}

impl Command {
    /// Returns the [`Category`] of this `Command`
    pub fn category(&self) -> Category {
        match self {
            Command::Kind(_) | Command::Back | Command::Forward => Category::Switch,
            Command::Lang(_) => Category::Locale,
            Command::Set(..) | Command::Remove(_) | Command::Reset => Category::Edit,
            Command::Write(_) | Command::Copy => Category::IO,
            Command::Undo | Command::Redo => Category::History,
            Command::Theme | Command::Source | Command::Errors => Category::Display,
            Command::Quit => Category::Quit,
        }
    }
}

/// The possible ways a command line could fail to parse
#[derive(Debug, Error)]
pub enum CommandError {
    /// Nothing was typed
    #[error("no command given")]
    Empty,
    /// The first word isn't a command
    #[error("unknown command '{0}'")]
    Unknown(String),
    /// The command needs more arguments
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        /// The command being parsed
        command: &'static str,
        /// A description of what is missing
        argument: &'static str,
    },
    /// The command was given more arguments than it takes
    #[error("unexpected '{rest}' after '{command}'")]
    Unexpected {
        /// The command being parsed
        command: &'static str,
        /// The text that wasn't expected
        rest: String,
    },
    /// The value given to `set` isn't JSON
    #[error("invalid JSON value: {0}")]
    BadValue(#[from] serde_json::Error),
}

/// Parses a command line (without the leading `:`)
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let no_args = |command: Command, name: &'static str| {
        if rest.is_empty() {
            Ok(command)
        } else {
            Err(CommandError::Unexpected {
                command: name,
                rest: rest.to_owned(),
            })
        }
    };

    match name {
        "" => Err(CommandError::Empty),
        "kind" | "k" => Ok(Command::Kind(one_arg("kind", "a document kind", rest)?)),
        "lang" => Ok(Command::Lang(one_arg("lang", "a language code", rest)?)),
        "set" => {
            let (path, value) =
                rest.split_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument {
                        command: "set",
                        argument: "a path and a value",
                    })?;
            Ok(Command::Set(
                Path::parse(path),
                serde_json::from_str(value.trim())?,
            ))
        }
        "rm" => Ok(Command::Remove(Path::parse(&one_arg("rm", "a path", rest)?))),
        "w" | "write" => Ok(Command::Write(if rest.is_empty() {
            None
        } else {
            Some(PathBuf::from(rest))
        })),
        "copy" | "y" => no_args(Command::Copy, "copy"),
        "reset" => no_args(Command::Reset, "reset"),
        "undo" | "u" => no_args(Command::Undo, "undo"),
        "redo" => no_args(Command::Redo, "redo"),
        "theme" => no_args(Command::Theme, "theme"),
        "source" => no_args(Command::Source, "source"),
        "errors" => no_args(Command::Errors, "errors"),
        "back" => no_args(Command::Back, "back"),
        "forward" => no_args(Command::Forward, "forward"),
        "q" | "quit" => no_args(Command::Quit, "quit"),
        _ => Err(CommandError::Unknown(name.to_owned())),
    }
}

/// Parses exactly one argument
fn one_arg(
    command: &'static str,
    argument: &'static str,
    rest: &str,
) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, argument });
    }
    match rest.split_once(char::is_whitespace) {
        Some((_, extra)) => Err(CommandError::Unexpected {
            command,
            rest: extra.trim().to_owned(),
        }),
        None => Ok(rest.to_owned()),
    }
}

/// Runs a parsed command, returning a description for the keystroke log
fn execute(command: Command, editor: &mut Editor) -> Result<String, EditorError> {
    match command {
        Command::Kind(kind) => editor.select_kind(&kind),
        Command::Lang(code) => editor.switch_locale(&code),
        Command::Set(path, value) => editor.set(&path, value),
        Command::Remove(path) => editor.remove(&path),
        Command::Write(path) => editor.download(path),
        Command::Copy => editor.copy(),
        Command::Reset => editor.reset(),
        Command::Undo => editor.undo(),
        Command::Redo => editor.redo(),
        Command::Theme => editor.toggle_theme(),
        Command::Source => editor.toggle_source(),
        Command::Errors => editor.toggle_errors(),
        Command::Back => editor.back(),
        Command::Forward => editor.forward(),
        // Quitting changes the state, so never reaches here
        Command::Quit => Ok("quit packsmith".to_owned()),
    }
}
