//! Module to hold all user-configurable parameters, until we find a better way to handle
//! configuration

use crate::core::DocumentKind;
use crate::editor::normal_mode::CmdType;
use crate::prefs::Theme;
use crate::view::display_token::{syntax_category::*, SyntaxCategory};

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui::style::Color;

/* COLOR SCHEME */

/// A mapping from syntax highlighting categories to terminal [`Color`]s
pub type ColorScheme = std::collections::HashMap<SyntaxCategory, Color>;

/// The [`ColorScheme`] used with [`Theme::Dark`], and when no theme has been chosen
pub fn dark_color_scheme() -> ColorScheme {
    hmap::hmap! {
        DEFAULT => Color::White,
        CONST => Color::Red,
        LITERAL => Color::Yellow,
        COMMENT => Color::Green,
        IDENT => Color::Cyan,
        ERROR => Color::LightRed
    }
}

/// The [`ColorScheme`] used with [`Theme::Light`]
pub fn light_color_scheme() -> ColorScheme {
    hmap::hmap! {
        DEFAULT => Color::Black,
        CONST => Color::Red,
        LITERAL => Color::Magenta,
        COMMENT => Color::DarkGray,
        IDENT => Color::Blue,
        ERROR => Color::LightRed
    }
}

/* KEY BINDINGS */

/// Mapping of keys to keystrokes.
/// Shortcut definition, also allows us to change the type if needed.
pub type KeyMap = std::collections::HashMap<KeyEvent, CmdType>;

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
}

fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Generates a 'canonical' [`KeyMap`].  Ctrl+Z and Ctrl+Y are always undo and redo; the rest
/// are single keys, similar to those of Vim.
pub fn default_keymap() -> KeyMap {
    hmap::hmap! {
        ctrl('z') => CmdType::Undo,
        ctrl('y') => CmdType::Redo,
        key('u') => CmdType::Undo,
        key('R') => CmdType::Redo,
        key('q') => CmdType::Quit,
        key(':') => CmdType::CommandMode,
        KeyEvent::new(KeyCode::Tab, KeyModifiers::NONE) => CmdType::NextKind,
        KeyEvent::new(KeyCode::BackTab, KeyModifiers::NONE) => CmdType::PrevKind,
        key('L') => CmdType::NextLocale,
        key('r') => CmdType::Reset,
        key('y') => CmdType::Copy,
        key('w') => CmdType::Download,
        key('t') => CmdType::ToggleTheme,
        key('s') => CmdType::ToggleSource,
        key('e') => CmdType::ToggleErrors,
        key('[') => CmdType::Back,
        key(']') => CmdType::Forward
    }
}

/* FILES */

/// Where the preferences file lives if nothing else is specified: under `$XDG_CONFIG_HOME` or
/// `$HOME/.config`, falling back on the working directory
pub fn default_prefs_path() -> PathBuf {
    let dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")));
    match dir {
        Some(dir) => dir.join("packsmith").join("prefs.toml"),
        None => PathBuf::from("packsmith.toml"),
    }
}

/* COMPLETE CONFIG */

/// A struct to hold the entire run-time configuration of packsmith
#[derive(Debug, Clone)]
pub struct Config {
    /// A mapping between keystrokes and normal-mode [`CmdType`]s
    pub keymap: KeyMap,
    /// The colours used by [`Theme::Dark`]
    pub dark: ColorScheme,
    /// The colours used by [`Theme::Light`]
    pub light: ColorScheme,
    /// The kind opened when no (or an unknown) kind is requested
    pub default_kind: DocumentKind,
    /// The prefix of every history path
    pub base_path: String,
    /// How many changes each document remembers for undo
    pub undo_depth: usize,
    /// How long the 'done' acknowledgement stays visible
    pub ack_duration: Duration,
    /// Where the theme preference is stored
    pub prefs_path: PathBuf,
    /// Where 'download' writes the active document
    pub download_path: PathBuf,
}

impl Config {
    /// The [`ColorScheme`] for a theme.  No theme means the dark one.
    pub fn color_scheme(&self, theme: Option<Theme>) -> &ColorScheme {
        match theme {
            Some(Theme::Light) => &self.light,
            Some(Theme::Dark) | None => &self.dark,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            keymap: default_keymap(),
            dark: dark_color_scheme(),
            light: light_color_scheme(),
            default_kind: DocumentKind::from("loot-table"),
            base_path: "/".to_owned(),
            undo_depth: 256,
            ack_duration: Duration::from_secs(2),
            prefs_path: default_prefs_path(),
            download_path: PathBuf::from("data.json"),
        }
    }
}
