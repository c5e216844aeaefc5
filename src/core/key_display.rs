//! An extension trait to add a convenient way to display keystrokes

use std::borrow::Cow;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// An extension trait to add a convenient way to display keystrokes
pub trait KeyDisplay {
    /// Return a compact string representing this keystroke
    fn compact_string(&self) -> Cow<'static, str>;
}

impl KeyDisplay for KeyEvent {
    fn compact_string(&self) -> Cow<'static, str> {
        let base: Cow<'static, str> = match self.code {
            KeyCode::Char(' ') => Cow::from("<SPACE>"),
            KeyCode::Char(c) => Cow::from(String::from(c)),

            KeyCode::Up => Cow::from("<UP>"),
            KeyCode::Down => Cow::from("<DOWN>"),
            KeyCode::Left => Cow::from("<LEFT>"),
            KeyCode::Right => Cow::from("<RIGHT>"),

            KeyCode::Tab => Cow::from("<TAB>"),
            KeyCode::BackTab => Cow::from("<S-TAB>"),
            KeyCode::Enter => Cow::from("<CR>"),
            KeyCode::Backspace => Cow::from("<BS>"),
            KeyCode::F(num) => Cow::from(format!("<F{}>", num)),
            KeyCode::Esc => Cow::from("<ESC>"),

            _ => Cow::from("<?>"),
        };
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            Cow::from(format!("^{}", base))
        } else if self.modifiers.contains(KeyModifiers::ALT) {
            Cow::from(format!("M-{}", base))
        } else {
            base
        }
    }
}

/// Converts a sequence of keystrokes into a single compact [`String`]
pub fn keystrokes_to_string(keys: &[KeyEvent]) -> String {
    keys.iter().map(|k| k.compact_string()).collect()
}
