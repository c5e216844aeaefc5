//! A utility datastructure to store and render a log of keystrokes, so that it's obvious what
//! every keystroke did.

use tui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// A category grouping similar actions
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Category {
    /// The active document kind changed
    Switch,
    /// The interface language changed
    Locale,
    /// Undo or redo
    History,
    /// The active document was edited (including resets)
    Edit,
    /// The document was copied or written somewhere
    IO,
    /// Only the presentation changed (theme, visible panes)
    Display,
    /// packsmith moved between modes
    Mode,
    /// The action of the keystrokes is that packsmith should quit
    Quit,
    /// The keystrokes did not correspond to a well-defined action
    Undefined,
    /// The keystrokes were understood, but the action failed
    Failed,
}

/// Returns the [`Color`] that all actions of a given [`Category`] should be displayed.  This is
/// not implemented as a public method on [`Category`], because doing so would require
/// [`Category`] to rely on the specific terminal backend used.
impl Category {
    fn term_color(self) -> Color {
        match self {
            Category::Switch => Color::LightBlue,
            Category::Locale => Color::Blue,
            Category::History => Color::LightYellow,
            Category::Edit => Color::LightGreen,
            Category::IO => Color::Cyan,
            Category::Display => Color::Gray,
            Category::Mode => Color::White,
            Category::Quit => Color::Magenta,
            Category::Undefined => Color::LightRed,
            Category::Failed => Color::Red,
        }
    }
}

/// One entry in the log.  This usually represents a single keystroke, but could represent an
/// accumulation of many identical keystrokes that are executed consecutively.
#[derive(Debug, Clone)]
struct Entry {
    count: usize,
    keystroke: String,
    description: String,
    color: Color,
}

/// A utility struct to store and display a log of which keystrokes have been executed recently
#[derive(Debug, Clone)]
pub struct KeyStrokeLog {
    /// A list of keystrokes that have been run
    keystrokes: Vec<Entry>,
    max_entries: usize,
}

impl KeyStrokeLog {
    /// Create a new (empty) keystroke log
    pub fn new(max_entries: usize) -> KeyStrokeLog {
        KeyStrokeLog {
            keystrokes: vec![],
            max_entries,
        }
    }

    /// Sets and enforces the max entry limit
    pub fn set_max_entries(&mut self, max_entries: usize) {
        self.max_entries = max_entries;
        self.enforce_entry_limit();
    }

    /// Repeatedly remove keystrokes until the entry limit is satisfied
    fn enforce_entry_limit(&mut self) {
        if self.keystrokes.len() > self.max_entries {
            let excess = self.keystrokes.len() - self.max_entries;
            self.keystrokes.drain(..excess);
        }
    }

    /// Pushes a new keystroke to the log.
    pub fn push(&mut self, keystroke: String, description: String, category: Category) {
        // If the keystroke is identical to the last log entry, increment that counter by one
        if let Some(last) = self.keystrokes.last_mut() {
            if last.keystroke == keystroke && last.description == description {
                last.count += 1;
                return;
            }
        }
        self.keystrokes.push(Entry {
            count: 1,
            keystroke,
            description,
            color: category.term_color(),
        });
        // Since we added an item, we should enforce the entry limit
        self.enforce_entry_limit();
    }
}

impl Widget for &KeyStrokeLog {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Calculate how wide the numbers column should be, enforcing that it is at least two
        // chars wide.
        let count_col_width = self
            .keystrokes
            .iter()
            .map(|e| match e.count {
                1 => 0,
                c => format!("{}x", c).len(),
            })
            .max()
            .unwrap_or(0)
            .max(2) as u16;
        // Calculate the width of the keystroke column, and make sure that it is at least two
        // chars wide.
        let cmd_col_width = self
            .keystrokes
            .iter()
            .map(|e| e.keystroke.chars().count())
            .max()
            .unwrap_or(0)
            .max(2) as u16;
        // Only the most recent entries fit
        let skip = self.keystrokes.len().saturating_sub(area.height as usize);
        for (y, e) in (area.top()..area.bottom()).zip(self.keystrokes.iter().skip(skip)) {
            let mut x = area.left();
            let mut print = |x: u16, text: &str, style: Style| {
                if x < area.right() {
                    buf.set_stringn(x, y, text, (area.right() - x) as usize, style);
                }
            };
            // Print the count if greater than 1
            if e.count > 1 {
                print(x, &format!("{}x", e.count), Style::default());
            }
            x += count_col_width + 1;
            // Print the keystrokes in one column
            print(x, &e.keystroke, Style::default().fg(Color::White));
            x += cmd_col_width + 1;
            print(x, "=>", Style::default());
            // Print the meanings in another column
            x += 3;
            print(x, &e.description, Style::default().fg(e.color));
        }
    }
}
