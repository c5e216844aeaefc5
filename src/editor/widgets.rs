use crate::config::ColorScheme;
use crate::session::Labels;
use crate::view::display_token::{DisplayToken, SyntaxCategory, INDENT_WIDTH};

use std::collections::HashSet;

use tui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Paragraph, Widget},
};

/// The title of the active kind, with the kind and language menus underneath
pub struct Header<'a> {
    pub labels: &'a Labels,
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_stringn(
            area.x,
            area.y,
            &self.labels.title,
            area.width as usize,
            Style::default().add_modifier(Modifier::BOLD),
        );
        if area.height < 2 {
            return;
        }
        let y = area.y + 1;
        let mut x = area.x;
        for entry in &self.labels.kinds {
            if x >= area.right() {
                break;
            }
            let style = if entry.selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            x = buf
                .set_stringn(x, y, &entry.label, (area.right() - x) as usize, style)
                .0
                + 1;
        }
        // The language menu only shows the active language
        if let Some(language) = self.labels.languages.iter().find(|e| e.selected) {
            Paragraph::new(language.label.as_str())
                .alignment(Alignment::Right)
                .render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }
}

pub struct StatusBar<'a> {
    pub mode: &'a str,
    pub keystroke_buffer: &'a str,
    pub acknowledged: Option<&'a str>,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let right = match self.acknowledged {
            Some(what) => format!("{} \u{2713}  {}", what, self.keystroke_buffer),
            None => self.keystroke_buffer.to_owned(),
        };
        Paragraph::new(right)
            .alignment(Alignment::Right)
            .render(area, buf);
        buf.set_string(
            area.x,
            area.y,
            format!("-- {} --", self.mode),
            Style::default(),
        );
    }
}

/// A pane showing the tokens of one surface
pub struct TextView<'a> {
    pub block: Block<'a>,
    pub tokens: &'a [DisplayToken],
    pub color_scheme: &'a ColorScheme,
    /// Shown when there are no tokens
    pub placeholder: &'a str,
}

impl Widget for TextView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = self.block.inner(area);
        self.block.render(area, buf);
        if inner.width == 0 || inner.height == 0 {
            return;
        }
        if self.tokens.is_empty() {
            buf.set_stringn(
                inner.x,
                inner.y,
                self.placeholder,
                inner.width as usize,
                Style::default().fg(Color::DarkGray),
            );
            return;
        }

        // Mutable variables to track where the terminal cursor should go
        let mut row = inner.top();
        let mut col = inner.left();
        let mut indentation_amount = 0u16;

        let mut unknown_categories: HashSet<SyntaxCategory> = HashSet::with_capacity(0);

        for tok in self.tokens {
            match tok {
                DisplayToken::Text(s, category) => {
                    let color = *self.color_scheme.get(category).unwrap_or_else(|| {
                        unknown_categories.insert(*category);
                        &Color::LightMagenta
                    });
                    if col < inner.right() {
                        col = buf
                            .set_stringn(
                                col,
                                row,
                                &**s,
                                (inner.right() - col).into(),
                                Style::default().fg(color),
                            )
                            .0;
                    }
                }
                DisplayToken::Whitespace(n) => {
                    col = col.saturating_add(*n as u16);
                }
                DisplayToken::Newline => {
                    row += 1;
                    if row == inner.bottom() {
                        break;
                    }
                    col = inner.left() + indentation_amount;
                }
                DisplayToken::Indent => {
                    indentation_amount += INDENT_WIDTH as u16;
                }
                DisplayToken::Dedent => {
                    indentation_amount = indentation_amount.saturating_sub(INDENT_WIDTH as u16);
                }
            }
        }

        // Print warning messages for unknown syntax categories
        for c in unknown_categories {
            log::error!("Unknown highlight category '{}'", c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::TextView;
    use crate::config::dark_color_scheme;
    use crate::view::display_token::json_tokens;

    use serde_json::json;
    use tui::{buffer::Buffer, layout::Rect, widgets::Block, widgets::Widget};

    fn lines(buf: &Buffer) -> Vec<String> {
        let width = buf.area.width as usize;
        buf.content
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol.as_str()).collect::<String>())
            .map(|l| l.trim_end().to_owned())
            .collect()
    }

    #[test]
    fn text_view_indents() {
        let mut tokens = Vec::new();
        json_tokens(&json!({ "a": [1] }), &mut tokens);
        let area = Rect::new(0, 0, 12, 6);
        let mut buf = Buffer::empty(area);
        TextView {
            block: Block::default(),
            tokens: &tokens,
            color_scheme: &dark_color_scheme(),
            placeholder: "",
        }
        .render(area, &mut buf);
        assert_eq!(
            lines(&buf),
            vec!["{", "  \"a\": [", "    1", "  ]", "}", ""]
        );
    }

    #[test]
    fn placeholder() {
        let area = Rect::new(0, 0, 10, 1);
        let mut buf = Buffer::empty(area);
        TextView {
            block: Block::default(),
            tokens: &[],
            color_scheme: &dark_color_scheme(),
            placeholder: "No errors",
        }
        .render(area, &mut buf);
        assert_eq!(lines(&buf), vec!["No errors"]);
    }
}
