//! Display tokens: the flat, styled rendering of a document that every surface draws.

use std::borrow::Cow;

use serde_json::Value;

/// How many spaces correspond to one indentation level
pub const INDENT_WIDTH: usize = 2;

pub mod syntax_category {
    //! Common values of [`SyntaxCategory`](super::SyntaxCategory)

    /// Text that shouldn't be highlighted a specific colour: used for things like punctuation.
    pub const DEFAULT: &str = "default";
    /// Constant values like 'true', 'false' and 'null'
    pub const CONST: &str = "const";
    /// Literal values like strings and numbers
    pub const LITERAL: &str = "literal";
    /// Object keys and paths
    pub const IDENT: &str = "ident";
    /// Annotations such as the size of a list in the tree view
    pub const COMMENT: &str = "comment";
    /// Anything that points at a problem
    pub const ERROR: &str = "error";
}

/// A category of text that should be syntax highlighted the same color.
///
/// See [`syntax_category`] for common values
pub type SyntaxCategory = &'static str;

/// A single piece of a rendered view
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum DisplayToken {
    /// Some text (as either a `&'static str` or a [`String`]) that should be rendered verbatim to
    /// the screen
    Text(Cow<'static, str>, SyntaxCategory),
    /// Add some number of spaces worth of whitespace
    Whitespace(usize),
    /// Put the next token onto a new line
    Newline,
    /// Add another indent level
    Indent,
    /// Remove an indent level
    Dedent,
}

impl DisplayToken {
    /// Creates a new text token from a static [`str`]
    pub fn from_str(text: &'static str, category: SyntaxCategory) -> Self {
        DisplayToken::Text(Cow::from(text), category)
    }

    /// Creates a new text token from an owned [`String`]
    pub fn from_string(text: String, category: SyntaxCategory) -> Self {
        DisplayToken::Text(Cow::from(text), category)
    }
}

/// Write a stream of display tokens to a string
pub fn write_tokens(tokens: &[DisplayToken], string: &mut String) {
    let mut indentation = 0usize;
    for tok in tokens {
        match tok {
            DisplayToken::Text(s, _) => string.push_str(s),
            DisplayToken::Whitespace(n) => string.extend(std::iter::repeat(' ').take(*n)),
            DisplayToken::Newline => {
                // Push a newline and keep indentation
                string.push('\n');
                string.extend(std::iter::repeat(' ').take(indentation));
            }
            DisplayToken::Indent => indentation += INDENT_WIDTH,
            DisplayToken::Dedent => indentation = indentation.saturating_sub(INDENT_WIDTH),
        }
    }
}

/// Same as [`write_tokens`], but creates a new [`String`]
pub fn tokens_to_text(tokens: &[DisplayToken]) -> String {
    let mut s = String::new();
    write_tokens(tokens, &mut s);
    s
}

/// Appends the tokens of a pretty-printed JSON value.  The text of these tokens is identical to
/// [`serde_json::to_string_pretty`].
pub fn json_tokens(value: &Value, tokens: &mut Vec<DisplayToken>) {
    use syntax_category::*;

    match value {
        Value::Null => tokens.push(DisplayToken::from_str("null", CONST)),
        Value::Bool(true) => tokens.push(DisplayToken::from_str("true", CONST)),
        Value::Bool(false) => tokens.push(DisplayToken::from_str("false", CONST)),
        Value::Number(n) => tokens.push(DisplayToken::from_string(n.to_string(), LITERAL)),
        Value::String(_) => tokens.push(DisplayToken::from_string(value.to_string(), LITERAL)),
        // Special case: empty containers are rendered on one line
        Value::Array(items) if items.is_empty() => tokens.push(DisplayToken::from_str("[]", DEFAULT)),
        Value::Object(map) if map.is_empty() => tokens.push(DisplayToken::from_str("{}", DEFAULT)),
        Value::Array(items) => {
            tokens.push(DisplayToken::from_str("[", DEFAULT));
            tokens.push(DisplayToken::Indent);
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    tokens.push(DisplayToken::from_str(",", DEFAULT));
                }
                tokens.push(DisplayToken::Newline);
                json_tokens(item, tokens);
            }
            tokens.push(DisplayToken::Dedent);
            tokens.push(DisplayToken::Newline);
            tokens.push(DisplayToken::from_str("]", DEFAULT));
        }
        Value::Object(map) => {
            tokens.push(DisplayToken::from_str("{", DEFAULT));
            tokens.push(DisplayToken::Indent);
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    tokens.push(DisplayToken::from_str(",", DEFAULT));
                }
                tokens.push(DisplayToken::Newline);
                tokens.push(DisplayToken::from_string(Value::from(key.as_str()).to_string(), IDENT));
                tokens.push(DisplayToken::from_str(": ", DEFAULT));
                json_tokens(item, tokens);
            }
            tokens.push(DisplayToken::Dedent);
            tokens.push(DisplayToken::Newline);
            tokens.push(DisplayToken::from_str("}", DEFAULT));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{json_tokens, tokens_to_text};

    use serde_json::json;

    #[test]
    fn json_matches_serde_pretty() {
        for value in &[
            json!(true),
            json!(null),
            json!(1.5),
            json!("with \"quotes\"\n"),
            json!([]),
            json!({}),
            json!([true, false]),
            json!({ "foo": true, "bar": [1, { "baz": [] }] }),
            json!([{ "foos": [false, true, false], "bar": false }, true]),
        ] {
            let mut tokens = Vec::new();
            json_tokens(value, &mut tokens);
            assert_eq!(
                tokens_to_text(&tokens),
                serde_json::to_string_pretty(value).unwrap()
            );
        }
    }
}
