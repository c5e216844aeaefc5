//! The error list: every structural problem that the schema finds in the document.

use super::display_token::{syntax_category, DisplayToken};
use super::Render;
use crate::model::DataModel;

/// Renders one line per [`Problem`](crate::schema::Problem).  A valid document renders as
/// nothing at all, and the frontend shows a localised placeholder instead.
#[derive(Debug, Copy, Clone, Default)]
pub struct ErrorsRenderer;

impl Render for ErrorsRenderer {
    fn render(&self, model: &DataModel) -> Vec<DisplayToken> {
        let problems = model.schema().validate(&model.value());
        let mut tokens = Vec::with_capacity(problems.len() * 4);
        for (i, problem) in problems.into_iter().enumerate() {
            if i > 0 {
                tokens.push(DisplayToken::Newline);
            }
            tokens.push(DisplayToken::from_string(
                problem.path.to_string(),
                syntax_category::IDENT,
            ));
            tokens.push(DisplayToken::Whitespace(1));
            tokens.push(DisplayToken::from_string(
                problem.message,
                syntax_category::ERROR,
            ));
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorsRenderer;
    use crate::model::DataModel;
    use crate::schema::{Field, Node, NodeSchema};
    use crate::view::display_token::tokens_to_text;
    use crate::view::Render;

    use serde_json::json;

    #[test]
    fn lists_problems() {
        let schema = NodeSchema::new(
            "test",
            Node::record(vec![Field::required("name", Node::Str)]),
        );
        let model = DataModel::with_value(schema, json!({ "name": 1, "x": 2 }), 10);
        assert_eq!(
            tokens_to_text(&ErrorsRenderer.render(&model)),
            "/name expected a string, found a number\n/x unknown field 'x'"
        );
        model.set(&crate::core::Path::parse("/name"), json!("ok")).unwrap();
        model.remove(&crate::core::Path::parse("/x")).unwrap();
        assert!(ErrorsRenderer.render(&model).is_empty());
    }
}
