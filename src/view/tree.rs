//! The tree view: one line per value, nested values indented under their parent, with values
//! that have problems flagged.

use std::collections::HashSet;

use serde_json::Value;

use super::display_token::{syntax_category::*, DisplayToken};
use super::Render;
use crate::core::Path;
use crate::model::DataModel;

/// Renders the document as an indented outline
#[derive(Debug, Copy, Clone, Default)]
pub struct TreeRenderer;

impl Render for TreeRenderer {
    fn render(&self, model: &DataModel) -> Vec<DisplayToken> {
        let value = model.value();
        let flagged: HashSet<Path> = model
            .schema()
            .validate(&value)
            .into_iter()
            .map(|p| p.path)
            .collect();
        let mut tokens = Vec::new();
        write_node(None, &value, &mut Path::root(), &flagged, &mut tokens);
        tokens
    }
}

/// Recursively writes the line of one value followed by the lines of its children.  `path` is
/// used as a stack while recursing, and is left unchanged on return.
fn write_node(
    label: Option<&str>,
    value: &Value,
    path: &mut Path,
    flagged: &HashSet<Path>,
    tokens: &mut Vec<DisplayToken>,
) {
    if let Some(label) = label {
        tokens.push(DisplayToken::Newline);
        tokens.push(DisplayToken::from_string(label.to_owned(), IDENT));
        tokens.push(DisplayToken::from_str(": ", DEFAULT));
    }
    match value {
        Value::Array(items) => tokens.push(DisplayToken::from_string(
            format!("[{}]", items.len()),
            COMMENT,
        )),
        Value::Object(map) => tokens.push(DisplayToken::from_string(
            format!("{{{}}}", map.len()),
            COMMENT,
        )),
        Value::Null | Value::Bool(_) => tokens.push(DisplayToken::from_string(value.to_string(), CONST)),
        _ => tokens.push(DisplayToken::from_string(value.to_string(), LITERAL)),
    }
    if flagged.contains(path) {
        tokens.push(DisplayToken::from_str(" !", ERROR));
    }

    let children: Vec<(String, &Value)> = match value {
        Value::Array(items) => items.iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect(),
        Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
        _ => return,
    };
    tokens.push(DisplayToken::Indent);
    for (key, child) in children {
        path.push(key.as_str());
        write_node(Some(key.as_str()), child, path, flagged, tokens);
        path.pop();
    }
    tokens.push(DisplayToken::Dedent);
}

#[cfg(test)]
mod tests {
    use super::TreeRenderer;
    use crate::model::DataModel;
    use crate::schema::{Field, Node, NodeSchema};
    use crate::view::display_token::tokens_to_text;
    use crate::view::Render;

    use serde_json::json;

    #[test]
    fn outline() {
        let schema = NodeSchema::new(
            "test",
            Node::record(vec![
                Field::required("pools", Node::list(Node::record(vec![
                    Field::required("rolls", Node::Number),
                ]))),
                Field::optional("name", Node::Str),
            ]),
        );
        let model = DataModel::with_value(
            schema,
            json!({ "pools": [{ "rolls": "two" }, {}], "name": "x", "on": null }),
            10,
        );
        assert_eq!(
            tokens_to_text(&TreeRenderer.render(&model)),
            r#"{3}
  pools: [2]
    0: {1}
      rolls: "two" !
    1: {0} !
  name: "x"
  on: null !"#
        );
    }

    #[test]
    fn scalar_root() {
        let model = DataModel::with_value(NodeSchema::new("any", Node::Any), json!(true), 10);
        assert_eq!(tokens_to_text(&TreeRenderer.render(&model)), "true");
    }
}
