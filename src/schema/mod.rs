//! The structural description of a kind of document.  A [`Schema`] knows how to build the
//! default value of a document, the canonical key order used when exporting it, and which
//! structural problems should be shown in the error list.

pub mod builtin;

use std::fmt::{Display, Formatter};

use serde_json::{Map, Value};

use crate::core::Path;

/// The shape of a kind of document that packsmith can edit
pub trait Schema: std::fmt::Debug {
    /// A short identifier for this schema, used in log messages
    fn name(&self) -> &str;

    /// Build the value that a freshly reset document of this kind contains
    fn default_value(&self) -> Value;

    /// Return a copy of `value` where every object's keys appear in the order that the schema
    /// declares them.  Keys unknown to the schema keep their relative order and come last.
    fn canonicalize(&self, value: &Value) -> Value;

    /// Find the structural problems in `value`
    fn validate(&self, value: &Value) -> Vec<Problem>;
}

/// A single structural problem found by [`Schema::validate`]
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Problem {
    /// Where in the document the problem is
    pub path: Path,
    /// A human readable summary of the problem
    pub message: String,
}

impl Display for Problem {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The shape of one value inside a document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Anything goes; nothing below this node is checked or reordered
    Any,
    /// `true` or `false`
    Bool,
    /// Any JSON number
    Number,
    /// Any JSON string
    Str,
    /// An array whose items all have the given shape
    List(Box<Node>),
    /// An object with arbitrary keys whose values all have the given shape
    Map(Box<Node>),
    /// An object with a fixed, ordered set of fields
    Record(Record),
}

impl Node {
    /// Shorthand for [`Node::List`]
    pub fn list(item: Node) -> Node {
        Node::List(Box::new(item))
    }

    /// Shorthand for [`Node::Map`]
    pub fn map(item: Node) -> Node {
        Node::Map(Box::new(item))
    }

    /// Shorthand for [`Node::Record`]
    pub fn record(fields: Vec<Field>) -> Node {
        Node::Record(Record { fields })
    }

    /// The value that an empty node of this shape contains
    pub fn default_value(&self) -> Value {
        match self {
            Node::Any => Value::Object(Map::new()),
            Node::Bool => Value::Bool(false),
            Node::Number => Value::from(0),
            Node::Str => Value::String(String::new()),
            Node::List(_) => Value::Array(vec![]),
            Node::Map(_) => Value::Object(Map::new()),
            Node::Record(record) => record.default_value(),
        }
    }

    fn canonicalize(&self, value: &Value) -> Value {
        match (self, value) {
            (Node::List(item), Value::Array(items)) => {
                Value::Array(items.iter().map(|v| item.canonicalize(v)).collect())
            }
            (Node::Map(item), Value::Object(map)) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), item.canonicalize(v)))
                    .collect(),
            ),
            (Node::Record(record), Value::Object(map)) => record.canonicalize(map),
            _ => value.clone(),
        }
    }

    fn validate(&self, value: &Value, path: &Path, problems: &mut Vec<Problem>) {
        match (self, value) {
            (Node::Any, _) | (Node::Bool, Value::Bool(_)) => {}
            (Node::Number, Value::Number(_)) | (Node::Str, Value::String(_)) => {}
            (Node::List(item), Value::Array(items)) => {
                for (i, v) in items.iter().enumerate() {
                    item.validate(v, &path.join(i.to_string()), problems);
                }
            }
            (Node::Map(item), Value::Object(map)) => {
                for (k, v) in map {
                    item.validate(v, &path.join(k.as_str()), problems);
                }
            }
            (Node::Record(record), Value::Object(map)) => record.validate(map, path, problems),
            (_, found) => problems.push(Problem {
                path: path.clone(),
                message: format!("expected {}, found {}", self.noun(), noun_of(found)),
            }),
        }
    }

    fn noun(&self) -> &'static str {
        match self {
            Node::Any => "anything",
            Node::Bool => "a boolean",
            Node::Number => "a number",
            Node::Str => "a string",
            Node::List(_) => "a list",
            Node::Map(_) | Node::Record(_) => "an object",
        }
    }
}

fn noun_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// One named field of a [`Record`]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    node: Node,
    required: bool,
    default: Option<Value>,
}

impl Field {
    /// A field which must always be present
    pub fn required(name: &str, node: Node) -> Self {
        Field {
            name: name.to_owned(),
            node,
            required: true,
            default: None,
        }
    }

    /// A field which may be left out
    pub fn optional(name: &str, node: Node) -> Self {
        Field {
            required: false,
            ..Field::required(name, node)
        }
    }

    /// Sets the value this field takes in a default document.  Optional fields with a default
    /// are included in the default document.
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// An object with a fixed, ordered set of fields
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<Field>,
}

impl Record {
    fn default_value(&self) -> Value {
        let mut map = Map::new();
        for f in &self.fields {
            match &f.default {
                Some(v) => {
                    map.insert(f.name.clone(), v.clone());
                }
                None if f.required => {
                    map.insert(f.name.clone(), f.node.default_value());
                }
                None => {}
            }
        }
        Value::Object(map)
    }

    fn canonicalize(&self, map: &Map<String, Value>) -> Value {
        let mut out = Map::new();
        for f in &self.fields {
            if let Some(v) = map.get(&f.name) {
                out.insert(f.name.clone(), f.node.canonicalize(v));
            }
        }
        for (k, v) in map {
            if !out.contains_key(k) {
                out.insert(k.clone(), v.clone());
            }
        }
        Value::Object(out)
    }

    fn validate(&self, map: &Map<String, Value>, path: &Path, problems: &mut Vec<Problem>) {
        for f in &self.fields {
            match map.get(&f.name) {
                Some(v) => f.node.validate(v, &path.join(f.name.as_str()), problems),
                None if f.required => problems.push(Problem {
                    path: path.clone(),
                    message: format!("missing required field '{}'", f.name),
                }),
                None => {}
            }
        }
        for k in map.keys() {
            if !self.fields.iter().any(|f| &f.name == k) {
                problems.push(Problem {
                    path: path.join(k.as_str()),
                    message: format!("unknown field '{}'", k),
                });
            }
        }
    }
}

/// A [`Schema`] described by a tree of [`Node`]s
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSchema {
    name: String,
    root: Node,
    default: Option<Value>,
}

impl NodeSchema {
    /// Creates a schema whose documents have the shape of `root`
    pub fn new(name: &str, root: Node) -> Self {
        NodeSchema {
            name: name.to_owned(),
            root,
            default: None,
        }
    }

    /// Overrides the default document, which otherwise is derived from the root node
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

impl Schema for NodeSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_value(&self) -> Value {
        self.default
            .clone()
            .unwrap_or_else(|| self.root.default_value())
    }

    fn canonicalize(&self, value: &Value) -> Value {
        self.root.canonicalize(value)
    }

    fn validate(&self, value: &Value) -> Vec<Problem> {
        let mut problems = Vec::new();
        self.root.validate(value, &Path::root(), &mut problems);
        problems
    }
}
