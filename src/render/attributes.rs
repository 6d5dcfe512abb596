//! Field-name driven formatting of product attributes.
//!
//! A single table maps normalized (ASCII lower-cased) field names to a
//! [`KeyRule`]. The structural tree consults it for its always-expand
//! decision and the product grid for the attribute shape.

use serde_json::{Map, Value};

/// Product fields shown in the card header rather than as attributes.
pub const KNOWN_PRODUCT_FIELDS: &[&str] =
    &["Name", "SKU", "ProductID", "Description", "Price", "Available"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeShape {
    /// Sequence of flat records.
    NodeList,
    /// Sequence of records with an optional nested `Attributes` sequence.
    AttributeCategoryList,
    /// Flat mapping of scalar/array values.
    BookAttributes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRule {
    pub expand_all: bool,
    pub shape: AttributeShape,
}

const KEY_RULES: &[(&str, KeyRule)] = &[
    (
        "productnodes",
        KeyRule {
            expand_all: true,
            shape: AttributeShape::NodeList,
        },
    ),
    (
        "attributenodes",
        KeyRule {
            expand_all: true,
            shape: AttributeShape::NodeList,
        },
    ),
    (
        "attributecategories",
        KeyRule {
            expand_all: true,
            shape: AttributeShape::AttributeCategoryList,
        },
    ),
    (
        "bookattributes",
        KeyRule {
            expand_all: true,
            shape: AttributeShape::BookAttributes,
        },
    ),
];

pub fn rule_for_key(key: &str) -> Option<KeyRule> {
    let normalized = key.to_ascii_lowercase();
    KEY_RULES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, rule)| *rule)
}

pub fn is_always_expanded(key: &str) -> bool {
    rule_for_key(key).is_some_and(|rule| rule.expand_all)
}

pub fn is_known_product_field(key: &str) -> bool {
    KNOWN_PRODUCT_FIELDS.contains(&key)
}

/// One visual line of a formatted attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayLine {
    pub indent: u8,
    pub emphasis: bool,
    pub text: String,
}

impl DisplayLine {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            indent: 0,
            emphasis: false,
            text: text.into(),
        }
    }

    fn indented(indent: u8, text: impl Into<String>) -> Self {
        Self {
            indent,
            emphasis: false,
            text: text.into(),
        }
    }

    fn bold(text: impl Into<String>) -> Self {
        Self {
            indent: 0,
            emphasis: true,
            text: text.into(),
        }
    }
}

pub fn format_attribute(key: &str, value: &Value) -> Vec<DisplayLine> {
    let shape = rule_for_key(key).map(|rule| rule.shape);
    match (shape, value) {
        (Some(AttributeShape::NodeList), Value::Array(nodes)) => format_node_list(nodes),
        (Some(AttributeShape::AttributeCategoryList), Value::Array(categories)) => {
            format_attribute_categories(categories)
        }
        (Some(AttributeShape::BookAttributes), Value::Object(attributes)) => {
            format_book_attributes(attributes)
        }
        (Some(AttributeShape::BookAttributes), Value::Array(items)) if items.is_empty() => {
            vec![DisplayLine::plain("no book attributes")]
        }
        _ => vec![DisplayLine::plain(scalar_text(value))],
    }
}

fn format_node_list(nodes: &[Value]) -> Vec<DisplayLine> {
    if nodes.is_empty() {
        return vec![DisplayLine::plain("no nodes")];
    }

    nodes
        .iter()
        .map(|node| match node {
            Value::Object(fields) => {
                DisplayLine::plain(join_scalar_fields(fields, " | "))
            }
            Value::String(text) => DisplayLine::plain(text.clone()),
            other => DisplayLine::plain(compact_json(other)),
        })
        .collect()
}

fn format_attribute_categories(categories: &[Value]) -> Vec<DisplayLine> {
    if categories.is_empty() {
        return vec![DisplayLine::plain("no categories")];
    }

    let mut lines = Vec::new();
    for category in categories {
        let Value::Object(fields) = category else {
            lines.push(DisplayLine::plain(scalar_text(category)));
            continue;
        };

        for (key, value) in fields {
            match (key.as_str(), value) {
                ("Name", name) => lines.push(DisplayLine::bold(scalar_text(name))),
                ("Attributes", Value::Array(attributes)) => {
                    lines.push(DisplayLine::indented(1, "Attributes:"));
                    for attribute in attributes {
                        let text = match attribute {
                            Value::Object(attr_fields) => join_scalar_fields(attr_fields, ", "),
                            other => scalar_text(other),
                        };
                        lines.push(DisplayLine::indented(2, text));
                    }
                }
                (_, Value::Array(_)) => {}
                (key, value) => {
                    lines.push(DisplayLine::indented(1, format!("{key}: {}", scalar_text(value))));
                }
            }
        }
    }
    lines
}

fn format_book_attributes(attributes: &Map<String, Value>) -> Vec<DisplayLine> {
    if attributes.is_empty() {
        return vec![DisplayLine::plain("no book attributes")];
    }

    attributes
        .iter()
        .map(|(key, value)| DisplayLine::plain(format!("{key}: {}", scalar_text(value))))
        .collect()
}

/// `key: value` pairs for every non-array field of a record.
fn join_scalar_fields(fields: &Map<String, Value>, separator: &str) -> String {
    fields
        .iter()
        .filter(|(_, value)| !value.is_array())
        .map(|(key, value)| format!("{key}: {}", scalar_text(value)))
        .collect::<Vec<_>>()
        .join(separator)
}

/// Display text for a generic attribute value.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => "N/A".to_owned(),
        Value::Bool(true) => "Yes".to_owned(),
        Value::Bool(false) => "No".to_owned(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(_) | Value::Object(_) => compact_json(value),
    }
}

pub fn compact_json(value: &Value) -> String {
    // Serializing a `Value` cannot fail: keys are always strings.
    serde_json::to_string(value).unwrap_or_default()
}
