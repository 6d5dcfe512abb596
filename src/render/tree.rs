use std::borrow::Cow;

use serde_json::Value;

use super::attributes::is_always_expanded;
use super::escape_html;
use super::products::PRODUCT_LIST_KEY;

/// Items shown for a sequence that is not expanded in full.
pub const DEFAULT_ITEM_LIMIT: usize = 3;
/// Characters of a string value shown before it is cut.
pub const STRING_PREVIEW_CHARS: usize = 100;
pub const ROOT_KEY: &str = "root";

pub fn render_tree(document: &Value) -> String {
    let mut out = String::new();
    render_node(&mut out, document, ROOT_KEY, 0, "");
    out
}

pub fn render_node(out: &mut String, value: &Value, key: &str, depth: usize, parent_key: &str) {
    let key_html = format!(
        "<span class=\"json-key\">\"{}\"</span>: ",
        escape_html(key)
    );

    match value {
        Value::Object(map) if map.is_empty() => render_empty(out, &key_html, depth, "{", "}"),
        Value::Array(items) if items.is_empty() => render_empty(out, &key_html, depth, "[", "]"),
        Value::Object(map) => {
            out.push_str(&format!(
                "<div class=\"collapsible\" data-depth=\"{depth}\">{key_html}<span class=\"json-bracket\">{{</span> <span class=\"json-meta\">({} keys)</span></div>\n",
                map.len()
            ));
            out.push_str("<div class=\"indent\">\n");
            for (child_key, child) in map {
                render_node(out, child, child_key, depth + 1, key);
            }
            out.push_str("</div>\n<div><span class=\"json-bracket\">}</span></div>\n");
        }
        Value::Array(items) => {
            let expand_all = should_expand_all(key, parent_key);
            let limit = item_limit(items.len(), expand_all);

            out.push_str(&format!(
                "<div class=\"collapsible\" data-depth=\"{depth}\">{key_html}<span class=\"json-bracket\">[</span> <span class=\"json-meta\">({} items)</span>",
                items.len()
            ));
            if expand_all {
                out.push_str(" <span class=\"json-expanded\">[expanded]</span>");
            }
            out.push_str("</div>\n<div class=\"indent\">\n");

            for (index, item) in items.iter().take(limit).enumerate() {
                render_node(out, item, &format!("[{index}]"), depth + 1, key);
            }
            if items.len() > limit {
                out.push_str(&format!(
                    "<div class=\"json-meta\">... {} more items</div>\n",
                    items.len() - limit
                ));
            }

            out.push_str("</div>\n<div><span class=\"json-bracket\">]</span></div>\n");
        }
        Value::String(text) => {
            render_scalar(
                out,
                &key_html,
                depth,
                "json-string",
                &format!("\"{}\"", escape_html(&truncate_preview(text))),
            );
        }
        Value::Number(number) => {
            render_scalar(out, &key_html, depth, "json-number", &number.to_string());
        }
        Value::Bool(flag) => {
            let word = if *flag { "true" } else { "false" };
            render_scalar(out, &key_html, depth, "json-boolean", word);
        }
        Value::Null => render_scalar(out, &key_html, depth, "json-null", "null"),
    }
}

/// Sequences directly under a product list are always shown in full.
pub fn should_expand_all(key: &str, parent_key: &str) -> bool {
    is_always_expanded(key) || parent_key == PRODUCT_LIST_KEY
}

pub fn item_limit(len: usize, expand_all: bool) -> usize {
    if expand_all {
        len
    } else {
        DEFAULT_ITEM_LIMIT.min(len)
    }
}

pub fn truncate_preview(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(STRING_PREVIEW_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

fn render_empty(out: &mut String, key_html: &str, depth: usize, open: &str, close: &str) {
    out.push_str(&format!(
        "<div data-depth=\"{depth}\">{key_html}<span class=\"json-bracket\">{open}</span><span class=\"json-bracket\">{close}</span> <span class=\"json-empty\">[empty]</span></div>\n"
    ));
}

fn render_scalar(out: &mut String, key_html: &str, depth: usize, class: &str, text: &str) {
    out.push_str(&format!(
        "<div data-depth=\"{depth}\">{key_html}<span class=\"{class}\">{text}</span></div>\n"
    ));
}
