use std::collections::BTreeMap;

use serde_json::{Map, Value};

use super::attributes::{DisplayLine, format_attribute, is_known_product_field};
use super::escape_html;

pub const CATEGORIES_KEY: &str = "Categories";
pub const PRODUCT_LIST_KEY: &str = "ProductList";
pub const UNNAMED_CATEGORY: &str = "Uncategorized";
pub const CATEGORY_PATH_SEPARATOR: &str = " > ";

#[derive(Debug, Clone, PartialEq)]
pub struct ProductGroup<'a> {
    pub key: String,
    pub products: Vec<&'a Value>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductGrouping<'a> {
    /// Sorted by `key`, ordinal string comparison.
    pub groups: Vec<ProductGroup<'a>>,
    /// Sum of every non-empty product list, counted once per list.
    pub total_products: usize,
}

impl ProductGrouping<'_> {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

pub fn group_products_by_category(document: &Value) -> ProductGrouping<'_> {
    let mut by_key: BTreeMap<String, Vec<&Value>> = BTreeMap::new();
    let mut total_products = 0;

    if let Some(categories) = document.get(CATEGORIES_KEY).and_then(Value::as_array) {
        for category in categories {
            collect_category(category, None, &mut by_key, &mut total_products);
        }
    }

    ProductGrouping {
        groups: by_key
            .into_iter()
            .map(|(key, products)| ProductGroup { key, products })
            .collect(),
        total_products,
    }
}

fn collect_category<'a>(
    category: &'a Value,
    parent_key: Option<&str>,
    by_key: &mut BTreeMap<String, Vec<&'a Value>>,
    total_products: &mut usize,
) {
    let name = category
        .get("Name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNNAMED_CATEGORY);
    let key = match parent_key {
        Some(parent) => format!("{parent}{CATEGORY_PATH_SEPARATOR}{name}"),
        None => name.to_owned(),
    };

    if let Some(products) = category.get(PRODUCT_LIST_KEY).and_then(Value::as_array)
        && !products.is_empty()
    {
        *total_products += products.len();
        by_key.entry(key.clone()).or_default().extend(products.iter());
    }

    if let Some(children) = category.get(CATEGORIES_KEY).and_then(Value::as_array) {
        for child in children {
            collect_category(child, Some(&key), by_key, total_products);
        }
    }
}

pub fn render_product_grid(grouping: &ProductGrouping<'_>) -> String {
    if grouping.is_empty() {
        return "<p class=\"no-products\">No products found.</p>\n".to_owned();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "<p class=\"product-summary\">{} products in {} groups</p>\n",
        grouping.total_products,
        grouping.groups.len()
    ));
    for group in &grouping.groups {
        out.push_str("<section class=\"product-group\">\n");
        out.push_str(&format!(
            "<h3 class=\"group-title\">{} <span class=\"group-count\">({} products)</span></h3>\n",
            escape_html(&group.key),
            group.products.len()
        ));
        out.push_str("<div class=\"product-grid\">\n");
        for product in &group.products {
            render_product_card(&mut out, product);
        }
        out.push_str("</div>\n</section>\n");
    }
    out
}

fn render_product_card(out: &mut String, product: &Value) {
    out.push_str("<div class=\"product-card\">\n");

    let Value::Object(fields) = product else {
        out.push_str(&format!(
            "<pre class=\"product-raw\">{}</pre>\n</div>\n",
            escape_html(&super::attributes::compact_json(product))
        ));
        return;
    };

    let name = fields
        .get("Name")
        .and_then(Value::as_str)
        .unwrap_or("Unnamed product");
    out.push_str(&format!(
        "<h4 class=\"product-name\">{}</h4>\n",
        escape_html(name)
    ));

    if let Some(sku) = product_identifier(fields) {
        out.push_str(&format!(
            "<div class=\"product-sku\">SKU: {}</div>\n",
            escape_html(&sku)
        ));
    }
    if let Some(description) = fields.get("Description").and_then(Value::as_str)
        && !description.trim().is_empty()
    {
        out.push_str(&format!(
            "<p class=\"product-description\">{}</p>\n",
            escape_html(description)
        ));
    }
    if let Some(price) = fields.get("Price").and_then(format_price) {
        out.push_str(&format!(
            "<div class=\"product-price\">{}</div>\n",
            escape_html(&price)
        ));
    }
    if let Some(available) = fields.get("Available").and_then(Value::as_bool) {
        let (class, label) = if available {
            ("available", "Available")
        } else {
            ("unavailable", "Unavailable")
        };
        out.push_str(&format!(
            "<div class=\"product-availability {class}\">{label}</div>\n"
        ));
    }

    let attributes = fields
        .iter()
        .filter(|(key, _)| !is_known_product_field(key))
        .collect::<Vec<_>>();
    if !attributes.is_empty() {
        out.push_str(&format!(
            "<details class=\"product-attributes\"><summary>Attributes ({})</summary>\n<dl>\n",
            attributes.len()
        ));
        for (key, value) in attributes {
            out.push_str(&format!("<dt>{}</dt>\n<dd>\n", escape_html(key)));
            for line in format_attribute(key, value) {
                render_display_line(out, &line);
            }
            out.push_str("</dd>\n");
        }
        out.push_str("</dl>\n</details>\n");
    }

    out.push_str("</div>\n");
}

fn render_display_line(out: &mut String, line: &DisplayLine) {
    let text = escape_html(&line.text);
    let text = if line.emphasis {
        format!("<strong>{text}</strong>")
    } else {
        text
    };
    out.push_str(&format!(
        "<div class=\"attr-line attr-indent-{}\">{text}</div>\n",
        line.indent
    ));
}

fn product_identifier(fields: &Map<String, Value>) -> Option<String> {
    ["SKU", "ProductID"]
        .iter()
        .filter_map(|key| fields.get(*key))
        .find_map(|value| match value {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
}

/// Absent or malformed prices are omitted rather than reported.
fn format_price(value: &Value) -> Option<String> {
    let amount = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    amount.is_finite().then(|| format!("${amount:.2}"))
}
