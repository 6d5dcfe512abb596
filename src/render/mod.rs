//! HTML rendering of a persisted catalog document.

pub mod attributes;
pub mod page;
pub mod products;
pub mod tree;

use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::cli::RenderArgs;
use crate::error::DocumentError;
use crate::store::{DocumentStore, LoadedDocument};

pub use page::RecoveryAction;

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let store = DocumentStore::new(&args.store.document);
    let recovery = RecoveryAction::Command(format!(
        "catalogview fetch --document {}",
        args.store.document
    ));

    let (html, failure) = match store.load() {
        Ok(document) => (render_document(&document, None), None),
        Err(err) => (render_document_error(&err, &recovery), Some(err)),
    };

    match args.out.as_deref() {
        Some(out) => {
            let out_path = PathBuf::from(out);
            std::fs::write(&out_path, &html)
                .with_context(|| format!("write html: {}", out_path.display()))?;
            tracing::info!(out = %out_path.display(), bytes = html.len(), "rendered catalog page");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(html.as_bytes()).context("write html to stdout")?;
            stdout.flush().context("flush stdout")?;
        }
    }

    if let Some(err) = failure {
        return Err(err).context("load catalog document");
    }
    Ok(())
}

/// Renders every view of `document`; groupings and stats are derived afresh.
pub fn render_document(document: &LoadedDocument, notice: Option<&str>) -> String {
    let stats = crate::stats::compute(&document.value);
    let tree_html = tree::render_tree(&document.value);
    let grouping = products::group_products_by_category(&document.value);
    let products_html = products::render_product_grid(&grouping);
    let formatted_json = serde_json::to_string_pretty(&document.value).unwrap_or_default();

    tracing::debug!(
        path = %document.path.display(),
        collections = stats.collections(),
        max_depth = stats.max_depth,
        product_groups = grouping.groups.len(),
        total_products = grouping.total_products,
        "render catalog document"
    );

    page::render_catalog_page(&page::PageParts {
        document,
        stats,
        tree_html: &tree_html,
        products_html: &products_html,
        formatted_json: &formatted_json,
        notice,
    })
}

pub fn render_document_error(err: &DocumentError, recovery: &RecoveryAction) -> String {
    let message = match err {
        DocumentError::NotFound { path } => {
            format!("Catalog file not found at: {}", path.display())
        }
        DocumentError::Parse { source, .. } => format!("Failed to parse JSON: {source}"),
        DocumentError::Io { path, source } => {
            format!("Failed to read {}: {source}", path.display())
        }
    };
    page::render_error_page("Error", &message, recovery)
}

pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn loaded(value: serde_json::Value) -> LoadedDocument {
        let raw = serde_json::to_string(&value).unwrap();
        LoadedDocument {
            path: PathBuf::from("catalog.json"),
            size_bytes: raw.len() as u64,
            raw,
            value,
            modified: None,
        }
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn document_without_categories_renders_empty_product_state() {
        let html = render_document(&loaded(json!({"Version": 1})), None);
        assert!(html.contains("No products found."));
        assert!(html.contains("JSON Structure"));
    }

    #[test]
    fn page_contains_every_view() {
        let doc = json!({
            "Categories": [{"Name": "Prints", "ProductList": [{"Name": "4x6 <Print>"}]}]
        });
        let html = render_document(&loaded(doc), Some("Catalog refreshed"));

        assert!(html.contains("id=\"structure\""));
        assert!(html.contains("id=\"products\""));
        assert!(html.contains("id=\"formatted\""));
        assert!(html.contains("id=\"raw\""));
        assert!(html.contains("Catalog refreshed"));
        assert!(html.contains("4x6 &lt;Print&gt;"));
        assert!(!html.contains("4x6 <Print>"));
    }

    #[test]
    fn not_found_error_page_offers_fetch() {
        let err = DocumentError::NotFound {
            path: PathBuf::from("missing.json"),
        };
        let html = render_document_error(
            &err,
            &RecoveryAction::Command("catalogview fetch".to_owned()),
        );
        assert!(html.contains("Catalog file not found at: missing.json"));
        assert!(html.contains("catalogview fetch"));
    }
}
