use crate::stats::CatalogStats;
use crate::store::LoadedDocument;

use super::escape_html;

/// Where the user goes after a render failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryAction {
    /// A link that triggers a fetch (served page).
    Link { href: String, label: String },
    /// A shell command that triggers a fetch (static page).
    Command(String),
}

pub struct PageParts<'a> {
    pub document: &'a LoadedDocument,
    pub stats: CatalogStats,
    pub tree_html: &'a str,
    pub products_html: &'a str,
    pub formatted_json: &'a str,
    /// Optional banner shown above the file info (e.g. after a pull).
    pub notice: Option<&'a str>,
}

pub fn render_catalog_page(parts: &PageParts<'_>) -> String {
    let document = parts.document;
    let file_name = document
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| document.path.display().to_string());
    let modified = document
        .modified
        .map(|m| m.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_owned());

    let mut out = String::new();
    out.push_str(&document_head("Catalog Viewer"));
    out.push_str("<body>\n<div class=\"container\">\n<h1>Catalog Viewer</h1>\n");

    if let Some(notice) = parts.notice {
        out.push_str(&format!(
            "<div class=\"notice\">{}</div>\n",
            escape_html(notice)
        ));
    }

    out.push_str(&format!(
        "<div class=\"file-info\">\n<strong>File:</strong> {}<br>\n<strong>Size:</strong> {} bytes<br>\n<strong>Last Modified:</strong> {}\n</div>\n",
        escape_html(&file_name),
        format_thousands(document.size_bytes),
        escape_html(&modified)
    ));

    out.push_str("<div class=\"stats\">\n");
    for (label, value) in [
        ("Root Keys", parts.stats.root_keys),
        ("Total Arrays", parts.stats.arrays),
        ("Total Objects", parts.stats.objects),
        ("Max Depth", parts.stats.max_depth),
    ] {
        out.push_str(&format!(
            "<div class=\"stat-box\"><h3>{label}</h3><div class=\"number\">{value}</div></div>\n"
        ));
    }
    out.push_str("</div>\n");

    out.push_str(
        r#"<div class="tabs">
<button class="tab active" data-tab="structure">Structure Overview</button>
<button class="tab" data-tab="products">Products</button>
<button class="tab" data-tab="formatted">Formatted JSON</button>
<button class="tab" data-tab="raw">Raw JSON</button>
</div>
<div id="structure" class="tab-content active">
<div class="search-box"><input type="text" id="searchInput" placeholder="Search keys..."></div>
<div class="json-structure">
<h2>JSON Structure</h2>
<div class="json-tree" id="jsonTree">
"#,
    );
    out.push_str(parts.tree_html);
    out.push_str(
        r#"</div>
</div>
</div>
<div id="products" class="tab-content">
<div class="search-box"><input type="text" id="productSearch" placeholder="Search products..."></div>
<div id="productGroups">
"#,
    );
    out.push_str(parts.products_html);
    out.push_str("</div>\n</div>\n");

    out.push_str(&format!(
        "<div id=\"formatted\" class=\"tab-content\">\n<h2>Formatted JSON</h2>\n<pre>{}</pre>\n</div>\n",
        escape_html(parts.formatted_json)
    ));
    out.push_str(&format!(
        "<div id=\"raw\" class=\"tab-content\">\n<h2>Raw JSON</h2>\n<pre>{}</pre>\n</div>\n",
        escape_html(&document.raw)
    ));

    out.push_str("</div>\n");
    out.push_str(SCRIPT);
    out.push_str("</body>\n</html>\n");
    out
}

pub fn render_error_page(heading: &str, message: &str, recovery: &RecoveryAction) -> String {
    let mut out = String::new();
    out.push_str(&document_head("Catalog Viewer - Error"));
    out.push_str("<body>\n<div class=\"container\">\n");
    out.push_str(&format!("<h1>{}</h1>\n", escape_html(heading)));
    out.push_str(&format!(
        "<p class=\"error-message\">{}</p>\n",
        escape_html(message)
    ));
    match recovery {
        RecoveryAction::Link { href, label } => out.push_str(&format!(
            "<p><a class=\"action\" href=\"{}\">{}</a></p>\n",
            escape_html(href),
            escape_html(label)
        )),
        RecoveryAction::Command(command) => out.push_str(&format!(
            "<p>Run <code>{}</code> to fetch the catalog.</p>\n",
            escape_html(command)
        )),
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn document_head(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n<title>{}</title>\n<style>\n{STYLE}</style>\n</head>\n",
        escape_html(title)
    )
}

const STYLE: &str = r#"* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: #f5f5f5; padding: 20px; line-height: 1.6; }
.container { max-width: 1400px; margin: 0 auto; background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 10px rgba(0,0,0,0.1); }
h1 { color: #333; margin-bottom: 10px; font-size: 28px; }
.notice { background: #e6f4ea; color: #1e4620; padding: 12px; border-radius: 5px; margin-bottom: 20px; }
.error-message { color: #a00; margin: 10px 0; }
.action { display: inline-block; padding: 8px 16px; background: #007bff; color: white; border-radius: 5px; text-decoration: none; }
.file-info { background: #f8f9fa; padding: 15px; border-radius: 5px; margin-bottom: 20px; font-size: 14px; color: #666; }
.file-info strong { color: #333; }
.stats { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 15px; margin-bottom: 20px; }
.stat-box { background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 20px; border-radius: 8px; text-align: center; }
.stat-box h3 { font-size: 14px; margin-bottom: 10px; opacity: 0.9; }
.stat-box .number { font-size: 32px; font-weight: bold; }
.tabs { display: flex; gap: 10px; margin-bottom: 20px; border-bottom: 2px solid #e0e0e0; }
.tab { padding: 10px 20px; background: #f8f9fa; border: none; cursor: pointer; font-size: 16px; border-radius: 5px 5px 0 0; }
.tab:hover { background: #e9ecef; }
.tab.active { background: #007bff; color: white; }
.tab-content { display: none; }
.tab-content.active { display: block; }
.json-structure { background: #f8f9fa; padding: 20px; border-radius: 5px; margin-bottom: 20px; }
.json-structure h2 { color: #007bff; margin-bottom: 15px; font-size: 20px; }
.json-tree { font-family: 'Courier New', monospace; font-size: 14px; }
.json-key { color: #d73a49; font-weight: bold; }
.json-string { color: #032f62; }
.json-number { color: #005cc5; }
.json-boolean { color: #d73a49; }
.json-null { color: #6f42c1; }
.json-bracket { color: #24292e; font-weight: bold; }
.json-meta { color: #6a737d; }
.json-empty { color: #999; font-size: 11px; }
.json-expanded { color: #28a745; font-size: 11px; }
.indent { margin-left: 20px; }
.collapsible { cursor: pointer; user-select: none; }
.collapsible:hover { background: #e9ecef; }
.collapsible::before { content: '\25BC  '; }
.collapsible.collapsed::before { content: '\25B6  '; }
.collapsed-content { display: none; }
pre { background: #f6f8fa; padding: 20px; border-radius: 5px; overflow-x: auto; font-size: 13px; line-height: 1.5; }
.search-box { margin-bottom: 20px; }
.search-box input { width: 100%; padding: 12px; border: 2px solid #e0e0e0; border-radius: 5px; font-size: 16px; }
.search-box input:focus { outline: none; border-color: #007bff; }
.highlight { background-color: yellow; font-weight: bold; }
.no-products { color: #666; font-style: italic; }
.product-summary { color: #666; margin-bottom: 15px; }
.product-group { margin-bottom: 30px; }
.group-title { color: #333; border-bottom: 1px solid #e0e0e0; margin-bottom: 10px; }
.group-count { color: #6a737d; font-weight: normal; font-size: 14px; }
.product-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 15px; }
.product-card { border: 1px solid #e0e0e0; border-radius: 8px; padding: 15px; background: #fff; }
.product-name { color: #007bff; margin-bottom: 5px; }
.product-sku { font-family: 'Courier New', monospace; font-size: 12px; color: #666; }
.product-description { font-size: 14px; margin: 8px 0; }
.product-price { font-weight: bold; color: #28a745; }
.product-availability.available { color: #28a745; }
.product-availability.unavailable { color: #d73a49; }
.product-attributes { margin-top: 10px; font-size: 13px; }
.product-attributes dt { font-weight: bold; margin-top: 6px; }
.attr-indent-1 { margin-left: 15px; }
.attr-indent-2 { margin-left: 30px; }
"#;

// Filtering works on text nodes only; product data never reaches innerHTML.
const SCRIPT: &str = r#"<script>
(function () {
  document.querySelectorAll('.tab').forEach(function (tab) {
    tab.addEventListener('click', function () {
      document.querySelectorAll('.tab-content').forEach(function (c) { c.classList.remove('active'); });
      document.querySelectorAll('.tab').forEach(function (t) { t.classList.remove('active'); });
      document.getElementById(tab.dataset.tab).classList.add('active');
      tab.classList.add('active');
    });
  });

  var tree = document.getElementById('jsonTree');
  tree.addEventListener('click', function (event) {
    var header = event.target.closest('.collapsible');
    if (!header) { return; }
    header.classList.toggle('collapsed');
    var body = header.nextElementSibling;
    if (body && body.classList.contains('indent')) {
      body.classList.toggle('collapsed-content');
      var closing = body.nextElementSibling;
      if (closing) { closing.classList.toggle('collapsed-content'); }
    }
  });

  function setHighlighted(el, text, filter) {
    while (el.firstChild) { el.removeChild(el.firstChild); }
    if (!filter) { el.appendChild(document.createTextNode(text)); return; }
    var lower = text.toLowerCase();
    var pos = 0;
    while (true) {
      var hit = lower.indexOf(filter, pos);
      if (hit < 0) { break; }
      el.appendChild(document.createTextNode(text.slice(pos, hit)));
      var mark = document.createElement('span');
      mark.className = 'highlight';
      mark.textContent = text.slice(hit, hit + filter.length);
      el.appendChild(mark);
      pos = hit + filter.length;
    }
    el.appendChild(document.createTextNode(text.slice(pos)));
  }

  document.getElementById('searchInput').addEventListener('input', function (event) {
    var filter = event.target.value.toLowerCase();
    var keys = tree.getElementsByClassName('json-key');
    for (var i = 0; i < keys.length; i++) {
      var key = keys[i];
      if (key.dataset.text === undefined) { key.dataset.text = key.textContent; }
      var text = key.dataset.text;
      var matches = text.toLowerCase().indexOf(filter) > -1;
      key.parentElement.style.display = (matches || !filter) ? '' : 'none';
      setHighlighted(key, text, matches ? filter : '');
    }
  });

  document.getElementById('productSearch').addEventListener('input', function (event) {
    var filter = event.target.value.toLowerCase();
    document.querySelectorAll('.product-group').forEach(function (group) {
      var visible = 0;
      group.querySelectorAll('.product-card').forEach(function (card) {
        var show = card.textContent.toLowerCase().indexOf(filter) > -1;
        card.style.display = show ? '' : 'none';
        if (show) { visible++; }
      });
      group.style.display = visible > 0 ? '' : 'none';
    });
  });
})();
</script>
"#;
