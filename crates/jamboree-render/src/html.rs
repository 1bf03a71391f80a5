//! HTML document rendering
//!
//! Serializes a filtered cell sequence into a single self-contained HTML
//! document. The emitted `@page` block is the single source of truth for
//! physical page sizing; rasterization backends must not re-specify
//! conflicting dimensions. The document never references the network: the
//! interactive-chart runtime is inlined from a local bundle when one is
//! found, and charts fall back to their static image or text
//! representation when it is not.

use std::fmt::Write as _;
use std::path::PathBuf;

use jamboree_notebook::{Cell, CellKind, MimeBundle, Output};
use pulldown_cmark::{html as md_html, Options, Parser};

use crate::pages::PageGeometry;

/// The markup produced by the renderer for one conversion
///
/// Transient: consumed exactly once by exactly one rasterization backend,
/// then discarded (or persisted verbatim under the debug flag).
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Self-contained HTML markup
    pub html: String,
    /// The geometry the document's page box declares
    pub geometry: PageGeometry,
}

/// Environment variable naming a local Plotly bundle to inline
pub const VIZ_BUNDLE_ENV: &str = "JAMBOREE_PLOTLY_JS";

/// Local paths searched for the chart runtime when the env var is unset
const VIZ_BUNDLE_PATHS: &[&str] = &[
    "plotly.min.js",
    "assets/plotly.min.js",
    "vendor/plotly.min.js",
];

/// Locate a local chart-runtime bundle, if any
///
/// Never reaches for the network; a missing bundle simply downgrades rich
/// chart payloads to their static representations.
pub fn find_viz_bundle() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(VIZ_BUNDLE_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        log::warn!("{VIZ_BUNDLE_ENV} points to missing file {}", path.display());
    }
    VIZ_BUNDLE_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

/// Render cells into a self-contained HTML document
///
/// Looks up the chart runtime bundle from the local search paths; see
/// [`render_with_bundle`] for the injectable variant.
pub fn render(cells: &[Cell], geometry: &PageGeometry) -> RenderedDocument {
    let bundle = find_viz_bundle().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(js) => {
            log::debug!("Inlining chart runtime from {}", path.display());
            Some(js)
        }
        Err(e) => {
            log::warn!("Failed to read chart runtime {}: {e}", path.display());
            None
        }
    });
    render_with_bundle(cells, geometry, bundle.as_deref())
}

/// Render cells with an explicit (or absent) chart runtime bundle
pub fn render_with_bundle(
    cells: &[Cell],
    geometry: &PageGeometry,
    viz_bundle: Option<&str>,
) -> RenderedDocument {
    let mut body = String::new();
    let mut has_charts = false;

    for (index, cell) in cells.iter().enumerate() {
        render_cell(&mut body, cell, index, viz_bundle.is_some(), &mut has_charts);
    }

    let mut html = String::with_capacity(body.len() + 4096);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<style>\n");
    let _ = write!(html, "{}", page_css(geometry));
    html.push_str(BASE_CSS);
    html.push_str("</style>\n");
    if let Some(bundle) = viz_bundle {
        if has_charts {
            html.push_str("<script>");
            html.push_str(bundle);
            html.push_str("</script>\n");
        }
    }
    html.push_str("</head>\n<body>\n<main class=\"notebook\">\n");
    html.push_str(&body);
    html.push_str("</main>\n");
    html.push_str(SETTLE_BEACON);
    html.push_str("</body>\n</html>\n");

    RenderedDocument {
        html,
        geometry: *geometry,
    }
}

/// The page-box style block: the single source of truth for physical sizing
fn page_css(geometry: &PageGeometry) -> String {
    format!(
        "@page {{\n    size: {w}mm {h}mm;\n    margin: {m};\n}}\n",
        w = geometry.width_mm,
        h = geometry.height_mm,
        m = geometry.margin,
    )
}

/// Print and screen styling, carried from the original converter template
const BASE_CSS: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    font-size: 11pt;
    line-height: 1.4;
    color: #333;
    margin: 0;
}
.notebook {
    background: white;
    width: 100%;
}
.nb-cell {
    margin-bottom: 1em;
    page-break-inside: avoid;
}
.nb-prompt {
    font-family: monospace;
    font-size: 9pt;
    color: #888;
}
.nb-source {
    background: #f8f9fa;
    border-left: 4px solid #007acc;
    padding: 8pt;
    margin: 8pt 0;
    white-space: pre-wrap;
    overflow-wrap: break-word;
}
.nb-output {
    border-left: 4px solid #28a745;
    padding: 8pt;
    margin: 8pt 0;
    page-break-inside: avoid;
}
.nb-error {
    border-left: 4px solid #dc3545;
    color: #842029;
}
pre {
    white-space: pre-wrap;
    overflow-wrap: break-word;
    margin: 0;
}
table {
    border-collapse: collapse;
    width: 100%;
    margin: 8pt 0;
}
th, td {
    border: 1px solid #ddd;
    padding: 6pt;
    text-align: left;
}
th {
    background-color: #f2f2f2;
    font-weight: bold;
}
img {
    max-width: 100%;
    height: auto;
}
"#;

/// Readiness beacon: sets `window.__jamboree_settled` once embedded charts
/// finish drawing (immediately when there are none). The browser backend
/// polls this flag instead of waiting for network idleness.
const SETTLE_BEACON: &str = r#"<script>
(function () {
    var charts = document.querySelectorAll("[data-jamboree-chart]");
    if (charts.length === 0 || typeof Plotly === "undefined") {
        window.__jamboree_settled = true;
        return;
    }
    var pending = charts.length;
    function done() {
        pending -= 1;
        if (pending <= 0) { window.__jamboree_settled = true; }
    }
    Array.prototype.forEach.call(charts, function (el) {
        try {
            var spec = JSON.parse(el.querySelector("script").textContent);
            Plotly.newPlot(el, spec.data || [], spec.layout || {}, { staticPlot: true })
                .then(done, done);
        } catch (e) {
            done();
        }
    });
})();
</script>
"#;

fn render_cell(
    out: &mut String,
    cell: &Cell,
    index: usize,
    charts_enabled: bool,
    has_charts: &mut bool,
) {
    match cell.kind {
        CellKind::Markdown => {
            out.push_str("<div class=\"nb-cell nb-markdown\">\n");
            let parser = Parser::new_ext(
                &cell.source,
                Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH,
            );
            md_html::push_html(out, parser);
            out.push_str("</div>\n");
        }
        CellKind::Raw => {
            out.push_str("<div class=\"nb-cell nb-raw\"><pre>");
            out.push_str(&html_escape::encode_text(&cell.source));
            out.push_str("</pre></div>\n");
        }
        CellKind::Code => {
            out.push_str("<div class=\"nb-cell nb-code\">\n");
            // Empty source means the filter suppressed the code block
            if !cell.source.is_empty() {
                if let Some(count) = cell.execution_count {
                    let _ = writeln!(out, "<div class=\"nb-prompt\">In [{count}]:</div>");
                }
                out.push_str("<pre class=\"nb-source\"><code>");
                out.push_str(&html_escape::encode_text(&cell.source));
                out.push_str("</code></pre>\n");
            }
            for (sub, output) in cell.outputs.iter().enumerate() {
                render_output(out, output, index, sub, charts_enabled, has_charts);
            }
            out.push_str("</div>\n");
        }
    }
}

fn render_output(
    out: &mut String,
    output: &Output,
    cell_index: usize,
    sub_index: usize,
    charts_enabled: bool,
    has_charts: &mut bool,
) {
    match output {
        Output::Stream { text, .. } => {
            out.push_str("<div class=\"nb-output\"><pre>");
            out.push_str(&html_escape::encode_text(text));
            out.push_str("</pre></div>\n");
        }
        Output::Error {
            ename,
            evalue,
            traceback,
        } => {
            out.push_str("<div class=\"nb-output nb-error\"><pre>");
            let _ = write!(
                out,
                "{}: {}",
                html_escape::encode_text(ename),
                html_escape::encode_text(evalue)
            );
            for line in traceback {
                out.push('\n');
                out.push_str(&html_escape::encode_text(line));
            }
            out.push_str("</pre></div>\n");
        }
        Output::ExecuteResult {
            execution_count,
            data,
        } => {
            if let Some(count) = execution_count {
                let _ = writeln!(out, "<div class=\"nb-prompt\">Out [{count}]:</div>");
            }
            render_data(out, data, cell_index, sub_index, charts_enabled, has_charts);
        }
        Output::DisplayData { data } => {
            render_data(out, data, cell_index, sub_index, charts_enabled, has_charts);
        }
    }
}

/// Render a MIME bundle by representation precedence: interactive chart
/// (when the runtime is inlined), HTML table, image, then plain text.
fn render_data(
    out: &mut String,
    data: &MimeBundle,
    cell_index: usize,
    sub_index: usize,
    charts_enabled: bool,
    has_charts: &mut bool,
) {
    if charts_enabled {
        if let Some(spec) = data.plotly() {
            // "</" must not terminate the embedded JSON script early
            let payload = spec.to_string().replace("</", "<\\/");
            *has_charts = true;
            let _ = writeln!(
                out,
                "<div class=\"nb-output nb-chart\" data-jamboree-chart \
                 id=\"jamboree-chart-{cell_index}-{sub_index}\">\
                 <script type=\"application/json\">{payload}</script></div>"
            );
            return;
        }
    }
    if let Some(html) = data.html() {
        out.push_str("<div class=\"nb-output\">");
        out.push_str(&html);
        out.push_str("</div>\n");
    } else if let Some(png) = data.png_base64() {
        let _ = writeln!(
            out,
            "<div class=\"nb-output\"><img src=\"data:image/png;base64,{png}\" alt=\"output\"></div>"
        );
    } else if let Some(text) = data.text_plain() {
        out.push_str("<div class=\"nb-output\"><pre>");
        out.push_str(&html_escape::encode_text(&text));
        out.push_str("</pre></div>\n");
    } else if !data.is_empty() {
        log::debug!("Skipping output with unsupported MIME types");
    }
}
