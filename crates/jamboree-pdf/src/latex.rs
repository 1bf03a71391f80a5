//! Typesetting rasterization backend
//!
//! Delegates cell content to the external pandoc + LaTeX toolchain. The
//! binaries are located via environment variables so the host's install is
//! used as-is; page geometry travels as explicit paperwidth/paperheight
//! directives, which non-standard presets (case_study) require. Toolchain
//! failures carry the full diagnostic output and are not retried; the CLI
//! advises falling back to the browser method.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::process::Command;

use jamboree_notebook::{Cell, CellKind, MimeBundle, Output};
use jamboree_render::PageGeometry;

use crate::backend::{Artifact, ConversionJob, RasterizeBackend};
use crate::error::{RasterError, Result};

/// Environment variable overriding the pandoc binary location
pub const PANDOC_BIN_ENV: &str = "JAMBOREE_PANDOC_BIN";

/// Environment variable overriding the LaTeX engine pandoc drives
pub const PDF_ENGINE_ENV: &str = "JAMBOREE_PDF_ENGINE";

/// Typesetting backend (the `latex` method)
pub struct TypesettingBackend {
    pandoc: PathBuf,
    engine: String,
}

impl Default for TypesettingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TypesettingBackend {
    /// Create a backend using the toolchain from the environment
    /// (defaults: `pandoc` driving `xelatex`)
    pub fn new() -> Self {
        Self {
            pandoc: std::env::var(PANDOC_BIN_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("pandoc")),
            engine: std::env::var(PDF_ENGINE_ENV).unwrap_or_else(|_| "xelatex".to_string()),
        }
    }
}

impl RasterizeBackend for TypesettingBackend {
    fn name(&self) -> &'static str {
        "latex"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.pandoc)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn rasterize(&self, job: &ConversionJob) -> Result<Artifact> {
        let workdir = tempfile::tempdir()?;
        let input = workdir.path().join("notebook.md");
        let output = workdir.path().join("notebook.pdf");
        std::fs::write(&input, markdown_for_cells(job.cells))?;

        let args = pandoc_args(job.geometry, &self.engine);
        log::debug!("Invoking {} {:?}", self.pandoc.display(), args);

        let result = Command::new(&self.pandoc)
            .arg(&input)
            .arg("-o")
            .arg(&output)
            .args(&args)
            .output();

        let out = match result {
            Ok(out) => out,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RasterError::Unavailable(format!(
                    "pandoc not found at '{}'; install it or set {PANDOC_BIN_ENV}",
                    self.pandoc.display()
                )));
            }
            Err(e) => return Err(e.into()),
        };

        if !out.status.success() {
            return Err(RasterError::Typesetting {
                message: format!("pandoc exited with {}", out.status),
                diagnostics: String::from_utf8_lossy(&out.stderr).into_owned(),
            });
        }

        let bytes = std::fs::read(&output).map_err(|e| RasterError::Typesetting {
            message: "pandoc reported success but produced no PDF".to_string(),
            diagnostics: e.to_string(),
        })?;
        Ok(Artifact::Pdf(bytes))
    }
}

/// Geometry and engine arguments passed to pandoc
///
/// Explicit paperwidth/paperheight cover every preset, including those with
/// no named LaTeX paper size.
fn pandoc_args(geometry: &PageGeometry, engine: &str) -> Vec<String> {
    vec![
        format!("--pdf-engine={engine}"),
        "-V".to_string(),
        format!(
            "geometry:paperwidth={}mm,paperheight={}mm",
            geometry.width_mm, geometry.height_mm
        ),
        "-V".to_string(),
        format!("geometry:margin={}", geometry.margin),
    ]
}

/// Serialize cells into pandoc markdown, preserving cell and output order
fn markdown_for_cells(cells: &[Cell]) -> String {
    let mut md = String::new();
    for cell in cells {
        match cell.kind {
            CellKind::Markdown => {
                md.push_str(&cell.source);
                md.push_str("\n\n");
            }
            CellKind::Raw => {
                let _ = writeln!(md, "```\n{}\n```\n", cell.source);
            }
            CellKind::Code => {
                if !cell.source.is_empty() {
                    if let Some(count) = cell.execution_count {
                        let _ = writeln!(md, "`In [{count}]:`\n");
                    }
                    let _ = writeln!(md, "```python\n{}\n```\n", cell.source);
                }
                for output in &cell.outputs {
                    push_output_markdown(&mut md, output);
                }
            }
        }
    }
    md
}

fn push_output_markdown(md: &mut String, output: &Output) {
    match output {
        Output::Stream { text, .. } => {
            let _ = writeln!(md, "```\n{}\n```\n", text.trim_end());
        }
        Output::Error {
            ename,
            evalue,
            traceback,
        } => {
            let _ = writeln!(md, "```\n{ename}: {evalue}");
            for line in traceback {
                let _ = writeln!(md, "{line}");
            }
            md.push_str("```\n\n");
        }
        Output::ExecuteResult {
            execution_count,
            data,
        } => {
            if let Some(count) = execution_count {
                let _ = writeln!(md, "`Out [{count}]:`\n");
            }
            push_data_markdown(md, data);
        }
        Output::DisplayData { data } => push_data_markdown(md, data),
    }
}

fn push_data_markdown(md: &mut String, data: &MimeBundle) {
    if let Some(html) = data.html() {
        // pandoc's markdown reader handles raw HTML blocks (tables)
        md.push_str(&html);
        md.push_str("\n\n");
    } else if let Some(png) = data.png_base64() {
        let _ = writeln!(md, "![](data:image/png;base64,{png})\n");
    } else if let Some(text) = data.text_plain() {
        let _ = writeln!(md, "```\n{}\n```\n", text.trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jamboree_render::{Margin, Orientation, PageSize};
    use std::collections::BTreeMap;

    fn geometry(size: PageSize) -> PageGeometry {
        PageGeometry::resolve(size, Orientation::Portrait, Margin::mm(20.0)).unwrap()
    }

    #[test]
    fn test_pandoc_args_carry_custom_paper_size() {
        let args = pandoc_args(&geometry(PageSize::CaseStudy), "xelatex");
        assert!(args.contains(&"--pdf-engine=xelatex".to_string()));
        assert!(args.contains(&"geometry:paperwidth=420mm,paperheight=1189mm".to_string()));
        assert!(args.contains(&"geometry:margin=20mm".to_string()));
    }

    #[test]
    fn test_pandoc_args_margin_unit_preserved() {
        let geom =
            PageGeometry::resolve(PageSize::A4, Orientation::Portrait, "1in".parse().unwrap())
                .unwrap();
        let args = pandoc_args(&geom, "xelatex");
        assert!(args.contains(&"geometry:margin=1in".to_string()));
    }

    #[test]
    fn test_markdown_cell_order_and_fencing() {
        let cells = vec![
            Cell::new(CellKind::Markdown, "# Title"),
            Cell::new(CellKind::Code, "print(1)")
                .with_execution_count(1)
                .with_output(Output::Stream {
                    name: None,
                    text: "1\n".to_string(),
                }),
        ];
        let md = markdown_for_cells(&cells);
        let title = md.find("# Title").unwrap();
        let code = md.find("```python\nprint(1)\n```").unwrap();
        let out = md.find("```\n1\n```").unwrap();
        assert!(title < code && code < out);
        assert!(md.contains("`In [1]:`"));
    }

    #[test]
    fn test_markdown_suppressed_source_skipped() {
        let cells = vec![Cell::new(CellKind::Code, "").with_output(Output::Stream {
            name: None,
            text: "only output".to_string(),
        })];
        let md = markdown_for_cells(&cells);
        assert!(!md.contains("```python"));
        assert!(md.contains("only output"));
    }

    #[test]
    fn test_markdown_table_and_image_outputs() {
        let cells = vec![Cell::new(CellKind::Code, "df").with_output(Output::ExecuteResult {
            execution_count: Some(2),
            data: MimeBundle(BTreeMap::from([
                (
                    "text/html".to_string(),
                    serde_json::json!("<table><tr><td>1</td></tr></table>"),
                ),
                ("image/png".to_string(), serde_json::json!("AAAA")),
            ])),
        })];
        let md = markdown_for_cells(&cells);
        // HTML representation wins over the image fallback
        assert!(md.contains("<table><tr><td>1</td></tr></table>"));
        assert!(!md.contains("base64,AAAA"));
        assert!(md.contains("`Out [2]:`"));
    }

    // Requires pandoc + a LaTeX engine on the host
    #[test]
    #[ignore]
    fn test_rasterize_end_to_end() {
        use jamboree_render::render_with_bundle;

        let backend = TypesettingBackend::new();
        if !backend.is_available() {
            eprintln!("Typesetting test skipped (pandoc not available)");
            return;
        }

        let cells = vec![Cell::new(CellKind::Markdown, "# Hello")];
        let geom = geometry(PageSize::A4);
        let document = render_with_bundle(&cells, &geom, None);
        let job = ConversionJob {
            cells: &cells,
            document: &document,
            geometry: &geom,
            source: std::path::Path::new("hello.ipynb"),
        };

        let artifact = backend.rasterize(&job).unwrap();
        assert!(artifact.pdf_bytes().unwrap().starts_with(b"%PDF"));
    }
}
