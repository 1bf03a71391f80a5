//! CLI application logic
//!
//! Parses arguments, resolves configuration (failing fast before any
//! conversion work), and drives the pipeline: load notebook, filter cells,
//! render the document, rasterize through the selected backend(s), write
//! the artifact. Under `both`, each backend invocation is independent and
//! each outcome is reported; the run fails only if every backend failed.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

use jamboree_notebook::Notebook;
use jamboree_pdf::{
    output_name, Artifact, BrowserBackend, ConversionJob, MercuryBackend, RasterizeBackend,
    TypesettingBackend,
};
use jamboree_render::{debug, filter, render, Margin, Orientation, PageGeometry, PageSize};

/// Conversion method (backend selection)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Method {
    /// Headless-browser print (most reliable page sizing)
    #[default]
    #[value(alias = "playwright", alias = "pdf")]
    Webpdf,
    /// External pandoc + LaTeX toolchain
    Latex,
    /// Delegate to a running Mercury dashboard server
    Mercury,
    /// Write the rendered HTML document itself
    Html,
    /// Run the browser and typesetting backends independently
    Both,
}

#[derive(Parser)]
#[command(name = "jamboree")]
#[command(author, version)]
#[command(about = "Convert notebooks to fixed-size paginated PDFs", long_about = None)]
pub struct Cli {
    /// Input notebook file (.ipynb)
    pub notebook: Option<PathBuf>,

    /// Page size preset (a0-a5, letter, legal, tabloid, ledger, case_study)
    #[arg(short, long, default_value = "a4")]
    pub size: String,

    /// Page orientation (portrait or landscape)
    #[arg(long, default_value = "portrait")]
    pub orientation: String,

    /// Uniform page margins, e.g. 20mm, 2cm, 1in
    #[arg(long, default_value = "20mm")]
    pub margins: String,

    /// Output filename (without extension)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Exclude code cells' source (their outputs are kept)
    #[arg(long = "no-code", alias = "no-input")]
    pub no_code: bool,

    /// Exclude In[n]/Out[n] execution prompts
    #[arg(long = "no-prompts", alias = "no-prompt")]
    pub no_prompts: bool,

    /// Conversion method
    #[arg(long, visible_alias = "format", value_enum, default_value = "webpdf")]
    pub method: Method,

    /// List available page sizes and exit
    #[arg(long)]
    pub list_sizes: bool,
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

/// Execute a parsed invocation
pub fn run(cli: Cli) -> Result<()> {
    if cli.list_sizes {
        list_sizes();
        return Ok(());
    }

    let Some(ref notebook_path) = cli.notebook else {
        bail!("notebook argument is required (unless using --list-sizes)");
    };

    // Resolve all configuration up front; bad flags must surface before
    // any expensive work starts.
    let size: PageSize = cli.size.parse()?;
    let orientation: Orientation = cli.orientation.parse()?;
    let margin: Margin = cli.margins.parse()?;
    let geometry = PageGeometry::resolve(size, orientation, margin)?;

    log::debug!(
        "resolved geometry: {}x{}mm margin {}",
        geometry.width_mm,
        geometry.height_mm,
        geometry.margin
    );

    let notebook = Notebook::from_path(notebook_path)
        .with_context(|| format!("Failed to load notebook: {}", notebook_path.display()))?;

    println!("Converting: {}", notebook_path.display());
    println!(
        "  Page: {size} {orientation} ({}x{}mm, margin {margin})",
        geometry.width_mm, geometry.height_mm
    );

    let cells = filter(&notebook.cells, !cli.no_code, !cli.no_prompts);
    println!("  Cells: {} of {}", cells.len(), notebook.cell_count());

    let document = render(&cells, &geometry);
    let job = ConversionJob {
        cells: &cells,
        document: &document,
        geometry: &geometry,
        source: notebook_path,
    };

    let methods: &[Method] = match cli.method {
        Method::Both => &[Method::Webpdf, Method::Latex],
        ref single => std::slice::from_ref(single),
    };

    // Retain the intermediate document once per run, next to the first
    // method's output, when the debug flag is set
    let first_name = resolved_name(methods[0], &job, size, orientation, cli.output.as_deref());
    if let Some(path) = debug::retain_if_enabled(&document, Path::new(&first_name))? {
        println!("  Debug HTML: {}", path.display());
    }

    let mut failures = Vec::new();
    for method in methods {
        match run_method(*method, &job, size, orientation, cli.output.as_deref()) {
            Ok(()) => {}
            Err(e) => {
                eprintln!("Error ({}): {e:#}", method_name(*method));
                if let Some(advice) = fallback_advice(*method) {
                    eprintln!("  {advice}");
                }
                failures.push(*method);
            }
        }
    }

    if failures.len() == methods.len() {
        bail!("conversion failed for every selected backend");
    }
    Ok(())
}

fn method_name(method: Method) -> &'static str {
    match method {
        Method::Webpdf => "webpdf",
        Method::Latex => "latex",
        Method::Mercury => "mercury",
        Method::Html => "html",
        Method::Both => "both",
    }
}

fn fallback_advice(method: Method) -> Option<&'static str> {
    match method {
        Method::Webpdf => Some("Hint: try the typesetting backend with --method latex"),
        Method::Latex => Some("Hint: try the browser backend with --method webpdf"),
        _ => None,
    }
}

fn resolved_name(
    method: Method,
    job: &ConversionJob,
    size: PageSize,
    orientation: Orientation,
    name_override: Option<&str>,
) -> String {
    let (backend, ext) = match method {
        Method::Html => ("html", "html"),
        other => (method_name(other), "pdf"),
    };
    output_name(job.source, backend, size, orientation, name_override, ext)
}

fn run_method(
    method: Method,
    job: &ConversionJob,
    size: PageSize,
    orientation: Orientation,
    name_override: Option<&str>,
) -> Result<()> {
    let filename = resolved_name(method, job, size, orientation, name_override);

    if method == Method::Html {
        fs::write(&filename, &job.document.html)
            .with_context(|| format!("Failed to write {filename}"))?;
        println!("  Created: {filename}");
        return Ok(());
    }

    let backend: Box<dyn RasterizeBackend> = match method {
        Method::Webpdf => Box::new(BrowserBackend::new()),
        Method::Latex => Box::new(TypesettingBackend::new()),
        Method::Mercury => Box::new(MercuryBackend::new()),
        Method::Html | Method::Both => unreachable!("handled by caller"),
    };

    match backend.rasterize(job)? {
        Artifact::Pdf(bytes) => {
            // Written in one shot only after full production; a failed
            // conversion never leaves a partial PDF behind
            fs::write(&filename, &bytes)
                .with_context(|| format!("Failed to write {filename}"))?;
            let mb = bytes.len() as f64 / (1024.0 * 1024.0);
            println!("  Created: {filename} ({mb:.1} MB)");
        }
        Artifact::Dashboard { url } => {
            println!("  Dashboard serving at: {url}");
        }
    }
    Ok(())
}

/// Print the page size registry
fn list_sizes() {
    println!("Available page sizes:");
    for size in PageSize::all() {
        let (w, h) = size.dimensions_mm();
        println!("  {:<12} {:>4} x {:>4} mm", size.name(), w, h);
    }
    println!();
    println!("Orientations: portrait, landscape");
    println!("Methods: webpdf (default), latex, mercury, html, both");
}
