//! Debug retention of intermediate rendered documents
//!
//! The rendered HTML normally lives only for the duration of one
//! conversion. Setting `JAMBOREE_DEBUG_HTML=1` persists it next to the
//! output file for inspection. The flag is read once per run.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::html::RenderedDocument;

/// Environment variable gating debug retention
pub const DEBUG_HTML_ENV: &str = "JAMBOREE_DEBUG_HTML";

/// Whether debug retention is enabled for this process
pub fn retention_enabled() -> bool {
    std::env::var(DEBUG_HTML_ENV)
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Persist the rendered document next to the eventual output file
///
/// `output` is the resolved output filename; the document lands at
/// `<stem>.debug.html` beside it. Returns the written path.
pub fn retain(doc: &RenderedDocument, output: &Path) -> Result<PathBuf> {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "notebook".to_string());
    let path = output.with_file_name(format!("{stem}.debug.html"));
    std::fs::write(&path, &doc.html)?;
    log::info!("Retained rendered document at {}", path.display());
    Ok(path)
}

/// Persist the document only when the debug flag is set
pub fn retain_if_enabled(doc: &RenderedDocument, output: &Path) -> Result<Option<PathBuf>> {
    if retention_enabled() {
        retain(doc, output).map(Some)
    } else {
        Ok(None)
    }
}
