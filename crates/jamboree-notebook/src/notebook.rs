//! Notebook document loading

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cell::Cell;

/// Result type for notebook loading
pub type Result<T> = std::result::Result<T, NotebookError>;

/// Errors that can occur while loading a notebook
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The notebook file could not be read
    #[error("Failed to read notebook: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid nbformat JSON
    #[error("Failed to parse notebook JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A loaded notebook document
///
/// Only the cell sequence matters to the conversion pipeline; kernel and
/// language metadata are carried opaquely so a notebook can be forwarded
/// verbatim (e.g. to a dashboard server).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    /// Ordered cells of the document
    #[serde(default)]
    pub cells: Vec<Cell>,

    /// Notebook-level metadata, kept as raw JSON
    #[serde(default)]
    pub metadata: serde_json::Value,

    /// Major nbformat version
    #[serde(default = "default_nbformat")]
    pub nbformat: u32,
}

fn default_nbformat() -> u32 {
    4
}

impl Notebook {
    /// Parse a notebook from nbformat JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a notebook from an `.ipynb` file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Number of cells in the document
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}
