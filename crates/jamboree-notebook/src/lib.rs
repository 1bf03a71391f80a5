//! jamboree-notebook - Notebook cell model and loading
//!
//! This crate provides the cell types used by jamboree for representing
//! a parsed notebook, plus deserialization of nbformat `.ipynb` JSON.
//! Cells are immutable once loaded; the conversion pipeline owns them
//! for the duration of a run.

mod cell;
mod notebook;

pub use cell::{Cell, CellKind, MimeBundle, Output, PLOTLY_MIME};
pub use notebook::{Notebook, NotebookError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
