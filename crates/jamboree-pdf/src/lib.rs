//! jamboree-pdf - Rasterization backends for rendered notebooks
//!
//! This crate turns rendered notebook content into conversion artifacts
//! through pluggable backends sharing one capability:
//!
//! - **Browser** (`webpdf`) - loads the rendered HTML in a headless Chrome
//!   session and prints it to PDF, bounded by a readiness deadline
//! - **Typesetting** (`latex`) - delegates cells to the external
//!   pandoc + LaTeX toolchain
//! - **Dashboard** (`mercury`) - hands the notebook to a live Mercury
//!   server (no PDF on this path)
//!
//! # Example
//!
//! ```ignore
//! use jamboree_pdf::{BrowserBackend, ConversionJob, RasterizeBackend};
//!
//! let backend = BrowserBackend::new();
//! let artifact = backend.rasterize(&job)?;
//! let pdf_bytes = artifact.pdf_bytes().expect("browser backend yields PDF");
//! ```

mod backend;
mod browser;
mod error;
mod latex;
mod mercury;
mod naming;

pub use backend::{Artifact, ConversionJob, RasterizeBackend};
pub use browser::{BrowserBackend, DEFAULT_RENDER_TIMEOUT, RENDER_TIMEOUT_ENV};
pub use error::{RasterError, Result};
pub use latex::{TypesettingBackend, PANDOC_BIN_ENV, PDF_ENGINE_ENV};
pub use mercury::{MercuryBackend, DEFAULT_MERCURY_URL, MERCURY_URL_ENV};
pub use naming::output_name;
