//! Rasterization backend trait
//!
//! One capability with multiple implementations selected at configuration
//! time: the browser backend prints the rendered HTML, the typesetting
//! backend delegates cells to an external LaTeX toolchain, and the
//! dashboard backend hands the notebook to a live server.

use std::path::Path;

use jamboree_notebook::Cell;
use jamboree_render::{PageGeometry, RenderedDocument};

use crate::error::Result;

/// Everything a backend may need for one conversion, passed by reference
///
/// Each run owns its job exclusively; jobs are never shared across
/// conversions, so a backend failure cannot corrupt another run's state.
pub struct ConversionJob<'a> {
    /// Filtered cells in render order
    pub cells: &'a [Cell],
    /// The rendered self-contained document
    pub document: &'a RenderedDocument,
    /// Resolved physical page geometry
    pub geometry: &'a PageGeometry,
    /// Path of the source notebook
    pub source: &'a Path,
}

/// The outcome of one backend invocation
#[derive(Debug, Clone)]
pub enum Artifact {
    /// Produced PDF bytes, ready to be written in full
    Pdf(Vec<u8>),
    /// The notebook was delegated to a dashboard server at this URL;
    /// no PDF is produced on this path
    Dashboard {
        /// Where the served notebook can be reached
        url: String,
    },
}

impl Artifact {
    /// PDF bytes, if this outcome carries any
    pub fn pdf_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Pdf(bytes) => Some(bytes),
            Self::Dashboard { .. } => None,
        }
    }
}

/// A pluggable strategy that turns rendered content into a conversion artifact
pub trait RasterizeBackend {
    /// Short name used in output filenames and messages
    fn name(&self) -> &'static str;

    /// Whether the backend can run in this environment
    ///
    /// Browser and typesetting backends probe for their engine binary;
    /// the dashboard backend checks server reachability.
    fn is_available(&self) -> bool {
        true
    }

    /// Run one conversion
    fn rasterize(&self, job: &ConversionJob) -> Result<Artifact>;
}
