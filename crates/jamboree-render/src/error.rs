//! Error types for page geometry and rendering

use thiserror::Error;

/// Result type for render operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while resolving page options or rendering
///
/// These are configuration errors: they are surfaced before any expensive
/// conversion work starts.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The page size preset name is not in the registry
    #[error("Unknown page size '{name}'. Valid sizes: {valid}")]
    UnknownPreset {
        /// The unrecognized name
        name: String,
        /// Comma-separated list of valid preset names
        valid: String,
    },

    /// The margin value could not be parsed or is out of range
    #[error("Invalid margin: {0}")]
    InvalidMargin(String),

    /// IO error while persisting a rendered document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
