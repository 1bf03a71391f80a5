//! Error types for rasterization backends

use thiserror::Error;

/// Result type for rasterization operations
pub type Result<T> = std::result::Result<T, RasterError>;

/// Errors that can occur while turning rendered content into PDF bytes
///
/// All of these are fatal to the current conversion and are not retried
/// automatically; the caller may advise falling back to another backend.
#[derive(Error, Debug)]
pub enum RasterError {
    /// The browser engine is unavailable or misconfigured
    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    /// The readiness signal never arrived within the bound and the
    /// best-effort print also failed
    #[error("Rendering did not settle within {timeout_secs}s: {message}")]
    RenderTimeout {
        /// The configured readiness bound in seconds
        timeout_secs: u64,
        /// What went wrong after the bound elapsed
        message: String,
    },

    /// The engine rejected the page-print instruction
    #[error("Print to PDF failed: {0}")]
    Print(String),

    /// The external typesetting toolchain failed
    #[error("Typesetting failed: {message}\n--- toolchain output ---\n{diagnostics}")]
    Typesetting {
        /// Short description of the failure
        message: String,
        /// The toolchain's diagnostic output
        diagnostics: String,
    },

    /// The backend cannot run in this environment
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// IO error in a backend's working files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
