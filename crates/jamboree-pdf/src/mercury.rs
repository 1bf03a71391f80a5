//! Dashboard delegation backend
//!
//! Hands the notebook to a running Mercury dashboard server instead of
//! producing PDF bytes (serving is out of scope for PDF production; the
//! outcome is the served URL). The client is a plain blocking HTTP client
//! with a bounded request timeout.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::backend::{Artifact, ConversionJob, RasterizeBackend};
use crate::error::{RasterError, Result};

/// Default Mercury server URL
pub const DEFAULT_MERCURY_URL: &str = "http://127.0.0.1:8000";

/// Environment variable overriding the Mercury server URL
pub const MERCURY_URL_ENV: &str = "JAMBOREE_MERCURY_URL";

/// Dashboard backend (the `mercury` method)
#[derive(Debug, Clone)]
pub struct MercuryBackend {
    /// Base URL of the Mercury server
    base_url: String,
    /// HTTP client
    client: Client,
}

impl Default for MercuryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MercuryBackend {
    /// Create a backend pointing at the server from the environment
    /// (or the localhost default)
    pub fn new() -> Self {
        let url =
            std::env::var(MERCURY_URL_ENV).unwrap_or_else(|_| DEFAULT_MERCURY_URL.to_string());
        Self::with_url(url)
    }

    /// Create a backend with a custom server URL
    pub fn with_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self { base_url, client }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL the uploaded notebook will be served at
    pub fn app_url(&self, stem: &str) -> String {
        format!("{}/app/{}", self.base_url, stem)
    }

    /// Check if the Mercury server is reachable
    pub fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| RasterError::Unavailable(e.to_string()))?;
        Ok(response.status().is_success())
    }

    /// Upload the raw notebook JSON for serving
    fn upload(&self, filename: &str, body: Vec<u8>) -> Result<()> {
        let url = format!("{}/api/notebooks/{}", self.base_url, filename);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .map_err(|e| RasterError::Unavailable(format!("upload failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(RasterError::Unavailable(format!(
                "Mercury server rejected upload ({status}): {message}"
            )));
        }
        Ok(())
    }
}

impl RasterizeBackend for MercuryBackend {
    fn name(&self) -> &'static str {
        "mercury"
    }

    fn is_available(&self) -> bool {
        self.health_check().unwrap_or(false)
    }

    fn rasterize(&self, job: &ConversionJob) -> Result<Artifact> {
        let filename = job
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "notebook.ipynb".to_string());
        let stem = job
            .source
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "notebook".to_string());

        // The server receives the notebook verbatim; filtering and page
        // geometry do not apply to a live dashboard.
        let body = std::fs::read(job.source)?;
        self.upload(&filename, body)?;

        let url = self.app_url(&stem);
        log::info!("Notebook delegated to Mercury at {url}");
        Ok(Artifact::Dashboard { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_default_url() {
        let backend = MercuryBackend::with_url(DEFAULT_MERCURY_URL);
        assert_eq!(backend.base_url(), DEFAULT_MERCURY_URL);
    }

    #[test]
    fn test_backend_trims_trailing_slash() {
        let backend = MercuryBackend::with_url("http://localhost:9000/");
        assert_eq!(backend.base_url(), "http://localhost:9000");
    }

    #[test]
    fn test_app_url() {
        let backend = MercuryBackend::with_url("http://localhost:9000");
        assert_eq!(
            backend.app_url("report"),
            "http://localhost:9000/app/report"
        );
    }

    // Requires a running Mercury server
    #[test]
    #[ignore]
    fn test_health_check() {
        let backend = MercuryBackend::new();
        match backend.health_check() {
            Ok(healthy) => println!("Mercury health: {healthy}"),
            Err(e) => eprintln!("Mercury health check skipped: {e}"),
        }
    }
}
