//! Browser rasterization backend
//!
//! Loads the rendered document in an isolated headless Chrome session and
//! prints it to PDF through DevTools. Readiness is never an open-ended
//! "network idle" wait (embedded chart runtimes may hold connections open
//! forever): the backend polls the document's settle beacon, bounded by a
//! hard deadline, and on deadline prints best-effort rather than hang.
//! The session owns the browser process; dropping it tears the process
//! down on every exit path.

use std::time::{Duration, Instant};

use headless_chrome::types::PrintToPdfOptions;
use headless_chrome::{Browser, LaunchOptions, Tab};

use crate::backend::{Artifact, ConversionJob, RasterizeBackend};
use crate::error::{RasterError, Result};

/// Environment variable overriding the readiness bound, in seconds
pub const RENDER_TIMEOUT_ENV: &str = "JAMBOREE_RENDER_TIMEOUT_SECS";

/// Default readiness bound
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Extra headroom on the browser's own idle watchdog so it does not kill
/// the session while we are still inside our readiness bound
const IDLE_GRACE: Duration = Duration::from_secs(30);

/// Expression polled against the page; true once charts finished drawing
const SETTLED_EXPR: &str = "window.__jamboree_settled === true";

/// Browser-automation rasterization backend (the `webpdf` method)
pub struct BrowserBackend {
    timeout: Duration,
    poll_interval: Duration,
}

impl Default for BrowserBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowserBackend {
    /// Create a backend with the readiness bound from the environment
    /// (or the 30s default)
    pub fn new() -> Self {
        Self {
            timeout: timeout_from_env(),
            poll_interval: Duration::from_millis(100),
        }
    }

    /// Override the readiness bound
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured readiness bound
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn probe_settled(&self, tab: &Tab) -> bool {
        tab.evaluate(SETTLED_EXPR, false)
            .ok()
            .and_then(|obj| obj.value)
            .map(|v| v == serde_json::Value::Bool(true))
            .unwrap_or(false)
    }
}

impl RasterizeBackend for BrowserBackend {
    fn name(&self) -> &'static str {
        "webpdf"
    }

    fn is_available(&self) -> bool {
        headless_chrome::browser::default_executable().is_ok()
    }

    fn rasterize(&self, job: &ConversionJob) -> Result<Artifact> {
        // The document must be loadable with zero network connectivity;
        // a local file URL guarantees that.
        let doc_file = tempfile::Builder::new()
            .prefix("jamboree-")
            .suffix(".html")
            .tempfile()?;
        std::fs::write(doc_file.path(), &job.document.html)?;
        let url = format!("file://{}", doc_file.path().display());

        let options = LaunchOptions::default_builder()
            .headless(true)
            .idle_browser_timeout(self.timeout + IDLE_GRACE)
            .build()
            .map_err(|e| RasterError::BrowserLaunch(e.to_string()))?;

        // Browser owns the child process and kills it on drop, so every
        // return below (including the error paths) releases the session.
        let browser =
            Browser::new(options).map_err(|e| RasterError::BrowserLaunch(e.to_string()))?;
        let tab = browser
            .new_tab()
            .map_err(|e| RasterError::BrowserLaunch(e.to_string()))?;
        tab.set_default_timeout(self.timeout);

        tab.navigate_to(&url)
            .map_err(|e| RasterError::BrowserLaunch(format!("navigation failed: {e}")))?;
        if let Err(e) = tab.wait_until_navigated() {
            // Not fatal: the settle poll below still bounds the wait
            log::warn!("Navigation wait did not complete: {e}");
        }

        let settled = wait_for_settle(self.timeout, self.poll_interval, || {
            self.probe_settled(&tab)
        });
        if !settled {
            log::warn!(
                "Readiness signal did not arrive within {}s; printing best-effort",
                self.timeout.as_secs()
            );
        }

        match tab.print_to_pdf(Some(print_options())) {
            Ok(bytes) => {
                log::debug!("Printed {} bytes via {}", bytes.len(), self.name());
                Ok(Artifact::Pdf(bytes))
            }
            Err(e) if !settled => Err(RasterError::RenderTimeout {
                timeout_secs: self.timeout.as_secs(),
                message: format!("best-effort print failed: {e}"),
            }),
            Err(e) => Err(RasterError::Print(e.to_string())),
        }
    }
}

/// Print instruction honoring the CSS-declared page box
///
/// `prefer_css_page_size` makes the document's `@page` block authoritative;
/// no paper width/height is passed that could conflict with it.
fn print_options() -> PrintToPdfOptions {
    PrintToPdfOptions {
        print_background: Some(true),
        display_header_footer: Some(false),
        prefer_css_page_size: Some(true),
        ..Default::default()
    }
}

/// Poll `probe` until it returns true or `timeout` elapses
///
/// Returns whether the probe succeeded within the bound. The wall-clock
/// spent here never exceeds the bound by more than one poll interval.
fn wait_for_settle<F>(timeout: Duration, poll: Duration, mut probe: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = Instant::now() + timeout;
    loop {
        if probe() {
            return true;
        }
        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        std::thread::sleep(poll.min(deadline - now));
    }
}

fn timeout_from_env() -> Duration {
    match std::env::var(RENDER_TIMEOUT_ENV) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                log::warn!("Ignoring invalid {RENDER_TIMEOUT_ENV}={raw}");
                DEFAULT_RENDER_TIMEOUT
            }
        },
        Err(_) => DEFAULT_RENDER_TIMEOUT,
    }
}
