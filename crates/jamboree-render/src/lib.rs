//! jamboree-render - Page geometry and document rendering
//!
//! This crate turns a notebook's cell sequence into a styled, self-contained
//! HTML document sized to an arbitrary physical page:
//!
//! 1. **Pages** - resolves a size preset + orientation + margin into
//!    absolute page geometry
//! 2. **Filter** - applies content-visibility flags to the cell sequence
//! 3. **Html** - serializes the filtered cells into markup whose `@page`
//!    block carries the resolved geometry
//!
//! All of it is pure; no browser, no network. Rasterization of the rendered
//! document lives in `jamboree-pdf`.

pub mod debug;
mod error;
mod filter;
mod html;
mod pages;

pub use error::{RenderError, Result};
pub use filter::filter;
pub use html::{find_viz_bundle, render, render_with_bundle, RenderedDocument, VIZ_BUNDLE_ENV};
pub use pages::{LengthUnit, Margin, Orientation, PageGeometry, PageSize};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
