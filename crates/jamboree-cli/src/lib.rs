//! Command-line interface for jamboree
//!
//! Converts Jupyter notebooks into fixed-size paginated PDFs through a
//! choice of backends (headless browser, pandoc/LaTeX, Mercury dashboard).

pub mod app;

pub use app::{run, run_cli, Cli, Method};
