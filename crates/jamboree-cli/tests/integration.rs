//! End-to-end conversion through the HTML method
//!
//! The HTML method exercises the full pipeline (load, filter, render,
//! name, write) without requiring a browser or external toolchain.

use std::path::Path;

use serde_json::json;

use jamboree_cli::{run, Cli, Method};

fn sample_notebook() -> serde_json::Value {
    json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [
            {
                "cell_type": "markdown",
                "metadata": {},
                "source": ["# Quarterly Report\n", "\n", "Summary of results."]
            },
            {
                "cell_type": "code",
                "metadata": {},
                "execution_count": 1,
                "source": "df.describe()",
                "outputs": [
                    {
                        "output_type": "execute_result",
                        "execution_count": 1,
                        "data": {
                            "text/html": "<table><tr><td>42</td></tr></table>",
                            "text/plain": "42"
                        },
                        "metadata": {}
                    }
                ]
            },
            {
                "cell_type": "code",
                "metadata": {},
                "execution_count": 2,
                "source": "plot()",
                "outputs": [
                    {
                        "output_type": "display_data",
                        "data": { "image/png": "aGVsbG8=" },
                        "metadata": {}
                    }
                ]
            }
        ]
    })
}

fn write_notebook(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("report.ipynb");
    std::fs::write(&path, sample_notebook().to_string()).unwrap();
    path
}

fn base_cli(notebook: std::path::PathBuf, output: String) -> Cli {
    Cli {
        notebook: Some(notebook),
        size: "a4".to_string(),
        orientation: "portrait".to_string(),
        margins: "20mm".to_string(),
        output: Some(output),
        no_code: false,
        no_prompts: false,
        method: Method::Html,
        list_sizes: false,
    }
}

#[test]
fn test_html_conversion_produces_document() {
    let dir = tempfile::tempdir().unwrap();
    let notebook = write_notebook(dir.path());
    let out = dir.path().join("report_out").to_string_lossy().into_owned();

    run(base_cli(notebook, out.clone())).unwrap();

    let html = std::fs::read_to_string(format!("{out}.html")).unwrap();
    assert!(html.contains("@page"));
    assert!(html.contains("size: 210mm 297mm"));
    assert!(html.contains("Quarterly Report"));
    assert!(html.contains("<table><tr><td>42</td></tr></table>"));
    assert!(html.contains("data:image/png;base64,aGVsbG8="));
    assert!(html.contains("df.describe()"));
    assert!(html.contains("In [1]:"));
}

#[test]
fn test_no_code_excludes_source_keeps_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let notebook = write_notebook(dir.path());
    let out = dir.path().join("no_code").to_string_lossy().into_owned();

    let mut cli = base_cli(notebook, out.clone());
    cli.no_code = true;
    run(cli).unwrap();

    let html = std::fs::read_to_string(format!("{out}.html")).unwrap();
    assert!(!html.contains("df.describe()"));
    assert!(html.contains("<table><tr><td>42</td></tr></table>"));
}

#[test]
fn test_no_prompts_strips_execution_counts() {
    let dir = tempfile::tempdir().unwrap();
    let notebook = write_notebook(dir.path());
    let out = dir.path().join("no_prompts").to_string_lossy().into_owned();

    let mut cli = base_cli(notebook, out.clone());
    cli.no_prompts = true;
    run(cli).unwrap();

    let html = std::fs::read_to_string(format!("{out}.html")).unwrap();
    assert!(!html.contains("In [1]:"));
    assert!(html.contains("df.describe()"));
}

#[test]
fn test_landscape_case_study_geometry() {
    let dir = tempfile::tempdir().unwrap();
    let notebook = write_notebook(dir.path());
    let out = dir.path().join("poster").to_string_lossy().into_owned();

    let mut cli = base_cli(notebook, out.clone());
    cli.size = "case_study".to_string();
    cli.orientation = "landscape".to_string();
    run(cli).unwrap();

    let html = std::fs::read_to_string(format!("{out}.html")).unwrap();
    assert!(html.contains("size: 1189mm 420mm"));
}

#[test]
fn test_missing_notebook_reports_load_failure() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("x").to_string_lossy().into_owned();

    let err = run(base_cli(dir.path().join("absent.ipynb"), out)).unwrap_err();
    assert!(err.to_string().contains("Failed to load notebook"));
}

#[test]
fn test_default_naming_next_to_source() {
    let dir = tempfile::tempdir().unwrap();
    let notebook = write_notebook(dir.path());

    // Without an override the output lands in the working directory,
    // so run this one from inside the tempdir via an explicit name
    // derived the same way the default namer does it.
    let mut cli = base_cli(notebook.clone(), String::new());
    cli.output = None;
    cli.method = Method::Html;

    // The default name is derived from the source stem
    let expected = "report_html_a4_portrait.html";
    let prev = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();
    let result = run(cli);
    let exists = dir.path().join(expected).exists();
    std::env::set_current_dir(prev).unwrap();

    result.unwrap();
    assert!(exists, "expected {expected} in output directory");
}
