//! Cell and output types
//!
//! These model the nbformat v4 document structure: an ordered sequence of
//! cells, where code cells carry an ordered sequence of typed outputs.
//! Source text may arrive in the JSON as either a single string or an
//! array of line strings; both forms deserialize to one `String`.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// The kind of a notebook cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Executable code cell, may carry outputs
    Code,
    /// Markdown prose cell
    Markdown,
    /// Raw passthrough cell
    Raw,
}

/// One ordered unit of a notebook document
///
/// The render order of a notebook is the order of its `cells` vector;
/// a cell's ordinal position is its index there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    /// Cell kind (code, markdown, or raw)
    #[serde(rename = "cell_type")]
    pub kind: CellKind,

    /// Source text of the cell
    #[serde(deserialize_with = "string_or_lines", default)]
    pub source: String,

    /// Ordered outputs produced by executing the cell (code cells only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<Output>,

    /// Execution-count label, if the cell has been executed
    #[serde(default)]
    pub execution_count: Option<u32>,
}

impl Cell {
    /// Create a cell with no outputs and no execution count
    pub fn new(kind: CellKind, source: impl Into<String>) -> Self {
        Self {
            kind,
            source: source.into(),
            outputs: Vec::new(),
            execution_count: None,
        }
    }

    /// Attach an output (keeps sub-order of insertion)
    pub fn with_output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    /// Set the execution count
    pub fn with_execution_count(mut self, count: u32) -> Self {
        self.execution_count = Some(count);
        self
    }
}

/// A single typed output of a code cell
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "output_type", rename_all = "snake_case")]
pub enum Output {
    /// Text written to stdout/stderr during execution
    Stream {
        /// Stream name ("stdout" or "stderr")
        #[serde(default)]
        name: Option<String>,
        /// The emitted text
        #[serde(deserialize_with = "string_or_lines", default)]
        text: String,
    },

    /// An exception raised during execution
    Error {
        /// Exception type name
        ename: String,
        /// Exception message
        evalue: String,
        /// Formatted traceback lines
        #[serde(default)]
        traceback: Vec<String>,
    },

    /// The value of the last expression, keyed by MIME type
    ExecuteResult {
        /// The `Out [n]` label for this result
        #[serde(default)]
        execution_count: Option<u32>,
        /// MIME representations of the result
        #[serde(default)]
        data: MimeBundle,
    },

    /// Rich display output (images, tables, chart payloads), keyed by MIME type
    DisplayData {
        /// MIME representations of the display item
        #[serde(default)]
        data: MimeBundle,
    },
}

/// MIME type of embedded Plotly figure payloads
pub const PLOTLY_MIME: &str = "application/vnd.plotly.v1+json";

/// A MIME-keyed bundle of output representations
///
/// Values are kept as raw JSON; accessors decode the representations the
/// renderer cares about. nbformat stores multi-line text values as arrays
/// of line strings, which the accessors join back together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MimeBundle(pub BTreeMap<String, serde_json::Value>);

impl MimeBundle {
    /// Plain-text representation, if present
    pub fn text_plain(&self) -> Option<String> {
        self.0.get("text/plain").map(join_lines)
    }

    /// HTML representation (tables, styled frames), if present
    pub fn html(&self) -> Option<String> {
        self.0.get("text/html").map(join_lines)
    }

    /// Base64-encoded PNG payload, if present
    pub fn png_base64(&self) -> Option<String> {
        self.0
            .get("image/png")
            .map(|v| join_lines(v).trim().to_string())
    }

    /// Embedded Plotly figure payload, if present
    pub fn plotly(&self) -> Option<&serde_json::Value> {
        self.0.get(PLOTLY_MIME)
    }

    /// True if the bundle carries no representations at all
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Join a JSON string-or-array-of-strings value into one string
fn join_lines(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .collect::<Vec<_>>()
            .concat(),
        other => other.to_string(),
    }
}

/// Deserialize nbformat source text: a string or an array of line strings
fn string_or_lines<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Text {
        One(String),
        Lines(Vec<String>),
    }

    Ok(match Text::deserialize(deserializer)? {
        Text::One(s) => s,
        Text::Lines(lines) => lines.concat(),
    })
}
