//! Deterministic output filenames

use std::path::Path;

use jamboree_render::{Orientation, PageSize};

/// Derive the output filename for one conversion
///
/// An explicit override is honored verbatim (extension appended, no
/// further decoration). Otherwise the name composes the source stem,
/// backend, preset, and orientation; identical inputs always yield the
/// identical string.
pub fn output_name(
    source: &Path,
    backend: &str,
    size: PageSize,
    orientation: Orientation,
    name_override: Option<&str>,
    extension: &str,
) -> String {
    if let Some(name) = name_override {
        return format!("{name}.{extension}");
    }
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "notebook".to_string());
    format!("{stem}_{backend}_{size}_{orientation}.{extension}")
}
