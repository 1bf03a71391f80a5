//! Content-visibility filtering
//!
//! Transforms the loaded cell sequence according to the show-code and
//! show-prompts flags before rendering. Suppressing code removes the
//! source block of code cells while keeping their execution outputs;
//! suppressing prompts strips the `In [n]` / `Out [n]` labels. Relative
//! cell order is always preserved, and both flags compose independently.

use jamboree_notebook::{Cell, CellKind, Output};

/// Apply visibility flags to a cell sequence
///
/// An empty result is valid and renders as a blank document.
pub fn filter(cells: &[Cell], show_code: bool, show_prompts: bool) -> Vec<Cell> {
    cells
        .iter()
        .filter_map(|cell| filter_cell(cell, show_code, show_prompts))
        .collect()
}

fn filter_cell(cell: &Cell, show_code: bool, show_prompts: bool) -> Option<Cell> {
    let mut cell = cell.clone();

    if !show_code && cell.kind == CellKind::Code {
        // A code cell whose only content is its source has nothing left
        if cell.outputs.is_empty() {
            return None;
        }
        cell.source.clear();
    }

    if !show_prompts {
        cell.execution_count = None;
        for output in &mut cell.outputs {
            if let Output::ExecuteResult {
                execution_count, ..
            } = output
            {
                *execution_count = None;
            }
        }
    }

    Some(cell)
}
