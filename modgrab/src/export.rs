// modgrab/src/export.rs
use std::fs;
use std::path::Path;

use modgrab_common::error::Result;
use modgrab_common::graph::DependencyGraph;

/// Writes the finalized graph in the abstract renderer hand-off format: the
/// id-keyed node map plus the typed edge list.
pub fn write_graph(path: &Path, graph: &DependencyGraph) -> Result<()> {
    let json = serde_json::to_string_pretty(graph)?;
    fs::write(path, json)?;
    Ok(())
}
