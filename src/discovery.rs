use crate::errors::Result;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// File extensions treated as workflow definitions.
const WORKFLOW_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Collects the workflow files under `<dir>/.github/workflows`.
///
/// Results are sorted so runs process files in a stable order.
pub fn discover_workflows(dir: &Path) -> Result<Vec<PathBuf>> {
    let workflows_dir = dir.join(".github").join("workflows");
    if !workflows_dir.is_dir() {
        return Err(format!(
            "Workflow directory '{}' not found",
            workflows_dir.display()
        )
        .into());
    }

    let mut files = Vec::new();
    let mut walker = WalkBuilder::new(&workflows_dir);
    walker.standard_filters(true);

    for entry in walker.build() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && is_workflow_file(path) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

/// Determines if a file is a workflow definition based on its extension.
fn is_workflow_file(path: &Path) -> bool {
    path.extension()
        .and_then(|os| os.to_str())
        .map(|s| WORKFLOW_EXTENSIONS.contains(&s.to_lowercase().as_str()))
        .unwrap_or(false)
}
