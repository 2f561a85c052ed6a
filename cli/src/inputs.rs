use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::warn;
use walkdir::WalkDir;

const ARCHIVE_EXTENSION: &str = "opuspak";

/// Expands glob patterns into archive paths. A directory contributes the
/// `*.opuspak` files directly inside it.
pub fn expand_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for pattern in patterns {
        let mut matched = false;
        for entry in glob::glob(pattern).with_context(|| format!("Invalid glob {:?}", pattern))? {
            let path = entry?;
            matched = true;

            if path.is_dir() {
                for child in WalkDir::new(&path)
                    .min_depth(1)
                    .max_depth(1)
                    .sort_by_file_name()
                    .into_iter()
                    .filter_map(|e| e.ok())
                {
                    let child = child.path();
                    if child.is_file()
                        && child.extension().is_some_and(|ext| ext == ARCHIVE_EXTENSION)
                        && seen.insert(child.to_path_buf())
                    {
                        paths.push(child.to_path_buf());
                    }
                }
            } else if seen.insert(path.clone()) {
                paths.push(path);
            }
        }

        if !matched {
            warn!("No files match {:?}", pattern);
        }
    }

    Ok(paths)
}
