//! Glob expansion relative to a base directory.

use std::path::Path;

use globset::GlobBuilder;
use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::ext::PathExt;

/// Expands `pattern` against the files below `base_dir`.
///
/// Returns the matching files as `/`-separated paths relative to
/// `base_dir`, sorted. Directories never match. `*` does not cross path
/// separators; use `**` for that.
pub fn expand<P: AsRef<Path>>(pattern: &str, base_dir: P) -> Result<Vec<String>> {
    let base_dir = base_dir.as_ref();
    let matcher = GlobBuilder::new(pattern).literal_separator(true).build()?.compile_matcher();

    let mut matches = Vec::new();
    for entry in WalkDir::new(base_dir).follow_links(true) {
        let entry = entry.map_err(|e| Error::Other(e.into()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = entry.path().strip_prefix(base_dir).map_err(|e| Error::Other(e.into()))?;
        if matcher.is_match(relative) {
            matches.push(relative.to_vfs_key()?);
        }
    }
    matches.sort();

    debug!("glob '{pattern}' in {} matched {matches:?}", base_dir.display());
    Ok(matches)
}
