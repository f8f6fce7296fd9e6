//! Loading of JSON or YAML configuration files

use log::debug;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::Result;

/// Reads the first of `file_names` that exists in `dir`.
///
/// The format follows the extension: `.json` files are parsed as JSON,
/// everything else as YAML. Returns `Ok(None)` when none of the files exist.
pub fn load_first<T, P>(dir: P, file_names: &[&str]) -> Result<Option<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let dir = dir.as_ref();

    for file_name in file_names {
        let path = dir.join(file_name);
        if !path.exists() {
            continue;
        }

        debug!("Loading '{}'", path.display());
        let content = std::fs::read_to_string(&path)?;
        let value = if file_name.ends_with(".json") {
            serde_json::from_str(&content)?
        } else {
            serde_yaml::from_str(&content)?
        };
        return Ok(Some(value));
    }

    Ok(None)
}
