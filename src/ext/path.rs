use std::path::Path;

use crate::constants::VFS_SEPARATOR;
use crate::error::{Error, Result};

/// Extension trait for Path to provide conversions used by the VFS
pub trait PathExt {
    /// Converts a path to a string slice, returning an error if the path contains invalid Unicode characters.
    ///
    /// # Examples
    /// ```
    /// use modgen::ext::PathExt;
    /// use std::path::Path;
    ///
    /// let path = Path::new("test");
    /// assert_eq!(path.to_str_checked().unwrap(), "test");
    /// ```
    fn to_str_checked(&self) -> Result<&str>;

    /// Converts a relative path to a VFS key, joining its components with `/`
    /// regardless of the host separator.
    ///
    /// # Examples
    /// ```
    /// use modgen::ext::PathExt;
    /// use std::path::Path;
    ///
    /// assert_eq!(Path::new("src/main.rs").to_vfs_key().unwrap(), "src/main.rs");
    /// ```
    fn to_vfs_key(&self) -> Result<String>;
}

impl PathExt for Path {
    fn to_str_checked(&self) -> Result<&str> {
        self.to_str().ok_or_else(|| {
            Error::Other(anyhow::anyhow!(
                "Path '{}' contains invalid Unicode characters",
                self.display()
            ))
        })
    }

    fn to_vfs_key(&self) -> Result<String> {
        let mut segments = Vec::new();
        for component in self.components() {
            segments.push(Path::new(component.as_os_str()).to_str_checked()?.to_string());
        }
        Ok(segments.join(&VFS_SEPARATOR.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_to_str_checked_valid() {
        let path = Path::new("valid_path");
        assert_eq!(path.to_str_checked().unwrap(), "valid_path");
    }

    #[test]
    fn test_to_vfs_key_joins_components() {
        let path: PathBuf = ["templates", "module", "view.j2"].iter().collect();
        assert_eq!(path.to_vfs_key().unwrap(), "templates/module/view.j2");
    }
}
