//! Decomposition of VFS keys into root, directory and file name parts.

use serde::Serialize;

use crate::constants::VFS_SEPARATOR;

/// A VFS path split into its parts.
///
/// `format` prefers `base` over `name` + `ext`; use [`ParsedPath::with_name`]
/// and [`ParsedPath::with_ext`] to keep them consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedPath {
    pub root: String,
    pub dir: String,
    pub base: String,
    pub ext: String,
    pub name: String,
}

impl ParsedPath {
    pub fn parse(path: &str) -> Self {
        let root = if path.starts_with(VFS_SEPARATOR) {
            VFS_SEPARATOR.to_string()
        } else {
            String::new()
        };

        let (dir, base) = match path.rfind(VFS_SEPARATOR) {
            Some(0) => (root.clone(), &path[1..]),
            Some(index) => (path[..index].to_string(), &path[index + 1..]),
            None => (String::new(), path),
        };

        let (name, ext) = match base.rfind('.') {
            Some(index) if index > 0 => (&base[..index], &base[index..]),
            _ => (base, ""),
        };

        Self {
            root,
            dir,
            base: base.to_string(),
            ext: ext.to_string(),
            name: name.to_string(),
        }
    }

    pub fn format(&self) -> String {
        let base = if self.base.is_empty() {
            format!("{}{}", self.name, self.ext)
        } else {
            self.base.clone()
        };
        let dir = if self.dir.is_empty() { &self.root } else { &self.dir };

        if dir.is_empty() {
            base
        } else if *dir == self.root {
            format!("{dir}{base}")
        } else {
            format!("{dir}{VFS_SEPARATOR}{base}")
        }
    }

    /// Replaces the file name without extension.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self.base = format!("{}{}", self.name, self.ext);
        self
    }

    /// Replaces the extension; `ext` includes the leading dot.
    pub fn with_ext(mut self, ext: &str) -> Self {
        self.ext = ext.to_string();
        self.base = format!("{}{}", self.name, self.ext);
        self
    }

    /// Moves the file under `directory`, keeping its base name.
    pub fn relocate(mut self, directory: &str) -> Self {
        let target = ParsedPath::parse(directory);
        self.root = target.root.clone();
        self.dir = if target.base.is_empty() {
            target.dir
        } else if target.dir.is_empty() {
            target.base
        } else if target.dir == target.root {
            format!("{}{}", target.dir, target.base)
        } else {
            format!("{}{VFS_SEPARATOR}{}", target.dir, target.base)
        };
        self
    }
}
