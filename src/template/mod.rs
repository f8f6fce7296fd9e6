//! Module templates
//!
//! - `Template`: a template directory with its manifest and hooks loaded
//! - `processor`: renders the files of a template into a virtual tree

use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{FileKind, TemplateManifest, VariableDeclaration};
use crate::error::Result;
use crate::hooks::Hooks;
use crate::renderer::TemplateRenderer;

pub mod processor;

pub use processor::TemplateProcessor;

/// A loaded module template.
#[derive(Debug)]
pub struct Template {
    pub module: String,
    /// Directory containing the manifest; file keys are relative to it.
    pub root: PathBuf,
    pub files: IndexMap<String, FileKind>,
    pub variables: IndexMap<String, VariableDeclaration>,
    pub hooks: Hooks,
}

impl Template {
    pub fn new<P: Into<PathBuf>>(module: &str, root: P) -> Self {
        Self {
            module: module.to_string(),
            root: root.into(),
            files: IndexMap::new(),
            variables: IndexMap::new(),
            hooks: Hooks::default(),
        }
    }

    pub fn load<P: AsRef<Path>>(
        module: &str,
        root: P,
        engine: Arc<dyn TemplateRenderer>,
    ) -> Result<Self> {
        let root = root.as_ref();
        let manifest = TemplateManifest::load(root)?;
        let hooks = Hooks::from_manifest(&manifest, root, engine)?;

        let template = Self {
            module: module.to_string(),
            root: root.to_path_buf(),
            files: manifest.files.normalize(),
            variables: manifest.variables,
            hooks,
        };
        debug!(
            "Loaded template '{module}' with {} file entries and {} variables",
            template.files.len(),
            template.variables.len()
        );
        Ok(template)
    }

    pub fn with_file(mut self, path: &str, kind: FileKind) -> Self {
        self.files.insert(path.to_string(), kind);
        self
    }

    pub fn with_variable(mut self, name: &str, declaration: VariableDeclaration) -> Self {
        self.variables.insert(name.to_string(), declaration);
        self
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }
}
