//! Prompting interface used by the generation pipeline
//!
//! The pipeline never talks to a terminal directly; it hands batches of
//! variable declarations to a [`VariablePrompter`] and gets back answers,
//! or `None` when the user cancelled.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::PathBuf;

use crate::config::{VariableContext, VariableDeclaration};
use crate::error::Result;

/// What a prompter may need besides the declarations themselves.
#[derive(Debug, Clone, Default)]
pub struct PromptConfig {
    /// File picker globs resolve against this directory.
    pub project_dir: PathBuf,
    /// Choices of `outputPath` variables.
    pub output_paths: IndexMap<String, String>,
}

#[async_trait]
pub trait VariablePrompter: Send + Sync {
    /// Picks the module to generate among `candidates`.
    async fn ask_module(&self, candidates: &[String]) -> Result<Option<String>>;

    /// Collects one value per declaration.
    ///
    /// Returns `Ok(None)` when the user cancelled; the answers of a
    /// cancelled batch are discarded.
    async fn ask_variables(
        &self,
        module: &str,
        declarations: &IndexMap<String, VariableDeclaration>,
        config: &PromptConfig,
    ) -> Result<Option<VariableContext>>;
}
