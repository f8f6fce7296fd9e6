//! Configuration management for modgen
//!
//! - `project`: the project configuration (`.modgen.json`)
//! - `manifest`: the manifest of a module template (`info.json`)
//! - `variable`: variable declarations and resolved values
//! - `loader`: JSON/YAML file loading shared by both

pub mod loader;
pub mod manifest;
pub mod project;
pub mod variable;

#[cfg(test)]
mod tests;

pub use manifest::{
    FileDeclarations, FileEdit, FileKind, FilePatch, InsertEdit, MatchSpec, PostActionSpec,
    PostProcessorSpec, RenderKind, TemplateManifest, TreePatchStep,
};
pub use project::{PredefinedVariable, ProjectConfig};
pub use variable::{
    context_to_json, Condition, FileVariant, TypedFileVariant, VariableContext,
    VariableDeclaration, VariableKind, VariableValue,
};
