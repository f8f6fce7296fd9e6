//! Template manifest (`info.json` / `info.yaml`) describing one module template

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

use super::loader::load_first;
use super::variable::VariableDeclaration;
use crate::constants::{MANIFEST_FILENAMES, SCRIPT_EXTENSIONS, TEMPLATE_EXTENSIONS};
use crate::error::{Error, Result};
use crate::vfs::Matcher;

/// How a single template file is turned into output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Text template rendered with the variable context.
    Template,
    /// Executable whose stdout becomes the file content.
    Script,
}

impl RenderKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "template" => Some(RenderKind::Template),
            "script" => Some(RenderKind::Script),
            _ => None,
        }
    }

    /// Infers the kind from the extension of `path`.
    pub fn infer(path: &str) -> Option<Self> {
        let extension = Path::new(path).extension()?.to_str()?;
        if TEMPLATE_EXTENSIONS.contains(&extension) {
            Some(RenderKind::Template)
        } else if SCRIPT_EXTENSIONS.contains(&extension) {
            Some(RenderKind::Script)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileKind {
    Template,
    Script,
    /// The key is a glob; every match is rendered with `subtype`, or with
    /// the kind inferred from its extension.
    Glob {
        #[serde(default)]
        subtype: Option<String>,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FileDeclarations {
    /// Shorthand where every entry is a template.
    List(Vec<String>),
    Map(IndexMap<String, FileKind>),
}

impl Default for FileDeclarations {
    fn default() -> Self {
        FileDeclarations::List(Vec::new())
    }
}

impl FileDeclarations {
    pub fn normalize(&self) -> IndexMap<String, FileKind> {
        match self {
            FileDeclarations::List(files) => {
                files.iter().map(|file| (file.clone(), FileKind::Template)).collect()
            }
            FileDeclarations::Map(files) => files.clone(),
        }
    }
}

/// Selects names either by equality or by regular expression.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MatchSpec {
    Exact(String),
    Regex { regex: String },
}

impl MatchSpec {
    pub fn to_matcher(&self) -> Result<Matcher> {
        match self {
            MatchSpec::Exact(value) => Ok(Matcher::Exact(value.clone())),
            MatchSpec::Regex { regex } => Ok(Matcher::Pattern(Regex::new(regex)?)),
        }
    }

    pub fn to_regex(&self) -> Result<Regex> {
        match self {
            MatchSpec::Exact(value) => Ok(Regex::new(&regex::escape(value))?),
            MatchSpec::Regex { regex } => Ok(Regex::new(regex)?),
        }
    }
}

/// One step of a declarative post-processor.
///
/// String values are rendered with the variable context first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TreePatchStep {
    Flat,
    ReplaceDirectory {
        #[serde(rename = "match")]
        matcher: MatchSpec,
        with: String,
    },
    MoveFiles {
        #[serde(rename = "match")]
        matcher: MatchSpec,
        to: String,
    },
    RenameFiles(IndexMap<String, String>),
    /// `template` renders the new base name; the current path is available
    /// as `file` (`file.name`, `file.ext`, `file.base`, `file.dir`).
    RenameWith {
        template: String,
    },
    Nest(String),
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertEdit {
    /// Substring identifying the anchor line.
    pub pointer: String,
    pub text: String,
    #[serde(default = "default_true")]
    pub preserve_indent: bool,
    #[serde(default)]
    pub global: bool,
    #[serde(default)]
    pub reverse: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileEdit {
    InsertAfter(InsertEdit),
    InsertBefore(InsertEdit),
    RemoveLines(MatchSpec),
    Replace { from: MatchSpec, to: String },
    TrimLines,
}

/// Edits applied to one existing project file after generation.
#[derive(Debug, Clone, Deserialize)]
pub struct FilePatch {
    /// Path relative to the project directory; rendered with the context.
    pub file: String,
    pub edits: Vec<FileEdit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PostProcessorSpec {
    /// Path of an executable, relative to the template directory.
    Script(String),
    Steps(Vec<TreePatchStep>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PostActionSpec {
    Script(String),
    Patches(Vec<FilePatch>),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateManifest {
    #[serde(default)]
    pub files: FileDeclarations,
    #[serde(default)]
    pub variables: IndexMap<String, VariableDeclaration>,
    #[serde(default)]
    pub pre_processor: Option<String>,
    #[serde(default)]
    pub async_pre_processor: Option<String>,
    #[serde(default)]
    pub post_processor: Option<PostProcessorSpec>,
    #[serde(default)]
    pub async_post_processor: Option<PostProcessorSpec>,
    #[serde(default)]
    pub post_actions: Option<PostActionSpec>,
    #[serde(default)]
    pub async_post_actions: Option<PostActionSpec>,
}

impl TemplateManifest {
    pub fn load<P: AsRef<Path>>(template_root: P) -> Result<Self> {
        let template_root = template_root.as_ref();
        load_first(template_root, MANIFEST_FILENAMES)?.ok_or_else(|| Error::ManifestNotFound {
            template_dir: template_root.display().to_string(),
            manifest_files: MANIFEST_FILENAMES.join(", "),
        })
    }
}
