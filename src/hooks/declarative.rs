//! Hooks described by data in the template manifest.

use std::sync::Arc;

use log::warn;

use super::{HookOutput, HookScope, PostAction, PostProcessor};
use crate::config::{context_to_json, FileEdit, FilePatch, InsertEdit, TreePatchStep, VariableContext};
use crate::error::Result;
use crate::patch::{InsertOptions, PatchOptions};
use crate::renderer::TemplateRenderer;
use crate::vfs::{ParsedPath, Tree};

/// Post-processor replaying a list of [`TreePatchStep`]s through a
/// [`TreePatcher`](crate::vfs::TreePatcher).
pub struct TreePatchProcessor {
    steps: Vec<TreePatchStep>,
    engine: Arc<dyn TemplateRenderer>,
}

impl TreePatchProcessor {
    /// Fails on invalid regular expressions.
    pub fn new(steps: Vec<TreePatchStep>, engine: Arc<dyn TemplateRenderer>) -> Result<Self> {
        for step in &steps {
            if let TreePatchStep::ReplaceDirectory { matcher, .. }
            | TreePatchStep::MoveFiles { matcher, .. } = step
            {
                matcher.to_matcher()?;
            }
        }
        Ok(Self { steps, engine })
    }
}

fn rename_with(
    engine: &dyn TemplateRenderer,
    template: &str,
    context: &serde_json::Value,
    mut path: ParsedPath,
) -> ParsedPath {
    let mut scope = context.clone();
    if let (Some(scope), Ok(file)) = (scope.as_object_mut(), serde_json::to_value(&path)) {
        scope.insert("file".to_string(), file);
    }

    match engine.render(template, &scope, Some("renameWith")) {
        Ok(base) if !base.trim().is_empty() => {
            path.base = base.trim().to_string();
            path
        }
        Ok(_) => path,
        Err(e) => {
            warn!("Keeping '{}': {e}", path.format());
            path
        }
    }
}

impl PostProcessor for TreePatchProcessor {
    fn post_process(
        &self,
        tree: Tree,
        context: &VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<Tree>> {
        let json = context_to_json(context);
        let render = |value: &str| self.engine.render(value, &json, None);

        let mut patcher = scope.utils.patch_tree(tree);
        for step in &self.steps {
            patcher = match step {
                TreePatchStep::Flat => patcher.flat(),
                TreePatchStep::ReplaceDirectory { matcher, with } => {
                    patcher.replace_directory(matcher.to_matcher()?, &render(with)?)
                }
                TreePatchStep::MoveFiles { matcher, to } => {
                    patcher.move_files(matcher.to_matcher()?, &render(to)?)
                }
                TreePatchStep::RenameFiles(dictionary) => {
                    patcher.rename_files_with_dictionary(dictionary.clone())
                }
                TreePatchStep::RenameWith { template } => {
                    let engine = self.engine.clone();
                    let template = template.clone();
                    let json = json.clone();
                    patcher.rename_files_with(move |path| rename_with(&*engine, &template, &json, path))
                }
                TreePatchStep::Nest(directory) => patcher.nest(&render(directory)?),
            };
        }

        Ok(HookOutput::Immediate(patcher.make()))
    }
}

/// Post-action editing existing project files.
pub struct FilePatchAction {
    patches: Vec<FilePatch>,
    engine: Arc<dyn TemplateRenderer>,
}

impl FilePatchAction {
    /// Fails on invalid regular expressions.
    pub fn new(patches: Vec<FilePatch>, engine: Arc<dyn TemplateRenderer>) -> Result<Self> {
        for edit in patches.iter().flat_map(|patch| &patch.edits) {
            match edit {
                FileEdit::RemoveLines(matcher) | FileEdit::Replace { from: matcher, .. } => {
                    matcher.to_regex()?;
                }
                _ => {}
            }
        }
        Ok(Self { patches, engine })
    }
}

fn insert_options(edit: &InsertEdit) -> InsertOptions {
    InsertOptions { preserve_indent: edit.preserve_indent, global: edit.global, reverse: edit.reverse }
}

impl PostAction for FilePatchAction {
    fn run(
        &self,
        _tree: &Tree,
        context: &VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<()>> {
        let json = context_to_json(context);
        let render = |value: &str| self.engine.render(value, &json, None);

        let mut builders = Vec::with_capacity(self.patches.len());
        for patch in &self.patches {
            let mut builder = scope.utils.patch_file(render(&patch.file)?, PatchOptions::default());
            for edit in &patch.edits {
                builder = match edit {
                    FileEdit::InsertAfter(edit) => {
                        builder.insert_after(&edit.pointer, &render(&edit.text)?, insert_options(edit))
                    }
                    FileEdit::InsertBefore(edit) => {
                        builder.insert_before(&edit.pointer, &render(&edit.text)?, insert_options(edit))
                    }
                    FileEdit::RemoveLines(matcher) => {
                        let regex = matcher.to_regex()?;
                        builder.filter(move |line| !regex.is_match(line))
                    }
                    FileEdit::Replace { from, to } => {
                        let regex = from.to_regex()?;
                        let to = render(to)?;
                        builder.map(move |line| regex.replace_all(line, to.as_str()).into_owned())
                    }
                    FileEdit::TrimLines => builder.trim_lines(),
                };
            }
            builders.push(builder);
        }

        Ok(HookOutput::Deferred(Box::pin(async move {
            for builder in builders {
                builder.apply().await?;
            }
            Ok(())
        })))
    }
}
