use futures::future::try_join_all;
use indexmap::IndexMap;
use log::debug;
use std::path::Path;

use crate::config::{context_to_json, FileKind, RenderKind, VariableContext};
use crate::error::{Error, Result};
use crate::hooks::ScriptLoader;
use crate::renderer::TemplateRenderer;
use crate::vfs::{insert_path, Tree};

pub struct TemplateProcessor<'a> {
    /// Dependencies
    engine: &'a dyn TemplateRenderer,
    scripts: &'a dyn ScriptLoader,

    /// Other
    template_root: &'a Path,
    module: &'a str,
    context: &'a VariableContext,
    answers: serde_json::Value,
}

impl<'a> TemplateProcessor<'a> {
    pub fn new(
        engine: &'a dyn TemplateRenderer,
        scripts: &'a dyn ScriptLoader,
        template_root: &'a Path,
        module: &'a str,
        context: &'a VariableContext,
    ) -> Self {
        Self { engine, scripts, template_root, module, context, answers: context_to_json(context) }
    }

    /// Resolves file declarations into concrete files and how to render
    /// each of them, in declaration order.
    ///
    /// Glob entries expand against the template directory. Any file whose
    /// kind is unknown or cannot be inferred fails the whole list.
    pub fn entries(&self, files: &IndexMap<String, FileKind>) -> Result<Vec<(String, RenderKind)>> {
        let mut entries = Vec::new();

        for (path, kind) in files {
            match kind {
                FileKind::Template => entries.push((path.clone(), RenderKind::Template)),
                FileKind::Script => entries.push((path.clone(), RenderKind::Script)),
                FileKind::Glob { subtype } => {
                    let subtype = match subtype {
                        Some(name) => Some(RenderKind::from_name(name).ok_or_else(|| {
                            Error::UnsupportedFileKind { entry: format!("{path} ({name})") }
                        })?),
                        None => None,
                    };

                    for matched in crate::glob::expand(path, self.template_root)? {
                        let kind = subtype
                            .or_else(|| RenderKind::infer(&matched))
                            .ok_or_else(|| Error::UnsupportedFileKind { entry: matched.clone() })?;
                        entries.push((matched, kind));
                    }
                }
                FileKind::Unsupported => {
                    return Err(Error::UnsupportedFileKind { entry: path.clone() })
                }
            }
        }

        Ok(entries)
    }

    /// Renders every declared file concurrently and nests the results by
    /// path. The first failure aborts the render.
    pub async fn render(&self, files: &IndexMap<String, FileKind>) -> Result<Tree> {
        let entries = self.entries(files)?;
        let contents =
            try_join_all(entries.iter().map(|(path, kind)| self.render_file(path, *kind))).await?;

        let mut tree = Tree::new();
        for ((path, _), content) in entries.iter().zip(contents) {
            insert_path(&mut tree, path, content);
        }
        Ok(tree)
    }

    async fn render_file(&self, path: &str, kind: RenderKind) -> Result<String> {
        let source = self.template_root.join(path);
        debug!("rendering {path} as {kind:?}");

        match kind {
            RenderKind::Template => {
                let content = tokio::fs::read_to_string(&source).await?;
                self.engine.render(&content, &self.answers, Some(path))
            }
            RenderKind::Script => {
                self.scripts.load(&source)?.render(self.module, self.context)?.resolve().await
            }
        }
    }
}
