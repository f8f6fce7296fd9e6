//! The generation pipeline.
//!
//! Generating a module runs these stages in order:
//!
//! 1. predefined project variables are applied to the template variables,
//! 2. the remaining variables are collected in conditional rounds,
//! 3. the pre-processor hooks rewrite the variable context,
//! 4. every declared file is rendered into a virtual tree,
//! 5. the post-processor hooks rewrite the tree,
//! 6. the tree is written under the project directory,
//! 7. the post-action hooks run.
//!
//! Stages 1 to 5 touch nothing on disk; [`Pipeline::resolve`] stops there.

use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{ProjectConfig, VariableContext};
use crate::error::Result;
use crate::hooks::{HookScope, ScriptLoader};
use crate::prompt::{PromptConfig, VariablePrompter};
use crate::renderer::TemplateRenderer;
use crate::template::{Template, TemplateProcessor};
use crate::utils::TemplateUtils;
use crate::vfs::{materialize, MaterializeReport, Tree};

pub mod variables;

pub use variables::{collect_variables, finalize, partition_predefined, PredefinedPartition};

/// Variables and rendered files of a module, not yet written.
#[derive(Debug)]
pub struct Resolution {
    pub context: VariableContext,
    pub tree: Tree,
}

#[derive(Debug)]
pub struct Generation {
    pub context: VariableContext,
    pub tree: Tree,
    pub report: MaterializeReport,
}

pub struct Pipeline<'a> {
    /// Dependencies
    engine: Arc<dyn TemplateRenderer>,
    prompter: &'a dyn VariablePrompter,
    scripts: &'a dyn ScriptLoader,

    /// Other
    config: &'a ProjectConfig,
    project_dir: PathBuf,
    utils: TemplateUtils,
}

impl<'a> Pipeline<'a> {
    pub fn new<P: AsRef<Path>>(
        engine: Arc<dyn TemplateRenderer>,
        prompter: &'a dyn VariablePrompter,
        scripts: &'a dyn ScriptLoader,
        config: &'a ProjectConfig,
        project_dir: P,
    ) -> Self {
        let project_dir = project_dir.as_ref().to_path_buf();
        let utils = TemplateUtils::new(&project_dir);
        Self { engine, prompter, scripts, config, project_dir, utils }
    }

    fn prompt_config(&self) -> PromptConfig {
        PromptConfig {
            project_dir: self.project_dir.clone(),
            output_paths: self.config.generator_output_paths.clone(),
        }
    }

    /// Collects the variables and renders the files of `template`.
    pub async fn resolve(&self, template: &Template) -> Result<Resolution> {
        let module = template.module.as_str();

        let PredefinedPartition { fixed, asked } =
            partition_predefined(&template.variables, &self.config.predefined_variables)?;
        let collected = collect_variables(
            module,
            asked,
            self.prompter,
            self.engine.as_ref(),
            &self.prompt_config(),
        )
        .await?;
        let context = self.pre_process(template, finalize(collected, fixed)).await?;

        let tree = TemplateProcessor::new(
            self.engine.as_ref(),
            self.scripts,
            &template.root,
            module,
            &context,
        )
        .render(&template.files)
        .await?;
        let tree = self.post_process(template, tree, &context).await?;

        Ok(Resolution { context, tree })
    }

    /// Resolves `template`, writes the result under the project directory
    /// and runs the post-actions.
    ///
    /// Files that cannot be written are reported, not fatal.
    pub async fn generate(&self, template: &Template, overwrite: bool) -> Result<Generation> {
        let Resolution { context, tree } = self.resolve(template).await?;

        let report = materialize(&tree, &self.project_dir, overwrite).await;
        info!(
            "{}: {} written, {} skipped, {} failed",
            template.module,
            report.written.len(),
            report.skipped.len(),
            report.failed.len()
        );

        self.post_actions(template, &tree, &context).await?;
        Ok(Generation { context, tree, report })
    }

    async fn pre_process(&self, template: &Template, context: VariableContext) -> Result<VariableContext> {
        let scope = HookScope { module: &template.module, utils: &self.utils };
        let mut context = context;

        if let Some(hook) = &template.hooks.pre_processor {
            context = hook.pre_process(context, &scope)?.resolve().await?;
        }
        if let Some(hook) = &template.hooks.legacy_pre_processor {
            warn!("`asyncPreProcessor` is deprecated, use `preProcessor`");
            context = hook.pre_process(context, &scope)?.resolve().await?;
        }
        Ok(context)
    }

    async fn post_process(&self, template: &Template, tree: Tree, context: &VariableContext) -> Result<Tree> {
        let scope = HookScope { module: &template.module, utils: &self.utils };
        let mut tree = tree;

        if let Some(hook) = &template.hooks.post_processor {
            tree = hook.post_process(tree, context, &scope)?.resolve().await?;
        }
        if let Some(hook) = &template.hooks.legacy_post_processor {
            warn!("`asyncPostProcessor` is deprecated, use `postProcessor`");
            tree = hook.post_process(tree, context, &scope)?.resolve().await?;
        }
        Ok(tree)
    }

    async fn post_actions(&self, template: &Template, tree: &Tree, context: &VariableContext) -> Result<()> {
        let scope = HookScope { module: &template.module, utils: &self.utils };

        if let Some(hook) = &template.hooks.post_actions {
            hook.run(tree, context, &scope)?.resolve().await?;
        }
        if let Some(hook) = &template.hooks.legacy_post_actions {
            warn!("`asyncPostActions` is deprecated, use `postActions`");
            hook.run(tree, context, &scope)?.resolve().await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::ExecutableLoader;
    use crate::prompt::AutomaticPrompter;
    use crate::renderer::MiniJinjaRenderer;

    #[test]
    fn prompt_config_comes_from_the_project() {
        let config = ProjectConfig::sample();
        let prompter = AutomaticPrompter::new();
        let scripts = ExecutableLoader::new("/work");
        let pipeline =
            Pipeline::new(Arc::new(MiniJinjaRenderer::new()), &prompter, &scripts, &config, "/work");

        let prompt_config = pipeline.prompt_config();
        assert_eq!(prompt_config.project_dir, PathBuf::from("/work"));
        assert_eq!(prompt_config.output_paths, config.generator_output_paths);
    }
}
