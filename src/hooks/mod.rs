//! Template hooks.
//!
//! A template can customize generation at three points: a pre-processor
//! rewrites the variable context before rendering, a post-processor
//! rewrites the rendered tree before it is written, and post-actions run
//! after the files are on disk. Each hook may answer immediately or hand
//! back a future through [`HookOutput`]; the pipeline awaits either form.
//!
//! Hooks come from the template manifest, either as executables (see
//! [`script`]) or as declarative patch lists (see [`declarative`]). Any
//! closure with the right signature is a hook as well.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use futures::future::BoxFuture;
use log::debug;

use crate::config::{PostActionSpec, PostProcessorSpec, TemplateManifest, VariableContext};
use crate::error::Result;
use crate::renderer::TemplateRenderer;
use crate::utils::TemplateUtils;
use crate::vfs::Tree;

pub mod declarative;
pub mod script;

pub use declarative::{FilePatchAction, TreePatchProcessor};
pub use script::{ExecutableLoader, ScriptHook, ScriptLoader, ScriptRender};

/// Result of a hook: a value now or a value later.
pub enum HookOutput<T> {
    Immediate(T),
    Deferred(BoxFuture<'static, Result<T>>),
}

impl<T> HookOutput<T> {
    pub async fn resolve(self) -> Result<T> {
        match self {
            HookOutput::Immediate(value) => Ok(value),
            HookOutput::Deferred(future) => future.await,
        }
    }
}

impl<T> From<T> for HookOutput<T> {
    fn from(value: T) -> Self {
        HookOutput::Immediate(value)
    }
}

/// What a hook knows about the current run.
pub struct HookScope<'a> {
    pub module: &'a str,
    pub utils: &'a TemplateUtils,
}

pub trait PreProcessor: Send + Sync {
    fn pre_process(
        &self,
        context: VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<VariableContext>>;
}

pub trait PostProcessor: Send + Sync {
    fn post_process(
        &self,
        tree: Tree,
        context: &VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<Tree>>;
}

pub trait PostAction: Send + Sync {
    fn run(
        &self,
        tree: &Tree,
        context: &VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<()>>;
}

impl<F> PreProcessor for F
where
    F: Fn(VariableContext, &HookScope<'_>) -> Result<HookOutput<VariableContext>> + Send + Sync,
{
    fn pre_process(
        &self,
        context: VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<VariableContext>> {
        self(context, scope)
    }
}

impl<F> PostProcessor for F
where
    F: Fn(Tree, &VariableContext, &HookScope<'_>) -> Result<HookOutput<Tree>> + Send + Sync,
{
    fn post_process(
        &self,
        tree: Tree,
        context: &VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<Tree>> {
        self(tree, context, scope)
    }
}

impl<F> PostAction for F
where
    F: Fn(&Tree, &VariableContext, &HookScope<'_>) -> Result<HookOutput<()>> + Send + Sync,
{
    fn run(
        &self,
        tree: &Tree,
        context: &VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<()>> {
        self(tree, context, scope)
    }
}

/// The hooks of one template.
///
/// The `legacy_*` slots hold the deprecated `async*` manifest keys. They
/// run after their primary counterpart and log a deprecation warning.
#[derive(Default)]
pub struct Hooks {
    pub pre_processor: Option<Box<dyn PreProcessor>>,
    pub legacy_pre_processor: Option<Box<dyn PreProcessor>>,
    pub post_processor: Option<Box<dyn PostProcessor>>,
    pub legacy_post_processor: Option<Box<dyn PostProcessor>>,
    pub post_actions: Option<Box<dyn PostAction>>,
    pub legacy_post_actions: Option<Box<dyn PostAction>>,
}

impl Hooks {
    pub fn from_manifest(
        manifest: &TemplateManifest,
        template_root: &Path,
        engine: Arc<dyn TemplateRenderer>,
    ) -> Result<Self> {
        let pre = |script: &String| -> Box<dyn PreProcessor> {
            Box::new(ScriptHook::new(template_root.join(script)))
        };
        let post = |spec: &PostProcessorSpec| -> Result<Box<dyn PostProcessor>> {
            let hook: Box<dyn PostProcessor> = match spec {
                PostProcessorSpec::Script(script) => {
                    Box::new(ScriptHook::new(template_root.join(script)))
                }
                PostProcessorSpec::Steps(steps) => {
                    Box::new(TreePatchProcessor::new(steps.clone(), engine.clone())?)
                }
            };
            Ok(hook)
        };
        let actions = |spec: &PostActionSpec| -> Result<Box<dyn PostAction>> {
            let hook: Box<dyn PostAction> = match spec {
                PostActionSpec::Script(script) => {
                    Box::new(ScriptHook::new(template_root.join(script)))
                }
                PostActionSpec::Patches(patches) => {
                    Box::new(FilePatchAction::new(patches.clone(), engine.clone())?)
                }
            };
            Ok(hook)
        };

        let hooks = Self {
            pre_processor: manifest.pre_processor.as_ref().map(pre),
            legacy_pre_processor: manifest.async_pre_processor.as_ref().map(pre),
            post_processor: manifest.post_processor.as_ref().map(post).transpose()?,
            legacy_post_processor: manifest.async_post_processor.as_ref().map(post).transpose()?,
            post_actions: manifest.post_actions.as_ref().map(actions).transpose()?,
            legacy_post_actions: manifest.async_post_actions.as_ref().map(actions).transpose()?,
        };
        debug!("Loaded hooks: {hooks:?}");
        Ok(hooks)
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_processor", &self.pre_processor.is_some())
            .field("legacy_pre_processor", &self.legacy_pre_processor.is_some())
            .field("post_processor", &self.post_processor.is_some())
            .field("legacy_post_processor", &self.legacy_post_processor.is_some())
            .field("post_actions", &self.post_actions.is_some())
            .field("legacy_post_actions", &self.legacy_post_actions.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VariableValue;
    use crate::renderer::MiniJinjaRenderer;

    #[tokio::test]
    async fn closures_are_hooks() {
        let utils = TemplateUtils::new(".");
        let scope = HookScope { module: "m", utils: &utils };

        let hook = |mut context: VariableContext,
                    scope: &HookScope<'_>|
         -> Result<HookOutput<VariableContext>> {
            context.insert("module".to_string(), VariableValue::from(scope.module));
            Ok(HookOutput::Immediate(context))
        };
        let context = hook.pre_process(VariableContext::new(), &scope).unwrap().resolve().await.unwrap();
        assert_eq!(context["module"], VariableValue::from("m"));
    }

    #[tokio::test]
    async fn deferred_output_is_awaited() {
        let output: HookOutput<u8> = HookOutput::Deferred(Box::pin(async { Ok(7) }));
        assert_eq!(output.resolve().await.unwrap(), 7);
    }

    #[test]
    fn manifest_slots_are_mapped() {
        let manifest: TemplateManifest = serde_json::from_str(
            r#"{"files": [], "preProcessor": "pre.sh", "asyncPostProcessor": ["flat"]}"#,
        )
        .unwrap();
        let hooks =
            Hooks::from_manifest(&manifest, Path::new("t"), Arc::new(MiniJinjaRenderer::new()))
                .unwrap();
        assert!(hooks.pre_processor.is_some());
        assert!(hooks.legacy_pre_processor.is_none());
        assert!(hooks.post_processor.is_none());
        assert!(hooks.legacy_post_processor.is_some());
    }

    #[test]
    fn invalid_regex_in_steps_fails_loading() {
        let manifest: TemplateManifest = serde_json::from_str(
            r#"{"files": [], "postProcessor": [{"moveFiles": {"match": {"regex": "("}, "to": "x"}}]}"#,
        )
        .unwrap();
        let result =
            Hooks::from_manifest(&manifest, Path::new("t"), Arc::new(MiniJinjaRenderer::new()));
        assert!(result.is_err());
    }
}
