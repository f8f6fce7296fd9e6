//! Hooks and file renderers backed by executables.
//!
//! The executable runs inside the project directory. It receives a JSON
//! document on stdin and answers on stdout:
//!
//! | role           | stdin                          | stdout                    |
//! |----------------|--------------------------------|---------------------------|
//! | pre-processor  | `{module, context}`            | new context (JSON)        |
//! | post-processor | `{module, context, tree}`      | new tree (JSON)           |
//! | post-action    | `{module, context, tree}`      | logged                    |
//! | script file    | `{module, context}`            | content of the file       |
//!
//! Empty stdout from a pre- or post-processor keeps its input unchanged.
//! A non-zero exit status fails the run.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{HookOutput, HookScope, PostAction, PostProcessor, PreProcessor};
use crate::config::{context_to_json, VariableContext};
use crate::error::{Error, Result};
use crate::vfs::Tree;

#[derive(Serialize)]
struct Input<'a> {
    module: &'a str,
    context: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    tree: Option<&'a Tree>,
}

impl<'a> Input<'a> {
    fn encode(module: &'a str, context: &VariableContext, tree: Option<&'a Tree>) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(&Input { module, context: context_to_json(context), tree })?)
    }
}

/// Executes `script` in `cwd` with `input` on stdin and returns its stdout.
///
/// Scripts that exit without reading stdin are fine; the broken pipe is
/// only logged.
pub async fn run_script(script: &Path, args: &[&str], cwd: &Path, input: &[u8]) -> Result<String> {
    let script = tokio::fs::canonicalize(script).await?;
    debug!("Running '{}' in '{}'", script.display(), cwd.display());

    let mut child = Command::new(&script)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()?;

    let stdin = child.stdin.take();
    let feed = async {
        let Some(mut stdin) = stdin else {
            return;
        };
        if let Err(e) = stdin.write_all(input).await {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                debug!("'{}' closed stdin before reading its input", script.display());
            } else {
                warn!("Failed to write to stdin of '{}': {e}", script.display());
            }
        }
    };

    // stdout is drained while stdin is still being fed
    let ((), output) = tokio::join!(feed, child.wait_with_output());
    let output = output?;
    if !output.status.success() {
        return Err(Error::HookExecutionError {
            script: script.display().to_string(),
            status: output.status,
        });
    }

    String::from_utf8(output.stdout).map_err(|e| Error::HookOutputError {
        script: script.display().to_string(),
        reason: e.to_string(),
    })
}

fn parse_or_keep<T: DeserializeOwned>(script: &Path, stdout: &str, input: T) -> Result<T> {
    if stdout.trim().is_empty() {
        return Ok(input);
    }
    serde_json::from_str(stdout).map_err(|e| Error::HookOutputError {
        script: script.display().to_string(),
        reason: e.to_string(),
    })
}

/// A hook implemented by an executable.
#[derive(Debug, Clone)]
pub struct ScriptHook {
    script: PathBuf,
}

impl ScriptHook {
    pub fn new<P: Into<PathBuf>>(script: P) -> Self {
        Self { script: script.into() }
    }

    pub fn script(&self) -> &Path {
        &self.script
    }
}

impl PreProcessor for ScriptHook {
    fn pre_process(
        &self,
        context: VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<VariableContext>> {
        let input = Input::encode(scope.module, &context, None)?;
        let script = self.script.clone();
        let cwd = scope.utils.project_dir().to_path_buf();

        Ok(HookOutput::Deferred(Box::pin(async move {
            let stdout = run_script(&script, &[], &cwd, &input).await?;
            parse_or_keep(&script, &stdout, context)
        })))
    }
}

impl PostProcessor for ScriptHook {
    fn post_process(
        &self,
        tree: Tree,
        context: &VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<Tree>> {
        let input = Input::encode(scope.module, context, Some(&tree))?;
        let script = self.script.clone();
        let cwd = scope.utils.project_dir().to_path_buf();

        Ok(HookOutput::Deferred(Box::pin(async move {
            let stdout = run_script(&script, &[], &cwd, &input).await?;
            parse_or_keep(&script, &stdout, tree)
        })))
    }
}

impl PostAction for ScriptHook {
    fn run(
        &self,
        tree: &Tree,
        context: &VariableContext,
        scope: &HookScope<'_>,
    ) -> Result<HookOutput<()>> {
        let input = Input::encode(scope.module, context, Some(tree))?;
        let script = self.script.clone();
        let cwd = scope.utils.project_dir().to_path_buf();

        Ok(HookOutput::Deferred(Box::pin(async move {
            let stdout = run_script(&script, &[], &cwd, &input).await?;
            for line in stdout.lines() {
                info!("{line}");
            }
            Ok(())
        })))
    }
}

/// Produces the content of a `script` file of a template.
pub trait ScriptRender: Send + Sync {
    fn render(&self, module: &str, context: &VariableContext) -> Result<HookOutput<String>>;
}

/// Turns a template file into a [`ScriptRender`].
pub trait ScriptLoader: Send + Sync {
    fn load(&self, script: &Path) -> Result<Box<dyn ScriptRender>>;
}

/// Loads script files as executables run inside the project directory.
///
/// The module name is passed as the only argument.
#[derive(Debug, Clone)]
pub struct ExecutableLoader {
    project_dir: PathBuf,
}

impl ExecutableLoader {
    pub fn new<P: Into<PathBuf>>(project_dir: P) -> Self {
        Self { project_dir: project_dir.into() }
    }
}

impl ScriptLoader for ExecutableLoader {
    fn load(&self, script: &Path) -> Result<Box<dyn ScriptRender>> {
        if !script.is_file() {
            return Err(Error::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("script '{}' not found", script.display()),
            )));
        }
        Ok(Box::new(ExecutableScript {
            script: script.to_path_buf(),
            project_dir: self.project_dir.clone(),
        }))
    }
}

struct ExecutableScript {
    script: PathBuf,
    project_dir: PathBuf,
}

impl ScriptRender for ExecutableScript {
    fn render(&self, module: &str, context: &VariableContext) -> Result<HookOutput<String>> {
        let input = Input::encode(module, context, None)?;
        let script = self.script.clone();
        let cwd = self.project_dir.clone();
        let module = module.to_string();

        Ok(HookOutput::Deferred(Box::pin(async move {
            run_script(&script, &[&module], &cwd, &input).await
        })))
    }
}
