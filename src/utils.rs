//! Helpers handed to hooks while a module is generated.

use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Output};

use log::debug;
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::patch::{PatchBuilder, PatchOptions};
use crate::vfs::{Tree, TreePatcher};

#[derive(Debug, Clone)]
pub struct TemplateUtils {
    project_dir: PathBuf,
}

impl TemplateUtils {
    pub fn new<P: AsRef<Path>>(project_dir: P) -> Self {
        Self { project_dir: project_dir.as_ref().to_path_buf() }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn patch_tree(&self, tree: Tree) -> TreePatcher {
        TreePatcher::new(tree)
    }

    /// Starts a patch of `file`; relative paths are resolved against the
    /// project directory.
    pub fn patch_file<P: AsRef<Path>>(&self, file: P, options: PatchOptions) -> PatchBuilder {
        PatchBuilder::new(self.project_dir.join(file), options)
    }

    /// Runs `command` through the shell inside the project directory and
    /// returns its stdout. A non-zero exit status is an error.
    pub async fn exec(&self, command: &str) -> Result<String> {
        debug!("exec: {command}");
        let output = shell(command).current_dir(&self.project_dir).output().await?;
        Self::collect(command, output)
    }

    /// Blocking variant of [`TemplateUtils::exec`].
    pub fn exec_sync(&self, command: &str) -> Result<String> {
        debug!("exec_sync: {command}");
        let output = std_shell(command).current_dir(&self.project_dir).output()?;
        Self::collect(command, output)
    }

    fn collect(command: &str, output: Output) -> Result<String> {
        if !output.stderr.is_empty() {
            debug!("{command}: {}", String::from_utf8_lossy(&output.stderr).trim_end());
        }
        if !output.status.success() {
            return Err(Error::CommandFailed { command: command.to_string(), status: output.status });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(not(windows))]
fn std_shell(command: &str) -> StdCommand {
    let mut cmd = StdCommand::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

#[cfg(windows)]
fn std_shell(command: &str) -> StdCommand {
    let mut cmd = StdCommand::new("cmd");
    cmd.arg("/C").arg(command);
    cmd
}

fn shell(command: &str) -> Command {
    Command::from(std_shell(command))
}
