use std::process::ExitStatus;
use thiserror::Error;

use crate::constants::exit_codes;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),

    #[error("Failed to render. Original error: {0}")]
    MinijinjaError(#[from] minijinja::Error),

    #[error("Invalid glob pattern. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Invalid regular expression. Original error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Prompt failed. Original error: {0}")]
    PromptError(#[from] dialoguer::Error),

    #[error("No configuration file found in '{project_dir}'. Tried: {config_files}.")]
    ConfigNotFound { project_dir: String, config_files: String },

    #[error("No template manifest found in '{template_dir}'. Tried: {manifest_files}.")]
    ManifestNotFound { template_dir: String, manifest_files: String },

    #[error("Add modules to the `templatesPaths` property of the project configuration.")]
    NoModules,

    #[error("Failed to find template '{module}'.")]
    ModuleNotFound { module: String },

    #[error("Unsupported file type for '{entry}'.")]
    UnsupportedFileKind { entry: String },

    #[error("Cannot use {value} as default of variable '{variable}' of type {kind}.")]
    InvalidDefault { variable: String, kind: String, value: String },

    #[error("Hook '{script}' failed with status: {status}")]
    HookExecutionError { script: String, status: ExitStatus },

    #[error("Hook '{script}' produced unusable output: {reason}")]
    HookOutputError { script: String, reason: String },

    #[error("Command '{command}' failed with status: {status}")]
    CommandFailed { command: String, status: ExitStatus },

    #[error("Cancelled by user.")]
    Cancelled,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience type alias for Results with modgen's Error as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Default error handler that prints the error and exits the program.
///
/// Cancellation exits without a diagnostic; every other error is printed
/// to stderr first. Both exit with [`exit_codes::FAILURE`].
pub fn default_error_handler(err: Error) -> ! {
    if !matches!(err, Error::Cancelled) {
        eprintln!("{err}");
    }
    std::process::exit(exit_codes::FAILURE);
}
