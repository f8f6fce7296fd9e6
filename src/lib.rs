/// Handles argument parsing and the `init` and `gen` commands.
pub mod cli;

/// Project configuration and template manifests.
pub mod config;

/// Application-wide constants.
pub mod constants;

/// Defines custom error types.
pub mod error;

/// Extension traits for standard library types.
pub mod ext;

/// Glob expansion relative to a directory.
pub mod glob;

/// Pre-processor, post-processor and post-action hooks.
pub mod hooks;

/// Line-oriented edits of files on disk.
pub mod patch;

/// The generation pipeline.
pub mod pipeline;

/// User input and interaction handling.
pub mod prompt;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Loaded module templates and file rendering.
pub mod template;

/// Helpers handed to hooks.
pub mod utils;

/// In-memory virtual file tree.
pub mod vfs;
