//! Interactive and non-interactive collection of template variables
//!
//! - `interface`: the [`VariablePrompter`] trait the pipeline depends on
//! - `dialoguer`: terminal implementation built on the dialoguer library
//! - `automatic`: answers from presets and defaults without user interaction

pub mod automatic;
pub mod dialoguer;
pub mod interface;

pub use automatic::AutomaticPrompter;
pub use dialoguer::DialoguerPrompter;
pub use interface::{PromptConfig, VariablePrompter};
