pub mod args;
pub mod init;
pub mod runner;

pub use args::{get_log_level_from_verbose, parse_cli, Cli, Commands, GenArgs, InitArgs, InitTarget};
pub use runner::{run, Runner};
