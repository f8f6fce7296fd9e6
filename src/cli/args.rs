use crate::constants::{exit_codes, verbosity, ANY_MODULE};
use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use std::fmt::Display;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// What `modgen init` writes.
#[derive(Debug, Clone, ValueEnum, Copy, PartialEq, Default)]
pub enum InitTarget {
    /// The project configuration file.
    #[default]
    Main,
    /// A sample module template.
    TemplateSample,
}

impl Display for InitTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InitTarget::Main => "main",
            InitTarget::TemplateSample => "template-sample",
        };
        write!(f, "{s}")
    }
}

/// Scaffold modules of a project from templates.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Project directory.
    #[arg(short = 'C', long = "project-dir", global = true, default_value = ".")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default configuration or a sample template.
    Init(InitArgs),
    /// Generate a module from one of the configured templates.
    #[command(visible_alias = "generate")]
    Gen(GenArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct InitArgs {
    #[arg(value_enum, default_value_t = InitTarget::Main)]
    pub target: InitTarget,
}

#[derive(clap::Args, Debug, Clone)]
pub struct GenArgs {
    /// Module to generate; `*` picks one interactively.
    #[arg(value_name = "MODULE", default_value = ANY_MODULE)]
    pub module: String,

    /// Replace files that already exist.
    #[arg(long)]
    pub overwrite: bool,

    /// Preset answers as a JSON object or `-` to read from stdin.
    #[arg(short, long)]
    pub answers: Option<String>,

    /// Answer from presets and defaults without prompting.
    #[arg(long = "non-interactive")]
    pub non_interactive: bool,
}

/// Parse command line arguments, printing the help when a subcommand is missing.
pub fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if matches!(
            e.kind(),
            ErrorKind::MissingRequiredArgument
                | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                | ErrorKind::MissingSubcommand
        ) {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
