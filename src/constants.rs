//! Constants used throughout the modgen application

/// Project configuration file names in order of preference
pub const CONFIG_FILENAMES: &[&str] = &[".modgen.json", ".modgen.yaml", ".modgen.yml"];

/// Template manifest file names in order of preference
pub const MANIFEST_FILENAMES: &[&str] = &["info.json", "info.yaml", "info.yml"];

/// Module argument meaning "pick one interactively"
pub const ANY_MODULE: &str = "*";

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Separator used between segments of VFS paths, independent of the host OS
pub const VFS_SEPARATOR: char = '/';

/// Line ending used by the text patch builder when none is configured
#[cfg(windows)]
pub const DEFAULT_EOL: &str = "\r\n";
#[cfg(not(windows))]
pub const DEFAULT_EOL: &str = "\n";

/// Extensions of glob-matched files rendered as text templates
pub const TEMPLATE_EXTENSIONS: &[&str] = &["j2", "jinja", "tpl", "txt"];

/// Extensions of glob-matched files rendered by executing them
pub const SCRIPT_EXTENSIONS: &[&str] = &["sh"];

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = -1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
