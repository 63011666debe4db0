//! Command-line configuration.

use std::path::PathBuf;

use crate::DriverError;

/// Template extension compiled when `--ext` is not given.
pub const DEFAULT_EXT: &str = "qtpl";

/// What the driver should do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverConfig {
    /// Directory searched recursively for templates.
    pub dir: PathBuf,
    /// Single template to compile instead of searching `dir`.
    pub file: Option<PathBuf>,
    /// Extension of template files, without the dot.
    pub ext: String,
    /// Emit `//line` directives into generated code.
    pub line_comments: bool,
    /// Log progress at debug level.
    pub verbose: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            dir: PathBuf::from("."),
            file: None,
            ext: DEFAULT_EXT.to_string(),
            line_comments: true,
            verbose: false,
        }
    }
}

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Compile(DriverConfig),
    Help,
}

/// Parse arguments, excluding the program name.
///
/// Flags take `--name=value` form; a single leading dash is accepted too.
pub fn parse_args(args: &[String]) -> Result<Command, DriverError> {
    let mut config = DriverConfig::default();
    for arg in args {
        let Some(flag) = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-')) else {
            return Err(DriverError::Usage(format!("unexpected argument {arg:?}")));
        };
        let (name, value) = match flag.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (flag, None),
        };
        match (name, value) {
            ("h" | "help", None) => return Ok(Command::Help),
            ("v" | "verbose", None) => config.verbose = true,
            ("skip-line-comments" | "skipLineComments", None) => config.line_comments = false,
            ("dir", Some(dir)) if !dir.is_empty() => config.dir = PathBuf::from(dir),
            ("file", Some(file)) if !file.is_empty() => config.file = Some(PathBuf::from(file)),
            ("ext", Some(ext)) => {
                let ext = ext.trim_start_matches('.');
                if ext.is_empty() {
                    return Err(DriverError::Usage("empty template extension".to_string()));
                }
                config.ext = ext.to_string();
            }
            ("dir" | "file" | "ext", _) => {
                return Err(DriverError::Usage(format!("flag --{name} needs a value")))
            }
            _ => return Err(DriverError::Usage(format!("unknown flag {arg:?}"))),
        }
    }
    Ok(Command::Compile(config))
}
