//! Output formatting module.

mod formatter;
mod human;
mod json;

pub use formatter::OutputFormatter;

use human::HumanFormatter;
use json::JsonFormatter;

/// How results are presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Json,
    Human { verbose: bool, quiet: bool },
}

impl OutputMode {
    /// Resolves the global CLI flags. `--json` wins over the human toggles.
    pub const fn from_flags(json: bool, verbose: bool, quiet: bool) -> Self {
        if json {
            Self::Json
        } else {
            Self::Human { verbose, quiet }
        }
    }

    /// Creates the formatter for this mode.
    pub fn formatter(self) -> Box<dyn OutputFormatter> {
        match self {
            Self::Json => Box::new(JsonFormatter),
            Self::Human { verbose, quiet } => Box::new(HumanFormatter::new(verbose, quiet)),
        }
    }
}
