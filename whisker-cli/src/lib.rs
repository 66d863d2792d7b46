//! Core implementation of the whisker command-line engine: a
//! hierarchical command tree with typed options, an argument parser, a
//! shell-agnostic completion engine with per-shell adapters, and a
//! markup-styled help formatter.

#![deny(missing_docs)]

pub mod command;
pub mod complete;
pub mod error;
pub mod help;
pub mod markup;
pub mod options;
pub mod parse;
pub mod shells;
pub mod trace_categories;

pub use command::{Command, CommandGroup, CommandPath};
pub use complete::{Completions, Delegate, Match, MatchGroup};
pub use error::{Error, ErrorKind};
pub use options::{Alias, CliOption, OptionGroup, OptionKind, OptionSpec, OptionValue};
pub use parse::{Context, parse_args};
pub use shells::Shell;
