//! Trace utilities

/// Trace category for command dispatch.
pub const COMMANDS: &str = "commands";
/// Trace category for completion.
pub const COMPLETION: &str = "completion";
/// Trace category for help rendering.
pub const HELP: &str = "help";
/// Trace category for argument parsing.
pub const PARSE: &str = "parse";
/// Trace category for shell adapters.
pub const SHELLS: &str = "shells";
