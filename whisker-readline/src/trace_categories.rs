//! Trace utilities

/// Trace category for history persistence.
pub const HISTORY: &str = "history";
/// Trace category for user input handling.
pub const INPUT: &str = "input";
/// Trace category for screen redraws.
pub const RENDER: &str = "render";
