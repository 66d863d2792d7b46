//! Shell adapters: per-shell request parsing and completion
//! serialization, plus the `setup` scripts that wire a shell's native
//! completion machinery to the `__complete__` entry point.

mod bash;
mod fish;
mod json;
mod zsh;

use std::str::FromStr;

use crate::{command::Command, complete, error, trace_categories};

/// The shells the completion engine can serve.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    strum_macros::Display,
    strum_macros::EnumIter,
    strum_macros::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum Shell {
    /// GNU bash.
    Bash,
    /// zsh.
    Zsh,
    /// fish.
    Fish,
    /// Structured JSON pass-through.
    Json,
}

impl Shell {
    /// Parses a shell name, yielding the `Unsupported shell` error the
    /// CLI surface promises for unknown names.
    pub fn from_name(name: &str) -> Result<Self, error::Error> {
        Self::from_str(name)
            .map_err(|_| error::ErrorKind::UnsupportedShell(name.to_owned()).into())
    }

    /// Whether this shell splits words on `=`, so that candidates for
    /// `--name=value` forms must carry only the value part.
    pub const fn splits_on_equals(self) -> bool {
        matches!(self, Self::Bash)
    }
}

/// Serves one `__complete__` invocation: parses `input` (the shell's
/// stdin payload) according to `shell`, runs each request through the
/// completion engine, and serializes the shell-specific reply.
pub fn handle_request(
    root: &Command,
    shell: Shell,
    state: &[(String, String)],
    input: &str,
) -> Result<String, error::Error> {
    tracing::debug!(target: trace_categories::SHELLS, "completion request for {shell}");

    let batches = match shell {
        Shell::Bash => vec![parse_word_lines(input)],
        Shell::Zsh => {
            zsh::reject_anchored_matchers(state)?;
            vec![parse_word_lines(input)]
        }
        Shell::Fish => vec![parse_word_lines(input)],
        Shell::Json => json::parse_requests(input)?,
    };

    let results: Vec<complete::Completions> = batches
        .into_iter()
        .map(|words| complete::complete_argv(root, &words, shell.splits_on_equals()))
        .collect();

    match shell {
        Shell::Bash => Ok(bash::serialize(&results)),
        Shell::Zsh => Ok(zsh::serialize(results, state)),
        Shell::Fish => Ok(fish::serialize(&results)),
        Shell::Json => json::serialize(&results),
    }
}

/// Emits the shell-side wiring script for the named commands.
pub fn setup_script(shell: Shell, command_names: &[String]) -> String {
    let mut script = String::new();
    for name in command_names {
        let wired = match shell {
            Shell::Bash => bash::setup(name),
            Shell::Zsh => zsh::setup(name),
            Shell::Fish => fish::setup(name),
            Shell::Json => String::new(),
        };
        script.push_str(&wired);
        script.push('\n');
    }
    script
}

/// Parses the newline-separated word protocol shared by the bash, zsh
/// and fish adapters. A trailing blank line (`\n\n` at the end of the
/// payload) means the cursor sits on a new, empty word.
fn parse_word_lines(input: &str) -> Vec<String> {
    let mut words: Vec<String> = input.split('\n').map(str::to_owned).collect();
    // The final newline is a terminator, not a separator.
    if input.ends_with('\n') {
        words.pop();
    }
    words
}

/// Quotes a string for POSIX-style shells using single quotes.
pub(crate) fn quote_single(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('\'');
    for c in s.chars() {
        if c == '\'' {
            quoted.push_str("'\\''");
        } else {
            quoted.push(c);
        }
    }
    quoted.push('\'');
    quoted
}

/// Turns a command name into a safe shell function identifier.
pub(crate) fn function_name(prefix: &str, command: &str) -> String {
    let sanitized: String = command
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    std::format!("{prefix}{sanitized}")
}
