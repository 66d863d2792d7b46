//! Error facilities for the command-line engine.

/// Unified error type for this crate. Contains just a kind for now,
/// but may be extended later with additional context.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error {
    /// The kind of error.
    kind: ErrorKind,
}

impl Error {
    /// Returns the kind of this error.
    pub const fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns whether this error arose from user-supplied command-line
    /// text (as opposed to a declaration-time or I/O problem). Usage
    /// errors are rendered with markup and exit with code 1.
    pub const fn is_usage_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UnknownOption { .. }
                | ErrorKind::AmbiguousOption { .. }
                | ErrorKind::BadOptionValue { .. }
                | ErrorKind::BadChoice { .. }
                | ErrorKind::OptionNeedsValue(_)
                | ErrorKind::UnexpectedOptionValue { .. }
                | ErrorKind::UnknownSubcommand { .. }
                | ErrorKind::MissingSubcommand(_)
        )
    }
}

/// Monolithic error type for the command-line engine.
///
/// Display strings may embed `:role:`payload`` markup; the outermost CLI
/// entry point expands it (or strips it when stderr is not a terminal).
#[derive(thiserror::Error, Debug)]
pub enum ErrorKind {
    /// An option was named on the command line that does not exist.
    #[error("Unknown option :yellow:`{name}`{}", format_suggestions(suggestions))]
    UnknownOption {
        /// The option name as typed, including hyphens.
        name: String,
        /// Close matches by edit distance, if any.
        suggestions: Vec<String>,
    },

    /// An abbreviated option matched more than one known option.
    #[error("Ambiguous option :yellow:`{name}` could match any of: {}", candidates.join(", "))]
    AmbiguousOption {
        /// The option name as typed, including hyphens.
        name: String,
        /// The full alias of every candidate it could abbreviate.
        candidates: Vec<String>,
    },

    /// A value supplied for an option could not be parsed under its type.
    #[error("Invalid value :yellow:`{value}` for option :bold:`{option}`: {reason}")]
    BadOptionValue {
        /// The option's alias as used on the command line.
        option: String,
        /// The offending value text.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A value was supplied that is not one of the option's choices.
    #[error("Invalid choice :yellow:`{value}` for option :bold:`{option}`; valid choices: {}", allowed.join(", "))]
    BadChoice {
        /// The option's alias as used on the command line.
        option: String,
        /// The offending value text.
        value: String,
        /// The declared choice set.
        allowed: Vec<String>,
    },

    /// An option that takes a value appeared as the final token with no
    /// value following it.
    #[error("Option :yellow:`{0}` must be followed by a value")]
    OptionNeedsValue(String),

    /// An `=value` was attached to an option that takes no value.
    #[error("Option :yellow:`{option}` does not take a value, found :yellow:`{value}`")]
    UnexpectedOptionValue {
        /// The option's alias as used on the command line.
        option: String,
        /// The attached value text.
        value: String,
    },

    /// A subcommand was named that does not exist.
    #[error("Unknown subcommand :yellow:`{name}` for :bold:`{parent}`{}", format_suggestions(suggestions))]
    UnknownSubcommand {
        /// The subcommand name as typed.
        name: String,
        /// The fully-qualified name of the command it was looked up in.
        parent: String,
        /// Close matches by edit distance, if any.
        suggestions: Vec<String>,
    },

    /// A command that requires a subcommand was invoked without one.
    #[error("Command :bold:`{0}` requires a subcommand")]
    MissingSubcommand(String),

    /// A textual option specification could not be parsed.
    #[error("invalid option spec: {0}")]
    OptionSpec(String),

    /// Two options in the same command share an alias.
    #[error("duplicate option alias '{alias}' in command '{command}'")]
    DuplicateAlias {
        /// The command in which the duplicate was detected.
        command: String,
        /// The alias text, including hyphens.
        alias: String,
    },

    /// Two subcommands of the same command share a name.
    #[error("duplicate subcommand '{name}' in command '{command}'")]
    DuplicateSubcommand {
        /// The command in which the duplicate was detected.
        command: String,
        /// The subcommand name.
        name: String,
    },

    /// A completion request named a shell this build does not support.
    #[error("Unsupported shell: {0}")]
    UnsupportedShell(String),

    /// The zsh adapter was asked to complete under an anchored matcher
    /// specification, which it cannot honor.
    #[error("completion not supported with matcher spec: {0}")]
    MatcherNotSupported(String),

    /// A completion request arriving on stdin was malformed.
    #[error("malformed completion request: {0}")]
    BadCompletionRequest(String),

    /// A command path no longer resolves within the tree it was built
    /// against.
    #[error("stale command path")]
    StaleCommandPath,

    /// An I/O error occurred.
    #[error("i/o error: {0}")]
    IoError(#[from] std::io::Error),

    /// A JSON (de)serialization error occurred.
    #[error("json error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl<T> From<T> for Error
where
    ErrorKind: From<T>,
{
    fn from(convertible_to_kind: T) -> Self {
        Self {
            kind: convertible_to_kind.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::from(".")
    } else {
        std::format!(". Did you mean: {}?", suggestions.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ambiguous_message_lists_candidates() {
        let err: Error = ErrorKind::AmbiguousOption {
            name: String::from("--se"),
            candidates: vec![String::from("--set-me"), String::from("--send")],
        }
        .into();

        let message = err.to_string();
        assert!(message.contains("Ambiguous"));
        assert!(message.contains("--set-me"));
        assert!(message.contains("--send"));
        assert!(err.is_usage_error());
    }

    #[test]
    fn test_unknown_option_suggestions() {
        let err: Error = ErrorKind::UnknownOption {
            name: String::from("--colr"),
            suggestions: vec![String::from("--color")],
        }
        .into();

        assert!(err.to_string().contains("Did you mean: --color?"));
    }

    #[test]
    fn test_unsupported_shell_message() {
        let err: Error = ErrorKind::UnsupportedShell(String::from("tcsh")).into();
        assert_eq!(err.to_string(), "Unsupported shell: tcsh");
        assert!(!err.is_usage_error());
    }
}
