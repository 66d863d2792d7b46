//! The fish adapter: emits tab-separated candidate lines, or a rebuilt
//! `complete -C` invocation when delegating.

use std::fmt::Write as _;

use crate::complete::Completions;

/// Serializes completion results as a fish script.
pub(super) fn serialize(results: &[Completions]) -> String {
    let mut script = String::new();

    for completions in results {
        if completions.wants_delegation() {
            // Rebuild the remaining command line, quoted for fish, and
            // hand it to fish's own completion machinery.
            let remaining = completions
                .all_words
                .iter()
                .skip(completions.delegate.num_to_remove)
                .map(|w| quote_double(w))
                .collect::<Vec<_>>()
                .join(" ");
            let _ = writeln!(script, "complete -C {}", quote_double(&remaining));
            continue;
        }

        for group in &completions.groups {
            for m in &group.matches {
                let word = std::format!("{}{}", group.word_prefix, m.word);
                if m.description.is_empty() {
                    let _ = writeln!(script, "echo -- {}", quote_double(&word));
                } else {
                    let _ = writeln!(
                        script,
                        "echo -- {}",
                        quote_double(&std::format!("{word}\t{}", m.description))
                    );
                }
            }
        }
    }

    script
}

/// The shell-side wiring for one command.
pub(super) fn setup(command: &str) -> String {
    let function = super::function_name("__whisker_complete_", command);
    std::format!(
        r#"function {function}
    printf '%s\n' (commandline -opc) (commandline -ct) | command {command} __complete__ fish | source
end
complete -c {command} -f -a '({function})'
"#
    )
}

/// Quotes a string for fish using double quotes.
fn quote_double(s: &str) -> String {
    let mut quoted = String::with_capacity(s.len() + 2);
    quoted.push('"');
    for c in s.chars() {
        if matches!(c, '"' | '\\' | '$') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complete::{Delegate, MatchGroup};

    #[test]
    fn test_serialize_tab_separated_lines() {
        let mut group = MatchGroup::default();
        group.add("child1", "First child");
        group.add("plain", "");

        let completions = Completions {
            groups: vec![group],
            ..Completions::default()
        };

        let script = serialize(&[completions]);
        assert!(script.contains("echo -- \"child1\tFirst child\"\n"));
        assert!(script.contains("echo -- \"plain\"\n"));
    }

    #[test]
    fn test_serialize_delegation_rebuilds_line() {
        let completions = Completions {
            all_words: vec![
                String::from("app"),
                String::from("ssh"),
                String::from("host"),
                String::from("ls"),
            ],
            delegate: Delegate {
                num_to_remove: 2,
                command: String::from("ssh"),
            },
            ..Completions::default()
        };

        let script = serialize(&[completions]);
        assert!(script.starts_with("complete -C "));
        assert!(script.contains("host"));
        assert!(script.contains("ls"));
        assert!(!script.contains("app"));
    }

    #[test]
    fn test_quote_double_escapes() {
        assert_eq!(quote_double("plain"), "\"plain\"");
        assert_eq!(quote_double("a\"b"), "\"a\\\"b\"");
        assert_eq!(quote_double("$HOME"), "\"\\$HOME\"");
    }
}
