//! The bash adapter: emits a script that fills `COMPREPLY`.

use std::fmt::Write as _;

use crate::complete::Completions;

/// Serializes completion results as a bash script to be eval'ed by the
/// generated completion function.
pub(super) fn serialize(results: &[Completions]) -> String {
    let mut script = String::new();

    for completions in results {
        if completions.wants_delegation() {
            // Hand the line to bash's own completion for the target
            // command, dropping the wrapper words.
            let _ = writeln!(
                script,
                "_command_offset {}",
                completions.delegate.num_to_remove
            );
            continue;
        }

        let mut nospace = false;
        let mut filenames = false;
        for group in &completions.groups {
            nospace = nospace || group.no_trailing_space;
            filenames = filenames || group.is_files;

            for m in &group.matches {
                let _ = writeln!(
                    script,
                    "COMPREPLY+=({})",
                    super::quote_single(&std::format!("{}{}", group.word_prefix, m.word))
                );
            }
        }

        if nospace {
            script.push_str("compopt -o nospace\n");
        }
        if filenames {
            script.push_str("compopt -o filenames\n");
        }
    }

    script
}

/// The shell-side wiring for one command.
pub(super) fn setup(command: &str) -> String {
    let function = super::function_name("_whisker_complete_", command);
    let quoted = super::quote_single(command);
    std::format!(
        r#"{function}() {{
    local src
    local limit="$((COMP_CWORD + 1))"
    src=$(printf "%s\n" "${{COMP_WORDS[@]:0:$limit}}" | {quoted} __complete__ bash)
    if [[ $? == 0 ]]; then
        eval "$src"
    fi
}}
complete -F {function} {command}
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::complete::{Delegate, MatchGroup};

    fn completions_with_group(group: MatchGroup) -> Completions {
        Completions {
            groups: vec![group],
            ..Completions::default()
        }
    }

    #[test]
    fn test_serialize_matches() {
        let mut group = MatchGroup::default();
        group.add("child1", "First child");

        let script = serialize(&[completions_with_group(group)]);
        assert!(script.contains("COMPREPLY+=('child1')"));
        assert!(!script.contains("_command_offset"));
    }

    #[test]
    fn test_serialize_delegation() {
        let completions = Completions {
            delegate: Delegate {
                num_to_remove: 2,
                command: String::from("ssh"),
            },
            ..Completions::default()
        };

        let script = serialize(&[completions]);
        assert!(script.contains("_command_offset 2"));
        assert!(!script.contains("COMPREPLY"));
    }

    #[test]
    fn test_serialize_nospace_and_filenames() {
        let mut group = MatchGroup {
            no_trailing_space: true,
            is_files: true,
            ..MatchGroup::default()
        };
        group.add("src/", "");

        let script = serialize(&[completions_with_group(group)]);
        assert!(script.contains("compopt -o nospace"));
        assert!(script.contains("compopt -o filenames"));
    }

    #[test]
    fn test_setup_mentions_complete_entry() {
        let script = setup("app");
        assert!(script.contains("__complete__ bash"));
        assert!(script.contains("complete -F _whisker_complete_app app"));
    }
}
