//! The zsh adapter: emits `compadd` invocations, with aligned
//! descriptions when the completion system provides enough columns.

use std::fmt::Write as _;

use crate::{complete::Completions, error};

/// Default column budget when the shell didn't report one.
const DEFAULT_COLUMNS: usize = 80;

/// Gap between a padded word and its description.
const DESCRIPTION_SEPARATOR: &str = "  -- ";

/// Rejects completion under zsh anchor matchers (`l`, `r`, `b`, `e`
/// specs): candidates produced by this engine would be misapplied.
pub(super) fn reject_anchored_matchers(
    state: &[(String, String)],
) -> Result<(), error::Error> {
    for (key, value) in state {
        if key == "_matcher" {
            let first_segment = value.split(':').next().unwrap_or_default();
            if matches!(first_segment, "l" | "r" | "b" | "e") {
                return Err(error::ErrorKind::MatcherNotSupported(value.clone()).into());
            }
        }
    }
    Ok(())
}

/// Serializes completion results as a zsh script to be eval'ed inside
/// the generated completion function.
pub(super) fn serialize(results: Vec<Completions>, state: &[(String, String)]) -> String {
    let columns = state
        .iter()
        .find(|(key, _)| key == "_cols")
        .and_then(|(_, value)| value.parse().ok())
        .unwrap_or(DEFAULT_COLUMNS);

    let mut script = String::new();
    for mut completions in results {
        if completions.wants_delegation() {
            let _ = writeln!(
                script,
                "words=(${{words[{},-1]}}); _normal -p {}",
                completions.delegate.num_to_remove + 1,
                super::quote_single(&completions.delegate.command),
            );
            continue;
        }

        for group in &mut completions.groups {
            if group.matches.is_empty() {
                if group.is_files {
                    script.push_str("_files\n");
                }
                continue;
            }

            if group.is_files {
                group.trim_trailing_slashes();
            }
            let prefix = group.remove_common_prefix();

            let mut flags = String::new();
            let _ = write!(flags, "-U -J {}", super::quote_single(&group.title));
            let _ = write!(flags, " -X {}", super::quote_single(&group.title));
            if !prefix.is_empty() {
                let _ = write!(flags, " -p {}", super::quote_single(&prefix));
            }
            if group.no_trailing_space {
                flags.push_str(" -S ''");
            }
            if group.is_files {
                flags.push_str(" -f");
            }

            if group.has_descriptions() {
                let word_width = group
                    .matches
                    .iter()
                    .map(|m| whisker_text::visible_width(&m.word))
                    .max()
                    .unwrap_or(0);
                let description_budget = columns
                    .saturating_sub(word_width + DESCRIPTION_SEPARATOR.len())
                    .max(8);

                script.push_str("compdescriptions=(");
                for m in &group.matches {
                    let padding = " "
                        .repeat(word_width.saturating_sub(whisker_text::visible_width(&m.word)));
                    let description =
                        whisker_text::truncate_to_width(&m.description, description_budget);
                    let line =
                        std::format!("{}{padding}{DESCRIPTION_SEPARATOR}{description}", m.word);
                    script.push_str(&super::quote_single(&line));
                    script.push(' ');
                }
                script.push_str(")\n");
                let _ = write!(script, "compadd -l -d compdescriptions {flags} -- ");
            } else {
                let _ = write!(script, "compadd {flags} -- ");
            }

            for m in &group.matches {
                script.push_str(&super::quote_single(&m.word));
                script.push(' ');
            }
            script.push('\n');
        }
    }

    script
}

/// The shell-side wiring for one command.
pub(super) fn setup(command: &str) -> String {
    let function = super::function_name("_whisker_complete_", command);
    let quoted = super::quote_single(command);
    std::format!(
        r#"#compdef {command}
{function}() {{
    local src
    src=$(printf "%s\n" "${{(@)words[1,CURRENT]}}" | {quoted} __complete__ zsh "_matcher=$_matcher" "_cols=$COLUMNS")
    if [[ $? == 0 ]]; then
        eval "$src"
    fi
}}
compdef {function} {command}
"#
    )
}
