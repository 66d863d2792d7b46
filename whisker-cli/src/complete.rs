//! Completion engine: re-walks a partial argument vector against the
//! command tree and produces named groups of completion candidates.

use serde::Serialize;

use crate::{
    command::{Command, CommandPath, OptionLocation, find_option, resolve_option},
    markup, trace_categories,
};

/// Title of the match group holding long options.
pub const GROUP_OPTIONS: &str = "Options";
/// Title of the match group holding short options.
pub const GROUP_SHORT_OPTIONS: &str = "Short options";
/// Title of the match group holding subcommand names.
pub const GROUP_SUBCOMMANDS: &str = "Subcommands";

/// A single completion candidate.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Match {
    /// The candidate text to insert.
    pub word: String,
    /// A short human-readable description, possibly empty.
    pub description: String,
}

/// A titled, ordered collection of completion candidates that shell
/// adapters render as one section.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MatchGroup {
    /// The section title.
    pub title: String,
    /// Whether the shell should suppress the trailing space it would
    /// normally append after inserting a candidate.
    pub no_trailing_space: bool,
    /// Whether the candidates are file names.
    pub is_files: bool,
    /// A common prefix stripped from every candidate, for shells that
    /// re-attach it at insertion time.
    pub word_prefix: String,
    /// The candidates, in order.
    pub matches: Vec<Match>,
}

/// Instructs the shell to drop the first N words of the command line and
/// invoke its own built-in completion for another command instead.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Delegate {
    /// How many leading words to drop.
    pub num_to_remove: usize,
    /// The command whose native completion should take over; empty
    /// means no delegation.
    pub command: String,
}

/// The result of one completion request.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Completions {
    /// The match groups, in presentation order.
    pub groups: Vec<MatchGroup>,
    /// Delegation request, if any.
    pub delegate: Delegate,
    /// All words of the request, including the command word.
    pub all_words: Vec<String>,
    /// Index of the word being completed within `all_words`.
    pub current_word_idx: usize,
    /// Index of the word being completed, relative to the innermost
    /// command's own first word.
    pub current_word_idx_in_parent: usize,
    /// Whether the shell splits words on `=` (and therefore wants only
    /// the value part of `--name=value` candidates).
    pub split_on_equals: bool,
}

impl MatchGroup {
    /// Appends a candidate.
    pub fn add(&mut self, word: impl Into<String>, description: impl Into<String>) {
        self.matches.push(Match {
            word: word.into(),
            description: description.into(),
        });
    }

    /// Returns whether any candidate carries a description.
    pub fn has_descriptions(&self) -> bool {
        self.matches.iter().any(|m| !m.description.is_empty())
    }

    /// Computes the longest common prefix of all candidates, moves it
    /// into `word_prefix`, and strips it from each candidate. No-op for
    /// fewer than two candidates.
    pub fn remove_common_prefix(&mut self) -> String {
        if self.matches.len() < 2 {
            return String::new();
        }

        let mut prefix = self.matches[0].word.clone();
        for m in &self.matches[1..] {
            let common = prefix
                .char_indices()
                .zip(m.word.chars())
                .take_while(|((_, a), b)| a == b)
                .map(|((i, a), _)| i + a.len_utf8())
                .last()
                .unwrap_or(0);
            prefix.truncate(common);
            if prefix.is_empty() {
                return String::new();
            }
        }

        for m in &mut self.matches {
            m.word = m.word[prefix.len()..].to_owned();
        }
        self.word_prefix.clone_from(&prefix);
        prefix
    }

    /// Strips one trailing path separator from each candidate, for
    /// shells that re-add it to directory completions.
    pub fn trim_trailing_slashes(&mut self) {
        for m in &mut self.matches {
            if m.word.len() > 1 && m.word.ends_with('/') {
                m.word.pop();
            }
        }
    }
}

impl Completions {
    /// Constructs an empty result for the given request words.
    pub fn new(words: Vec<String>, split_on_equals: bool) -> Self {
        let current_word_idx = words.len().saturating_sub(1);
        Self {
            all_words: words,
            current_word_idx,
            split_on_equals,
            ..Self::default()
        }
    }

    /// Returns the group with the given title, creating it if needed.
    pub fn add_group(&mut self, title: &str) -> &mut MatchGroup {
        if let Some(index) = self.groups.iter().position(|g| g.title == title) {
            return &mut self.groups[index];
        }
        self.groups.push(MatchGroup {
            title: title.to_owned(),
            ..MatchGroup::default()
        });
        let index = self.groups.len() - 1;
        &mut self.groups[index]
    }

    /// Total number of candidates across all groups.
    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }

    /// Returns whether a delegation was requested.
    pub fn wants_delegation(&self) -> bool {
        !self.delegate.command.is_empty()
    }
}

/// Completes the final word of `words` against the tree rooted at
/// `root`. `words[0]` is resolved as an executable name (by basename)
/// among the root's subcommands; an unknown executable yields an empty
/// result. Never fails: malformed prefixes simply produce no matches.
pub fn complete_argv(root: &Command, words: &[String], split_on_equals: bool) -> Completions {
    let mut completions = Completions::new(words.to_vec(), split_on_equals);

    let Some((first, rest)) = words.split_first() else {
        return completions;
    };
    let exe = first.rsplit('/').next().unwrap_or(first);
    let Some(location) = root.find_subcommand(exe) else {
        tracing::debug!(target: trace_categories::COMPLETION, "unknown executable '{exe}'");
        return completions;
    };

    let Some((last, complete_words)) = rest.split_last() else {
        return completions;
    };

    let mut walk = Walk {
        root,
        path: CommandPath::root().child(location.0, location.1),
        pending: None,
        options_allowed: true,
        args_seen: 0,
        cmd_start_idx: 1,
    };
    walk.consume(complete_words);
    completions.current_word_idx_in_parent =
        completions.current_word_idx.saturating_sub(walk.cmd_start_idx);
    walk.complete_final_word(last, words, &mut completions);

    // Keep empty groups only when they signal file completion.
    completions.groups.retain(|g| !g.matches.is_empty() || g.is_files);
    completions
}

/// Completion-mode parser state: a variant of the argument parser that
/// never errors out and only tracks where in the tree the cursor sits.
struct Walk<'a> {
    root: &'a Command,
    path: CommandPath,
    pending: Option<OptionLocation>,
    options_allowed: bool,
    args_seen: usize,
    /// Index within the request words where the innermost command's own
    /// words begin.
    cmd_start_idx: usize,
}

impl Walk<'_> {
    fn current(&self) -> &Command {
        self.root.descendant(&self.path).unwrap_or(self.root)
    }

    fn consume(&mut self, words: &[String]) {
        for (offset, word) in words.iter().enumerate() {
            if self.current().flags.ignore_all_args {
                self.options_allowed = false;
                self.args_seen += words.len() - offset;
                return;
            }

            if self.pending.take().is_some() {
                continue;
            }

            if self.options_allowed && word.starts_with('-') && word != "-" {
                if word == "--" {
                    self.options_allowed = false;
                    continue;
                }
                let (name, inline) = match word.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (word.as_str(), None),
                };
                if inline.is_none() {
                    if let Some(location) = self.resolve_option_loosely(name) {
                        let takes_value = resolve_option(self.root, &self.path, location)
                            .is_some_and(|o| o.takes_value());
                        if takes_value {
                            self.pending = Some(location);
                        }
                    }
                }
                continue;
            }

            // Non-option word: maybe a subcommand, otherwise an arg.
            if self.args_seen == 0 {
                let matched = {
                    let current = self.current();
                    current.find_subcommand(word).or_else(|| {
                        let prefix_matches = current.find_subcommands(word);
                        (prefix_matches.len() == 1).then(|| prefix_matches[0])
                    })
                };
                if let Some(location) = matched {
                    self.path = self.path.child(location.0, location.1);
                    self.args_seen = 0;
                    self.cmd_start_idx += offset + 1;
                    self.options_allowed = !self.current().flags.only_args_allowed;
                    // Restart consumption relative to the new command.
                    self.consume(&words[offset + 1..]);
                    return;
                }
            }

            if self.args_seen >= self.current().flags.allow_options_after_args {
                self.options_allowed = false;
            }
            self.args_seen += 1;
        }
    }

    fn resolve_option_loosely(&self, name: &str) -> Option<OptionLocation> {
        if let Some(location) = find_option(self.root, &self.path, name) {
            return Some(location);
        }
        if name.starts_with("--") {
            let matches = crate::command::find_options(self.root, &self.path, name);
            if matches.len() == 1 {
                return Some(matches[0]);
            }
        }
        None
    }

    fn complete_final_word(
        &self,
        word: &str,
        all_words: &[String],
        completions: &mut Completions,
    ) {
        let current = self.current();

        if let Some(custom) = current.parse_args_for_completion {
            let remaining: Vec<String> = all_words[self.cmd_start_idx.min(all_words.len())..]
                .to_vec();
            custom(current, &remaining, completions);
            return;
        }

        // A pending option is waiting for its value.
        if let Some(location) = self.pending {
            if let Some(option) = resolve_option(self.root, &self.path, location) {
                let name = option
                    .aliases
                    .iter()
                    .find(|a| !a.is_short)
                    .or_else(|| option.aliases.first())
                    .map(|a| a.to_string())
                    .unwrap_or_default();
                complete_option_value(option, &name, word, false, completions);
            }
            return;
        }

        if word.starts_with('-') && self.options_allowed && !current.flags.ignore_all_args {
            if let Some((name, partial)) = word.split_once('=') {
                self.complete_attached_value(name, partial, completions);
            } else if let Some(stripped) = word.strip_prefix("--") {
                self.complete_long_options(stripped, completions);
            } else {
                self.complete_short_options(word, completions);
            }
            return;
        }

        if self.args_seen == 0 && current.has_subcommands() && !current.flags.ignore_all_args {
            let group = completions.add_group(GROUP_SUBCOMMANDS);
            for subcommand in current.subcommands() {
                if !subcommand.hidden && subcommand.name.starts_with(word) {
                    group.add(
                        subcommand.name.clone(),
                        markup::strip(&subcommand.short_description),
                    );
                }
            }
            return;
        }

        let stop_at = current.flags.stop_completing_at_arg;
        if stop_at > 0 && self.args_seen + 1 >= stop_at {
            return;
        }

        if let Some(arg_completer) = current.arg_completer {
            arg_completer(completions, word, self.args_seen + 1);
        }
    }

    fn complete_attached_value(
        &self,
        name: &str,
        partial: &str,
        completions: &mut Completions,
    ) {
        let Some(location) = self.resolve_option_loosely(name) else {
            return;
        };
        let Some(option) = resolve_option(self.root, &self.path, location) else {
            return;
        };
        if !option.takes_value() {
            return;
        }
        complete_option_value(option, name, partial, true, completions);
    }

    fn complete_long_options(&self, partial: &str, completions: &mut Completions) {
        let group = completions.add_group(GROUP_OPTIONS);
        for location in crate::command::eligible_options(self.root, &self.path) {
            let Some(option) = resolve_option(self.root, &self.path, location) else {
                continue;
            };
            if option.hidden {
                continue;
            }
            for alias in option.aliases.iter().filter(|a| !a.is_short) {
                if alias.name.starts_with(partial) {
                    group.add(alias.to_string(), markup::strip(first_line(&option.help)));
                }
            }
        }
    }

    fn complete_short_options(&self, word: &str, completions: &mut Completions) {
        let partial = word.trim_start_matches('-');
        let group = completions.add_group(GROUP_SHORT_OPTIONS);
        for location in crate::command::eligible_options(self.root, &self.path) {
            let Some(option) = resolve_option(self.root, &self.path, location) else {
                continue;
            };
            if option.hidden {
                continue;
            }
            for alias in option.aliases.iter().filter(|a| a.is_short) {
                if alias.name.starts_with(partial) {
                    group.add(alias.to_string(), markup::strip(first_line(&option.help)));
                }
            }
        }
    }
}

/// Completes the value of a single option from its completer or its
/// declared choice set. `attached` indicates the partial arrived in
/// `--name=partial` form.
fn complete_option_value(
    option: &crate::options::CliOption,
    name: &str,
    partial: &str,
    attached: bool,
    completions: &mut Completions,
) {
    if let Some(completer) = option.completer {
        completer(completions, partial);
        return;
    }

    if !option.choices.is_empty() {
        let title = std::format!("Values for {name}");
        let split = completions.split_on_equals;
        let group = completions.add_group(&title);
        for choice in &option.choices {
            if choice.starts_with(partial) {
                let word = if attached && !split {
                    std::format!("{name}={choice}")
                } else {
                    choice.clone()
                };
                group.add(word, "");
            }
        }
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|w| (*w).to_owned()).collect()
    }

    fn completion_root() -> Result<Command> {
        let mut registry = Command::new("(root)");
        let app = registry.add_subcommand("app", "");

        let child = app.add_subcommand("child1", "");
        child.short_description = String::from("First child");
        child.add_option_text("--simple-string -s\nA string option.\n", "")?;

        let ssh = app.add_subcommand("ssh", "");
        ssh.flags.ignore_all_args = true;
        ssh.arg_completer = Some(|completions, _word, _arg| {
            completions.delegate = Delegate {
                num_to_remove: 2,
                command: String::from("ssh"),
            };
        });

        registry.validate()?;
        Ok(registry)
    }

    #[test]
    fn test_subcommand_completion() -> Result<()> {
        let registry = completion_root()?;
        let result = complete_argv(&registry, &words(&["app", "ch"]), false);

        assert_eq!(result.groups.len(), 1);
        assert_eq!(result.groups[0].title, GROUP_SUBCOMMANDS);
        assert_eq!(result.groups[0].matches.len(), 1);
        assert_eq!(result.groups[0].matches[0].word, "child1");
        Ok(())
    }

    #[test]
    fn test_unknown_executable_is_empty() -> Result<()> {
        let registry = completion_root()?;
        let result = complete_argv(&registry, &words(&["nosuch", "ch"]), false);
        assert_eq!(result.match_count(), 0);
        Ok(())
    }

    #[test]
    fn test_executable_matched_by_basename() -> Result<()> {
        let registry = completion_root()?;
        let result = complete_argv(&registry, &words(&["/usr/bin/app", "ch"]), false);
        assert_eq!(result.match_count(), 1);
        Ok(())
    }

    #[test]
    fn test_long_option_completion() -> Result<()> {
        let registry = completion_root()?;
        let result = complete_argv(&registry, &words(&["app", "child1", "--si"]), false);

        let group = &result.groups[0];
        assert_eq!(group.title, GROUP_OPTIONS);
        assert!(group.matches.iter().any(|m| m.word == "--simple-string"));
        Ok(())
    }

    #[test]
    fn test_short_option_completion() -> Result<()> {
        let registry = completion_root()?;
        let result = complete_argv(&registry, &words(&["app", "child1", "-"]), false);

        let group = result
            .groups
            .iter()
            .find(|g| g.title == GROUP_SHORT_OPTIONS)
            .ok_or_else(|| anyhow::anyhow!("no short options group"))?;
        assert!(group.matches.iter().any(|m| m.word == "-s"));
        Ok(())
    }

    #[test]
    fn test_delegation_via_arg_completer() -> Result<()> {
        let registry = completion_root()?;
        let result = complete_argv(&registry, &words(&["app", "ssh", "host", "ls", ""]), false);

        assert!(result.wants_delegation());
        assert_eq!(result.delegate.num_to_remove, 2);
        assert_eq!(result.delegate.command, "ssh");
        Ok(())
    }

    #[test]
    fn test_current_word_index_is_last_word() -> Result<()> {
        let registry = completion_root()?;
        let result = complete_argv(&registry, &words(&["app", "child1", "x", ""]), false);
        assert_eq!(result.current_word_idx, 3);
        Ok(())
    }

    #[test]
    fn test_choices_value_completion() -> Result<()> {
        let mut registry = Command::new("(root)");
        let app = registry.add_subcommand("app", "");
        app.add_option_text("--mode\ntype=choices\nchoices=fast,slow,steady\n", "")?;
        registry.validate()?;

        let result = complete_argv(&registry, &words(&["app", "--mode=s"]), false);
        let group = &result.groups[0];
        let candidates: Vec<_> = group.matches.iter().map(|m| m.word.as_str()).collect();
        assert_eq!(candidates, vec!["--mode=slow", "--mode=steady"]);

        // With =-splitting shells, only the value part is emitted.
        let result = complete_argv(&registry, &words(&["app", "--mode=s"]), true);
        let group = &result.groups[0];
        let candidates: Vec<_> = group.matches.iter().map(|m| m.word.as_str()).collect();
        assert_eq!(candidates, vec!["slow", "steady"]);
        Ok(())
    }

    #[test]
    fn test_remove_common_prefix() {
        let mut group = MatchGroup::default();
        group.add("--color", "");
        group.add("--config", "");

        let prefix = group.remove_common_prefix();
        assert_eq!(prefix, "--co");
        assert_eq!(group.word_prefix, "--co");
        assert_eq!(group.matches[0].word, "lor");
        assert_eq!(group.matches[1].word, "nfig");
    }

    #[test]
    fn test_trim_trailing_slashes() {
        let mut group = MatchGroup::default();
        group.is_files = true;
        group.add("src/", "");
        group.add("/", "");

        group.trim_trailing_slashes();
        assert_eq!(group.matches[0].word, "src");
        assert_eq!(group.matches[1].word, "/");
    }

    #[test]
    fn test_pending_option_value_completion() -> Result<()> {
        let mut registry = Command::new("(root)");
        let app = registry.add_subcommand("app", "");
        app.add_option_text("--mode\ntype=choices\nchoices=fast,slow\n", "")?;
        registry.validate()?;

        let result = complete_argv(&registry, &words(&["app", "--mode", "f"]), false);
        assert_eq!(result.match_count(), 1);
        assert_eq!(result.groups[0].matches[0].word, "fast");
        Ok(())
    }
}
