//! Walks an argument vector against the command tree, filling option
//! values and positional args and descending into subcommands.

use crate::{
    command::{
        self, Command, CommandPath, OptionLocation, find_option, find_options, resolve_option,
        resolve_option_mut,
    },
    error,
    options::{OptionKind, OptionValue},
    trace_categories,
};

/// Maximum edit distance used when suggesting near-misses.
const SUGGESTION_DISTANCE: usize = 2;

/// The result of a successful parse: the chain of commands visited
/// (deepest last) plus typed access to every option value.
#[derive(Debug)]
pub struct Context<'a> {
    /// The root of the parsed tree.
    pub root: &'a Command,
    /// Path to the deepest command visited.
    pub path: CommandPath,
}

/// Parses `argv` (everything after the program name) against the tree
/// rooted at `root`, which must have been validated.
///
/// Stops at the first error. On success the tree carries the parsed
/// state and the returned [`Context`] provides typed access to it.
pub fn parse_args<'a>(
    root: &'a mut Command,
    argv: &[String],
) -> Result<Context<'a>, error::Error> {
    let mut parser = Parser {
        root,
        path: CommandPath::root(),
        pending: None,
        options_allowed: true,
        seen_any_for_current: false,
    };
    parser.run(argv)?;

    let Parser { root, path, .. } = parser;
    tracing::debug!(target: trace_categories::PARSE, "parsed to {}", command::qualified_name(root, &path));
    Ok(Context { root, path })
}

struct Parser<'a> {
    root: &'a mut Command,
    path: CommandPath,
    pending: Option<(OptionLocation, String)>,
    options_allowed: bool,
    seen_any_for_current: bool,
}

impl Parser<'_> {
    fn run(&mut self, argv: &[String]) -> Result<(), error::Error> {
        if self.current().flags.only_args_allowed {
            self.options_allowed = false;
        }

        let mut i = 0;
        while i < argv.len() {
            let token = &argv[i];

            if self.current().flags.ignore_all_args {
                self.push_args(&argv[i..], i);
                return Ok(());
            }

            if let Some((location, alias)) = self.pending.take() {
                self.add_occurrence(location, &alias, Some(token))?;
                i += 1;
                continue;
            }

            if self.options_allowed && token.starts_with('-') && token != "-" {
                if token == "--" {
                    self.options_allowed = false;
                    self.seen_any_for_current = true;
                } else {
                    let (name, inline) = match token.split_once('=') {
                        Some((name, value)) => (name, Some(value)),
                        None => (token.as_str(), None),
                    };
                    if name.starts_with("--") {
                        self.handle_long_option(name, inline)?;
                    } else {
                        self.handle_short_cluster(name, inline)?;
                    }
                    self.seen_any_for_current = true;
                }
                i += 1;
                continue;
            }

            self.handle_non_option(token, i)?;
            i += 1;
        }

        if let Some((_, alias)) = self.pending.take() {
            return Err(error::ErrorKind::OptionNeedsValue(alias).into());
        }

        Ok(())
    }

    fn current(&self) -> &Command {
        // The path was produced by descending through this same tree.
        self.root.descendant(&self.path).unwrap_or(&*self.root)
    }

    fn handle_long_option(
        &mut self,
        name: &str,
        inline: Option<&str>,
    ) -> Result<(), error::Error> {
        if let Some(location) = find_option(self.root, &self.path, name) {
            return self.apply_option(location, name.to_owned(), inline);
        }

        let matches = find_options(self.root, &self.path, name);
        match matches.len() {
            0 => Err(error::ErrorKind::UnknownOption {
                name: name.to_owned(),
                suggestions: command::suggestions_for_option(
                    self.root,
                    &self.path,
                    name,
                    SUGGESTION_DISTANCE,
                ),
            }
            .into()),
            1 => {
                let location = matches[0];
                let alias = self.matched_long_alias(location, name);
                self.apply_option(location, alias, inline)
            }
            _ => {
                let candidates = matches
                    .iter()
                    .map(|loc| self.matched_long_alias(*loc, name))
                    .collect();
                Err(error::ErrorKind::AmbiguousOption {
                    name: name.to_owned(),
                    candidates,
                }
                .into())
            }
        }
    }

    fn handle_short_cluster(
        &mut self,
        name: &str,
        inline: Option<&str>,
    ) -> Result<(), error::Error> {
        // A multi-letter short alias wins over cluster interpretation.
        if let Some(location) = find_option(self.root, &self.path, name) {
            return self.apply_option(location, name.to_owned(), inline);
        }

        let letters: Vec<char> = name.chars().skip(1).collect();
        for (index, letter) in letters.iter().enumerate() {
            let alias = std::format!("-{letter}");
            let Some(location) = find_option(self.root, &self.path, &alias) else {
                return Err(error::ErrorKind::UnknownOption {
                    name: alias,
                    suggestions: command::suggestions_for_option(
                        self.root,
                        &self.path,
                        name,
                        SUGGESTION_DISTANCE,
                    ),
                }
                .into());
            };

            let is_last = index + 1 == letters.len();
            if is_last {
                self.apply_option(location, alias, inline)?;
            } else {
                let takes_value = resolve_option(self.root, &self.path, location)
                    .is_some_and(|o| o.takes_value());
                if takes_value {
                    return Err(error::ErrorKind::OptionNeedsValue(alias).into());
                }
                self.apply_option(location, alias, None)?;
            }
        }
        Ok(())
    }

    /// Returns the full text of the long alias that a typed prefix
    /// matched, for error messages and `seen_alias` bookkeeping.
    fn matched_long_alias(&self, location: OptionLocation, typed: &str) -> String {
        let typed_name = typed.trim_start_matches('-');
        resolve_option(self.root, &self.path, location)
            .and_then(|option| {
                option
                    .aliases
                    .iter()
                    .find(|a| !a.is_short && a.name.starts_with(typed_name))
                    .map(|a| a.to_string())
            })
            .unwrap_or_else(|| typed.to_owned())
    }

    fn apply_option(
        &mut self,
        location: OptionLocation,
        alias: String,
        inline: Option<&str>,
    ) -> Result<(), error::Error> {
        let Some(option) = resolve_option(self.root, &self.path, location) else {
            return Err(error::ErrorKind::StaleCommandPath.into());
        };

        if option.takes_value() {
            match inline {
                Some(value) => self.add_occurrence(location, &alias, Some(value)),
                None => {
                    self.pending = Some((location, alias));
                    Ok(())
                }
            }
        } else {
            match (option.kind, inline) {
                // A boolean tolerates an explicit =y/=no style value.
                (OptionKind::Bool, _) | (_, None) => {
                    self.add_occurrence(location, &alias, inline)
                }
                (_, Some(value)) => Err(error::ErrorKind::UnexpectedOptionValue {
                    option: alias,
                    value: value.to_owned(),
                }
                .into()),
            }
        }
    }

    fn add_occurrence(
        &mut self,
        location: OptionLocation,
        alias: &str,
        value: Option<&str>,
    ) -> Result<(), error::Error> {
        let Some(option) = resolve_option_mut(self.root, &self.path, location) else {
            return Err(error::ErrorKind::StaleCommandPath.into());
        };
        option.add_occurrence(alias, value)
    }

    fn handle_non_option(
        &mut self,
        token: &str,
        token_index: usize,
    ) -> Result<(), error::Error> {
        let (args_len, allow_after, has_subcommands, must_be_first) = {
            let current = self.current();
            (
                current.args.len(),
                current.flags.allow_options_after_args,
                current.has_subcommands(),
                current.flags.subcommand_must_be_first,
            )
        };

        if args_len >= allow_after {
            self.options_allowed = false;
        }

        let subcommand_eligible = has_subcommands
            && args_len == 0
            && !(must_be_first && self.seen_any_for_current);

        if subcommand_eligible {
            if let Some(next) = self.match_subcommand(token)? {
                self.descend(next);
                return Ok(());
            }
        }

        self.seen_any_for_current = true;
        let tokens = [token.to_owned()];
        self.push_args(&tokens, token_index);
        Ok(())
    }

    /// Matches `token` against the current command's subcommands: exact
    /// first, then unique prefix. Returns `Ok(None)` when the token
    /// should be treated as a plain arg instead.
    fn match_subcommand(&self, token: &str) -> Result<Option<(usize, usize)>, error::Error> {
        let current = self.current();

        if let Some(location) = current.find_subcommand(token) {
            return Ok(Some(location));
        }

        let prefix_matches = current.find_subcommands(token);
        if prefix_matches.len() == 1 {
            return Ok(Some(prefix_matches[0]));
        }

        if current.flags.subcommand_optional {
            return Ok(None);
        }

        Err(error::ErrorKind::UnknownSubcommand {
            name: token.to_owned(),
            parent: command::qualified_name(self.root, &self.path),
            suggestions: current.suggestions_for_command(token, SUGGESTION_DISTANCE),
        }
        .into())
    }

    fn descend(&mut self, location: (usize, usize)) {
        self.path = self.path.child(location.0, location.1);
        self.seen_any_for_current = false;
        self.options_allowed = !self.current().flags.only_args_allowed;
        tracing::trace!(target: trace_categories::PARSE, "descending into {}", self.current().name);
    }

    fn push_args(&mut self, tokens: &[String], first_token_index: usize) {
        let path = self.path.clone();
        if let Some(current) = self.root.descendant_mut(&path) {
            if current.args.is_empty() {
                current.index_of_first_arg = first_token_index;
            }
            current.args.extend(tokens.iter().cloned());
        }
    }
}

impl Context<'_> {
    /// The deepest command visited by the parse.
    pub fn command(&self) -> &Command {
        self.root.descendant(&self.path).unwrap_or(self.root)
    }

    /// The chain of commands visited, root first.
    pub fn commands(&self) -> Vec<&Command> {
        let mut chain = Vec::with_capacity(self.path.depth() + 1);
        for depth in 0..=self.path.depth() {
            if let Some(command) = self.root.descendant(&self.path.ancestor(depth)) {
                chain.push(command);
            }
        }
        chain
    }

    /// The positional args collected by the deepest command.
    pub fn args(&self) -> &[String] {
        &self.command().args
    }

    /// Dispatches to the deepest command's run function.
    pub fn dispatch(&self) -> Result<u8, error::Error> {
        let command = self.command();
        tracing::debug!(target: trace_categories::COMMANDS, "dispatching {}", command.name);

        if let Some(run) = command.run {
            return run(self);
        }
        if command.has_subcommands() {
            return Err(error::ErrorKind::MissingSubcommand(command::qualified_name(
                self.root, &self.path,
            ))
            .into());
        }
        Ok(0)
    }

    /// Finds the option with the given canonical name, searching the
    /// deepest command first and then depth-eligible ancestors.
    pub fn option(&self, canonical_name: &str) -> Option<&crate::options::CliOption> {
        for distance in 0..=self.path.depth() {
            let owner_path = self.path.ancestor(self.path.depth() - distance);
            let owner = self.root.descendant(&owner_path)?;
            if let Some(&(group, index)) = owner.name_map.get(canonical_name) {
                let option = owner.option_groups.get(group)?.options.get(index)?;
                if command::option_is_eligible(option.depth, distance) {
                    return Some(option);
                }
            }
        }
        None
    }

    /// The effective string value of the named option.
    pub fn get_str(&self, canonical_name: &str) -> Option<String> {
        match self.option(canonical_name)?.effective_value()? {
            OptionValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The effective integer value of the named option.
    pub fn get_int(&self, canonical_name: &str) -> Option<i64> {
        match self.option(canonical_name)?.effective_value()? {
            OptionValue::Int(n) => Some(n),
            _ => None,
        }
    }

    /// The effective float value of the named option.
    pub fn get_float(&self, canonical_name: &str) -> Option<f64> {
        match self.option(canonical_name)?.effective_value()? {
            OptionValue::Float(f) => Some(f),
            _ => None,
        }
    }

    /// The effective boolean value of the named option; `false` when the
    /// option exists but was neither supplied nor defaulted.
    pub fn get_bool(&self, canonical_name: &str) -> bool {
        matches!(
            self.option(canonical_name).and_then(|o| o.effective_value()),
            Some(OptionValue::Bool(true))
        )
    }

    /// The total count recorded for the named count option.
    pub fn get_count(&self, canonical_name: &str) -> i64 {
        match self.option(canonical_name).and_then(|o| o.effective_value()) {
            Some(OptionValue::Count(n)) => n,
            _ => 0,
        }
    }

    /// The accumulated values of the named list option.
    pub fn get_list(&self, canonical_name: &str) -> Vec<String> {
        self.option(canonical_name)
            .map(|o| o.list_values())
            .unwrap_or_default()
    }
}
