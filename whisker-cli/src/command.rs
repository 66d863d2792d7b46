//! The hierarchical command tree: commands, groups, lookup, cloning,
//! validation, and edit-distance suggestions.
//!
//! The tree is owned by its root. Child commands carry no parent
//! pointers; operations that need ancestor context (inherited options,
//! fully-qualified names) take a [`CommandPath`] and resolve ancestors
//! by walking down from the root.

use indexmap::IndexMap;
use std::collections::HashSet;

use crate::{
    complete, error,
    options::{CliOption, OptionGroup, OptionSpec},
    parse,
};

/// Function invoked when a command is dispatched.
pub type RunFn = fn(&parse::Context<'_>) -> Result<u8, error::Error>;

/// Function that completes positional arguments. Receives the completion
/// result under construction, the partial word, and the 0-based index of
/// the argument being completed.
pub type ArgCompleter = fn(&mut complete::Completions, &str, usize);

/// Function that replaces the generic completion parser for a command.
/// Receives the command, the words following it, and the completion
/// result under construction.
pub type CompletionParser = fn(&Command, &[String], &mut complete::Completions);

/// Function that can recover from a dispatch error, yielding the exit
/// code to use instead.
pub type ErrorHandler = fn(&error::Error) -> u8;

/// A titled, ordered collection of subcommands.
#[derive(Clone, Debug, Default)]
pub struct CommandGroup {
    /// The group title; empty renders as plain "Commands".
    pub title: String,
    /// The commands in declaration order.
    pub commands: Vec<Command>,
}

/// Behavioral flags for a command, mirrored from its declaration.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommandFlags {
    /// How many positional args may appear before options stop being
    /// recognized; 0 means options must precede the first arg.
    pub allow_options_after_args: usize,
    /// Whether a first positional arg that matches no subcommand is
    /// accepted as a plain arg rather than an error.
    pub subcommand_optional: bool,
    /// Whether a subcommand is only recognized in the very first token.
    pub subcommand_must_be_first: bool,
    /// Whether option parsing is disabled entirely for this command.
    pub only_args_allowed: bool,
    /// Whether every remaining token is collected as an arg unexamined.
    pub ignore_all_args: bool,
    /// Stop offering completions at this 1-based arg index; 0 disables.
    pub stop_completing_at_arg: usize,
}

/// One command in the tree.
#[derive(Clone, Debug, Default)]
pub struct Command {
    /// The name by which the command is invoked.
    pub name: String,
    /// The title of the group this command was added under.
    pub group: String,
    /// Usage suffix shown after the qualified name in help.
    pub usage: String,
    /// One-line description for listings.
    pub short_description: String,
    /// Full help text, in the free-form markup dialect.
    pub help_text: String,
    /// Whether the command is hidden from help output.
    pub hidden: bool,
    /// Subcommands, grouped.
    pub subcommand_groups: Vec<CommandGroup>,
    /// Options, grouped.
    pub option_groups: Vec<OptionGroup>,
    /// Positional arguments accumulated by the last parse.
    pub args: Vec<String>,
    /// Token offset of the first positional argument in the last parse.
    pub index_of_first_arg: usize,
    /// Behavioral flags.
    pub flags: CommandFlags,
    /// Function dispatched when this command is selected.
    pub run: Option<RunFn>,
    /// Completer for positional arguments.
    pub arg_completer: Option<ArgCompleter>,
    /// Replacement completion parser, when the generic walk won't do.
    pub parse_args_for_completion: Option<CompletionParser>,
    /// Recovery callback consulted when dispatch fails.
    pub on_error: Option<ErrorHandler>,

    pub(crate) name_map: IndexMap<String, (usize, usize)>,
}

/// A root-relative location of a command in the tree: a sequence of
/// (group index, command index) pairs, outermost first. The empty path
/// designates the root itself.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CommandPath(pub Vec<(usize, usize)>);

impl CommandPath {
    /// The root path.
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// The number of levels below the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Returns this path extended by one segment.
    pub fn child(&self, group: usize, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push((group, index));
        Self(segments)
    }

    /// Returns the path truncated to the given depth.
    pub fn ancestor(&self, depth: usize) -> Self {
        Self(self.0[..depth.min(self.0.len())].to_vec())
    }
}

/// Identifies an option visible from some command: how many levels up
/// its owner sits, and where it lives in the owner's groups.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct OptionLocation {
    /// Distance from the command doing the lookup to the owner;
    /// 0 means the option is the command's own.
    pub distance: usize,
    /// Index of the owning option group.
    pub group: usize,
    /// Index within the group.
    pub index: usize,
}

impl Command {
    /// Constructs a named command with no subcommands or options.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Resolves a path to the command it designates.
    pub fn descendant(&self, path: &CommandPath) -> Option<&Self> {
        let mut current = self;
        for &(group, index) in &path.0 {
            current = current.subcommand_groups.get(group)?.commands.get(index)?;
        }
        Some(current)
    }

    /// Resolves a path to the command it designates, mutably.
    pub fn descendant_mut(&mut self, path: &CommandPath) -> Option<&mut Self> {
        let mut current = self;
        for &(group, index) in &path.0 {
            current = current
                .subcommand_groups
                .get_mut(group)?
                .commands
                .get_mut(index)?;
        }
        Some(current)
    }

    /// Adds a subcommand under the named group (creating the group if
    /// needed) and returns it for further configuration.
    pub fn add_subcommand(
        &mut self,
        name: impl Into<String>,
        group_title: impl Into<String>,
    ) -> &mut Self {
        let group_title = group_title.into();
        let group_index = self.subcommand_group_index(&group_title);

        let mut command = Self::new(name);
        command.group.clone_from(&group_title);

        let commands = &mut self.subcommand_groups[group_index].commands;
        commands.push(command);
        let index = commands.len() - 1;
        &mut self.subcommand_groups[group_index].commands[index]
    }

    /// Clones `src` (resetting all parse state) into the named
    /// subcommand group of `self`.
    pub fn add_clone(&mut self, group_title: impl Into<String>, src: &Self) -> &mut Self {
        let group_title = group_title.into();
        let group_index = self.subcommand_group_index(&group_title);

        let mut command = src.fresh_clone();
        command.group.clone_from(&group_title);

        let commands = &mut self.subcommand_groups[group_index].commands;
        commands.push(command);
        let index = commands.len() - 1;
        &mut self.subcommand_groups[group_index].commands[index]
    }

    /// Deep-copies this command and its whole subtree, clearing any
    /// state accumulated by parsing. The clone is fully independent.
    pub fn fresh_clone(&self) -> Self {
        let mut clone = self.clone();
        clone.reset_tree();
        clone
    }

    /// Adds an option from a programmatic spec to the named group.
    pub fn add_option(
        &mut self,
        spec: OptionSpec,
        group_title: impl Into<String>,
    ) -> Result<&mut CliOption, error::Error> {
        let option = CliOption::new(spec)?;
        Ok(self.insert_option(option, group_title.into()))
    }

    /// Adds an option from free-form text to the named group.
    pub fn add_option_text(
        &mut self,
        text: &str,
        group_title: impl Into<String>,
    ) -> Result<&mut CliOption, error::Error> {
        let option = CliOption::from_text(text)?;
        Ok(self.insert_option(option, group_title.into()))
    }

    /// Looks up a direct subcommand by exact name.
    pub fn find_subcommand(&self, name: &str) -> Option<(usize, usize)> {
        for (gi, group) in self.subcommand_groups.iter().enumerate() {
            for (ci, command) in group.commands.iter().enumerate() {
                if command.name == name {
                    return Some((gi, ci));
                }
            }
        }
        None
    }

    /// Looks up direct subcommands whose names begin with `prefix`.
    pub fn find_subcommands(&self, prefix: &str) -> Vec<(usize, usize)> {
        let mut matches = Vec::new();
        for (gi, group) in self.subcommand_groups.iter().enumerate() {
            for (ci, command) in group.commands.iter().enumerate() {
                if command.name.starts_with(prefix) {
                    matches.push((gi, ci));
                }
            }
        }
        matches
    }

    /// Resolves a subcommand location to the command itself.
    pub fn subcommand_at(&self, location: (usize, usize)) -> Option<&Self> {
        self.subcommand_groups
            .get(location.0)?
            .commands
            .get(location.1)
    }

    /// Iterates over all direct subcommands, across groups.
    pub fn subcommands(&self) -> impl Iterator<Item = &Self> {
        self.subcommand_groups
            .iter()
            .flat_map(|g| g.commands.iter())
    }

    /// Iterates over this command's own options, across groups.
    pub fn options(&self) -> impl Iterator<Item = &CliOption> {
        self.option_groups.iter().flat_map(|g| g.options.iter())
    }

    /// Returns whether this command has any subcommands.
    pub fn has_subcommands(&self) -> bool {
        self.subcommand_groups.iter().any(|g| !g.commands.is_empty())
    }

    /// Visits every command in the subtree, depth-first, with its path.
    pub fn visit_all(&self, visitor: &mut impl FnMut(&Self, &CommandPath)) {
        fn walk(
            command: &Command,
            path: &CommandPath,
            visitor: &mut impl FnMut(&Command, &CommandPath),
        ) {
            visitor(command, path);
            for (gi, group) in command.subcommand_groups.iter().enumerate() {
                for (ci, child) in group.commands.iter().enumerate() {
                    walk(child, &path.child(gi, ci), visitor);
                }
            }
        }
        walk(self, &CommandPath::root(), visitor);
    }

    /// Clears all parse state in the subtree: positional args, first-arg
    /// offsets, and per-option accumulators.
    pub fn reset_tree(&mut self) {
        self.args.clear();
        self.index_of_first_arg = 0;
        for group in &mut self.option_groups {
            for option in &mut group.options {
                option.reset();
            }
        }
        for group in &mut self.subcommand_groups {
            for command in &mut group.commands {
                command.reset_tree();
            }
        }
    }

    /// Suggests subcommand names within the given edit distance of
    /// `name`, sorted by distance then lexicographically.
    pub fn suggestions_for_command(&self, name: &str, max_distance: usize) -> Vec<String> {
        let candidates = self.subcommands().map(|c| c.name.clone());
        rank_suggestions(name, candidates, max_distance)
    }

    /// Validates the tree rooted at this command and prepares it for
    /// parsing. Detects duplicate subcommand names and duplicate option
    /// aliases (including inherited ones), synthesizes `--help -h` on
    /// every command and `--version` on the root unless those aliases
    /// are already taken, and builds each command's canonical-name map.
    /// Idempotent.
    pub fn validate(&mut self) -> Result<(), error::Error> {
        self.validate_node(&[], true)
    }

    fn validate_node(
        &mut self,
        inherited_aliases: &[(String, i32)],
        is_root: bool,
    ) -> Result<(), error::Error> {
        // Unique subcommand names across groups.
        let mut names = HashSet::new();
        for group in &self.subcommand_groups {
            for command in &group.commands {
                if !names.insert(command.name.clone()) {
                    return Err(error::ErrorKind::DuplicateSubcommand {
                        command: self.name.clone(),
                        name: command.name.clone(),
                    }
                    .into());
                }
            }
        }

        // Synthesize reserved options where their aliases are free.
        let taken: HashSet<String> = self
            .options()
            .flat_map(|o| o.aliases.iter().map(|a| a.to_string()))
            .chain(inherited_aliases.iter().map(|(a, _)| a.clone()))
            .collect();

        if !taken.contains("--help") && !taken.contains("-h") {
            self.insert_option(
                CliOption::from_text("--help -h\ntype=bool-set\nShow help for this command.\n")?,
                String::new(),
            );
        }
        if is_root && !taken.contains("--version") {
            self.insert_option(
                CliOption::from_text("--version\ntype=bool-set\nShow version information.\n")?,
                String::new(),
            );
        }

        // Unique aliases among everything visible here.
        let mut seen: HashSet<String> = inherited_aliases
            .iter()
            .map(|(a, _)| a.clone())
            .collect();
        for option in self.options() {
            for alias in &option.aliases {
                if !seen.insert(alias.to_string()) {
                    return Err(error::ErrorKind::DuplicateAlias {
                        command: self.name.clone(),
                        alias: alias.to_string(),
                    }
                    .into());
                }
            }
        }

        // Canonical-name map for typed accessors.
        self.name_map.clear();
        for (gi, group) in self.option_groups.iter().enumerate() {
            for (oi, option) in group.options.iter().enumerate() {
                self.name_map.insert(option.name.clone(), (gi, oi));
            }
        }

        // What the children inherit: our inheritance, one level farther,
        // plus our own inheritable options.
        let mut passed_down: Vec<(String, i32)> = Vec::new();
        for (alias, depth) in inherited_aliases {
            if *depth < 0 {
                passed_down.push((alias.clone(), *depth));
            } else if *depth > 1 {
                passed_down.push((alias.clone(), depth - 1));
            }
        }
        for option in self.options() {
            if option.depth != 0 {
                for alias in &option.aliases {
                    passed_down.push((alias.to_string(), option.depth));
                }
            }
        }

        for group in &mut self.subcommand_groups {
            for command in &mut group.commands {
                command.validate_node(&passed_down, false)?;
            }
        }

        Ok(())
    }

    fn subcommand_group_index(&mut self, title: &str) -> usize {
        if let Some(index) = self
            .subcommand_groups
            .iter()
            .position(|g| g.title == title)
        {
            return index;
        }
        self.subcommand_groups.push(CommandGroup {
            title: title.to_owned(),
            commands: Vec::new(),
        });
        self.subcommand_groups.len() - 1
    }

    fn insert_option(&mut self, option: CliOption, group_title: String) -> &mut CliOption {
        let group_index = if let Some(index) = self
            .option_groups
            .iter()
            .position(|g| g.title == group_title)
        {
            index
        } else {
            self.option_groups.push(OptionGroup {
                title: group_title,
                options: Vec::new(),
            });
            self.option_groups.len() - 1
        };

        let options = &mut self.option_groups[group_index].options;
        options.push(option);
        let index = options.len() - 1;
        &mut self.option_groups[group_index].options[index]
    }
}

/// Returns whether an option owned `distance` levels above the lookup
/// command is visible there.
pub const fn option_is_eligible(option_depth: i32, distance: usize) -> bool {
    #[allow(clippy::cast_possible_wrap)]
    {
        option_depth < 0 || option_depth >= distance as i32
    }
}

/// Enumerates every option visible from the command at `path`: its own
/// options plus depth-eligible options of each ancestor, nearest owner
/// first.
pub fn eligible_options(root: &Command, path: &CommandPath) -> Vec<OptionLocation> {
    let mut locations = Vec::new();
    for distance in 0..=path.depth() {
        let owner_path = path.ancestor(path.depth() - distance);
        let Some(owner) = root.descendant(&owner_path) else {
            continue;
        };
        for (gi, group) in owner.option_groups.iter().enumerate() {
            for (oi, option) in group.options.iter().enumerate() {
                if option_is_eligible(option.depth, distance) {
                    locations.push(OptionLocation {
                        distance,
                        group: gi,
                        index: oi,
                    });
                }
            }
        }
    }
    locations
}

/// Resolves an option location relative to the command at `path`.
pub fn resolve_option<'a>(
    root: &'a Command,
    path: &CommandPath,
    location: OptionLocation,
) -> Option<&'a CliOption> {
    let owner_path = path.ancestor(path.depth().checked_sub(location.distance)?);
    root.descendant(&owner_path)?
        .option_groups
        .get(location.group)?
        .options
        .get(location.index)
}

/// Resolves an option location relative to the command at `path`,
/// mutably.
pub fn resolve_option_mut<'a>(
    root: &'a mut Command,
    path: &CommandPath,
    location: OptionLocation,
) -> Option<&'a mut CliOption> {
    let owner_path = path.ancestor(path.depth().checked_sub(location.distance)?);
    root.descendant_mut(&owner_path)?
        .option_groups
        .get_mut(location.group)?
        .options
        .get_mut(location.index)
}

/// Finds the option matching an alias as typed (`--name` or `-n`),
/// searching the command at `path` and then its ancestors, gating each
/// by inheritance depth.
pub fn find_option(
    root: &Command,
    path: &CommandPath,
    name_with_hyphens: &str,
) -> Option<OptionLocation> {
    let (text, is_short) = split_alias_text(name_with_hyphens)?;
    eligible_options(root, path).into_iter().find(|loc| {
        resolve_option(root, path, *loc)
            .is_some_and(|o| o.find_alias(text, is_short).is_some())
    })
}

/// Finds all long options whose `--name` form begins with the given
/// prefix (which must include the leading hyphens).
pub fn find_options(
    root: &Command,
    path: &CommandPath,
    prefix_with_hyphens: &str,
) -> Vec<OptionLocation> {
    eligible_options(root, path)
        .into_iter()
        .filter(|loc| {
            resolve_option(root, path, *loc).is_some_and(|o| {
                o.aliases
                    .iter()
                    .any(|a| !a.is_short && a.to_string().starts_with(prefix_with_hyphens))
            })
        })
        .collect()
}

/// Suggests option aliases within the given edit distance of the typed
/// name, considering everything visible from the command at `path`.
pub fn suggestions_for_option(
    root: &Command,
    path: &CommandPath,
    name_with_hyphens: &str,
    max_distance: usize,
) -> Vec<String> {
    let typed = name_with_hyphens.trim_start_matches('-');
    let candidates: Vec<String> = eligible_options(root, path)
        .into_iter()
        .filter_map(|loc| resolve_option(root, path, loc))
        .flat_map(|o| o.aliases.iter().filter(|a| !a.is_short))
        .map(|a| a.to_string())
        .collect();

    let mut ranked: Vec<(usize, String)> = candidates
        .into_iter()
        .filter_map(|alias| {
            let distance = strsim::levenshtein(typed, alias.trim_start_matches('-'));
            (distance <= max_distance).then_some((distance, alias))
        })
        .collect();
    ranked.sort();
    ranked.dedup();
    ranked.into_iter().map(|(_, alias)| alias).collect()
}

/// Renders the fully-qualified name of the command at `path`, e.g.
/// `whisker __complete__ setup`.
pub fn qualified_name(root: &Command, path: &CommandPath) -> String {
    let mut parts = vec![root.name.clone()];
    for depth in 1..=path.depth() {
        if let Some(command) = root.descendant(&path.ancestor(depth)) {
            parts.push(command.name.clone());
        }
    }
    parts.join(" ")
}

fn split_alias_text(name_with_hyphens: &str) -> Option<(&str, bool)> {
    if let Some(rest) = name_with_hyphens.strip_prefix("--") {
        Some((rest, false))
    } else if let Some(rest) = name_with_hyphens.strip_prefix('-') {
        Some((rest, true))
    } else {
        None
    }
}

fn rank_suggestions(
    typed: &str,
    candidates: impl Iterator<Item = String>,
    max_distance: usize,
) -> Vec<String> {
    let mut ranked: Vec<(usize, String)> = candidates
        .filter_map(|name| {
            let distance = strsim::levenshtein(typed, &name);
            (distance <= max_distance).then_some((distance, name))
        })
        .collect();
    ranked.sort();
    ranked.dedup();
    ranked.into_iter().map(|(_, name)| name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    fn sample_tree() -> Result<Command> {
        let mut root = Command::new("app");
        root.add_option_text("--from-parent -p\ntype=count\ndepth=1\n", "")?;

        let child = root.add_subcommand("child1", "");
        child.add_option_text("--simple-string -s\n", "")?;
        child.add_option_text("--set-me -b\ntype=bool-set\n", "")?;

        root.add_subcommand("child2", "");
        root.validate()?;
        Ok(root)
    }

    #[test]
    fn test_find_subcommand() -> Result<()> {
        let root = sample_tree()?;
        assert!(root.find_subcommand("child1").is_some());
        assert!(root.find_subcommand("nope").is_none());
        assert_eq!(root.find_subcommands("child").len(), 2);
        assert_eq!(root.find_subcommands("child1").len(), 1);
        Ok(())
    }

    #[test]
    fn test_validate_synthesizes_help_and_version() -> Result<()> {
        let root = sample_tree()?;

        let path = CommandPath::root();
        assert!(find_option(&root, &path, "--help").is_some());
        assert!(find_option(&root, &path, "-h").is_some());
        assert!(find_option(&root, &path, "--version").is_some());

        let (gi, ci) = root.find_subcommand("child1").ok_or_else(|| anyhow::anyhow!("missing"))?;
        let child_path = CommandPath::root().child(gi, ci);
        assert!(find_option(&root, &child_path, "--help").is_some());
        assert!(find_option(&root, &child_path, "--version").is_none());
        Ok(())
    }

    #[test]
    fn test_validate_is_idempotent() -> Result<()> {
        let mut root = sample_tree()?;
        root.validate()?;
        root.validate()?;

        let help_count = root
            .options()
            .filter(|o| o.aliases.iter().any(|a| a.name == "help"))
            .count();
        assert_eq!(help_count, 1);
        Ok(())
    }

    #[test]
    fn test_validate_detects_duplicate_subcommands() -> Result<()> {
        let mut root = Command::new("app");
        root.add_subcommand("twin", "");
        root.add_subcommand("twin", "Other");

        let err = root.validate().unwrap_err();
        assert!(err.to_string().contains("twin"));
        Ok(())
    }

    #[test]
    fn test_validate_detects_inherited_alias_conflict() -> Result<()> {
        let mut root = Command::new("app");
        root.add_option_text("--color\ndepth=1\n", "")?;
        let child = root.add_subcommand("child", "");
        child.add_option_text("--color\n", "")?;

        let err = root.validate().unwrap_err();
        assert!(err.to_string().contains("--color"));
        Ok(())
    }

    #[test]
    fn test_depth_gated_inheritance() -> Result<()> {
        let mut root = Command::new("app");
        root.add_option_text("--near\ndepth=1\n", "")?;
        root.add_option_text("--everywhere\ndepth=-1\n", "")?;
        let child = root.add_subcommand("child", "");
        child.add_subcommand("grandchild", "");
        root.validate()?;

        let child_path = CommandPath::root().child(0, 0);
        let grandchild_path = child_path.child(0, 0);

        assert!(find_option(&root, &child_path, "--near").is_some());
        assert!(find_option(&root, &grandchild_path, "--near").is_none());
        assert!(find_option(&root, &grandchild_path, "--everywhere").is_some());
        Ok(())
    }

    #[test]
    fn test_fresh_clone_resets_state() -> Result<()> {
        let mut root = sample_tree()?;
        let path = CommandPath::root();
        let loc = find_option(&root, &path, "--from-parent")
            .ok_or_else(|| anyhow::anyhow!("missing"))?;
        resolve_option_mut(&mut root, &path, loc)
            .ok_or_else(|| anyhow::anyhow!("missing"))?
            .add_occurrence("-p", None)?;
        root.args.push(String::from("leftover"));

        let clone = root.fresh_clone();
        assert!(clone.args.is_empty());
        let cloned_opt = resolve_option(&clone, &path, loc).ok_or_else(|| anyhow::anyhow!("missing"))?;
        assert!(cloned_opt.parsed.is_empty());

        // The original still carries its state.
        assert_eq!(root.args.len(), 1);
        Ok(())
    }

    #[test]
    fn test_suggestions_rank_by_distance() -> Result<()> {
        let mut root = Command::new("app");
        root.add_subcommand("status", "");
        root.add_subcommand("stash", "");
        root.add_subcommand("push", "");
        root.validate()?;

        let suggestions = root.suggestions_for_command("stat", 2);
        assert_eq!(suggestions, vec!["stash", "status"]);
        Ok(())
    }

    #[test]
    fn test_option_suggestions() -> Result<()> {
        let root = sample_tree()?;
        let (gi, ci) = root.find_subcommand("child1").ok_or_else(|| anyhow::anyhow!("missing"))?;
        let path = CommandPath::root().child(gi, ci);

        let suggestions = suggestions_for_option(&root, &path, "--simple-strin", 2);
        assert_eq!(suggestions, vec!["--simple-string"]);
        Ok(())
    }

    #[test]
    fn test_qualified_name() -> Result<()> {
        let root = sample_tree()?;
        let (gi, ci) = root.find_subcommand("child1").ok_or_else(|| anyhow::anyhow!("missing"))?;
        let path = CommandPath::root().child(gi, ci);
        assert_eq!(qualified_name(&root, &path), "app child1");
        Ok(())
    }

    #[test]
    fn test_visit_all_covers_tree() -> Result<()> {
        let root = sample_tree()?;
        let mut visited = Vec::new();
        root.visit_all(&mut |command, _path| visited.push(command.name.clone()));
        assert_eq!(visited, vec!["app", "child1", "child2"]);
        Ok(())
    }
}
