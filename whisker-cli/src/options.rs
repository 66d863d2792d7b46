//! Option primitives for the command tree: aliases, typed values, and
//! option specifications in both programmatic and free-form text shape.

use itertools::Itertools;
use std::fmt::Display;

use crate::{complete, error};

/// One textual form by which an option can be named on the command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alias {
    /// The alias text, without any leading hyphens.
    pub name: String,
    /// Whether the alias is a short (single-hyphen) form.
    pub is_short: bool,
    /// Whether matching this alias sets the option to its negated default.
    pub is_unset: bool,
}

impl Alias {
    /// Constructs an alias from its hyphenless text.
    pub fn new(name: impl Into<String>, is_short: bool) -> Self {
        Self {
            name: name.into(),
            is_short,
            is_unset: false,
        }
    }
}

impl Display for Alias {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_short {
            write!(f, "-{}", self.name)
        } else {
            write!(f, "--{}", self.name)
        }
    }
}

/// The type of value an option carries.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum OptionKind {
    /// A free-form (or choice-restricted) string.
    #[default]
    Str,
    /// A base-detecting integer.
    Int,
    /// A floating-point number.
    Float,
    /// A boolean toggle; takes no value on the command line.
    Bool,
    /// A counter incremented once per occurrence; takes no value.
    Count,
}

/// A typed option value parsed from command-line text.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
    /// A floating-point value.
    Float(f64),
    /// A boolean value.
    Bool(bool),
    /// A count increment.
    Count(i64),
}

/// Function that completes values for a single option. Receives the
/// completion result under construction and the partial value text.
pub type OptionCompleter = fn(&mut complete::Completions, &str);

/// Programmatic specification of an option.
#[derive(Clone, Debug, Default)]
pub struct OptionSpec {
    /// Space-separated aliases; short ones begin with `-`, long with `--`.
    pub name: String,
    /// The type name (`str`, `int`, `float`, `count`, `bool-set`,
    /// `bool-reset`, `choices`, `list`); empty means `str`.
    pub type_name: String,
    /// The valid choice set, for `choices` options.
    pub choices: Vec<String>,
    /// The default value, in textual form.
    pub default: Option<String>,
    /// The canonical name; derived from the first long alias when empty.
    pub dest: Option<String>,
    /// Help text.
    pub help: String,
    /// Inheritance depth; see [`CliOption::depth`].
    pub depth: i32,
    /// Whether the option is hidden from help output.
    pub hidden: bool,
    /// Optional value completer.
    pub completer: Option<OptionCompleter>,
}

/// A single command-line option, including any state accumulated while
/// parsing an argument vector.
#[derive(Clone, Debug)]
pub struct CliOption {
    /// The canonical (CamelCase) name used for programmatic lookup.
    pub name: String,
    /// All aliases; non-empty, first-declared first.
    pub aliases: Vec<Alias>,
    /// Valid values, when restricted.
    pub choices: Vec<String>,
    /// Default value in textual form.
    pub default: Option<String>,
    /// The value type.
    pub kind: OptionKind,
    /// Whether values accumulate into a list.
    pub is_list: bool,
    /// Whether the option is hidden from help output.
    pub hidden: bool,
    /// How far down the subcommand tree the option remains visible:
    /// 0 = this command only, N > 0 = descendants up to N levels away,
    /// negative = all descendants.
    pub depth: i32,
    /// Help text, in the free-form markup dialect.
    pub help: String,
    /// Optional value completer.
    pub completer: Option<OptionCompleter>,

    /// Raw values seen on the command line, in order.
    pub values_from_cmdline: Vec<String>,
    /// Parsed values, parallel to `values_from_cmdline`.
    pub parsed: Vec<OptionValue>,
    /// The alias via which the option was last matched, with hyphens.
    pub seen_alias: String,
}

/// A titled, ordered collection of options.
#[derive(Clone, Debug, Default)]
pub struct OptionGroup {
    /// The group title; empty renders as plain "Options".
    pub title: String,
    /// The options in declaration order.
    pub options: Vec<CliOption>,
}

impl CliOption {
    /// Constructs an option from a programmatic specification.
    pub fn new(spec: OptionSpec) -> Result<Self, error::Error> {
        let mut aliases = Vec::new();
        for word in spec.name.split_whitespace() {
            if let Some(rest) = word.strip_prefix("--") {
                aliases.push(Alias::new(rest, false));
            } else if let Some(rest) = word.strip_prefix('-') {
                aliases.push(Alias::new(rest, true));
            } else {
                return Err(error::ErrorKind::OptionSpec(std::format!(
                    "alias '{word}' must begin with - or --"
                ))
                .into());
            }
        }
        if aliases.is_empty() {
            return Err(
                error::ErrorKind::OptionSpec(std::format!("no aliases in '{}'", spec.name)).into(),
            );
        }

        let mut kind = OptionKind::Str;
        let mut is_list = false;
        let mut choices = spec.choices;
        let mut default = spec.default;

        match spec.type_name.as_str() {
            "" | "str" | "string" => {}
            "int" => kind = OptionKind::Int,
            "float" => kind = OptionKind::Float,
            "count" => kind = OptionKind::Count,
            "bool-set" => kind = OptionKind::Bool,
            "bool-reset" => {
                kind = OptionKind::Bool;
                default = Some(String::from("true"));
                for alias in &mut aliases {
                    alias.is_unset = true;
                }
            }
            "choices" => {
                if choices.is_empty() {
                    return Err(error::ErrorKind::OptionSpec(std::format!(
                        "option '{}' has type choices but no choices",
                        spec.name
                    ))
                    .into());
                }
                if default.is_none() {
                    default = Some(choices[0].clone());
                }
            }
            "list" => is_list = true,
            other => {
                return Err(error::ErrorKind::OptionSpec(std::format!(
                    "unknown option type '{other}'"
                ))
                .into());
            }
        }

        if kind != OptionKind::Str {
            choices.clear();
        }

        let name = match spec.dest {
            Some(dest) if !dest.is_empty() => dest,
            Some(_) => {
                return Err(error::ErrorKind::OptionSpec(std::format!(
                    "empty dest for '{}'",
                    spec.name
                ))
                .into());
            }
            None => {
                let first_long = aliases.iter().find(|a| !a.is_short);
                match first_long {
                    Some(alias) => camel_case_dest(&alias.name),
                    None => {
                        return Err(error::ErrorKind::OptionSpec(std::format!(
                            "cannot derive a dest for '{}' (no long alias)",
                            spec.name
                        ))
                        .into());
                    }
                }
            }
        };

        let option = Self {
            name,
            aliases,
            choices,
            default,
            kind,
            is_list,
            hidden: spec.hidden,
            depth: spec.depth,
            help: spec.help,
            completer: spec.completer,
            values_from_cmdline: Vec::new(),
            parsed: Vec::new(),
            seen_alias: String::new(),
        };

        // Make sure a supplied default actually parses under the type.
        if let Some(default) = &option.default {
            option.parse_value("(default)", default)?;
        }

        Ok(option)
    }

    /// Constructs an option from a free-form textual specification.
    ///
    /// The first line carries space-separated aliases; subsequent
    /// `key=value` lines carry metadata (`type`, `dest`, `choices`,
    /// `default`, `depth`); everything after is help text.
    pub fn from_text(text: &str) -> Result<Self, error::Error> {
        let mut spec = OptionSpec::default();
        let mut lines = text.lines();

        loop {
            match lines.next() {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => {
                    spec.name = line.trim().to_owned();
                    break;
                }
                None => {
                    return Err(error::ErrorKind::OptionSpec(String::from(
                        "empty option spec",
                    ))
                    .into());
                }
            }
        }

        let mut help_lines: Vec<&str> = Vec::new();
        let mut in_metadata = true;
        for line in lines {
            if in_metadata {
                if let Some((key, value)) = split_metadata_line(line) {
                    match key {
                        "type" => spec.type_name = value.to_owned(),
                        "dest" => spec.dest = Some(value.to_owned()),
                        "default" => spec.default = Some(value.to_owned()),
                        "choices" => {
                            spec.choices = value
                                .split(',')
                                .map(|c| c.trim().to_owned())
                                .filter(|c| !c.is_empty())
                                .collect();
                        }
                        "depth" => {
                            spec.depth = value.parse().map_err(|_| {
                                error::ErrorKind::OptionSpec(std::format!(
                                    "depth is not an integer: '{value}'"
                                ))
                            })?;
                        }
                        other => {
                            return Err(error::ErrorKind::OptionSpec(std::format!(
                                "unknown metadata key '{other}'"
                            ))
                            .into());
                        }
                    }
                    continue;
                }
                in_metadata = false;
            }
            help_lines.push(line);
        }

        while help_lines.first().is_some_and(|l| l.trim().is_empty()) {
            help_lines.remove(0);
        }
        while help_lines.last().is_some_and(|l| l.trim().is_empty()) {
            help_lines.pop();
        }
        spec.help = help_lines.join("\n");

        Self::new(spec)
    }

    /// Returns whether this option consumes a value token.
    pub const fn takes_value(&self) -> bool {
        !matches!(self.kind, OptionKind::Bool | OptionKind::Count)
    }

    /// Looks up the alias matching the given hyphenless text, if any.
    pub fn find_alias(&self, name: &str, is_short: bool) -> Option<&Alias> {
        self.aliases
            .iter()
            .find(|a| a.is_short == is_short && a.name == name)
    }

    /// Records one occurrence of this option, parsing `value` under the
    /// option's type. `value` of `None` is valid only for boolean and
    /// count options.
    pub fn add_occurrence(
        &mut self,
        alias_text: &str,
        value: Option<&str>,
    ) -> Result<(), error::Error> {
        let parsed = match (self.kind, value) {
            (OptionKind::Bool, None) | (OptionKind::Bool, Some("")) => {
                let is_unset = self
                    .aliases
                    .iter()
                    .find(|a| alias_text.trim_start_matches('-') == a.name)
                    .is_some_and(|a| a.is_unset);
                OptionValue::Bool(!is_unset)
            }
            (OptionKind::Count, None) => OptionValue::Count(1),
            (_, Some(value)) => self.parse_value(alias_text, value)?,
            (_, None) => {
                return Err(error::ErrorKind::OptionNeedsValue(alias_text.to_owned()).into());
            }
        };

        self.values_from_cmdline
            .push(value.unwrap_or_default().to_owned());
        self.parsed.push(parsed);
        self.seen_alias = alias_text.to_owned();
        Ok(())
    }

    /// Parses a single raw value under this option's type, without
    /// recording it.
    pub fn parse_value(
        &self,
        alias_text: &str,
        value: &str,
    ) -> Result<OptionValue, error::Error> {
        match self.kind {
            OptionKind::Str => {
                if !self.choices.is_empty() && !self.choices.iter().any(|c| c == value) {
                    return Err(error::ErrorKind::BadChoice {
                        option: alias_text.to_owned(),
                        value: value.to_owned(),
                        allowed: self.choices.clone(),
                    }
                    .into());
                }
                Ok(OptionValue::Str(value.to_owned()))
            }
            OptionKind::Int => parse_int(value)
                .map(OptionValue::Int)
                .map_err(|reason| self.bad_value(alias_text, value, reason)),
            OptionKind::Float => parse_float(value)
                .map(OptionValue::Float)
                .map_err(|reason| self.bad_value(alias_text, value, reason)),
            OptionKind::Bool => match parse_bool_word(value) {
                Some(b) => Ok(OptionValue::Bool(b)),
                None => Err(self.bad_value(
                    alias_text,
                    value,
                    String::from("expected y, yes, true, n, no or false"),
                )),
            },
            OptionKind::Count => parse_int(value)
                .map(OptionValue::Count)
                .map_err(|reason| self.bad_value(alias_text, value, reason)),
        }
    }

    /// Returns the default value parsed under this option's type. For
    /// list options with no declared default, this is the empty list
    /// (represented as no value).
    pub fn parsed_default(&self) -> Option<OptionValue> {
        let default = self.default.as_deref()?;
        self.parse_value("(default)", default).ok()
    }

    /// The effective scalar value after parsing: the last value seen on
    /// the command line, or the default.
    pub fn effective_value(&self) -> Option<OptionValue> {
        if let Some(last) = self.parsed.last() {
            if self.kind == OptionKind::Count {
                let total: i64 = self
                    .parsed
                    .iter()
                    .map(|v| match v {
                        OptionValue::Count(n) => *n,
                        _ => 0,
                    })
                    .sum();
                return Some(OptionValue::Count(total));
            }
            return Some(last.clone());
        }
        self.parsed_default()
    }

    /// The accumulated list of string values for a list option,
    /// including a declared default when nothing was supplied.
    pub fn list_values(&self) -> Vec<String> {
        if self.parsed.is_empty() {
            return self.default.iter().cloned().collect();
        }
        self.parsed
            .iter()
            .filter_map(|v| match v {
                OptionValue::Str(s) => Some(s.clone()),
                _ => None,
            })
            .collect()
    }

    /// Clears all state accumulated during parsing.
    pub fn reset(&mut self) {
        self.values_from_cmdline.clear();
        self.parsed.clear();
        self.seen_alias.clear();
    }

    /// Renders the comma-separated alias list, long aliases first.
    pub fn aliases_for_display(&self) -> String {
        self.aliases
            .iter()
            .filter(|a| !a.is_short)
            .chain(self.aliases.iter().filter(|a| a.is_short))
            .map(Alias::to_string)
            .join(", ")
    }

    fn bad_value(&self, alias_text: &str, value: &str, reason: String) -> error::Error {
        error::ErrorKind::BadOptionValue {
            option: alias_text.to_owned(),
            value: value.to_owned(),
            reason,
        }
        .into()
    }
}

/// Splits a metadata line of the form `key=value`; returns `None` for
/// lines that begin the help text instead.
fn split_metadata_line(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_lowercase() || c == '_') {
        return None;
    }
    Some((key, value))
}

/// Derives a CamelCase canonical name from a kebab-case long alias.
pub fn camel_case_dest(long_alias: &str) -> String {
    let mut result = String::with_capacity(long_alias.len());
    for part in long_alias.split('-') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.push_str(chars.as_str());
        }
    }
    result
}

/// Parses a boolean word: `y`, `yes`, `true` / `n`, `no`, `false`.
pub fn parse_bool_word(s: &str) -> Option<bool> {
    match s {
        "y" | "yes" | "true" => Some(true),
        "n" | "no" | "false" => Some(false),
        _ => None,
    }
}

/// Parses an integer with base detection: `0x`/`0X` hex, `0o`/`0O`
/// octal, `0b`/`0B` binary, decimal otherwise.
pub fn parse_int(s: &str) -> Result<i64, String> {
    let (negative, magnitude) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let parsed = if let Some(hex) = magnitude
        .strip_prefix("0x")
        .or_else(|| magnitude.strip_prefix("0X"))
    {
        i64::from_str_radix(hex, 16)
    } else if let Some(oct) = magnitude
        .strip_prefix("0o")
        .or_else(|| magnitude.strip_prefix("0O"))
    {
        i64::from_str_radix(oct, 8)
    } else if let Some(bin) = magnitude
        .strip_prefix("0b")
        .or_else(|| magnitude.strip_prefix("0B"))
    {
        i64::from_str_radix(bin, 2)
    } else {
        magnitude.parse()
    };

    match parsed {
        Ok(value) => Ok(if negative { -value } else { value }),
        Err(_) => Err(std::format!("'{s}' is not a valid integer")),
    }
}

/// Parses a float, additionally accepting base-prefixed integer forms.
pub fn parse_float(s: &str) -> Result<f64, String> {
    if let Ok(int) = parse_int(s) {
        #[allow(clippy::cast_precision_loss)]
        return Ok(int as f64);
    }
    s.parse()
        .map_err(|_| std::format!("'{s}' is not a valid number"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_alias_display() {
        assert_eq!(Alias::new("s", true).to_string(), "-s");
        assert_eq!(Alias::new("simple-string", false).to_string(), "--simple-string");
    }

    #[test]
    fn test_camel_case_dest() {
        assert_eq!(camel_case_dest("foo-bar"), "FooBar");
        assert_eq!(camel_case_dest("simple-string"), "SimpleString");
        assert_eq!(camel_case_dest("x"), "X");
    }

    #[test]
    fn test_from_text_full_spec() -> Result<()> {
        let opt = CliOption::from_text(
            "--output -o\ntype=choices\nchoices=text, json\ndepth=2\nHow to format results.",
        )?;

        assert_eq!(opt.name, "Output");
        assert_eq!(opt.aliases.len(), 2);
        assert_eq!(opt.choices, vec!["text", "json"]);
        assert_eq!(opt.default.as_deref(), Some("text"));
        assert_eq!(opt.depth, 2);
        assert_eq!(opt.help, "How to format results.");
        Ok(())
    }

    #[test]
    fn test_from_text_unknown_metadata_key() {
        let err = CliOption::from_text("--x\nfrobs=1\nhelp").unwrap_err();
        assert!(err.to_string().contains("frobs"));
    }

    #[test]
    fn test_from_text_bad_depth() {
        let err = CliOption::from_text("--x\ndepth=lots\n").unwrap_err();
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_bool_reset_marks_aliases_unset() -> Result<()> {
        let opt = CliOption::from_text("--no-window-decorations -d\ntype=bool-reset\n")?;
        assert!(opt.aliases.iter().all(|a| a.is_unset));
        assert_eq!(opt.default.as_deref(), Some("true"));
        assert_eq!(opt.parsed_default(), Some(OptionValue::Bool(true)));
        Ok(())
    }

    #[test]
    fn test_add_occurrence_bool_directions() -> Result<()> {
        let mut opt = CliOption::from_text("--no-color\ntype=bool-reset\n")?;
        opt.add_occurrence("--no-color", None)?;
        assert_eq!(opt.parsed, vec![OptionValue::Bool(false)]);

        let mut opt = CliOption::from_text("--verbose\ntype=bool-set\n")?;
        opt.add_occurrence("--verbose", None)?;
        opt.add_occurrence("--verbose", Some("no"))?;
        assert_eq!(
            opt.parsed,
            vec![OptionValue::Bool(true), OptionValue::Bool(false)]
        );
        assert_eq!(opt.values_from_cmdline.len(), opt.parsed.len());
        Ok(())
    }

    #[test]
    fn test_default_must_parse() {
        let err = CliOption::from_text("--n\ntype=int\ndefault=many\n").unwrap_err();
        assert!(err.to_string().contains("many"));
    }

    #[test]
    fn test_empty_aliases_rejected() {
        assert!(CliOption::new(OptionSpec::default()).is_err());
    }

    #[test]
    fn test_parse_int_bases() {
        assert_eq!(parse_int("42"), Ok(42));
        assert_eq!(parse_int("-3"), Ok(-3));
        assert_eq!(parse_int("0x10"), Ok(16));
        assert_eq!(parse_int("0o17"), Ok(15));
        assert_eq!(parse_int("0b101"), Ok(5));
        assert!(parse_int("ten").is_err());
    }

    #[test]
    fn test_parse_float_accepts_hex() {
        assert_eq!(parse_float("0x10"), Ok(16.0));
        assert_eq!(parse_float("2.5"), Ok(2.5));
        assert!(parse_float("pi").is_err());
    }

    #[test]
    fn test_count_accumulation() -> Result<()> {
        let mut opt = CliOption::from_text("--verbose -v\ntype=count\n")?;
        opt.add_occurrence("-v", None)?;
        opt.add_occurrence("-v", None)?;
        assert_eq!(opt.effective_value(), Some(OptionValue::Count(2)));
        Ok(())
    }

    #[test]
    fn test_list_accumulation_and_reset() -> Result<()> {
        let mut opt = CliOption::from_text("--include\ntype=list\n")?;
        opt.add_occurrence("--include", Some("a"))?;
        opt.add_occurrence("--include", Some("b"))?;
        assert_eq!(opt.list_values(), vec!["a", "b"]);

        opt.reset();
        assert!(opt.list_values().is_empty());
        assert!(opt.values_from_cmdline.is_empty());
        Ok(())
    }

    #[test]
    fn test_aliases_for_display_longs_first() -> Result<()> {
        let opt = CliOption::from_text("-s --simple-string\n")?;
        assert_eq!(opt.aliases_for_display(), "--simple-string, -s");
        Ok(())
    }
}
