//! Renders the command tree into width-wrapped, markup-styled help pages.

use indexmap::IndexMap;
use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use crate::{
    command::{self, Command, CommandPath, resolve_option},
    error,
    markup,
    options::{CliOption, OptionKind},
    parse::Context,
    trace_categories,
};

/// Help pages never render wider than this.
const MAX_WIDTH: usize = 80;

/// Presentation settings for a help page.
#[derive(Clone, Copy, Debug)]
pub struct HelpOptions {
    /// Total page width, in columns.
    pub width: usize,
    /// Whether markup expands to SGR styling.
    pub styled: bool,
}

impl HelpOptions {
    /// Detects settings from the process's stdout: the terminal width
    /// when stdout is a tty narrower than 80 columns, else 80; styling
    /// only on a tty.
    pub fn detect() -> Self {
        let is_tty = std::io::stdout().is_terminal();
        let width = match crossterm::terminal::size() {
            Ok((w, _)) if is_tty && usize::from(w) < MAX_WIDTH => usize::from(w),
            _ => MAX_WIDTH,
        };
        Self {
            width,
            styled: is_tty,
        }
    }
}

/// Intercepts the synthesized `--help` and `--version` options after a
/// parse. Returns the exit code to use when one of them fired.
pub fn handle_reserved_options(
    ctx: &Context<'_>,
    version_line: &str,
) -> Result<Option<u8>, error::Error> {
    if ctx.get_bool("Help") {
        show(ctx.root, &ctx.path, &HelpOptions::detect())?;
        return Ok(Some(0));
    }
    if ctx.get_bool("Version") {
        let mut stdout = std::io::stdout();
        writeln!(stdout, "{version_line}")?;
        return Ok(Some(0));
    }
    Ok(None)
}

/// Renders and displays the help page for the command at `path`,
/// delegating to a pager when stdout is a styled terminal.
pub fn show(
    root: &Command,
    path: &CommandPath,
    options: &HelpOptions,
) -> Result<(), error::Error> {
    let page = render(root, path, options);

    if options.styled && std::io::stdout().is_terminal() {
        if page_through_external(&page)? {
            return Ok(());
        }
    }

    let mut stdout = std::io::stdout();
    stdout.write_all(page.as_bytes())?;
    stdout.flush()?;
    Ok(())
}

/// Renders the help page for the command at `path` as a string.
pub fn render(root: &Command, path: &CommandPath, options: &HelpOptions) -> String {
    let Some(command) = root.descendant(path) else {
        return String::new();
    };
    let mut page = String::new();

    // Usage line.
    let qualified = command::qualified_name(root, path);
    let usage = if !command.usage.is_empty() {
        command.usage.clone()
    } else if command.has_subcommands() {
        String::from("command [options] [args...]")
    } else {
        String::from("[options] [args...]")
    };
    page.push_str(&style_heading("Usage", options));
    page.push_str(": ");
    page.push_str(&qualified);
    if !usage.is_empty() {
        page.push(' ');
        page.push_str(&usage);
    }
    page.push_str("\n\n");

    // Description.
    let description = if command.help_text.is_empty() {
        command.short_description.as_str()
    } else {
        command.help_text.as_str()
    };
    if !description.is_empty() {
        page.push_str(&format_help_text(description, options.width, 0, options.styled));
        page.push('\n');
    }

    render_subcommands(command, options, &mut page);
    render_options(root, path, options, &mut page);

    page
}

fn render_subcommands(command: &Command, options: &HelpOptions, page: &mut String) {
    for group in &command.subcommand_groups {
        let visible: Vec<_> = group.commands.iter().filter(|c| !c.hidden).collect();
        if visible.is_empty() {
            continue;
        }

        let title = if group.title.is_empty() {
            "Commands"
        } else {
            group.title.as_str()
        };
        page.push_str(&style_heading(title, options));
        page.push_str(":\n");

        let name_width = visible.iter().map(|c| c.name.len()).max().unwrap_or(0);
        for subcommand in visible {
            let description = markup::expand(&subcommand.short_description, options.styled);
            let _ = writeln!(page, "  {:<name_width$}  {}", subcommand.name, description);
        }
        page.push('\n');
    }
}

fn render_options(
    root: &Command,
    path: &CommandPath,
    options: &HelpOptions,
    page: &mut String,
) {
    // Collect visible options by group title: the command's own first,
    // then depth-eligible options inherited from ancestors.
    let mut grouped: IndexMap<String, Vec<&CliOption>> = IndexMap::new();
    for location in command::eligible_options(root, path) {
        let Some(option) = resolve_option(root, path, location) else {
            continue;
        };
        if option.hidden {
            continue;
        }
        let owner_path = path.ancestor(path.depth() - location.distance);
        let title = root
            .descendant(&owner_path)
            .and_then(|owner| owner.option_groups.get(location.group))
            .map(|g| g.title.clone())
            .unwrap_or_default();
        grouped.entry(title).or_default().push(option);
    }

    for (title, group_options) in grouped {
        let title = if title.is_empty() { String::from("Options") } else { title };
        page.push_str(&style_heading(&title, options));
        page.push_str(":\n");

        for option in group_options {
            page.push_str("  ");
            let aliases = option.aliases_for_display();
            if options.styled {
                page.push_str(markup::BOLD);
                page.push_str(&aliases);
                page.push_str(markup::BOLD_OFF);
            } else {
                page.push_str(&aliases);
            }

            if show_default(option) {
                if let Some(default) = &option.default {
                    let text = std::format!(" (default: {default})");
                    if options.styled {
                        page.push_str(markup::ITALIC);
                        page.push_str(&text);
                        page.push_str(markup::ITALIC_OFF);
                    } else {
                        page.push_str(&text);
                    }
                }
            }
            if !option.choices.is_empty() {
                let _ = write!(page, " [{}]", option.choices.join("|"));
            }
            page.push('\n');

            if !option.help.is_empty() {
                page.push_str(&format_help_text(
                    &option.help,
                    options.width,
                    4,
                    options.styled,
                ));
            }
        }
        page.push('\n');
    }
}

const fn show_default(option: &CliOption) -> bool {
    !option.is_list && !matches!(option.kind, OptionKind::Bool | OptionKind::Count)
}

fn style_heading(text: &str, options: &HelpOptions) -> String {
    if options.styled {
        std::format!("{}{text}{}", markup::BOLD, markup::BOLD_OFF)
    } else {
        text.to_owned()
    }
}

/// Formats a free-form help body: paragraphs are re-wrapped to the page
/// width, `.. code::` starts a literal indented block, `$ `-prefixed
/// code lines render as shell prompts, and the formatting-placeholder
/// sentinel line is suppressed.
pub fn format_help_text(text: &str, width: usize, indent: usize, styled: bool) -> String {
    let mut out = String::new();
    let pad = " ".repeat(indent);
    let wrap_width = width.saturating_sub(indent).max(16);

    let mut paragraph: Vec<&str> = Vec::new();
    let mut in_code_block = false;

    let flush_paragraph = |paragraph: &mut Vec<&str>, out: &mut String| {
        if paragraph.is_empty() {
            return;
        }
        let joined = paragraph.join(" ");
        let expanded = markup::expand(&joined, styled);
        for line in wrap_text(&expanded, wrap_width) {
            out.push_str(&pad);
            out.push_str(&line);
            out.push('\n');
        }
        paragraph.clear();
    };

    for line in text.lines() {
        if line.contains("#placeholder_for_formatting#") {
            continue;
        }

        if line.trim_start().starts_with(".. code::") {
            flush_paragraph(&mut paragraph, &mut out);
            in_code_block = true;
            continue;
        }

        if in_code_block {
            if line.is_empty() {
                out.push('\n');
                continue;
            }
            if !line.starts_with(' ') {
                in_code_block = false;
            } else {
                let code = line.trim_start();
                out.push_str(&pad);
                out.push_str("    ");
                if styled {
                    if let Some(rest) = code.strip_prefix("$ ") {
                        let _ = write!(out, "{}${} {rest}", markup::BOLD, markup::BOLD_OFF);
                    } else {
                        let _ = write!(out, "\x1b[36m{code}\x1b[39m");
                    }
                } else {
                    out.push_str(code);
                }
                out.push('\n');
                continue;
            }
        }

        if line.trim().is_empty() {
            flush_paragraph(&mut paragraph, &mut out);
            out.push('\n');
        } else {
            paragraph.push(line.trim());
        }
    }
    flush_paragraph(&mut paragraph, &mut out);

    out
}

/// Greedy word wrap by visible width.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = whisker_text::visible_width(word);
        if current_width > 0 && current_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn page_through_external(page: &str) -> Result<bool, error::Error> {
    let pager = std::env::var("PAGER").unwrap_or_else(|_| String::from("less -FRX"));
    let mut parts = pager.split_whitespace();
    let Some(program) = parts.next() else {
        return Ok(false);
    };

    let spawned = std::process::Command::new(program)
        .args(parts)
        .stdin(std::process::Stdio::piped())
        .spawn();

    let mut child = match spawned {
        Ok(child) => child,
        Err(err) => {
            tracing::debug!(target: trace_categories::HELP, "pager unavailable: {err}");
            return Ok(false);
        }
    };

    if let Some(stdin) = child.stdin.as_mut() {
        // The pager may exit before consuming everything; that's fine.
        let _ = stdin.write_all(page.as_bytes());
    }
    child.wait()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    const PLAIN: HelpOptions = HelpOptions {
        width: 80,
        styled: false,
    };

    fn sample_tree() -> Result<Command> {
        let mut root = Command::new("app");
        root.help_text = String::from("A sample application.");

        let child = root.add_subcommand("child1", "");
        child.short_description = String::from("First child");
        child.add_option_text(
            "--simple-string -s\ndefault=abc\nA simple string option.\n",
            "",
        )?;

        root.validate()?;
        Ok(root)
    }

    #[test]
    fn test_root_help_page() -> Result<()> {
        let root = sample_tree()?;
        let page = render(&root, &CommandPath::root(), &PLAIN);

        assert!(page.starts_with("Usage: app"));
        assert!(page.contains("Options:"));
        assert!(page.contains("--help, -h"));
        assert!(page.contains("--version"));
        assert!(page.contains("child1"));
        assert!(page.contains("First child"));
        Ok(())
    }

    #[test]
    fn test_subcommand_help_shows_default() -> Result<()> {
        let root = sample_tree()?;
        let (gi, ci) = root
            .find_subcommand("child1")
            .ok_or_else(|| anyhow::anyhow!("missing"))?;
        let page = render(&root, &CommandPath::root().child(gi, ci), &PLAIN);

        assert!(page.starts_with("Usage: app child1"));
        assert!(page.contains("--simple-string, -s (default: abc)"));
        assert!(page.contains("A simple string option."));
        Ok(())
    }

    #[test]
    fn test_inherited_options_listed_for_child() -> Result<()> {
        let mut root = Command::new("app");
        root.add_option_text("--from-parent -p\ntype=count\ndepth=1\n", "")?;
        root.add_subcommand("child", "");
        root.validate()?;

        let page = render(&root, &CommandPath::root().child(0, 0), &PLAIN);
        assert!(page.contains("--from-parent"));
        Ok(())
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text("one two three four five six seven", 9);
        assert!(lines.iter().all(|l| whisker_text::visible_width(l) <= 9));
        assert_eq!(lines.join(" "), "one two three four five six seven");
    }

    #[test]
    fn test_format_help_code_blocks() {
        let text = "Intro line.\n\n.. code::\n\n    $ app run\n    output\n\nAfter.";
        let formatted = format_help_text(text, 80, 0, false);

        assert!(formatted.contains("Intro line.\n"));
        assert!(formatted.contains("    $ app run\n"));
        assert!(formatted.contains("    output\n"));
        assert!(formatted.contains("After.\n"));
    }

    #[test]
    fn test_format_help_placeholder_suppressed() {
        let text = "Keep.\n#placeholder_for_formatting#\nAlso keep.";
        let formatted = format_help_text(text, 80, 0, false);
        assert!(!formatted.contains("placeholder"));
        assert!(formatted.contains("Keep. Also keep."));
    }

    #[test]
    fn test_hidden_options_not_rendered() -> Result<()> {
        let mut root = Command::new("app");
        let opt = root.add_option_text("--secret\n", "")?;
        opt.hidden = true;
        root.validate()?;

        let page = render(&root, &CommandPath::root(), &PLAIN);
        assert!(!page.contains("--secret"));
        Ok(())
    }
}
