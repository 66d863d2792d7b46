//! Declarative construction of the whisker command tree.

use std::io::{Read, Write};
use std::path::PathBuf;

use whisker_cli::{Command, Shell, parse::Context, shells};
use whisker_readline::{Editor, EditorOptions, ReadResult};

use crate::productinfo;

/// Builds the validated root command.
pub fn build() -> Result<Command, whisker_cli::Error> {
    let mut root = Command::new(productinfo::PRODUCT_NAME);
    root.short_description =
        String::from("Terminal tooling for the whisker terminal emulator");
    root.help_text = String::from(
        "whisker bundles the small interactive tools that ship with the \
         whisker terminal: line input with editing and history, and shell \
         completion for the tool suite itself.",
    );

    add_input_command(&mut root)?;
    add_complete_command(&mut root)?;

    root.validate()?;
    Ok(root)
}

/// Builds the completion registry: a nameless root whose subcommands are
/// the executables completion requests may name.
pub fn completion_registry() -> Result<Command, whisker_cli::Error> {
    let tree = build()?;
    let mut registry = Command::new("");
    registry.add_clone("", &tree);
    registry.validate()?;
    Ok(registry)
}

fn add_input_command(root: &mut Command) -> Result<(), whisker_cli::Error> {
    let input = root.add_subcommand("input", "");
    input.short_description = String::from("Read a line of input with full editing");
    input.usage = String::from("[options]");
    input.help_text = String::from(concat!(
        "Read a single line of input from the terminal, with cursor ",
        "movement, a kill ring, history and completion, and write the ",
        "result to stdout. Useful from scripts that want comfortable ",
        "interactive input:\n",
        "\n",
        ".. code::\n",
        "\n",
        "    $ name=$(whisker input --prompt 'name: ')\n",
        "\n",
        "The exit code is 0 when input was accepted, 1 on end-of-file ",
        "and 130 when canceled with :bold:`ctrl+c`.",
    ));
    input.run = Some(run_input);

    input.add_option_text("--prompt -p\ndefault=> \nThe prompt to display.\n", "")?;
    input.add_option_text(
        "--continuation-prompt\ndefault=. \nThe prompt for continuation lines.\n",
        "",
    )?;
    input.add_option_text(
        "--history-file\nPath to a JSON history file. When set, accepted \
         input is appended there and is available for browsing and search.\n",
        "",
    )?;
    input.add_option_text(
        "--max-history-items\ntype=int\ndefault=8192\nMaximum number of history items to keep.\n",
        "",
    )?;
    input.add_option_text(
        "--no-bracketed-paste\ntype=bool-set\nDo not enable bracketed paste on the terminal.\n",
        "",
    )?;
    Ok(())
}

fn add_complete_command(root: &mut Command) -> Result<(), whisker_cli::Error> {
    let complete = root.add_subcommand("__complete__", "");
    complete.hidden = true;
    complete.short_description = String::from("Serve shell completion requests");
    complete.usage = String::from("SHELL [STATE_K=V ...]");
    complete.flags.subcommand_optional = true;
    complete.run = Some(run_complete);

    let setup = complete.add_subcommand("setup", "");
    setup.short_description = String::from("Print shell-side completion wiring");
    setup.usage = String::from("SHELL [COMMAND ...]");
    setup.run = Some(run_setup);
    Ok(())
}

fn run_input(ctx: &Context<'_>) -> Result<u8, whisker_cli::Error> {
    let options = EditorOptions {
        prompt: ctx.get_str("Prompt").unwrap_or_else(|| String::from("> ")),
        continuation_prompt: ctx
            .get_str("ContinuationPrompt")
            .unwrap_or_else(|| String::from(". ")),
        history_file: ctx.get_str("HistoryFile").map(PathBuf::from),
        max_history_items: ctx
            .get_int("MaxHistoryItems")
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(8192),
        disable_bracketed_paste: ctx.get_bool("NoBracketedPaste"),
    };

    let mut editor = Editor::new(options).map_err(to_cli_error)?;
    let mut terminal = std::io::stderr();

    match editor.read_line(&mut terminal).map_err(to_cli_error)? {
        ReadResult::Input(text) => {
            let mut stdout = std::io::stdout();
            writeln!(stdout, "{text}")?;
            stdout.flush()?;
            Ok(0)
        }
        ReadResult::Eof => Ok(1),
        // 128 + SIGINT.
        ReadResult::Interrupted => Ok(130),
    }
}

fn run_complete(ctx: &Context<'_>) -> Result<u8, whisker_cli::Error> {
    let args = ctx.args();
    let Some(shell_name) = args.first() else {
        return Err(whisker_cli::ErrorKind::BadCompletionRequest(String::from(
            "missing shell name",
        ))
        .into());
    };
    let shell = Shell::from_name(shell_name)?;

    let state: Vec<(String, String)> = args[1..]
        .iter()
        .filter_map(|arg| {
            arg.split_once('=')
                .map(|(key, value)| (key.to_owned(), value.to_owned()))
        })
        .collect();

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input)?;

    let registry = completion_registry()?;
    let output = shells::handle_request(&registry, shell, &state, &input)?;

    let mut stdout = std::io::stdout();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(0)
}

fn run_setup(ctx: &Context<'_>) -> Result<u8, whisker_cli::Error> {
    let args = ctx.args();
    let Some(shell_name) = args.first() else {
        return Err(whisker_cli::ErrorKind::BadCompletionRequest(String::from(
            "missing shell name",
        ))
        .into());
    };
    let shell = Shell::from_name(shell_name)?;

    let commands: Vec<String> = if args.len() > 1 {
        args[1..].to_vec()
    } else {
        vec![String::from(productinfo::PRODUCT_NAME)]
    };

    let mut stdout = std::io::stdout();
    stdout.write_all(shells::setup_script(shell, &commands).as_bytes())?;
    stdout.flush()?;
    Ok(0)
}

fn to_cli_error(err: whisker_readline::Error) -> whisker_cli::Error {
    whisker_cli::ErrorKind::IoError(std::io::Error::other(err.to_string())).into()
}
