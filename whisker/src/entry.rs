//! Outermost CLI entry point: parse, dispatch, and error rendering.

use std::io::{IsTerminal, Write};

use whisker_cli::markup;

use crate::{events, productinfo, tree};

/// Runs the whisker CLI with the given arguments (program name already
/// stripped). Returns the process exit code.
pub fn run(args: &[String]) -> u8 {
    events::init_tracing();

    match run_inner(args) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!("command failed: {err}");
            report_error(&err);
            1
        }
    }
}

fn run_inner(args: &[String]) -> Result<u8, whisker_cli::Error> {
    let mut root = tree::build()?;
    let ctx = whisker_cli::parse_args(&mut root, args)?;

    let version_line = std::format!(
        "{} {}",
        productinfo::PRODUCT_NAME,
        productinfo::PRODUCT_VERSION
    );
    if let Some(code) = whisker_cli::help::handle_reserved_options(&ctx, &version_line)? {
        return Ok(code);
    }

    // With no subcommand at all, show help rather than an error.
    if ctx.command().name == productinfo::PRODUCT_NAME && ctx.args().is_empty() {
        whisker_cli::help::show(
            ctx.root,
            &ctx.path,
            &whisker_cli::help::HelpOptions::detect(),
        )?;
        return Ok(0);
    }

    match ctx.dispatch() {
        Ok(code) => Ok(code),
        Err(err) => {
            if let Some(recover) = ctx.command().on_error {
                return Ok(recover(&err));
            }
            Err(err)
        }
    }
}

fn report_error(err: &whisker_cli::Error) {
    let mut stderr = std::io::stderr();
    let styled = stderr.is_terminal();
    let _ = writeln!(stderr, "{}", markup::format_error(&err.to_string(), styled));
}
