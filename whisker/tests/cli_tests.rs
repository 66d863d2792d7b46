//! End-to-end scenarios for the whisker command tree and its completion
//! surface, driven at the library level.

use anyhow::Result;
use whisker_cli::{
    Command, CommandPath, Delegate, Shell,
    help::{self, HelpOptions},
    shells,
};

const PLAIN: HelpOptions = HelpOptions {
    width: 80,
    styled: false,
};

#[test]
fn root_help_page_lists_visible_commands() -> Result<()> {
    let tree = whisker::tree::build()?;
    let page = help::render(&tree, &CommandPath::root(), &PLAIN);

    assert!(page.starts_with("Usage: whisker"));
    assert!(page.contains("Options:"));
    assert!(page.contains("--help, -h"));
    assert!(page.contains("--version"));
    assert!(page.contains("input"));
    // Internal plumbing stays hidden.
    assert!(!page.contains("__complete__"));
    Ok(())
}

#[test]
fn input_help_page_renders_code_block() -> Result<()> {
    let tree = whisker::tree::build()?;
    let location = tree
        .find_subcommand("input")
        .ok_or_else(|| anyhow::anyhow!("missing input command"))?;
    let page = help::render(
        &tree,
        &CommandPath::root().child(location.0, location.1),
        &PLAIN,
    );

    assert!(page.starts_with("Usage: whisker input"));
    assert!(page.contains("    $ name=$(whisker input --prompt 'name: ')"));
    assert!(page.contains("--history-file"));
    assert!(page.contains("(default: 8192)"));
    Ok(())
}

#[test]
fn bash_completion_of_partial_subcommand() -> Result<()> {
    let registry = whisker::tree::completion_registry()?;
    let output = shells::handle_request(&registry, Shell::Bash, &[], "whisker\nin\n")?;

    assert!(output.contains("COMPREPLY+=('input')"));
    assert!(!output.contains("_command_offset"));
    Ok(())
}

#[test]
fn bash_completion_delegation_uses_command_offset() -> Result<()> {
    // An ssh-style wrapper: all args opaque, completion delegated to the
    // real command with the wrapper words dropped.
    let mut registry = Command::new("");
    let app = registry.add_subcommand("app", "");
    let ssh = app.add_subcommand("ssh", "");
    ssh.flags.ignore_all_args = true;
    ssh.arg_completer = Some(|completions, _word, _arg| {
        completions.delegate = Delegate {
            num_to_remove: 2,
            command: String::from("ssh"),
        };
    });
    registry.validate()?;

    let output = shells::handle_request(&registry, Shell::Bash, &[], "app\nssh\nhost\nls\n\n")?;
    assert!(output.contains("_command_offset 2"));
    Ok(())
}

#[test]
fn unsupported_shell_name_fails_to_parse() {
    let err = Shell::from_name("tcsh").unwrap_err();
    assert_eq!(err.to_string(), "Unsupported shell: tcsh");
}

#[test]
fn zsh_anchored_matcher_is_refused() -> Result<()> {
    let registry = whisker::tree::completion_registry()?;
    let state = vec![(String::from("_matcher"), String::from("l:|=*"))];
    let result = shells::handle_request(&registry, Shell::Zsh, &state, "whisker\nin\n");
    assert!(result.is_err());
    Ok(())
}

#[test]
fn json_adapter_round_trips_requests() -> Result<()> {
    let registry = whisker::tree::completion_registry()?;
    let output = shells::handle_request(
        &registry,
        Shell::Json,
        &[],
        r#"[["whisker", "in"], ["whisker", "--ver"]]"#,
    )?;

    let parsed: serde_json::Value = serde_json::from_str(&output)?;
    assert_eq!(parsed[0]["groups"][0]["matches"][0]["word"], "input");
    assert_eq!(parsed[1]["groups"][0]["matches"][0]["word"], "--version");
    Ok(())
}

#[test]
fn setup_scripts_wire_the_complete_entry_point() -> Result<()> {
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        let script = shells::setup_script(shell, &[String::from("whisker")]);
        assert!(
            script.contains("__complete__"),
            "{shell} setup script misses the entry point"
        );
    }
    Ok(())
}
