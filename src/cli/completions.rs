use crate::cli::args::{Cli, CompletionCommands};
use crate::utils::errors::Result;
use crate::utils::paths::PROGRAM_NAME;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io;

pub fn handle_completion_command(command: &CompletionCommands) -> Result<()> {
    let shell = command.shell();
    let mut cmd = Cli::command();

    // Job documents are JSON; steer bash file completion towards them
    if matches!(shell, Shell::Bash) {
        println!("# Completion for {PROGRAM_NAME}");
        print!(
            r#"
_datapower_agent_override() {{
    local cur prev words cword
    _init_completion || return

    case "$prev" in
        "--job")
            _filedir json
            return 0
            ;;
        "--config")
            _filedir '@(yaml|yml)'
            return 0
            ;;
    esac

    _datapower-agent "$@"
}}

"#
        );

        generate(shell, &mut cmd, PROGRAM_NAME, &mut io::stdout());

        println!();
        println!("complete -F _datapower_agent_override {PROGRAM_NAME}");
    } else {
        generate(shell, &mut cmd, PROGRAM_NAME, &mut io::stdout());
    }

    Ok(())
}
