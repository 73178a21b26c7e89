use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "datapower-agent")]
#[command(version = "1.0.0")]
#[command(about = "Inventory and manage certificate stores on DataPower appliances")]
#[command(long_about = None)]
pub struct Cli {
    /// Settings file path
    #[arg(
        long,
        env = "DATAPOWER_AGENT_CONFIG",
        default_value = "~/.config/datapower-agent/config.yaml"
    )]
    pub config: String,

    /// Enable verbose logging (repeat for more verbosity: -v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output raw tab-separated values (no formatting)
    #[arg(short, long)]
    pub raw: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inventory the certificates of a store
    Inventory {
        /// Job document (JSON) describing server and store
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        job: PathBuf,
        /// Print the submitted inventory as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add or remove a certificate, as given by the job's operation_type
    Manage {
        /// Job document (JSON) describing server, store and certificate
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        job: PathBuf,
    },
    /// Generate shell completion scripts
    Completion {
        #[command(subcommand)]
        command: CompletionCommands,
    },
}

#[derive(Subcommand)]
pub enum CompletionCommands {
    /// Generate bash completion script
    Bash,
    /// Generate zsh completion script
    Zsh,
    /// Generate fish completion script
    Fish,
    /// Generate PowerShell completion script
    PowerShell,
}

impl CompletionCommands {
    pub fn shell(&self) -> Shell {
        match self {
            CompletionCommands::Bash => Shell::Bash,
            CompletionCommands::Zsh => Shell::Zsh,
            CompletionCommands::Fish => Shell::Fish,
            CompletionCommands::PowerShell => Shell::PowerShell,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_inventory_command() {
        let cli = Cli::try_parse_from([
            "datapower-agent",
            "-vv",
            "--config",
            "/tmp/agent.yaml",
            "inventory",
            "--job",
            "job.json",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, "/tmp/agent.yaml");
        match cli.command {
            Commands::Inventory { job, json } => {
                assert_eq!(job, PathBuf::from("job.json"));
                assert!(json);
            }
            _ => panic!("expected inventory command"),
        }
    }

    #[test]
    fn test_manage_requires_job() {
        assert!(Cli::try_parse_from(["datapower-agent", "manage"]).is_err());
    }
}
