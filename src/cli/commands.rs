use crate::appliance::ApplianceClient;
use crate::cli::args::*;
use crate::cli::completions::handle_completion_command;
use crate::config::AgentSettings;
use crate::job::{run_inventory, run_management, InventorySink, JobCompletion, JobConfig};
use crate::store::InventoryItem;
use crate::utils::errors::{AgentError, Result};
use crate::utils::output::OutputFormat;
use crate::utils::paths::AgentPaths;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_PATH: &str = "~/.config/datapower-agent/config.yaml";

pub async fn handle_command(cli: Cli) -> Result<()> {
    // Initialize logging - always to stderr
    if !cli.quiet {
        let log_level = match cli.verbose {
            0 => "datapower_agent=warn",  // Default: warnings only
            1 => "datapower_agent=info",  // -v: info level
            2 => "datapower_agent=debug", // -vv: debug level
            _ => "datapower_agent=trace", // -vvv+: trace level
        };

        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(log_level)
            .init();
    }

    match cli.command {
        Commands::Inventory { ref job, json } => {
            let output = OutputFormat::new(cli.raw, json);
            handle_inventory_command(&cli, job, output).await
        }
        Commands::Manage { ref job } => handle_manage_command(&cli, job).await,
        Commands::Completion { ref command } => handle_completion_command(command),
    }
}

async fn handle_inventory_command(cli: &Cli, job: &Path, output: OutputFormat) -> Result<()> {
    let settings = load_settings(&cli.config)?;
    let config = JobConfig::load(job)?;
    let client = connect(&settings, &config)?;

    let mut sink = StdoutSink { output };
    let completion = run_inventory(&client, &settings, &config, &mut sink).await;
    report(cli, completion)
}

async fn handle_manage_command(cli: &Cli, job: &Path) -> Result<()> {
    let settings = load_settings(&cli.config)?;
    let config = JobConfig::load(job)?;
    let client = connect(&settings, &config)?;

    let completion = run_management(&client, &settings, &config).await;
    report(cli, completion)
}

fn settings_path(config: &str) -> Result<PathBuf> {
    if config == DEFAULT_SETTINGS_PATH {
        AgentPaths::settings_file()
    } else {
        AgentPaths::expand_home(config)
    }
}

fn load_settings(config: &str) -> Result<AgentSettings> {
    let path = settings_path(config)?;
    AgentSettings::load(&path)
}

/// Build the appliance client for the job's server and store
fn connect(settings: &AgentSettings, config: &JobConfig) -> Result<ApplianceClient> {
    let password = server_password(config)?;
    let base_url = settings.base_url(&config.store.client_machine);
    tracing::debug!("Connecting to {base_url} as {}", config.server.username);
    ApplianceClient::new(base_url, config.server.username.clone(), password, settings)
}

/// Password from the job document, then DATAPOWER_PASSWORD, then an interactive prompt
fn server_password(config: &JobConfig) -> Result<String> {
    if let Some(password) = config.server.password.as_ref().filter(|p| !p.is_empty()) {
        return Ok(password.clone());
    }
    if let Ok(password) = env::var("DATAPOWER_PASSWORD") {
        return Ok(password);
    }

    rpassword::prompt_password(format!("Password for {}: ", config.server.username))
        .map_err(|e| AgentError::Config(format!("Failed to read password: {e}")))
}

fn report(cli: &Cli, completion: JobCompletion) -> Result<()> {
    if completion.is_error() {
        return Err(AgentError::JobFailed(completion.message));
    }
    if !cli.quiet {
        eprintln!("{}: {}", completion.status, completion.message);
    }
    Ok(())
}

/// Hands the inventory to the user instead of a host platform
struct StdoutSink {
    output: OutputFormat,
}

impl InventorySink for StdoutSink {
    fn submit(&mut self, items: &[InventoryItem]) -> bool {
        match self.output.print_inventory(items) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to write inventory: {e}");
                false
            }
        }
    }
}
