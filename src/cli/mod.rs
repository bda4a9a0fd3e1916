use clap::{Parser, Subcommand};
use config::LoggingConfig;

pub mod config;
pub mod events;
pub mod init;
pub mod logging;
pub mod replay;
pub mod version;

#[derive(Parser)]
#[command(name = "concord")]
#[command(author = "Concord Project")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Operator CLI for the Concord governance ledger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a default configuration file
    Init {
        /// Path to config file (default: ~/.local/share/concord/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Replay a JSON script of governance calls against a fresh ledger
    Replay {
        /// Path to the JSON script
        #[arg(long)]
        script: String,

        /// Path to config file (default: ~/.local/share/concord/config.toml)
        #[arg(long)]
        config: Option<String>,

        /// Write the resulting event log (CBOR) to this file
        #[arg(long)]
        events_out: Option<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show an exported event log
    Events {
        /// Path to a CBOR event log written by `replay --events-out`
        #[arg(long)]
        input: String,

        /// Only show this event kind (e.g. vote-cast, proposal-executed)
        #[arg(long)]
        kind: Option<String>,

        /// Only show events about this principal
        #[arg(long)]
        principal: Option<String>,

        /// Maximum number of events to show (most recent first)
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Init { config, force } => {
            logging::init(&LoggingConfig::default())?;
            init::execute(config, force).await
        }
        Commands::Replay {
            script,
            config,
            events_out,
            json,
        } => replay::execute(script, config, events_out, json).await,
        Commands::Events {
            input,
            kind,
            principal,
            limit,
        } => {
            logging::init(&LoggingConfig::default())?;
            events::execute(input, kind, principal, limit).await
        }
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
