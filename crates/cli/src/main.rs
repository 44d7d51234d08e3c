//! simchat: a wallet chat assistant and wallet dashboard over the Sim API.
//!
//! Commands:
//! - `chat`      Start the chat server
//! - `dashboard` Start the wallet dashboard server
//! - `tools`     List the tools offered to the model
//! - `init`      Write a default config file

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "simchat",
    about = "Chat with an LLM about blockchain wallets, or browse them on a dashboard",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the chat server
    Chat {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start the wallet dashboard server
    Dashboard {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the tools offered to the model
    Tools {
        /// Print the full JSON definitions
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { port } => commands::chat::run(port).await?,
        Commands::Dashboard { port } => commands::dashboard::run(port).await?,
        Commands::Tools { json } => commands::tools::run(json)?,
        Commands::Init { force } => commands::init::run(force)?,
    }

    Ok(())
}
