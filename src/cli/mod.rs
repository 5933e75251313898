//! CLI module: command parsing and dispatch
//!
//! All CLI logic lives here. `main.rs` calls `cli::run()`.

pub mod agent;
pub mod common;
pub mod config;
pub mod tools;

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};

use reagent::utils::logging::init_logging;

use common::load_config;

#[derive(Parser)]
#[command(name = "reagent")]
#[command(version)]
#[command(about = "ReAct agent with tools and summarising memory", long_about = None)]
struct Cli {
    /// Config file to use instead of ~/.reagent/config.json
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent (interactive unless -m is given)
    Agent {
        /// Single query to answer, then exit
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Print the tool listing the model sees
    Tools,
    /// Validate configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Check the config file for unknown fields and invalid values
    Check,
}

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    // Respect the logging settings when the config is readable; a broken
    // config is reported by the command itself.
    let logging_cfg = load_config(cli.config.as_deref())
        .map(|c| c.logging)
        .unwrap_or_default();
    if let Err(e) = init_logging(&logging_cfg) {
        eprintln!("Warning: {}", e);
    }

    match cli.command {
        None => {
            let mut cmd = Cli::command();
            cmd.print_help()?;
            println!();
        }
        Some(Commands::Version) => {
            cmd_version();
        }
        Some(Commands::Agent { message }) => {
            agent::cmd_agent(message, cli.config).await?;
        }
        Some(Commands::Tools) => {
            tools::cmd_tools(cli.config)?;
        }
        Some(Commands::Config { action }) => {
            config::cmd_config(action, cli.config)?;
        }
    }

    Ok(())
}

/// Display version information
fn cmd_version() {
    println!("reagent {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("ReAct agent with tools and summarising memory");
}
