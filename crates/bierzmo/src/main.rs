// SPDX-FileCopyrightText: 2026 Bierzmo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bierzmo - command-line client for the parish confirmation backend.
//!
//! This is the binary entry point: it loads configuration, initializes
//! tracing and dispatches to the subcommands in [`commands`].

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use bierzmo_config::BierzmoConfig;
use clap::{Parser, Subcommand};

/// Bierzmo - parish confirmation backend client.
#[derive(Parser, Debug)]
#[command(name = "bierzmo", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate configuration and print the resolved backend URL.
    Check,
    /// Log in with the configured credentials.
    Login,
    /// List calendar events visible to the logged-in user.
    Events {
        /// Only events filed under this role.
        #[arg(long, conflicts_with = "group")]
        role: Option<u32>,
        /// Only events filed under this formation group.
        #[arg(long)]
        group: Option<u32>,
        /// Show every event, skipping the visibility filter.
        #[arg(long)]
        all: bool,
    },
    /// List formation groups.
    Groups,
    /// Print the role catalog.
    Roles,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => bierzmo_config::load_and_validate_path(path),
        None => bierzmo_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            bierzmo_config::render_errors(&errors);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.app.log_level);

    match run(cli.command, &config).await {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("bierzmo: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Commands,
    config: &BierzmoConfig,
) -> Result<String, bierzmo_core::BierzmoError> {
    match command {
        Commands::Check => Ok(commands::check(config)),
        Commands::Roles => Ok(commands::roles(&config.roles.to_catalog())),
        Commands::Login => {
            let client = commands::connect(config)?;
            let user = commands::login(&client, config).await?;
            Ok(format!(
                "{}\n{}",
                commands::describe_user(&user, client.catalog()),
                commands::describe_session(config)
            ))
        }
        Commands::Events { role, group, all } => {
            let client = commands::connect(config)?;
            let user = commands::login(&client, config).await?;
            let filter = commands::EventFilter {
                role: role.map(Into::into),
                group: group.map(Into::into),
                all,
            };
            let events = commands::events(&client, &user, &filter).await?;
            Ok(events.join("\n"))
        }
        Commands::Groups => {
            let client = commands::connect(config)?;
            commands::login(&client, config).await?;
            let groups = commands::groups(&client).await?;
            Ok(groups.join("\n"))
        }
    }
}

/// Initialize the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("bierzmo={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
