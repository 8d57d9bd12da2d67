// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Triage - customer support ticketing with urgency ranking.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod import;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use triage_config::TriageConfig;
use triage_core::TriageError;
use triage_urgency::UrgencyClassifier;

/// Triage - customer support ticketing with urgency ranking.
#[derive(Parser, Debug)]
#[command(name = "triage", version, about, long_about = None)]
struct Cli {
    /// Configuration file to use instead of the standard search path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP/WebSocket server.
    Serve,
    /// Bulk-import customer messages from a CSV file.
    Import {
        /// CSV with customer_name, customer_email, message_text, tier, account_balance.
        path: PathBuf,
    },
    /// Print the urgency score and tier for a piece of text.
    Classify {
        /// Message text; multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn load_config(path: Option<&PathBuf>) -> TriageConfig {
    let loaded = match path {
        Some(path) => triage_config::load_and_validate_path(path),
        None => triage_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            triage_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let level = log_level.to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("triage={level},tower_http={level},warn"))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let command = match cli.command {
        Some(Commands::Classify { text }) => {
            let text = text.join(" ");
            let assessment = UrgencyClassifier::new().classify(&text);
            println!("score: {}", assessment.score);
            println!("urgency: {}", assessment.level);
            return;
        }
        Some(command) => command,
        None => {
            println!("triage: use --help for available commands");
            return;
        }
    };

    let config = load_config(cli.config.as_ref());
    init_tracing(&config.app.log_level);

    let result = match command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Import { path } => import::run_import(config, &path).await.map(|summary| {
            println!(
                "Import complete: {} imported, {} failed",
                summary.imported, summary.failed
            );
        }),
        Commands::Config => match triage_config::to_toml_string(&config) {
            Ok(rendered) => {
                print!("{rendered}");
                Ok(())
            }
            Err(e) => Err(TriageError::Config(e.to_string())),
        },
        Commands::Classify { .. } => Ok(()),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "triage exited with an error");
        eprintln!("triage: {e}");
        std::process::exit(1);
    }
}
