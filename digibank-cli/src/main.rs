//! dbank - Digibank REST server and operator CLI

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod output;

use commands::{accounts, seed, serve, status, users};

/// Digibank - digital bank backend
#[derive(Parser)]
#[command(name = "dbank", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API server
    Serve {
        /// Address to bind (overrides settings and DIGIBANK_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides settings and DIGIBANK_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create the default bank account and optionally an operator user
    Seed {
        /// Operator email; no operator is created without it
        #[arg(long)]
        email: Option<String>,
        /// Operator display name
        #[arg(long, default_value = "Operator")]
        name: String,
        /// Operator password (or set DIGIBANK_PASSWORD)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show account and user totals
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List bank accounts
    Accounts {
        #[command(flatten)]
        list: commands::ListArgs,
    },

    /// List operator users
    Users {
        #[command(flatten)]
        list: commands::ListArgs,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Serve { host, port } => serve::run(host, port),
        Commands::Seed { email, name, password, json } => seed::run(email, &name, password, json),
        Commands::Status { json } => status::run(json),
        Commands::Accounts { list } => accounts::run(list),
        Commands::Users { list } => users::run(list),
    }
}
