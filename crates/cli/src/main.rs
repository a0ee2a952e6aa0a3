//! Juice Shop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! js-cli migrate
//!
//! # Load users, products and baskets from a fixture
//! js-cli seed crates/cli/fixtures/demo.yaml
//!
//! # Create a user
//! js-cli user create -e jim@juice-sh.op -p ncc-1701
//! ```
//!
//! Every command reads `JUICE_DATABASE_URL` (or `DATABASE_URL`), loading
//! `.env` first if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "js-cli")]
#[command(author, version, about = "Juice Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database from a YAML fixture
    Seed {
        /// Path to the fixture file
        file: String,
    },
    /// Manage shop users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user with a password
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (at least 5 characters)
        #[arg(short, long)]
        password: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::run(&file).await?,
        Commands::User { action } => match action {
            UserAction::Create { email, password } => {
                commands::user::create(&email, &password).await?;
            }
        },
    }
    Ok(())
}
