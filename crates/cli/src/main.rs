//! Optimile CLI - Database migrations and user bootstrap.
//!
//! # Usage
//!
//! ```bash
//! # Run document store migrations
//! optimile-cli migrate
//!
//! # Create the first admin (password from OPTIMILE_BOOTSTRAP_PASSWORD)
//! optimile-cli user create -e admin@example.com -n "Admin Name" -r admin
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `user create` - Create a user directly in the document store

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "optimile-cli")]
#[command(author, version, about = "Optimile CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage users
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new user
    Create {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Display name
        #[arg(short, long)]
        name: String,

        /// Role (`admin` or `driver`)
        #[arg(short, long, default_value = "admin")]
        role: String,

        /// Phone number
        #[arg(short, long)]
        phone: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
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
        Commands::User { action } => match action {
            UserAction::Create {
                email,
                name,
                role,
                phone,
            } => {
                let id = commands::user::create_user(&email, &name, &role, phone).await?;
                tracing::info!("Created user {id}");
            }
        },
    }
    Ok(())
}
