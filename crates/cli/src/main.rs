//! Oliv CLI - Database setup and admin management tools.
//!
//! # Usage
//!
//! ```bash
//! # Create tables and seed the default catalog
//! oliv-cli init
//!
//! # Create an admin user
//! oliv-cli admin create -u alice -p 'correct horse battery staple'
//!
//! # Grant admin to an existing account
//! oliv-cli admin promote -u bob
//! ```
//!
//! # Commands
//!
//! - `init` - Bootstrap the schema and seed the catalog
//! - `admin create` - Create admin users
//! - `admin promote` - Promote an existing user to admin
//!
//! # Environment Variables
//!
//! - `OLIV_DATABASE_URL` - `SQLite` connection string (falls back to `DATABASE_URL`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "oliv-cli")]
#[command(author, version, about = "Oliv storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create tables and seed the default catalog
    Init,
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Password (prefer the environment variable over the flag)
        #[arg(short, long, env = "OLIV_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Grant the admin flag to an existing user
    Promote {
        /// Login name
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before clap reads env-backed arguments
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let pool = commands::connect().await?;

    match cli.command {
        Commands::Init => {
            commands::init::run(&pool).await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Create { username, password } => {
                commands::admin::create_user(&pool, &username, &password).await?;
            }
            AdminAction::Promote { username } => {
                commands::admin::promote_user(&pool, &username).await?;
            }
        },
    }
    Ok(())
}
