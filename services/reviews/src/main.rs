//! Administrative commands against the reviews database.
//!
//! ```bash
//! reviews-admin create-user --username alice --email alice@example.com --role moderator
//! reviews-admin create-category --name Film --slug film
//! reviews-admin delete-category --slug film
//! ```
//!
//! Reads `DATABASE_URL`, `SECRET_KEY` and optional `SLUG_MAX_LEN` from the
//! environment. Prints the affected record's id on success.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use sea_orm::Database;
use tracing::info;

use yamdb_core::config::Config as _;
use yamdb_core::tracing::init_tracing;
use yamdb_domain::user::UserRole;
use yamdb_reviews::config::ReviewsConfig;
use yamdb_reviews::state::AppState;
use yamdb_reviews::usecase::user::CreateUserInput;

#[derive(Parser)]
#[command(name = "reviews-admin", about = "Manage users and lookup tables")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a user and issue their confirmation code
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// user, moderator or admin
        #[arg(long, default_value = "user")]
        role: UserRole,
    },
    CreateCategory {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
    },
    CreateGenre {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
    },
    /// Delete a category; its titles stay, uncategorised
    DeleteCategory {
        #[arg(long)]
        slug: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = ReviewsConfig::from_env()?;
    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    info!("connected to database");
    let state = AppState::from_config(db, &config)?;

    match args.command {
        Command::CreateUser {
            username,
            email,
            role,
        } => {
            let user = state
                .users()
                .create(CreateUserInput {
                    username,
                    email,
                    role,
                    ..Default::default()
                })
                .await?;
            println!("{}", user.id);
        }
        Command::CreateCategory { name, slug } => {
            let category = state.categories().create(&name, &slug).await?;
            println!("{}", category.id);
        }
        Command::CreateGenre { name, slug } => {
            let genre = state.genres().create(&name, &slug).await?;
            println!("{}", genre.id);
        }
        Command::DeleteCategory { slug } => {
            let category = state.categories().get_by_slug(&slug).await?;
            state.categories().delete_by_slug(&slug).await?;
            println!("{}", category.id);
        }
    }
    Ok(())
}
