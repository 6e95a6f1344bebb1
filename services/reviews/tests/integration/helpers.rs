use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::{ConnectOptions, Database};
use sea_orm_migration::MigratorTrait as _;

use yamdb_domain::clock::FixedClock;
use yamdb_reviews::domain::confirmation::ConfirmationCodeIssuer;
use yamdb_reviews::domain::types::{Title, User};
use yamdb_reviews::state::AppState;
use yamdb_reviews::usecase::title::CreateTitleInput;
use yamdb_reviews::usecase::user::CreateUserInput;
use yamdb_reviews_migration::Migrator;

pub const SECRET: &str = "integration-secret";

/// Midday UTC on the given day of October 2026.
pub fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, day, 12, 0, 0).unwrap()
}

/// Fresh in-memory database with all migrations applied.
pub async fn setup() -> AppState {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    AppState {
        db,
        clock: Arc::new(FixedClock(at(1))),
        issuer: ConfirmationCodeIssuer::new(SECRET, Duration::days(3)).unwrap(),
        slug_max_len: 50,
    }
}

/// Same database, different "now".
pub fn with_clock(state: &AppState, now: DateTime<Utc>) -> AppState {
    AppState {
        clock: Arc::new(FixedClock(now)),
        ..state.clone()
    }
}

pub async fn seed_user(state: &AppState, username: &str) -> User {
    state
        .users()
        .create(CreateUserInput {
            username: username.into(),
            email: format!("{username}@example.com"),
            ..Default::default()
        })
        .await
        .unwrap()
}

pub async fn seed_title(
    state: &AppState,
    name: &str,
    year: i32,
    category: Option<&str>,
    genres: &[&str],
) -> Title {
    state
        .titles()
        .create(CreateTitleInput {
            name: name.into(),
            year,
            description: None,
            category_slug: category.map(str::to_owned),
            genre_slugs: genres.iter().map(|g| (*g).to_owned()).collect(),
        })
        .await
        .unwrap()
}

/// Categories `film`, `book` and genres `drama`, `sci-fi`, `comedy`.
pub async fn seed_lookups(state: &AppState) {
    state.categories().create("Film", "film").await.unwrap();
    state.categories().create("Book", "book").await.unwrap();
    state.genres().create("Drama", "drama").await.unwrap();
    state.genres().create("Science fiction", "sci-fi").await.unwrap();
    state.genres().create("Comedy", "comedy").await.unwrap();
}
