//! Creates the Brewline schema. Pass `--seed` to also load the default admin,
//! starter menu, pickup counter and slot configuration.

use brewline_api::middleware::auth::hash_password;
use brewline_db::{
    schema::initialize_database,
    seed::{seed_database, DEFAULT_ADMIN_PASSWORD, DEFAULT_ADMIN_USERNAME},
};
use color_eyre::eyre::{Result, WrapErr};
use dotenv::dotenv;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let seed = std::env::args().skip(1).any(|arg| arg == "--seed");

    let database_url = std::env::var("DATABASE_URL")
        .wrap_err("DATABASE_URL environment variable must be set")?;

    info!("Connecting to database...");
    let db_pool = brewline_db::create_pool(&database_url).await?;

    info!("Initializing database schema...");
    initialize_database(&db_pool).await?;
    info!("Database schema initialized");

    if seed {
        let password_hash = hash_password(DEFAULT_ADMIN_PASSWORD)?;
        seed_database(&db_pool, &password_hash).await?;
        warn!(
            "Default admin is {} / {}; change the password before going live",
            DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD
        );
    }

    Ok(())
}
