use color_eyre::eyre::Result;
use dotenv::dotenv;
use slotwise_db::{create_pool, schema::initialize_database};
use tracing::info;

/// Applies the database schema without starting the API server.
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    dotenv().ok();

    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| color_eyre::eyre::eyre!("DATABASE_URL environment variable must be set"))?;

    let db_pool = create_pool(&database_url).await?;
    initialize_database(&db_pool).await?;

    info!("Database migration complete");
    Ok(())
}
