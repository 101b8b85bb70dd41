//! Drop every application table and re-run migrations
//!
//! Development helper. Reads `DATABASE_URL` from the environment or `.env`.

#[cfg(feature = "ssr")]
const TABLES: [&str; 10] = [
    "reply_votes",
    "annotation_votes",
    "annotation_replies",
    "annotations",
    "text_permissions",
    "texts",
    "friends",
    "friend_requests",
    "users",
    "_sqlx_migrations",
];

#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use sqlx::postgres::PgPool;
    use sqlx::Row;
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reset_database=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL")
        .map_err(|_| "DATABASE_URL must be set to reset the database")?;

    let pool = PgPool::connect(&database_url).await?;
    let row = sqlx::query("SELECT current_database()")
        .fetch_one(&pool)
        .await?;
    let name: String = row.get(0);
    tracing::warn!("Resetting database '{}'", name);

    for table in TABLES {
        sqlx::query(&format!("DROP TABLE IF EXISTS {} CASCADE", table))
            .execute(&pool)
            .await?;
        tracing::info!("Dropped {}", table);
    }

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("Migrations applied, database '{}' is empty", name);

    Ok(())
}

#[cfg(not(feature = "ssr"))]
fn main() {
    eprintln!("reset_database requires the 'ssr' feature");
}
