/**
 * Server Initialization
 *
 * Opens the database (if configured), builds `AppState` and assembles the
 * router.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::AppState;

/// Create and configure the Axum application
///
/// A missing or unreachable database does not prevent startup: annotations
/// fall back to the in-memory store and database-only routes answer 503.
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("Initializing lecotes backend server");

    let db_pool = load_database(config.database_url.as_deref()).await;
    let app_state = AppState::new(db_pool, config);

    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}
