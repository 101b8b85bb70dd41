/**
 * Application State Management
 *
 * `AppState` is the single state container handed to the router. The
 * `FromRef` implementations let handlers extract only the part they use.
 *
 * # Example
 *
 * ```rust,no_run
 * use axum::extract::State;
 * use lecotes::backend::annotations::AnnotationEngine;
 *
 * async fn handler(State(engine): State<AnnotationEngine>) {
 *     // engine.list_for_text(...)
 * }
 * ```
 */

use std::sync::Arc;

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::annotations::{AnnotationEngine, AnnotationStore, MemoryAnnotationStore, PgAnnotationStore};
use crate::backend::error::BackendError;
use crate::backend::server::config::ServerConfig;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `None` when `DATABASE_URL` is not configured. Texts, friends and auth
    /// need it; see `AppState::require_db`.
    pub db_pool: Option<PgPool>,

    /// Annotation engine over PostgreSQL, or memory when no pool exists
    pub engine: AnnotationEngine,

    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build state around an optional pool, picking the matching store
    ///
    /// Without a pool the server runs in development mode: annotations live
    /// in memory and users and texts cannot be created, so only embedders
    /// and tests that seed a `MemoryAnnotationStore` get a usable engine.
    pub fn new(db_pool: Option<PgPool>, config: ServerConfig) -> Self {
        let store: Arc<dyn AnnotationStore> = match &db_pool {
            Some(pool) => Arc::new(PgAnnotationStore::new(pool.clone())),
            None => {
                tracing::warn!(
                    "No database pool; running in development mode with in-memory annotations. \
                     Signup and texts are unavailable, set DATABASE_URL for production"
                );
                Arc::new(MemoryAnnotationStore::new())
            }
        };
        Self::with_store(db_pool, store, config)
    }

    /// Build state around an explicit annotation store
    pub fn with_store(
        db_pool: Option<PgPool>,
        store: Arc<dyn AnnotationStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            db_pool,
            engine: AnnotationEngine::new(store),
            config: Arc::new(config),
        }
    }

    /// The pool, or `DatabaseUnavailable` for database-only routes
    pub fn require_db(&self) -> Result<&PgPool, BackendError> {
        self.db_pool.as_ref().ok_or(BackendError::DatabaseUnavailable)
    }
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for AnnotationEngine {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.engine.clone()
    }
}
