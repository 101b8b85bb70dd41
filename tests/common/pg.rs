//! PostgreSQL fixtures
//!
//! Suites using these are `#[ignore]`d and need `DATABASE_URL` pointing at a
//! disposable database:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/lecotes_test cargo test -- --ignored
//! ```

use std::sync::Arc;

use sqlx::PgPool;
use uuid::Uuid;

use lecotes::backend::annotations::{AnnotationEngine, PgAnnotationStore};
use lecotes::backend::auth::users::{create_user, User};
use lecotes::backend::texts::db::create_text;

pub const CONTENT: &str = "Sing, O goddess, the anger of Achilles son of Peleus";

/// Connect, migrate and build an engine over the pool
pub async fn setup() -> (PgPool, AnnotationEngine) {
    dotenv::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for PostgreSQL tests");
    let pool = PgPool::connect(&url).await.expect("Failed to connect to database");
    sqlx::migrate!().run(&pool).await.expect("Failed to run migrations");
    let engine = AnnotationEngine::new(Arc::new(PgAnnotationStore::new(pool.clone())));
    (pool, engine)
}

/// A user with a unique username and e-mail
pub async fn seed_user(pool: &PgPool, prefix: &str) -> User {
    let tag = Uuid::new_v4().simple().to_string();
    let username = format!("{}_{}", prefix, &tag[..8]);
    let email = format!("{}@example.com", username);
    create_user(pool, &username, &email, "not-a-real-hash")
        .await
        .expect("Failed to create user")
}

/// An unshared text owned by `owner`
pub async fn seed_text(pool: &PgPool, owner: Uuid) -> Uuid {
    let (text, _) = create_text(pool, owner, "Iliad", CONTENT, &[])
        .await
        .expect("Failed to create text");
    text.id
}
