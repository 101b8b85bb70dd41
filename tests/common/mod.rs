//! Common test utilities and helpers
//!
//! - `TestApp` - the full router over an in-memory annotation store
//! - `TestUser` - a seeded user with a bearer token
//! - assertion macros
//! - `pg` - PostgreSQL fixtures for the ignored suites

#![allow(dead_code)]

pub mod assertions;
pub mod pg;

use std::sync::Arc;

use axum_test::TestServer;
use uuid::Uuid;

use lecotes::backend::annotations::MemoryAnnotationStore;
use lecotes::backend::auth::sessions::create_token;
use lecotes::backend::routes::create_router;
use lecotes::backend::server::{AppState, ServerConfig};
use lecotes::shared::texts::Text;

/// A seeded user and their bearer token
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub token: String,
}

/// Router without a database: annotations in memory, database routes 503
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryAnnotationStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryAnnotationStore::new());
        let state = AppState::with_store(None, store.clone(), ServerConfig::default());
        let server = TestServer::new(create_router(state)).expect("Failed to start test server");
        Self { server, store }
    }

    /// Register a user in the store and mint a token for them
    pub async fn user(&self, username: &str) -> TestUser {
        let id = self.store.insert_user(username).await;
        let token = create_token(id, username).expect("Failed to create test token");
        TestUser {
            id,
            username: username.to_string(),
            token,
        }
    }

    pub async fn text(&self, owner: &TestUser, content: &str) -> Text {
        self.store.insert_text(owner.id, "Test text", content).await
    }
}

/// Forty characters of filler for annotation ranges
pub const SAMPLE_CONTENT: &str = "The quick brown fox jumps over a lazy do";
