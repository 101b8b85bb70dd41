//! Server Module
//!
//! Server initialization, configuration and shared state.
//!
//! - **`state`** - `AppState` and its `FromRef` implementations
//! - **`config`** - `ServerConfig::from_env` and database loading
//! - **`init`** - `create_app`
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env`
//! 2. **Database**: connect and migrate when `DATABASE_URL` is set
//! 3. **State Creation**: pick the PostgreSQL or in-memory annotation store
//! 4. **Router Creation**: routes, middleware and static files

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

pub use config::{ConfigError, ServerConfig};
pub use init::create_app;
pub use state::AppState;
