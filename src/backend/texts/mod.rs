//! Texts Module
//!
//! Creating, sharing, listing and deleting the documents users annotate.
//!
//! - **`db`** - PostgreSQL queries
//! - **`handlers`** - HTTP handlers

pub mod db;
pub mod handlers;

pub use handlers::{create_text, delete_text, get_text, list_texts};
