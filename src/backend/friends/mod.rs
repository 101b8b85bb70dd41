//! Friends Module
//!
//! Friend requests by e-mail, approval or denial, and friend lists.
//!
//! - **`db`** - PostgreSQL queries
//! - **`handlers`** - HTTP handlers

pub mod db;
pub mod handlers;

pub use handlers::{list_friend_requests, list_friends, respond_to_friend_request, send_friend_request};
