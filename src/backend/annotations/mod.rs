//! Annotations Module
//!
//! The annotation engine and its storage.
//!
//! - **`engine`** - create with overlap merge, replies, votes, deletes
//! - **`store`** - the storage port (`AnnotationStore`, `StoreTx`)
//! - **`pg`** - PostgreSQL adapter
//! - **`memory`** - in-memory adapter
//! - **`error`** - `EngineError`
//! - **`handlers`** - HTTP handlers

pub mod engine;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod pg;
pub mod store;

pub use engine::{AnnotationEngine, CreateOutcome, VoteReceipt};
pub use error::{EngineError, EngineResult};
pub use memory::MemoryAnnotationStore;
pub use pg::PgAnnotationStore;
pub use store::{AnnotationOrder, AnnotationStore, StoreError, StoreTx};
