//! Storage ports and their backends.
//!
//! Layout:
//! - `traits.rs`: the `KeyValueStore` port shared by durable and session storage
//! - `schema.rs`: SQL DDL for the durable store (SQLite)
//! - `sqlite.rs`: durable backend
//! - `memory.rs`: session backend

pub mod memory;
pub mod models;
pub mod schema;
pub mod sqlite;
pub mod traits;

pub use memory::MemoryKv;
pub use models::KvEntry;
pub use schema::SQLITE_INIT;
pub use sqlite::{SqliteKv, SqlitePool, connect};
pub use traits::KeyValueStore;

/// Durable key holding the JSON array of quotes.
pub const QUOTES_KEY: &str = "quotes";
/// Durable key holding the selected category filter.
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Session key holding the last rendered quote.
pub const LAST_VIEWED_QUOTE_KEY: &str = "lastViewedQuote";
