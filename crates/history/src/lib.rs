//! History stores: where completed runs are kept.
//!
//! Two [`copymill_core::HistoryStore`] implementations:
//! - [`SqliteHistoryStore`] — the production backend, one database file
//! - [`InMemoryHistoryStore`] — a `Mutex<Vec>` for tests and ephemeral use

pub mod in_memory;
pub mod sqlite;

pub use in_memory::InMemoryHistoryStore;
pub use sqlite::SqliteHistoryStore;
