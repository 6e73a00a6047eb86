//! SQLite backend for the moot roster store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated
//! thread without blocking the async runtime. Errors surface as
//! [`moot_core::Error`]; there is no backend-private error taxonomy.

mod encode;
mod schema;
mod store;

pub use store::SqliteStore;
