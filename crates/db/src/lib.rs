//! vorlage-db – Datenbank-Abstraktion
//!
//! Dieses Crate stellt das Repository-Pattern bereit. Die Geschaeftslogik
//! spricht nur mit den Traits in [`repository`]; die SQLite-Implementierung
//! in [`sqlite`] ist austauschbar.

pub mod error;
pub mod models;
pub mod repository;
pub mod sqlite;

pub use error::DbError;
pub use repository::{DatabaseConfig, DbResult, PostRepository, UserRepository};
pub use sqlite::SqliteDb;
