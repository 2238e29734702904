//! vorlage-core – Gemeinsame Typen
//!
//! Stellt die ID-Typen bereit, die von Datenbank, Auth und Web gemeinsam
//! genutzt werden.

pub mod types;

// Re-Exporte fuer bequemen Zugriff
pub use types::{PostId, UserId};
