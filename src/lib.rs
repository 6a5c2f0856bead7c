//! # Bizman - Business Records Manager
//!
//! Keeps the day-to-day records of a small contracting business in a local
//! SQLite file.
//!
//! Bizman provides:
//! - Five record collections: leads, projects, daily updates, equipment, vendors
//! - Typed records plus an untyped field-map interface for string-driven callers
//! - SQLite-backed storage with create / read-all / delete-all operations
//! - Cash flow and project type reports
//! - A command-line front end and a JSON HTTP API

pub mod collection;
pub mod record;
pub mod id;
pub mod storage;
pub mod report;
pub mod server;
pub mod output;
pub mod config;
pub mod ui;

// Re-exports for convenient access
pub use collection::Collection;
pub use record::{DailyUpdate, Equipment, FieldMap, Lead, LeadStatus, Project, Record, Value, Vendor};
pub use id::generate_id;
pub use storage::{SqliteStore, StoreConfig};

/// Result type alias for Bizman operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Bizman operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A caller referenced something the schema does not have.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("unknown collection '{0}' (expected Leads, Projects, DailyUpdates, Equipment or Vendors)")]
    UnknownCollection(String),

    #[error("{collection} record is missing required field '{field}'")]
    MissingField { collection: Collection, field: String },

    #[error("{collection} field '{field}' is invalid: {reason}")]
    InvalidField {
        collection: Collection,
        field: String,
        reason: String,
    },
}
