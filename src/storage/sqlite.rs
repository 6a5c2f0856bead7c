//! SQLite storage implementation

use std::path::{Path, PathBuf};
use rusqlite::types::{ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, params_from_iter};
use serde::Serialize;
use crate::collection::{Collection, FieldKind};
use crate::record::{self, DailyUpdate, Equipment, FieldMap, Lead, Project, Record, Value, Vendor};
use crate::Result;
use super::schema;

/// Database file used when no path is configured
pub const DEFAULT_DATABASE_FILE: &str = "business_management.db";

/// Where the store keeps its data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_FILE)
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Text(s) => ToSqlOutput::from(s.as_str()),
            Value::Real(v) => ToSqlOutput::from(*v),
        })
    }
}

/// SQLite-backed storage for the business record collections.
///
/// Soft references (`Projects.LeadID`, `DailyUpdates.ProjectID`) are declared
/// in the schema but never enforced: the `foreign_keys` pragma stays off.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist) and ensure the schema
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let store = Self::connect(config)?;
        store.initialize()?;
        Ok(store)
    }

    /// Open a database file without touching its schema
    pub fn connect(config: &StoreConfig) -> Result<Self> {
        tracing::debug!("Opening database {}", config.path.display());
        Self::from_connection(Connection::open(&config.path)?)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let store = Self::from_connection(Connection::open_in_memory()?)?;
        store.initialize()?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", false)?;
        Ok(Self { conn })
    }

    /// Path of the backing file, `None` for in-memory databases
    pub fn path(&self) -> Option<&Path> {
        self.conn.path().filter(|p| !p.is_empty()).map(Path::new)
    }

    /// Create every collection table that does not exist yet.
    ///
    /// Safe to call on every start; existing rows are untouched.
    pub fn initialize(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    /// Whether all collection tables exist
    pub fn is_initialized(&self) -> Result<bool> {
        for collection in Collection::all() {
            let exists: bool = self.conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
                [collection.as_str()],
                |row| row.get(0),
            )?;
            if !exists {
                return Ok(false);
            }
        }
        Ok(true)
    }

    // ========== Insert ==========

    /// Insert one typed record. The record's id must already be assigned
    /// (see [`crate::generate_id`]).
    pub fn insert<R: Record>(&self, record: &R) -> Result<()> {
        record.validate()?;
        self.insert_values(R::COLLECTION, &record.values())
    }

    /// Insert one record given as a field map.
    ///
    /// Every schema field, `id` included, must be present and no other key
    /// is accepted. Returns the record as stored.
    pub fn insert_fields(&self, collection: Collection, fields: &FieldMap) -> Result<FieldMap> {
        let normalized = record::normalize_fields(collection, fields)?;
        let values: Vec<Value> = collection
            .fields()
            .iter()
            .filter_map(|f| normalized.get(f.name).cloned())
            .collect();
        self.insert_values(collection, &values)?;
        Ok(normalized)
    }

    fn insert_values(&self, collection: Collection, values: &[Value]) -> Result<()> {
        let placeholders = (1..=values.len())
            .map(|i| format!("?{}", i))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            collection.as_str(),
            collection.column_list(),
            placeholders
        );
        self.conn.execute(&sql, params_from_iter(values.iter()))?;
        tracing::debug!("Inserted 1 row into {}", collection);
        Ok(())
    }

    // ========== Read ==========

    /// All records of one typed collection, in insertion order
    pub fn fetch_all<R: Record>(&self) -> Result<Vec<R>> {
        let rows = self.fetch_all_fields(R::COLLECTION)?;
        let records = rows
            .iter()
            .map(|fields| {
                R::from_fields(fields).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
                })
            })
            .collect::<rusqlite::Result<Vec<R>>>()?;
        Ok(records)
    }

    /// All rows of a collection as field maps, in insertion order.
    ///
    /// NULL columns are left out of the map.
    pub fn fetch_all_fields(&self, collection: Collection) -> Result<Vec<FieldMap>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            collection.column_list(),
            collection.as_str()
        );
        let mut stmt = self.conn.prepare(&sql)?;

        let rows = stmt
            .query_map([], |row| self.row_to_fields(collection, row))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        tracing::debug!("Fetched {} rows from {}", rows.len(), collection);
        Ok(rows)
    }

    /// Helper to convert a row to a field map using the collection schema
    fn row_to_fields(&self, collection: Collection, row: &rusqlite::Row) -> rusqlite::Result<FieldMap> {
        let mut fields = FieldMap::new();
        for (idx, field) in collection.fields().iter().enumerate() {
            let decimal = field.kind == FieldKind::Decimal;
            let value = match row.get_ref(idx)? {
                ValueRef::Null => continue,
                ValueRef::Integer(i) if decimal => Value::Real(i as f64),
                ValueRef::Integer(i) => Value::Text(i.to_string()),
                ValueRef::Real(f) if decimal => Value::Real(f),
                ValueRef::Real(f) => Value::Text(f.to_string()),
                ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                    Value::Text(String::from_utf8_lossy(bytes).into_owned())
                }
            };
            fields.insert(field.name.to_string(), value);
        }
        Ok(fields)
    }

    pub fn leads(&self) -> Result<Vec<Lead>> {
        self.fetch_all()
    }

    pub fn projects(&self) -> Result<Vec<Project>> {
        self.fetch_all()
    }

    pub fn daily_updates(&self) -> Result<Vec<DailyUpdate>> {
        self.fetch_all()
    }

    pub fn equipment(&self) -> Result<Vec<Equipment>> {
        self.fetch_all()
    }

    pub fn vendors(&self) -> Result<Vec<Vendor>> {
        self.fetch_all()
    }

    /// Count rows in a collection
    pub fn count(&self, collection: Collection) -> Result<usize> {
        let sql = format!("SELECT COUNT(*) FROM {}", collection.as_str());
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // ========== Bulk Operations ==========

    /// Delete every record in a collection, keeping the table.
    ///
    /// Returns the number of rows removed. Irreversible.
    pub fn delete_all(&self, collection: Collection) -> Result<usize> {
        let sql = format!("DELETE FROM {}", collection.as_str());
        let deleted = self.conn.execute(&sql, [])?;
        tracing::debug!("Deleted {} rows from {}", deleted, collection);
        Ok(deleted)
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<DbStats> {
        Ok(DbStats {
            leads: self.count(Collection::Leads)?,
            projects: self.count(Collection::Projects)?,
            daily_updates: self.count(Collection::DailyUpdates)?,
            equipment: self.count(Collection::Equipment)?,
            vendors: self.count(Collection::Vendors)?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DbStats {
    pub leads: usize,
    pub projects: usize,
    pub daily_updates: usize,
    pub equipment: usize,
    pub vendors: usize,
}

impl DbStats {
    /// Row count for one collection
    pub fn get(&self, collection: Collection) -> usize {
        match collection {
            Collection::Leads => self.leads,
            Collection::Projects => self.projects,
            Collection::DailyUpdates => self.daily_updates,
            Collection::Equipment => self.equipment,
            Collection::Vendors => self.vendors,
        }
    }

    pub fn total(&self) -> usize {
        Collection::all().iter().map(|c| self.get(*c)).sum()
    }
}

impl std::fmt::Display for DbStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "  Leads: {}", self.leads)?;
        writeln!(f, "  Projects: {}", self.projects)?;
        writeln!(f, "  Daily Updates: {}", self.daily_updates)?;
        writeln!(f, "  Equipment: {}", self.equipment)?;
        writeln!(f, "  Vendors: {}", self.vendors)
    }
}
