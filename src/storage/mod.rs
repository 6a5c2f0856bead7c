//! Storage Layer - SQLite-backed persistence
//!
//! System of record is a single SQLite file with one table per collection:
//! - Leads(LeadID, LeadSource, ReferralSource, LeadCost, ReceivedDate, Status)
//! - Projects(ProjectID, LeadID, ProjectType, StartDate, ContractValue)
//! - DailyUpdates(UpdateID, ProjectID, Date, HoursWorked, MaterialCosts)
//! - Equipment(EquipmentID, Type, PurchaseDate, CurrentStatus)
//! - Vendors(VendorID, Name, ServiceType, RateStructure)

pub mod schema;
pub mod sqlite;

pub use sqlite::{DbStats, SqliteStore, StoreConfig, DEFAULT_DATABASE_FILE};
