//! Database schema definitions
//!
//! Table and column names match the original `business_management.db`
//! layout so existing database files open unchanged.

use crate::collection::Collection;

/// SQL to create the leads table
pub const CREATE_LEADS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Leads (
    LeadID TEXT PRIMARY KEY,
    LeadSource TEXT,
    ReferralSource TEXT,
    LeadCost REAL,
    ReceivedDate TEXT,
    Status TEXT
)
"#;

/// SQL to create the projects table
pub const CREATE_PROJECTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Projects (
    ProjectID TEXT PRIMARY KEY,
    LeadID TEXT,
    ProjectType TEXT,
    StartDate TEXT,
    ContractValue REAL,
    FOREIGN KEY (LeadID) REFERENCES Leads(LeadID)
)
"#;

/// SQL to create the daily updates table
pub const CREATE_DAILY_UPDATES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS DailyUpdates (
    UpdateID TEXT PRIMARY KEY,
    ProjectID TEXT,
    Date TEXT,
    HoursWorked REAL,
    MaterialCosts REAL,
    FOREIGN KEY (ProjectID) REFERENCES Projects(ProjectID)
)
"#;

/// SQL to create the equipment table
pub const CREATE_EQUIPMENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Equipment (
    EquipmentID TEXT PRIMARY KEY,
    Type TEXT,
    PurchaseDate TEXT,
    CurrentStatus TEXT
)
"#;

/// SQL to create the vendors table
pub const CREATE_VENDORS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS Vendors (
    VendorID TEXT PRIMARY KEY,
    Name TEXT,
    ServiceType TEXT,
    RateStructure TEXT
)
"#;

/// Creation statement for one collection's table
pub fn create_table_statement(collection: Collection) -> &'static str {
    match collection {
        Collection::Leads => CREATE_LEADS_TABLE,
        Collection::Projects => CREATE_PROJECTS_TABLE,
        Collection::DailyUpdates => CREATE_DAILY_UPDATES_TABLE,
        Collection::Equipment => CREATE_EQUIPMENT_TABLE,
        Collection::Vendors => CREATE_VENDORS_TABLE,
    }
}

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    Collection::all()
        .iter()
        .map(|c| create_table_statement(*c))
        .collect()
}
