//! Collection types - the five record groups kept by the store
//!
//! Every record lives in exactly one collection:
//! - `Leads`: incoming sales leads
//! - `Projects`: contracted work, softly linked to a lead
//! - `DailyUpdates`: hours and material costs logged against a project
//! - `Equipment`: owned tools and machinery
//! - `Vendors`: suppliers and subcontractors

use crate::{Error, Result, SchemaError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Storage type of a single field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text (TEXT column)
    Text,
    /// Non-negative decimal (REAL column)
    Decimal,
    /// Calendar date, stored as `YYYY-MM-DD` text
    Date,
    /// One of `LeadStatus`, stored as text
    Status,
}

/// One field of a collection's schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name as used in field maps and JSON
    pub name: &'static str,
    /// Column name in the backing table
    pub column: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, column: &'static str, kind: FieldKind) -> FieldDef {
    FieldDef { name, column, kind }
}

const LEAD_FIELDS: &[FieldDef] = &[
    field("id", "LeadID", FieldKind::Text),
    field("source", "LeadSource", FieldKind::Text),
    field("referral_source", "ReferralSource", FieldKind::Text),
    field("cost", "LeadCost", FieldKind::Decimal),
    field("received_date", "ReceivedDate", FieldKind::Date),
    field("status", "Status", FieldKind::Status),
];

const PROJECT_FIELDS: &[FieldDef] = &[
    field("id", "ProjectID", FieldKind::Text),
    field("lead_id", "LeadID", FieldKind::Text),
    field("project_type", "ProjectType", FieldKind::Text),
    field("start_date", "StartDate", FieldKind::Date),
    field("contract_value", "ContractValue", FieldKind::Decimal),
];

const DAILY_UPDATE_FIELDS: &[FieldDef] = &[
    field("id", "UpdateID", FieldKind::Text),
    field("project_id", "ProjectID", FieldKind::Text),
    field("date", "Date", FieldKind::Date),
    field("hours_worked", "HoursWorked", FieldKind::Decimal),
    field("material_costs", "MaterialCosts", FieldKind::Decimal),
];

const EQUIPMENT_FIELDS: &[FieldDef] = &[
    field("id", "EquipmentID", FieldKind::Text),
    field("type", "Type", FieldKind::Text),
    field("purchase_date", "PurchaseDate", FieldKind::Date),
    field("current_status", "CurrentStatus", FieldKind::Text),
];

const VENDOR_FIELDS: &[FieldDef] = &[
    field("id", "VendorID", FieldKind::Text),
    field("name", "Name", FieldKind::Text),
    field("service_type", "ServiceType", FieldKind::Text),
    field("rate_structure", "RateStructure", FieldKind::Text),
];

/// The closed set of record collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    Leads,
    Projects,
    DailyUpdates,
    Equipment,
    Vendors,
}

impl Collection {
    /// Backing table name
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Leads => "Leads",
            Collection::Projects => "Projects",
            Collection::DailyUpdates => "DailyUpdates",
            Collection::Equipment => "Equipment",
            Collection::Vendors => "Vendors",
        }
    }

    /// Human label for a single record of this collection
    pub fn record_label(&self) -> &'static str {
        match self {
            Collection::Leads => "Lead",
            Collection::Projects => "Project",
            Collection::DailyUpdates => "Daily Update",
            Collection::Equipment => "Equipment",
            Collection::Vendors => "Vendor",
        }
    }

    /// Get all collections, in schema creation order
    pub fn all() -> &'static [Collection] {
        &[
            Collection::Leads,
            Collection::Projects,
            Collection::DailyUpdates,
            Collection::Equipment,
            Collection::Vendors,
        ]
    }

    /// Field schema of this collection. The identifier is always first.
    pub fn fields(&self) -> &'static [FieldDef] {
        match self {
            Collection::Leads => LEAD_FIELDS,
            Collection::Projects => PROJECT_FIELDS,
            Collection::DailyUpdates => DAILY_UPDATE_FIELDS,
            Collection::Equipment => EQUIPMENT_FIELDS,
            Collection::Vendors => VENDOR_FIELDS,
        }
    }

    /// Primary key column
    pub fn id_column(&self) -> &'static str {
        self.fields()[0].column
    }

    /// Look up a field by its field-map name
    pub fn field(&self, name: &str) -> Option<&'static FieldDef> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Comma-separated column list in schema order, for SELECT/INSERT
    pub fn column_list(&self) -> String {
        self.fields()
            .iter()
            .map(|f| f.column)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Collection {
    type Err = Error;

    /// Accepts the table name in any case, with or without `-`/`_`/space
    /// separators and in singular form (`daily-update`, `DailyUpdates`).
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "leads" | "lead" => Ok(Collection::Leads),
            "projects" | "project" => Ok(Collection::Projects),
            "dailyupdates" | "dailyupdate" | "updates" => Ok(Collection::DailyUpdates),
            "equipment" => Ok(Collection::Equipment),
            "vendors" | "vendor" => Ok(Collection::Vendors),
            _ => Err(SchemaError::UnknownCollection(s.to_string()).into()),
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_roundtrip() {
        for collection in Collection::all() {
            let parsed: Collection = collection.as_str().parse().unwrap();
            assert_eq!(*collection, parsed);
        }
    }

    #[test]
    fn test_collection_aliases() {
        assert_eq!(Collection::from_str("daily-updates").unwrap(), Collection::DailyUpdates);
        assert_eq!(Collection::from_str("daily_update").unwrap(), Collection::DailyUpdates);
        assert_eq!(Collection::from_str("LEADS").unwrap(), Collection::Leads);
        assert_eq!(Collection::from_str("vendor").unwrap(), Collection::Vendors);
    }

    #[test]
    fn test_unknown_collection() {
        let err = Collection::from_str("Invoices").unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::UnknownCollection(ref name)) if name == "Invoices"
        ));
    }

    #[test]
    fn test_id_is_first_field() {
        for collection in Collection::all() {
            let first = &collection.fields()[0];
            assert_eq!(first.name, "id");
            assert_eq!(first.kind, FieldKind::Text);
            assert!(first.column.ends_with("ID"));
        }
        assert_eq!(Collection::DailyUpdates.id_column(), "UpdateID");
    }

    #[test]
    fn test_column_list() {
        assert_eq!(
            Collection::Vendors.column_list(),
            "VendorID, Name, ServiceType, RateStructure"
        );
    }
}
