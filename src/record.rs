//! Record types - one concrete struct per collection
//!
//! Typed records are the primary interface to the store. String-driven
//! callers (the HTTP API, generic listings) go through [`FieldMap`], which is
//! converted to and from the typed records using the collection's field schema.

use crate::collection::{Collection, FieldKind};
use crate::{Error, Result, SchemaError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Textual date format used in storage and field maps
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single untyped field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Real(f64),
    Text(String),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{}", s),
            Value::Real(v) => write!(f, "{:.2}", v),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Real(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::Text(date.format(DATE_FORMAT).to_string())
    }
}

impl From<LeadStatus> for Value {
    fn from(status: LeadStatus) -> Self {
        Value::Text(status.as_str().to_string())
    }
}

/// Field name to value mapping for one record
pub type FieldMap = BTreeMap<String, Value>;

/// Status of a lead in the sales pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Converted,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Converted => "Converted",
        }
    }

    pub fn all() -> &'static [LeadStatus] {
        &[LeadStatus::New, LeadStatus::Contacted, LeadStatus::Converted]
    }
}

impl FromStr for LeadStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "new" => Ok(LeadStatus::New),
            "contacted" => Ok(LeadStatus::Contacted),
            "converted" => Ok(LeadStatus::Converted),
            _ => Err(format!(
                "unknown lead status '{}' (expected New, Contacted or Converted)",
                s
            )),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A record type bound to exactly one collection.
pub trait Record: Sized {
    const COLLECTION: Collection;

    /// Store-assigned identifier
    fn id(&self) -> &str;

    /// Convert to an untyped field map keyed by field name
    fn to_fields(&self) -> FieldMap;

    /// Build from an untyped field map, checking every required field
    fn from_fields(fields: &FieldMap) -> Result<Self>;

    /// Check value constraints (non-negative decimals) without building a copy
    /// for the caller.
    fn validate(&self) -> Result<()> {
        Self::from_fields(&self.to_fields()).map(|_| ())
    }

    /// Values in the collection's schema order
    fn values(&self) -> Vec<Value> {
        let mut fields = self.to_fields();
        Self::COLLECTION
            .fields()
            .iter()
            .filter_map(|f| fields.remove(f.name))
            .collect()
    }
}

/// Typed reads out of a field map, reporting schema violations for one collection.
pub(crate) struct FieldReader<'a> {
    collection: Collection,
    fields: &'a FieldMap,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(collection: Collection, fields: &'a FieldMap) -> Self {
        Self { collection, fields }
    }

    fn invalid(&self, field: &str, reason: impl Into<String>) -> Error {
        SchemaError::InvalidField {
            collection: self.collection,
            field: field.to_string(),
            reason: reason.into(),
        }
        .into()
    }

    fn raw(&self, name: &str) -> Result<&'a Value> {
        self.fields.get(name).ok_or_else(|| {
            SchemaError::MissingField {
                collection: self.collection,
                field: name.to_string(),
            }
            .into()
        })
    }

    pub(crate) fn text(&self, name: &str) -> Result<String> {
        match self.raw(name)? {
            Value::Text(s) => Ok(s.clone()),
            Value::Real(_) => Err(self.invalid(name, "expected text, found a number")),
        }
    }

    pub(crate) fn decimal(&self, name: &str) -> Result<f64> {
        let value = match self.raw(name)? {
            Value::Real(v) => *v,
            Value::Text(s) => s
                .trim()
                .parse::<f64>()
                .map_err(|_| self.invalid(name, format!("'{}' is not a number", s)))?,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(self.invalid(name, format!("{} must be a non-negative number", value)));
        }
        Ok(value)
    }

    pub(crate) fn date(&self, name: &str) -> Result<NaiveDate> {
        let text = self.text(name)?;
        NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
            .map_err(|e| self.invalid(name, format!("'{}' is not a YYYY-MM-DD date: {}", text, e)))
    }

    pub(crate) fn status(&self, name: &str) -> Result<LeadStatus> {
        let text = self.text(name)?;
        text.parse().map_err(|e: String| self.invalid(name, e))
    }

    /// Read a field according to its declared kind, normalising the value.
    pub(crate) fn by_kind(&self, name: &str, kind: FieldKind) -> Result<Value> {
        Ok(match kind {
            FieldKind::Text => Value::Text(self.text(name)?),
            FieldKind::Decimal => Value::Real(self.decimal(name)?),
            FieldKind::Date => self.date(name)?.into(),
            FieldKind::Status => self.status(name)?.into(),
        })
    }
}

fn field_map<const N: usize>(entries: [(&str, Value); N]) -> FieldMap {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// A sales lead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    /// Where the lead came from (web, referral, walk-in...)
    pub source: String,
    pub referral_source: String,
    /// Acquisition cost
    pub cost: f64,
    pub received_date: NaiveDate,
    pub status: LeadStatus,
}

impl Lead {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        referral_source: impl Into<String>,
        cost: f64,
        received_date: NaiveDate,
        status: LeadStatus,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            referral_source: referral_source.into(),
            cost,
            received_date,
            status,
        }
    }
}

impl Record for Lead {
    const COLLECTION: Collection = Collection::Leads;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        field_map([
            ("id", self.id.as_str().into()),
            ("source", self.source.as_str().into()),
            ("referral_source", self.referral_source.as_str().into()),
            ("cost", self.cost.into()),
            ("received_date", self.received_date.into()),
            ("status", self.status.into()),
        ])
    }

    fn from_fields(fields: &FieldMap) -> Result<Self> {
        let r = FieldReader::new(Self::COLLECTION, fields);
        Ok(Self {
            id: r.text("id")?,
            source: r.text("source")?,
            referral_source: r.text("referral_source")?,
            cost: r.decimal("cost")?,
            received_date: r.date("received_date")?,
            status: r.status("status")?,
        })
    }
}

/// A contracted project. `lead_id` is a soft reference and may name a lead
/// that does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub lead_id: String,
    pub project_type: String,
    pub start_date: NaiveDate,
    pub contract_value: f64,
}

impl Project {
    pub fn new(
        id: impl Into<String>,
        lead_id: impl Into<String>,
        project_type: impl Into<String>,
        start_date: NaiveDate,
        contract_value: f64,
    ) -> Self {
        Self {
            id: id.into(),
            lead_id: lead_id.into(),
            project_type: project_type.into(),
            start_date,
            contract_value,
        }
    }
}

impl Record for Project {
    const COLLECTION: Collection = Collection::Projects;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        field_map([
            ("id", self.id.as_str().into()),
            ("lead_id", self.lead_id.as_str().into()),
            ("project_type", self.project_type.as_str().into()),
            ("start_date", self.start_date.into()),
            ("contract_value", self.contract_value.into()),
        ])
    }

    fn from_fields(fields: &FieldMap) -> Result<Self> {
        let r = FieldReader::new(Self::COLLECTION, fields);
        Ok(Self {
            id: r.text("id")?,
            lead_id: r.text("lead_id")?,
            project_type: r.text("project_type")?,
            start_date: r.date("start_date")?,
            contract_value: r.decimal("contract_value")?,
        })
    }
}

/// Work logged against a project on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUpdate {
    pub id: String,
    pub project_id: String,
    pub date: NaiveDate,
    pub hours_worked: f64,
    pub material_costs: f64,
}

impl DailyUpdate {
    pub fn new(
        id: impl Into<String>,
        project_id: impl Into<String>,
        date: NaiveDate,
        hours_worked: f64,
        material_costs: f64,
    ) -> Self {
        Self {
            id: id.into(),
            project_id: project_id.into(),
            date,
            hours_worked,
            material_costs,
        }
    }
}

impl Record for DailyUpdate {
    const COLLECTION: Collection = Collection::DailyUpdates;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        field_map([
            ("id", self.id.as_str().into()),
            ("project_id", self.project_id.as_str().into()),
            ("date", self.date.into()),
            ("hours_worked", self.hours_worked.into()),
            ("material_costs", self.material_costs.into()),
        ])
    }

    fn from_fields(fields: &FieldMap) -> Result<Self> {
        let r = FieldReader::new(Self::COLLECTION, fields);
        Ok(Self {
            id: r.text("id")?,
            project_id: r.text("project_id")?,
            date: r.date("date")?,
            hours_worked: r.decimal("hours_worked")?,
            material_costs: r.decimal("material_costs")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub id: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    pub purchase_date: NaiveDate,
    pub current_status: String,
}

impl Equipment {
    pub fn new(
        id: impl Into<String>,
        equipment_type: impl Into<String>,
        purchase_date: NaiveDate,
        current_status: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            equipment_type: equipment_type.into(),
            purchase_date,
            current_status: current_status.into(),
        }
    }
}

impl Record for Equipment {
    const COLLECTION: Collection = Collection::Equipment;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        field_map([
            ("id", self.id.as_str().into()),
            ("type", self.equipment_type.as_str().into()),
            ("purchase_date", self.purchase_date.into()),
            ("current_status", self.current_status.as_str().into()),
        ])
    }

    fn from_fields(fields: &FieldMap) -> Result<Self> {
        let r = FieldReader::new(Self::COLLECTION, fields);
        Ok(Self {
            id: r.text("id")?,
            equipment_type: r.text("type")?,
            purchase_date: r.date("purchase_date")?,
            current_status: r.text("current_status")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub service_type: String,
    /// Free-form pricing description ("hourly $85", "fixed per job")
    pub rate_structure: String,
}

impl Vendor {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        service_type: impl Into<String>,
        rate_structure: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            service_type: service_type.into(),
            rate_structure: rate_structure.into(),
        }
    }
}

impl Record for Vendor {
    const COLLECTION: Collection = Collection::Vendors;

    fn id(&self) -> &str {
        &self.id
    }

    fn to_fields(&self) -> FieldMap {
        field_map([
            ("id", self.id.as_str().into()),
            ("name", self.name.as_str().into()),
            ("service_type", self.service_type.as_str().into()),
            ("rate_structure", self.rate_structure.as_str().into()),
        ])
    }

    fn from_fields(fields: &FieldMap) -> Result<Self> {
        let r = FieldReader::new(Self::COLLECTION, fields);
        Ok(Self {
            id: r.text("id")?,
            name: r.text("name")?,
            service_type: r.text("service_type")?,
            rate_structure: r.text("rate_structure")?,
        })
    }
}

/// Check a field map against a collection's schema and return it normalised:
/// decimals as numbers, dates and statuses in canonical form. A key the
/// schema does not know is an `InvalidField` error.
pub fn normalize_fields(collection: Collection, fields: &FieldMap) -> Result<FieldMap> {
    if let Some(unknown) = fields.keys().find(|name| collection.field(name).is_none()) {
        return Err(SchemaError::InvalidField {
            collection,
            field: unknown.clone(),
            reason: "not a field of this collection".to_string(),
        }
        .into());
    }

    let reader = FieldReader::new(collection, fields);
    collection
        .fields()
        .iter()
        .map(|f| Ok((f.name.to_string(), reader.by_kind(f.name, f.kind)?)))
        .collect()
}

/// Convert a decoded JSON object into a field map.
///
/// `null` counts as absent, so a required field sent as `null` surfaces as
/// `MissingField` later. Booleans, arrays and objects are `InvalidField`.
pub fn fields_from_json(
    collection: Collection,
    object: BTreeMap<String, serde_json::Value>,
) -> Result<FieldMap> {
    let mut fields = FieldMap::new();
    for (name, value) in object {
        let value = match value {
            serde_json::Value::Null => continue,
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Number(n) => match n.as_f64() {
                Some(v) => Value::Real(v),
                None => {
                    return Err(SchemaError::InvalidField {
                        collection,
                        field: name,
                        reason: format!("{} is out of range", n),
                    }
                    .into());
                }
            },
            other => {
                return Err(SchemaError::InvalidField {
                    collection,
                    field: name,
                    reason: format!("expected text or a number, found {}", other),
                }
                .into());
            }
        };
        fields.insert(name, value);
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn sample_lead() -> Lead {
        Lead::new("abc12345", "Referral", "Friend", 0.0, date("2024-01-05"), LeadStatus::New)
    }

    #[test]
    fn test_lead_status_roundtrip() {
        for status in LeadStatus::all() {
            let parsed: LeadStatus = status.as_str().parse().unwrap();
            assert_eq!(*status, parsed);
        }
        assert!(LeadStatus::from_str("Lost").is_err());
    }

    #[test]
    fn test_lead_fields() {
        let fields = sample_lead().to_fields();
        assert_eq!(fields["id"], Value::from("abc12345"));
        assert_eq!(fields["cost"], Value::Real(0.0));
        assert_eq!(fields["received_date"], Value::from("2024-01-05"));
        assert_eq!(fields["status"], Value::from("New"));
        assert_eq!(Lead::from_fields(&fields).unwrap(), sample_lead());
    }

    #[test]
    fn test_values_follow_schema_order() {
        let vendor = Vendor::new("v0000001", "Acme Lumber", "Materials", "Net 30");
        let values = vendor.values();
        assert_eq!(
            values,
            vec![
                Value::from("v0000001"),
                Value::from("Acme Lumber"),
                Value::from("Materials"),
                Value::from("Net 30"),
            ]
        );
    }

    #[test]
    fn test_missing_field() {
        let mut fields = sample_lead().to_fields();
        fields.remove("source");
        let err = Lead::from_fields(&fields).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::MissingField { collection: Collection::Leads, ref field })
                if field == "source"
        ));
    }

    #[test]
    fn test_negative_decimal_rejected() {
        let lead = Lead { cost: -5.0, ..sample_lead() };
        let err = lead.validate().unwrap_err();
        assert!(matches!(err, Error::Schema(SchemaError::InvalidField { .. })));
    }

    #[test]
    fn test_decimal_from_text() {
        let mut fields = Project::new("p1", "l1", "Deck", date("2024-03-01"), 0.0).to_fields();
        fields.insert("contract_value".into(), Value::from("12500.5"));
        let project = Project::from_fields(&fields).unwrap();
        assert_eq!(project.contract_value, 12500.5);
    }

    #[test]
    fn test_bad_date_rejected() {
        let mut fields = Equipment::new("e1", "Excavator", date("2023-06-01"), "Active").to_fields();
        fields.insert("purchase_date".into(), Value::from("June 1st"));
        assert!(Equipment::from_fields(&fields).is_err());
    }

    #[test]
    fn test_value_json_shape() {
        let json = serde_json::to_value(sample_lead().to_fields()).unwrap();
        assert_eq!(json["cost"], serde_json::json!(0.0));
        assert_eq!(json["status"], serde_json::json!("New"));

        let parsed: FieldMap = serde_json::from_value(serde_json::json!({
            "hours_worked": 8,
            "project_id": "p1",
        }))
        .unwrap();
        assert_eq!(parsed["hours_worked"], Value::Real(8.0));
        assert_eq!(parsed["project_id"], Value::from("p1"));
    }

    #[test]
    fn test_equipment_serializes_type() {
        let equipment = Equipment::new("e1", "Excavator", date("2023-06-01"), "Active");
        let json = serde_json::to_value(&equipment).unwrap();
        assert_eq!(json["type"], "Excavator");
    }

    #[test]
    fn test_normalize_rejects_unknown_fields() {
        let mut fields = sample_lead().to_fields();
        fields.insert("notes".into(), Value::from("call back"));
        let err = normalize_fields(Collection::Leads, &fields).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::InvalidField { ref field, .. }) if field == "notes"
        ));
    }

    #[test]
    fn test_normalize_canonical_status() {
        let mut fields = sample_lead().to_fields();
        fields.insert("status".into(), Value::from("contacted"));
        let normalized = normalize_fields(Collection::Leads, &fields).unwrap();
        assert_eq!(normalized["status"], Value::from("Contacted"));
    }

    #[test]
    fn test_json_null_is_missing() {
        let object: BTreeMap<String, serde_json::Value> = serde_json::from_value(serde_json::json!({
            "id": "v0000001",
            "name": "Acme",
            "service_type": null,
            "rate_structure": "Net 30",
        }))
        .unwrap();

        let fields = fields_from_json(Collection::Vendors, object).unwrap();
        assert!(!fields.contains_key("service_type"));
        let err = normalize_fields(Collection::Vendors, &fields).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::MissingField { ref field, .. }) if field == "service_type"
        ));
    }

    #[test]
    fn test_json_boolean_is_invalid() {
        let object: BTreeMap<String, serde_json::Value> =
            serde_json::from_value(serde_json::json!({ "name": true, "cost": 12 })).unwrap();
        let err = fields_from_json(Collection::Vendors, object).unwrap_err();
        assert!(matches!(
            err,
            Error::Schema(SchemaError::InvalidField { ref field, .. }) if field == "name"
        ));
    }
}
