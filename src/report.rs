//! Reports over the Projects collection
//!
//! - `cash_flow`: contract value summed per start month
//! - `by_project_type`: project count and contract value per project type

use crate::record::Project;
use serde::Serialize;
use std::collections::BTreeMap;

/// Contract value starting in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    /// `YYYY-MM`
    pub month: String,
    pub contract_value: f64,
}

/// Contract value totals for one project type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeSummary {
    pub project_type: String,
    pub projects: usize,
    pub total: f64,
    pub average: f64,
}

/// Group projects by start month and sum their contract values.
///
/// Months with no projects are not emitted. Output is ascending by month.
pub fn cash_flow(projects: &[Project]) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<String, f64> = BTreeMap::new();
    for project in projects {
        let month = project.start_date.format("%Y-%m").to_string();
        *months.entry(month).or_default() += project.contract_value;
    }

    months
        .into_iter()
        .map(|(month, contract_value)| MonthlyTotal { month, contract_value })
        .collect()
}

/// Summarise contract values per project type, sorted by type name.
pub fn by_project_type(projects: &[Project]) -> Vec<TypeSummary> {
    let mut types: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for project in projects {
        let entry = types.entry(project.project_type.as_str()).or_default();
        entry.0 += 1;
        entry.1 += project.contract_value;
    }

    types
        .into_iter()
        .map(|(project_type, (count, total))| TypeSummary {
            project_type: project_type.to_string(),
            projects: count,
            total,
            average: total / count as f64,
        })
        .collect()
}
