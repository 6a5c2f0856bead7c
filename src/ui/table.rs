use crate::collection::Collection;
use crate::record::FieldMap;
use crate::report::{MonthlyTotal, TypeSummary};
use crate::storage::DbStats;
use tabled::builder::Builder;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
pub struct TableRow {
    #[tabled(rename = "Collection")]
    pub metric: String,
    #[tabled(rename = "Records")]
    pub value: String,
}

pub struct TableBuilder {
    rows: Vec<TableRow>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn add_row(&mut self, label: &str, value: &str) {
        self.rows.push(TableRow {
            metric: label.to_string(),
            value: value.to_string(),
        });
    }

    pub fn build(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        Table::new(&self.rows).with(Style::rounded()).to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn stats_table(stats: &DbStats) -> String {
    let mut builder = TableBuilder::new();
    for collection in Collection::all() {
        builder.add_row(collection.as_str(), &stats.get(*collection).to_string());
    }
    builder.add_row("Total", &stats.total().to_string());
    builder.build()
}

/// Render field maps as a table with one column per schema field, headed by
/// the table's column names. Missing (NULL) values render empty.
pub fn records_table(collection: Collection, rows: &[FieldMap]) -> String {
    let mut builder = Builder::default();
    builder.push_record(collection.fields().iter().map(|f| f.column.to_string()));
    for row in rows {
        builder.push_record(
            collection
                .fields()
                .iter()
                .map(|f| row.get(f.name).map(ToString::to_string).unwrap_or_default()),
        );
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn cash_flow_table(flow: &[MonthlyTotal]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Month", "Contract Value"]);
    for entry in flow {
        builder.push_record([entry.month.clone(), format!("{:.2}", entry.contract_value)]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn project_type_table(summary: &[TypeSummary]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Project Type", "Projects", "Total", "Average"]);
    for entry in summary {
        builder.push_record([
            entry.project_type.clone(),
            entry.projects.to_string(),
            format!("{:.2}", entry.total),
            format!("{:.2}", entry.average),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}
