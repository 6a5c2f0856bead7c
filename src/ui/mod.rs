pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{banner, dim, error, header, info, section, success, summary_row, warn};
pub use table::{TableBuilder, cash_flow_table, project_type_table, records_table, stats_table};
pub use theme::{money, theme, Theme};
