//! Data module - CSV loading and sales aggregation

pub mod aggregate;
mod loader;
mod model;

pub use aggregate::{DashboardViews, GroupTotal, MonthlyTotal};
pub use loader::{
    parse_amount, parse_date, read_table, table_from_dataframe, Dataset, LoadError, TableCache,
    DEFAULT_DATA_PATH, REQUIRED_COLUMNS,
};
pub use model::{Month, Table, Transaction};
