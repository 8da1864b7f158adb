//! CSV Data Loader Module
//! Reads the sales CSV with Polars, validates every row into a typed `Table`
//! and memoizes the result until the source file changes.

use crate::data::model::{Table, Transaction};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::SystemTime;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Where the dashboard looks for data unless told otherwise.
pub const DEFAULT_DATA_PATH: &str = "data/sales_data.csv";

/// Columns every source file must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 5] = ["date", "order_id", "category", "region", "total_amount"];

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("Row {row}: invalid {column} value '{value}'")]
    MalformedRow {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("Row {row}: total sales exceed the supported range")]
    TotalOverflow { row: usize },
}

/// Outcome of a load. Absent and Empty are distinct, and neither is an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    /// The source file does not exist or cannot be opened.
    Absent,
    /// The source file is well-formed but has no data rows.
    Empty,
    Populated(Arc<Table>),
}

impl Dataset {
    fn from_table(table: Arc<Table>) -> Self {
        if table.is_empty() {
            Dataset::Empty
        } else {
            Dataset::Populated(table)
        }
    }

    /// The loaded table, if there is anything to show.
    pub fn table(&self) -> Option<&Arc<Table>> {
        match self {
            Dataset::Populated(table) => Some(table),
            Dataset::Absent | Dataset::Empty => None,
        }
    }
}

/// Identifies one version of the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SourceStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl SourceStamp {
    /// `None` when the file is missing, is not a regular file or cannot be opened.
    fn read(path: &Path) -> Option<Self> {
        let metadata = fs::metadata(path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        File::open(path).ok()?;
        Some(Self {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        })
    }
}

struct CacheEntry {
    stamp: SourceStamp,
    table: Arc<Table>,
}

/// Memoizes the parsed table of one source file.
///
/// An entry stays valid while the file's modification time and length are
/// unchanged. Readers share the cached `Arc<Table>`; a miss re-reads the file
/// and swaps the new table in under the write lock.
pub struct TableCache {
    path: PathBuf,
    entry: RwLock<Option<CacheEntry>>,
}

impl Default for TableCache {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry: RwLock::new(None),
        }
    }

    /// Get the source path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Drop the cached table so the next load re-reads the file.
    pub fn invalidate(&self) {
        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Load the source file, serving the cached table when the file is unchanged.
    pub fn load(&self) -> Result<Dataset, LoadError> {
        let Some(stamp) = SourceStamp::read(&self.path) else {
            warn!("Data source {} is absent", self.path.display());
            self.invalidate();
            return Ok(Dataset::Absent);
        };

        if let Some(table) = self.cached(stamp) {
            debug!("Cache hit for {}", self.path.display());
            return Ok(Dataset::from_table(table));
        }

        debug!("Cache miss for {}, reading file", self.path.display());
        let table = Arc::new(read_table(&self.path)?);
        info!("Loaded {} rows from {}", table.len(), self.path.display());

        *self.entry.write().unwrap_or_else(PoisonError::into_inner) = Some(CacheEntry {
            stamp,
            table: Arc::clone(&table),
        });

        Ok(Dataset::from_table(table))
    }

    fn cached(&self, stamp: SourceStamp) -> Option<Arc<Table>> {
        self.entry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .filter(|entry| entry.stamp == stamp)
            .map(|entry| Arc::clone(&entry.table))
    }
}

/// Read and validate the whole file. Any bad row fails the load.
pub fn read_table(path: &Path) -> Result<Table, LoadError> {
    // Every column as String: dates and amounts are validated row by row below
    let df = LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?
        .collect()?;

    table_from_dataframe(&df)
}

/// Convert a string-typed frame into transactions.
///
/// Blank lines are skipped; row numbers in errors still count them. The
/// running total is checked so that no aggregate over the table can overflow.
pub fn table_from_dataframe(df: &DataFrame) -> Result<Table, LoadError> {
    let [dates, order_ids, categories, regions, amounts] = REQUIRED_COLUMNS.map(|name| {
        df.get_column_names()
            .iter()
            .any(|col| col.as_str() == name)
            .then(|| df.column(name))
    });

    let dates = string_column(dates, "date")?;
    let order_ids = string_column(order_ids, "order_id")?;
    let categories = string_column(categories, "category")?;
    let regions = string_column(regions, "region")?;
    let amounts = string_column(amounts, "total_amount")?;

    let mut records = Vec::with_capacity(df.height());
    let mut running_total = Decimal::ZERO;
    for i in 0..df.height() {
        let row = i + 1;
        let cells = [&dates, &order_ids, &categories, &regions, &amounts];
        if cells.iter().all(|column| is_blank(column.get(i))) {
            debug!("Skipping blank row {row}");
            continue;
        }

        let date_raw = dates.get(i).unwrap_or_default();
        let amount_raw = amounts.get(i).unwrap_or_default();

        let date = parse_date(date_raw).ok_or_else(|| malformed(row, "date", date_raw))?;
        let total_amount = parse_amount(amount_raw)
            .filter(|amount| !amount.is_sign_negative() || amount.is_zero())
            .ok_or_else(|| malformed(row, "total_amount", amount_raw))?;
        running_total = running_total
            .checked_add(total_amount)
            .ok_or(LoadError::TotalOverflow { row })?;

        records.push(Transaction {
            date,
            order_id: label(order_ids.get(i), row, "order_id")?,
            category: label(categories.get(i), row, "category")?,
            region: label(regions.get(i), row, "region")?,
            total_amount,
        });
    }

    Ok(Table::new(records))
}

fn string_column<'a>(
    column: Option<PolarsResult<&'a Column>>,
    name: &'static str,
) -> Result<&'a StringChunked, LoadError> {
    let column = column.ok_or(LoadError::MissingColumn(name))??;
    Ok(column.str()?)
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

fn label(value: Option<&str>, row: usize, column: &'static str) -> Result<String, LoadError> {
    let value = value.unwrap_or_default().trim();
    if value.is_empty() {
        return Err(malformed(row, column, value));
    }
    Ok(value.to_string())
}

fn malformed(row: usize, column: &'static str, value: &str) -> LoadError {
    LoadError::MalformedRow {
        row,
        column,
        value: value.to_string(),
    }
}

/// Parse an ISO-like date. A time part, if present, is discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|datetime| datetime.date())
        })
}

/// Parse a monetary value such as `1234.50`, `$1,234.50` or ` 30 `.
pub fn parse_amount(value: &str) -> Option<Decimal> {
    let value = value.trim();
    let value = value.strip_prefix('$').unwrap_or(value);
    if value.is_empty() {
        return None;
    }
    Decimal::from_str(&value.replace(',', "")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const HEADER: &str = "date,order_id,category,region,total_amount\n";

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_missing_file_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = TableCache::new(dir.path().join("nope.csv"));
        assert_eq!(cache.load().unwrap(), Dataset::Absent);
    }

    #[test]
    fn test_directory_is_absent() {
        let dir = TempDir::new().unwrap();
        let cache = TableCache::new(dir.path());
        assert_eq!(cache.load().unwrap(), Dataset::Absent);
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let file = csv_file(HEADER);
        let cache = TableCache::new(file.path());
        assert_eq!(cache.load().unwrap(), Dataset::Empty);
    }

    #[test]
    fn test_loads_rows_in_file_order() {
        let file = csv_file(&format!(
            "{HEADER}2024-01-05,O1,Electronics,East,100\n2024-02-01,O2,Books,West,30.25\n"
        ));
        let cache = TableCache::new(file.path());
        let dataset = cache.load().unwrap();
        let table = dataset.table().unwrap();

        assert_eq!(table.len(), 2);
        let first = &table.records()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(first.order_id, "O1");
        assert_eq!(first.category, "Electronics");
        assert_eq!(first.region, "East");
        assert_eq!(first.total_amount, dec("100"));
        assert_eq!(table.records()[1].total_amount, dec("30.25"));
    }

    #[test]
    fn test_extra_columns_and_order_are_ignored() {
        let file = csv_file(
            "region,total_amount,customer,date,category,order_id\nEast,12.5,Ann,2024-03-01,Toys,O9\n",
        );
        let dataset = TableCache::new(file.path()).load().unwrap();
        let table = dataset.table().unwrap();
        assert_eq!(table.records()[0].category, "Toys");
        assert_eq!(table.records()[0].order_id, "O9");
        assert_eq!(table.records()[0].total_amount, dec("12.5"));
    }

    #[test]
    fn test_missing_column_fails() {
        let file = csv_file("date,order_id,category,total_amount\n2024-01-05,O1,Books,10\n");
        let err = TableCache::new(file.path()).load().unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("region")));
    }

    #[test]
    fn test_bad_date_fails_whole_load() {
        let file = csv_file(&format!(
            "{HEADER}2024-01-05,O1,Books,East,10\nnot-a-date,O2,Books,East,10\n"
        ));
        let err = TableCache::new(file.path()).load().unwrap_err();
        match err {
            LoadError::MalformedRow { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "date");
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_negative_amount_fails() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,Books,East,-5\n"));
        let err = TableCache::new(file.path()).load().unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRow {
                column: "total_amount",
                ..
            }
        ));
    }

    #[test]
    fn test_blank_amount_fails() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,Books,East,\n"));
        let err = TableCache::new(file.path()).load().unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRow {
                row: 1,
                column: "total_amount",
                ..
            }
        ));
    }

    #[test]
    fn test_blank_category_fails() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,,East,5\n"));
        let err = TableCache::new(file.path()).load().unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRow {
                column: "category",
                ..
            }
        ));
    }

    #[test]
    fn test_trailing_blank_line_is_skipped() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,Books,East,10\n\n"));
        let dataset = TableCache::new(file.path()).load().unwrap();
        assert_eq!(dataset.table().unwrap().len(), 1);
    }

    #[test]
    fn test_blank_line_between_rows_is_skipped() {
        let file = csv_file(&format!(
            "{HEADER}2024-01-05,O1,Books,East,10\n\n2024-01-06,O2,Toys,West,20\n"
        ));
        let dataset = TableCache::new(file.path()).load().unwrap();
        let table = dataset.table().unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.records()[1].order_id, "O2");
    }

    #[test]
    fn test_blank_lines_only_is_empty() {
        let file = csv_file(&format!("{HEADER}\n\n"));
        assert_eq!(TableCache::new(file.path()).load().unwrap(), Dataset::Empty);
    }

    #[test]
    fn test_row_of_empty_cells_is_skipped() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,Books,East,10\n,,,,\n"));
        let dataset = TableCache::new(file.path()).load().unwrap();
        assert_eq!(dataset.table().unwrap().len(), 1);
    }

    #[test]
    fn test_partially_blank_row_still_fails() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,Books,East,10\n,,,,5\n"));
        let err = TableCache::new(file.path()).load().unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRow {
                row: 2,
                column: "date",
                ..
            }
        ));
    }

    #[test]
    fn test_total_beyond_decimal_range_fails() {
        let file = csv_file(&format!(
            "{HEADER}2024-01-05,O1,Books,East,50000000000000000000000000000\n\
             2024-01-06,O2,Books,East,50000000000000000000000000000\n"
        ));
        let err = TableCache::new(file.path()).load().unwrap_err();
        assert!(matches!(err, LoadError::TotalOverflow { row: 2 }));
    }

    #[test]
    fn test_large_total_within_range_aggregates() {
        let file = csv_file(&format!(
            "{HEADER}2024-01-05,O1,Books,East,50000000000000000000000000000\n\
             2024-02-06,O2,Toys,West,20000000000000000000000000000\n"
        ));
        let dataset = TableCache::new(file.path()).load().unwrap();
        let views = crate::data::DashboardViews::compute(dataset.table().unwrap());
        assert_eq!(views.total_sales, dec("70000000000000000000000000000"));
        assert_eq!(views.by_category[0].label, "Books");
    }

    #[test]
    fn test_unchanged_file_is_served_from_cache() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,Books,East,10\n"));
        let cache = TableCache::new(file.path());

        let first = cache.load().unwrap();
        let second = cache.load().unwrap();
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(first.table().unwrap(), second.table().unwrap()));
    }

    #[test]
    fn test_changed_file_is_reloaded() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,Books,East,10\n"));
        let cache = TableCache::new(file.path());
        assert_eq!(cache.load().unwrap().table().unwrap().len(), 1);

        fs::write(
            file.path(),
            format!("{HEADER}2024-01-05,O1,Books,East,10\n2024-01-06,O2,Toys,West,20\n"),
        )
        .unwrap();
        assert_eq!(cache.load().unwrap().table().unwrap().len(), 2);
    }

    #[test]
    fn test_invalidate_forces_reread() {
        let file = csv_file(&format!("{HEADER}2024-01-05,O1,Books,East,10\n"));
        let cache = TableCache::new(file.path());

        let first = cache.load().unwrap();
        cache.invalidate();
        let second = cache.load().unwrap();
        assert_eq!(first, second);
        assert!(!Arc::ptr_eq(first.table().unwrap(), second.table().unwrap()));
    }

    #[test]
    fn test_deleted_file_becomes_absent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sales.csv");
        fs::write(&path, format!("{HEADER}2024-01-05,O1,Books,East,10\n")).unwrap();

        let cache = TableCache::new(&path);
        assert!(cache.load().unwrap().table().is_some());

        fs::remove_file(&path).unwrap();
        assert_eq!(cache.load().unwrap(), Dataset::Absent);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_date("2024-01-05"), expected);
        assert_eq!(parse_date("2024/01/05"), expected);
        assert_eq!(parse_date(" 2024-01-05 "), expected);
        assert_eq!(parse_date("2024-01-05 13:45:00"), expected);
        assert_eq!(parse_date("2024-01-05T13:45:00"), expected);
        assert_eq!(parse_date("05/01/2024"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("30"), Some(dec("30")));
        assert_eq!(parse_amount(" 12.50 "), Some(dec("12.50")));
        assert_eq!(parse_amount("$1,234.50"), Some(dec("1234.50")));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("$"), None);
    }
}
