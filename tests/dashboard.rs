use rust_decimal::Decimal;
use shopsmart_dashboard::data::aggregate::{
    category_breakdown, monthly_series, region_breakdown, total_orders, total_sales,
};
use shopsmart_dashboard::data::{DashboardViews, Dataset, Month, TableCache};
use std::fs;
use tempfile::TempDir;

const SCENARIO: &str = "\
date,order_id,category,region,total_amount
2024-01-05,O1,Electronics,East,100
2024-01-20,O1,Electronics,East,50
2024-02-01,O2,Books,West,30
";

fn write_csv(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("sales_data.csv");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn scenario_from_file() {
    let dir = TempDir::new().unwrap();
    let cache = TableCache::new(write_csv(&dir, SCENARIO));

    let Dataset::Populated(table) = cache.load().unwrap() else {
        panic!("expected a populated table");
    };

    assert_eq!(total_sales(&table), Decimal::from(180));
    assert_eq!(total_orders(&table), 2);

    let monthly: Vec<(Month, Decimal)> = monthly_series(&table)
        .into_iter()
        .map(|m| (m.month, m.total))
        .collect();
    assert_eq!(
        monthly,
        vec![
            (Month::new(2024, 1).unwrap(), Decimal::from(150)),
            (Month::new(2024, 2).unwrap(), Decimal::from(30)),
        ]
    );

    let categories: Vec<(String, Decimal)> = category_breakdown(&table)
        .into_iter()
        .map(|g| (g.label, g.total))
        .collect();
    assert_eq!(
        categories,
        vec![
            ("Electronics".to_string(), Decimal::from(150)),
            ("Books".to_string(), Decimal::from(30)),
        ]
    );

    let regions: Vec<(String, Decimal)> = region_breakdown(&table)
        .into_iter()
        .map(|g| (g.label, g.total))
        .collect();
    assert_eq!(
        regions,
        vec![
            ("East".to_string(), Decimal::from(150)),
            ("West".to_string(), Decimal::from(30)),
        ]
    );
}

#[test]
fn consecutive_loads_are_equal() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(&dir, SCENARIO);

    let cached = TableCache::new(&path);
    assert_eq!(cached.load().unwrap(), cached.load().unwrap());

    // Two independent caches read the file separately and still agree.
    let first = TableCache::new(&path).load().unwrap();
    let second = TableCache::new(&path).load().unwrap();
    assert_eq!(first, second);
}

#[test]
fn absent_and_empty_are_distinct() {
    let dir = TempDir::new().unwrap();
    let missing = TableCache::new(dir.path().join("missing.csv"));
    assert_eq!(missing.load().unwrap(), Dataset::Absent);

    let empty = TableCache::new(write_csv(
        &dir,
        "date,order_id,category,region,total_amount\n",
    ));
    assert_eq!(empty.load().unwrap(), Dataset::Empty);
}

#[test]
fn file_appearing_after_absent_is_loaded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sales_data.csv");
    let cache = TableCache::new(&path);
    assert_eq!(cache.load().unwrap(), Dataset::Absent);

    fs::write(&path, SCENARIO).unwrap();
    let dataset = cache.load().unwrap();
    let views = DashboardViews::compute(dataset.table().unwrap());
    assert_eq!(views.total_sales, Decimal::from(180));
    assert_eq!(views.total_orders, 2);
    assert_eq!(views.average_order_value, Decimal::from(90));
}

#[test]
fn malformed_row_fails_whole_load() {
    let dir = TempDir::new().unwrap();
    let cache = TableCache::new(write_csv(
        &dir,
        &format!("{SCENARIO}2024-13-45,O3,Books,West,10\n"),
    ));
    let err = cache.load().unwrap_err();
    assert_eq!(err.to_string(), "Row 4: invalid date value '2024-13-45'");
}
