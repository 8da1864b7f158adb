//! Sales Aggregation Module
//! Pure views over a loaded `Table`: totals, monthly series and breakdowns.

use crate::data::model::{Month, Table, Transaction};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Total sales for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    pub month: Month,
    pub total: Decimal,
}

/// Total sales for one label of a categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupTotal {
    pub label: String,
    pub total: Decimal,
}

/// Sum of `total_amount` over all rows.
pub fn total_sales(table: &Table) -> Decimal {
    table.records().iter().map(|r| r.total_amount).sum()
}

/// Number of distinct order ids.
pub fn total_orders(table: &Table) -> usize {
    table
        .records()
        .iter()
        .map(|r| r.order_id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Total sales divided by distinct orders, rounded to cents. Zero without orders.
pub fn average_order_value(table: &Table) -> Decimal {
    per_order(total_sales(table), total_orders(table))
}

fn per_order(sales: Decimal, orders: usize) -> Decimal {
    match orders {
        0 => Decimal::ZERO,
        orders => (sales / Decimal::from(orders)).round_dp(2),
    }
}

/// Sales per calendar month, oldest first. Months without sales are omitted.
pub fn monthly_series(table: &Table) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<Month, Decimal> = BTreeMap::new();
    for record in table.records() {
        *months.entry(Month::of(record.date)).or_default() += record.total_amount;
    }

    months
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}

/// Sales per category, largest first.
pub fn category_breakdown(table: &Table) -> Vec<GroupTotal> {
    breakdown(table, |r| &r.category)
}

/// Sales per region, largest first.
pub fn region_breakdown(table: &Table) -> Vec<GroupTotal> {
    breakdown(table, |r| &r.region)
}

/// Group by `key`, sum amounts and sort descending.
///
/// Groups are collected in first-appearance order and the sort is stable, so
/// equal totals keep the order in which their labels first occur in the file.
fn breakdown<F>(table: &Table, key: F) -> Vec<GroupTotal>
where
    F: Fn(&Transaction) -> &String,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();

    for record in table.records() {
        let label = key(record);
        let slot = *index.entry(label.as_str()).or_insert_with(|| {
            groups.push(GroupTotal {
                label: label.clone(),
                total: Decimal::ZERO,
            });
            groups.len() - 1
        });
        groups[slot].total += record.total_amount;
    }

    groups.sort_by(|a, b| b.total.cmp(&a.total));
    groups
}

/// Everything the dashboard renders for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardViews {
    pub total_sales: Decimal,
    pub total_orders: usize,
    pub average_order_value: Decimal,
    pub monthly: Vec<MonthlyTotal>,
    pub by_category: Vec<GroupTotal>,
    pub by_region: Vec<GroupTotal>,
}

impl DashboardViews {
    /// Compute all views. They share no state, so they run in parallel.
    pub fn compute(table: &Table) -> Self {
        let ((total_sales, total_orders), (monthly, (by_category, by_region))) = rayon::join(
            || (total_sales(table), total_orders(table)),
            || {
                rayon::join(
                    || monthly_series(table),
                    || rayon::join(|| category_breakdown(table), || region_breakdown(table)),
                )
            },
        );

        Self {
            total_sales,
            total_orders,
            average_order_value: per_order(total_sales, total_orders),
            monthly,
            by_category,
            by_region,
        }
    }
}
