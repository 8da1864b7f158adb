//! ShopSmart Sales Dashboard
//!
//! Loads a CSV of retail sales transactions, aggregates it into totals, a
//! monthly series and category/region breakdowns, and renders the result as
//! KPI cards and charts.

pub mod args;
pub mod charts;
pub mod data;
pub mod gui;
pub mod report;
