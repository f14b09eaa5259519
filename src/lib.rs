//! Pharmacy billing desk: invoices, distributors, inventory and a sales
//! dashboard, built around a reusable searchable/paginated table view.

pub mod billing;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod seed;
pub mod store;
pub mod table;
pub mod tables;
pub mod tui;
