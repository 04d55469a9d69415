//! # Rusty Report
//!
//! Turns loosely structured spreadsheet workbooks into chart-ready count tables.
//!
//! ## Pipeline
//!
//! - **Reading**: Office Open XML workbooks (`.xlsx`, `.xlsm`, `.xlam`) are read into typed cell
//!   values, with sheet visibility taken from the workbook.
//! - **Header detection**: the header row is found by scoring the first rows of each sheet, so
//!   title rows and notes above the table are skipped.
//! - **Normalization**: column names are trimmed and blank rows and columns removed.
//! - **Classification**: free-text priority, status and completion cells are mapped onto fixed
//!   categories by ordered keyword vocabularies.
//! - **Aggregation**: rows are grouped by priority × status, assignee × priority and month, or
//!   counted per task column.
//!
//! ## Views
//!
//! - [`tickets::TicketDashboard`]: open/closed charts per ticket sheet, assignees and the
//!   monthly trend
//! - [`banks::BankSheet`]: bank/address filters, per-column completion and the completion matrix
//!
//! Every stage takes a [`config::ReportConfig`]; [`config::ReportConfig::from_env`] applies the
//! `REPORT_*` environment overrides.
pub mod aggregate;
pub mod banks;
pub mod classify;
pub mod config;
pub mod error;
pub mod frame;
mod helpers;
pub mod spreadsheet;
pub mod tickets;

pub use config::ReportConfig;
pub use error::RustyReportError;
pub use frame::loader::detect_sheet_header;
pub use frame::loader::load_sheet;
pub use frame::loader::preview_sheet;
pub use frame::loader::visible_sheet_names;
pub use frame::Frame;
pub use frame::Value;
