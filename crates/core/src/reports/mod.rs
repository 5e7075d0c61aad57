//! Business reports.
//!
//! - Accounting summary: revenue, purchases, expenses, profit, cash flow,
//!   receivables, payables
//! - Low-stock alerts

pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use service::ReportService;
pub use types::{AccountSummary, LowStockItem};
