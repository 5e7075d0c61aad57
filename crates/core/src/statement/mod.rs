//! Statement reconstructor.
//!
//! Rebuilds a party's chronological ledger with running balances from the
//! invoices and transactions that reference it.

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::StatementService;
pub use types::{EntrySource, LedgerEntry};
