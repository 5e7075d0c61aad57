//! Ledger mutation primitives.
//!
//! - Stock mutator: inventory deltas implied by invoice lines
//! - Balance mutator: signed party balance deltas
//! - Running balances for reconstructed statements
//! - Error types shared by every engine operation

pub mod balance;
pub mod error;
pub mod stock;

pub use balance::{BalanceMutator, RunningBalance};
pub use error::{ErrorKind, LedgerError};
pub use stock::{Sign, StockMutator};
