//! Core reconciliation engine for Khata.
//!
//! This crate contains pure business logic with ZERO I/O, async, or clock
//! dependencies. Every operation maps an immutable [`model::Snapshot`] and a
//! command to a new snapshot, or fails without touching anything.
//!
//! # Modules
//!
//! - `model` - Parties, products, invoices, transactions, and the snapshot
//! - `ledger` - Stock and balance mutators, running balances, errors
//! - `invoice` - Invoice ledger manager
//! - `payment` - Direct transaction poster
//! - `statement` - Statement reconstructor
//! - `payroll` - Attendance-based salary accrual
//! - `reports` - Accounting summary
//! - `linkage` - Legacy description-based link migration
//! - `engine` - Engine boundary and serializable commands

pub mod engine;
pub mod invoice;
pub mod ledger;
pub mod linkage;
pub mod model;
pub mod payment;
pub mod payroll;
pub mod reports;
pub mod statement;

pub use engine::{Command, CommandEnvelope, Engine, Outcome};
pub use ledger::{ErrorKind, LedgerError};
pub use model::Snapshot;
