//! Engine boundary.
//!
//! [`Engine`] exposes every ledger operation over an immutable [`Snapshot`];
//! [`Command`] mirrors the state-changing ones as serializable values so a
//! caller can submit them as JSON under optimistic concurrency control.
//!
//! [`Snapshot`]: crate::model::Snapshot

pub mod command;
pub mod facade;

pub use command::{Command, CommandEnvelope, Outcome};
pub use facade::Engine;
