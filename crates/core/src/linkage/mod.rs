//! Legacy linkage migration.
//!
//! Documents written before transactions carried explicit `invoice_id` and
//! `party_id` links are backfilled by searching descriptions for invoice
//! numbers and party names, once, at load time.

pub mod service;

pub use service::{LinkReport, LinkService};
