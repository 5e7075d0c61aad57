//! Invoice ledger manager.
//!
//! Posting, editing, and deleting sale and purchase invoices, with their stock,
//! balance, and companion-transaction side effects.

pub mod numbering;
pub mod service;
pub mod totals;
pub mod types;

#[cfg(test)]
mod service_props;

pub use numbering::next_invoice_no;
pub use service::InvoiceService;
pub use totals::compute_totals;
pub use types::{InvoiceInput, InvoiceLineInput, ManualParty, PartySelection};
