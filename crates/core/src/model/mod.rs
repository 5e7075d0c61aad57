//! Ledger data model.
//!
//! Plain records with no engine behaviour beyond sign conventions and lookups:
//! - Parties (customers, suppliers, staff) and their running balances
//! - Products and their running stock
//! - Invoices with line items and computed totals
//! - The flat transaction log
//! - The immutable snapshot that groups all four

pub mod invoice;
pub mod party;
pub mod product;
pub mod snapshot;
pub mod transaction;

pub use invoice::{
    Invoice, InvoiceKind, InvoiceLine, InvoiceParty, InvoiceSubType, InvoiceTotals, PaymentMode,
};
pub use party::{Party, PartyRole};
pub use product::Product;
pub use snapshot::Snapshot;
pub use transaction::{Direction, Transaction};
