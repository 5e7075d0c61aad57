//! The immutable ledger snapshot.

use khata_shared::types::{InvoiceId, PartyId, ProductId, TransactionId};
use serde::{Deserialize, Serialize};

use super::invoice::Invoice;
use super::party::Party;
use super::product::Product;
use super::transaction::Transaction;

/// The whole ledger as one value.
///
/// Engine commands take a `&Snapshot` and return a new one; the input is never
/// mutated, so a failed command leaves the caller's state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Incremented by every committed command (optimistic concurrency token).
    #[serde(default)]
    pub version: u64,
    /// Next insertion sequence handed to an invoice or transaction.
    #[serde(default)]
    pub next_sequence: u64,
    /// Customers, suppliers, and staff.
    #[serde(default)]
    pub parties: Vec<Party>,
    /// Inventory.
    #[serde(default)]
    pub products: Vec<Product>,
    /// Posted invoices, in insertion order.
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    /// Transaction log, in insertion order.
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this snapshot with an extra party.
    #[must_use]
    pub fn with_party(mut self, party: Party) -> Self {
        self.parties.push(party);
        self
    }

    /// Returns this snapshot with an extra product.
    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.push(product);
        self
    }

    /// Finds a party by ID.
    #[must_use]
    pub fn party(&self, id: PartyId) -> Option<&Party> {
        self.parties.iter().find(|p| p.id == id)
    }

    /// Finds a product by ID.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Finds an invoice by ID.
    #[must_use]
    pub fn invoice(&self, id: InvoiceId) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == id)
    }

    /// Finds a transaction by ID.
    #[must_use]
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Finds the companion transaction of an invoice.
    #[must_use]
    pub fn companion_of(&self, invoice_id: InvoiceId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|t| t.invoice_id == Some(invoice_id))
    }

    pub(crate) fn party_mut(&mut self, id: PartyId) -> Option<&mut Party> {
        self.parties.iter_mut().find(|p| p.id == id)
    }

    /// Hands out the next insertion sequence.
    pub(crate) fn take_sequence(&mut self) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        sequence
    }

    /// Marks the working copy as a committed new version.
    pub(crate) fn commit(mut self) -> Self {
        self.version += 1;
        self
    }
}
