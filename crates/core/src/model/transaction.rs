//! Transaction log records.

use chrono::NaiveDate;
use khata_shared::types::{InvoiceId, PartyId, TransactionId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::invoice::PaymentMode;

/// Direction of a transaction or ledger entry.
///
/// How a direction moves a party balance depends on the party role,
/// see [`PartyRole::signed_amount`](super::PartyRole::signed_amount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Credit (money received, or value credited to the party).
    Credit,
    /// Debit (money paid out, or value charged to the party).
    Debit,
}

impl Direction {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Credit => Self::Debit,
            Self::Debit => Self::Credit,
        }
    }

    /// Upper-case label used in descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Credit => "CREDIT",
            Self::Debit => "DEBIT",
        }
    }
}

/// A record in the flat transaction log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Business date.
    pub date: NaiveDate,
    /// Human-readable description. Never used for linkage.
    pub description: String,
    /// Amount, always positive.
    pub amount: Decimal,
    /// Credit or debit.
    pub direction: Direction,
    /// Free-form category ("Sale", "Purchase", "Payment", "Salary", ...).
    pub category: String,
    /// Party whose balance this transaction moved, if any.
    #[serde(default)]
    pub party_id: Option<PartyId>,
    /// Invoice that owns this transaction (companion transactions only).
    #[serde(default)]
    pub invoice_id: Option<InvoiceId>,
    /// How the money moved.
    #[serde(default)]
    pub payment_mode: Option<PaymentMode>,
    /// Snapshot-wide insertion sequence, used as a deterministic tie-break.
    #[serde(default)]
    pub sequence: u64,
}

impl Transaction {
    /// Returns true if this is the companion transaction of an invoice.
    #[must_use]
    pub fn is_companion(&self) -> bool {
        self.invoice_id.is_some()
    }
}
