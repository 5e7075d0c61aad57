//! Statement entry types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::Direction;

/// What produced a statement entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySource {
    /// Full value of an invoice.
    InvoiceAccrual,
    /// Amount settled when the invoice was posted.
    InvoiceSettlement,
    /// A direct transaction.
    Transaction,
}

/// One line of a reconstructed party statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Business date.
    pub date: NaiveDate,
    /// Credit or debit.
    pub direction: Direction,
    /// Amount, always positive.
    pub amount: Decimal,
    /// Human-readable description.
    pub description: String,
    /// Invoice number, or `TX-nnnnn` for direct transactions.
    pub reference: String,
    /// Party balance after this entry, folded in chronological order.
    pub running_balance: Decimal,
    /// What produced the entry.
    pub source: EntrySource,
}
