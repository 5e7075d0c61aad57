//! Direct transaction inputs.

use chrono::NaiveDate;
use khata_shared::types::PartyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{Direction, PaymentMode};

/// Input for posting or editing a direct transaction.
///
/// With a `party_id` this is a collection, payment, or salary settlement that
/// moves the party's balance. Without one it is a general expense or income
/// line with no balance effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInput {
    /// Party whose balance moves.
    #[serde(default)]
    pub party_id: Option<PartyId>,
    /// Business date.
    pub date: NaiveDate,
    /// Amount (must be positive).
    pub amount: Decimal,
    /// Credit or debit.
    pub direction: Direction,
    /// Category; derived from the direction and party when unset.
    #[serde(default)]
    pub category: Option<String>,
    /// How the money moved.
    #[serde(default)]
    pub payment_mode: PaymentMode,
    /// Free-text note.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Marks a salary settlement for a staff member.
    #[serde(default)]
    pub salary: bool,
}

impl PaymentInput {
    /// A party transaction with default category and cash mode.
    #[must_use]
    pub fn for_party(
        party_id: PartyId,
        date: NaiveDate,
        amount: Decimal,
        direction: Direction,
    ) -> Self {
        Self {
            party_id: Some(party_id),
            date,
            amount,
            direction,
            category: None,
            payment_mode: PaymentMode::Cash,
            remarks: None,
            salary: false,
        }
    }

    /// A general expense (debit) with no party.
    #[must_use]
    pub fn expense(date: NaiveDate, amount: Decimal, category: impl Into<String>) -> Self {
        Self {
            party_id: None,
            date,
            amount,
            direction: Direction::Debit,
            category: Some(category.into()),
            payment_mode: PaymentMode::Cash,
            remarks: None,
            salary: false,
        }
    }
}
