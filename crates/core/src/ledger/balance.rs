//! Party balance mutations and running balances.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::LedgerError;
use super::stock::Sign;
use crate::model::{Direction, Invoice, Party, PartyRole};

/// Applies and reverses signed deltas on a party's outstanding balance.
///
/// The caller computes `delta` with the role convention; the mutator only adds
/// `sign * delta`.
pub struct BalanceMutator;

impl BalanceMutator {
    /// Returns `party` with `sign * delta` added to its outstanding balance.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if the new balance is out of range.
    pub fn apply_balance(party: &Party, delta: Decimal, sign: Sign) -> Result<Party, LedgerError> {
        let change = match sign {
            Sign::Apply => delta,
            Sign::Reverse => -delta,
        };
        let mut updated = party.clone();
        updated.outstanding_balance = party
            .outstanding_balance
            .checked_add(change)
            .ok_or(LedgerError::AmountOverflow)?;
        debug!(
            party_id = %party.id,
            change = %change,
            balance = %updated.outstanding_balance,
            "Balance adjusted"
        );
        Ok(updated)
    }

    /// Balance delta of an invoice for its party: the unsettled portion.
    ///
    /// Sale raises the customer's receivable, purchase raises the supplier's
    /// payable; both are positive under their role convention.
    #[must_use]
    pub fn invoice_delta(invoice: &Invoice) -> Decimal {
        invoice.unsettled()
    }

    /// Balance delta of a direct transaction for a party of `role`.
    #[must_use]
    pub fn transaction_delta(role: PartyRole, direction: Direction, amount: Decimal) -> Decimal {
        role.signed_amount(direction, amount)
    }
}

/// Running balance around one statement entry.
///
/// - previous_balance: balance before this entry
/// - current_balance: balance after this entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunningBalance {
    /// 1-based position in chronological order.
    pub position: u64,
    /// Balance before this entry.
    pub previous_balance: Decimal,
    /// Balance after this entry.
    pub current_balance: Decimal,
}

impl RunningBalance {
    /// Creates the running balance for the first entry.
    #[must_use]
    pub fn first_entry(balance_change: Decimal) -> Self {
        Self {
            position: 1,
            previous_balance: Decimal::ZERO,
            current_balance: balance_change,
        }
    }

    /// Creates the running balance following `previous`.
    ///
    /// - current_balance[N] = previous_balance[N] + balance_change
    /// - previous_balance[N] = current_balance[N-1]
    ///
    /// `None` if the new balance is out of range.
    #[must_use]
    pub fn next_entry(previous: &Self, balance_change: Decimal) -> Option<Self> {
        Some(Self {
            position: previous.position + 1,
            previous_balance: previous.current_balance,
            current_balance: previous.current_balance.checked_add(balance_change)?,
        })
    }

    /// Folds a chronological sequence of changes into running balances.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if any running balance is out of range.
    pub fn fold(changes: impl IntoIterator<Item = Decimal>) -> Result<Vec<Self>, LedgerError> {
        let mut balances: Vec<Self> = Vec::new();
        for change in changes {
            let next = match balances.last() {
                Some(previous) => {
                    Self::next_entry(previous, change).ok_or(LedgerError::AmountOverflow)?
                }
                None => Self::first_entry(change),
            };
            balances.push(next);
        }
        Ok(balances)
    }
}
