//! Direct transaction poster.

use khata_shared::types::TransactionId;
use rust_decimal::Decimal;
use tracing::info;

use super::types::PaymentInput;
use crate::ledger::{BalanceMutator, LedgerError, Sign};
use crate::model::{Direction, Party, Snapshot, Transaction};

/// Posts, edits, and deletes transactions that no invoice owns.
///
/// Party resolution is always by the stored `party_id`; the description is
/// for humans only.
pub struct PaymentService;

impl PaymentService {
    /// Records a direct transaction and applies its balance effect.
    ///
    /// # Errors
    ///
    /// `NonPositiveAmount` or `UnknownParty`.
    pub fn post(
        snapshot: &Snapshot,
        input: &PaymentInput,
    ) -> Result<(Snapshot, Transaction), LedgerError> {
        let mut work = snapshot.clone();
        let sequence = work.take_sequence();
        let transaction = Self::build(snapshot, input, TransactionId::new(), sequence)?;

        Self::apply_effect(&mut work, &transaction, Sign::Apply)?;
        work.transactions.push(transaction.clone());

        info!(
            transaction_id = %transaction.id,
            amount = %transaction.amount,
            direction = transaction.direction.label(),
            category = %transaction.category,
            "Transaction posted"
        );
        Ok((work.commit(), transaction))
    }

    /// Replaces a direct transaction.
    ///
    /// The old balance effect is reversed against the party the old record
    /// references before the new one is applied. The transaction keeps its ID,
    /// sequence, and log position.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound`, `InvoiceManagedTransaction` for a companion,
    /// `DanglingTransactionParty` if the old party no longer exists, plus every
    /// error of [`Self::post`].
    pub fn edit(
        snapshot: &Snapshot,
        transaction_id: TransactionId,
        input: &PaymentInput,
    ) -> Result<(Snapshot, Transaction), LedgerError> {
        let index = Self::position(snapshot, transaction_id)?;
        let old = &snapshot.transactions[index];
        let transaction = Self::build(snapshot, input, old.id, old.sequence)?;

        let mut work = snapshot.clone();
        Self::apply_effect(&mut work, old, Sign::Reverse)?;
        Self::apply_effect(&mut work, &transaction, Sign::Apply)?;
        work.transactions[index] = transaction.clone();

        info!(
            transaction_id = %transaction.id,
            amount = %transaction.amount,
            direction = transaction.direction.label(),
            "Transaction edited"
        );
        Ok((work.commit(), transaction))
    }

    /// Reverses a direct transaction's balance effect and drops it.
    ///
    /// # Errors
    ///
    /// `TransactionNotFound`, `InvoiceManagedTransaction`, or
    /// `DanglingTransactionParty`.
    pub fn delete(
        snapshot: &Snapshot,
        transaction_id: TransactionId,
    ) -> Result<Snapshot, LedgerError> {
        let index = Self::position(snapshot, transaction_id)?;
        let mut work = snapshot.clone();
        let old = work.transactions.remove(index);
        Self::apply_effect(&mut work, &old, Sign::Reverse)?;

        info!(transaction_id = %old.id, "Transaction deleted");
        Ok(work.commit())
    }

    /// Finds a direct transaction, refusing companions.
    fn position(snapshot: &Snapshot, transaction_id: TransactionId) -> Result<usize, LedgerError> {
        let index = snapshot
            .transactions
            .iter()
            .position(|t| t.id == transaction_id)
            .ok_or(LedgerError::TransactionNotFound(transaction_id))?;
        if let Some(invoice_id) = snapshot.transactions[index].invoice_id {
            return Err(LedgerError::InvoiceManagedTransaction {
                transaction_id,
                invoice_id,
            });
        }
        Ok(index)
    }

    fn build(
        snapshot: &Snapshot,
        input: &PaymentInput,
        id: TransactionId,
        sequence: u64,
    ) -> Result<Transaction, LedgerError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        let party = match input.party_id {
            Some(party_id) => Some(
                snapshot
                    .party(party_id)
                    .ok_or(LedgerError::UnknownParty(party_id))?,
            ),
            None => None,
        };

        Ok(Transaction {
            id,
            date: input.date,
            description: Self::describe(input, party),
            amount: input.amount,
            direction: input.direction,
            category: Self::category(input, party),
            party_id: input.party_id,
            invoice_id: None,
            payment_mode: Some(input.payment_mode),
            sequence,
        })
    }

    fn category(input: &PaymentInput, party: Option<&Party>) -> String {
        if let Some(category) = input.category.as_deref().filter(|c| !c.trim().is_empty()) {
            return category.to_string();
        }
        let category = match (party, input.direction) {
            (Some(_), _) if input.salary => "Salary",
            (Some(_), Direction::Credit) => "Receipt",
            (Some(_), Direction::Debit) => "Payment",
            (None, Direction::Credit) => "Income",
            (None, Direction::Debit) => "Expense",
        };
        category.to_string()
    }

    fn describe(input: &PaymentInput, party: Option<&Party>) -> String {
        let remarks = input.remarks.as_deref().filter(|r| !r.trim().is_empty());
        let Some(party) = party else {
            return remarks
                .map(str::to_string)
                .unwrap_or_else(|| Self::category(input, None));
        };
        if input.salary {
            return format!(
                "Payroll Settlement: {} [{}]. Ref: {}",
                party.name,
                input.payment_mode,
                remarks.unwrap_or("Monthly Cycle")
            );
        }
        let kind = match input.direction {
            Direction::Credit => "Recovery",
            Direction::Debit => "Remittance",
        };
        let mut description = format!(
            "Ledger {kind} [{}] - {} ({})",
            input.payment_mode, party.name, party.role
        );
        if let Some(note) = remarks {
            description.push_str(". Note: ");
            description.push_str(note);
        }
        description
    }

    /// Applies (or reverses) a transaction's effect on its party balance.
    fn apply_effect(
        work: &mut Snapshot,
        transaction: &Transaction,
        sign: Sign,
    ) -> Result<(), LedgerError> {
        let Some(party_id) = transaction.party_id else {
            return Ok(());
        };
        let Some(party) = work.party_mut(party_id) else {
            return Err(match sign {
                Sign::Apply => LedgerError::UnknownParty(party_id),
                Sign::Reverse => LedgerError::DanglingTransactionParty {
                    transaction_id: transaction.id,
                    party_id,
                },
            });
        };
        let delta =
            BalanceMutator::transaction_delta(party.role, transaction.direction, transaction.amount);
        *party = BalanceMutator::apply_balance(party, delta, sign)?;
        Ok(())
    }
}
