//! Statement reconstructor.

use chrono::NaiveDate;
use khata_shared::types::PartyId;
use rust_decimal::Decimal;
use tracing::debug;

use super::types::{EntrySource, LedgerEntry};
use crate::ledger::{LedgerError, RunningBalance};
use crate::model::{Direction, Invoice, Party, Snapshot, Transaction};

/// Entry before its running balance is known, with its chronological key.
struct Pending {
    key: (NaiveDate, u64, u8),
    direction: Direction,
    amount: Decimal,
    description: String,
    reference: String,
    source: EntrySource,
}

/// Rebuilds a party's statement from invoices and transactions.
pub struct StatementService;

impl StatementService {
    /// Builds the statement of `party`, newest entry first.
    ///
    /// Each of the party's invoices contributes an accrual entry and, when
    /// something was paid at posting, a settlement entry. Each direct
    /// transaction linked to the party contributes one entry; companion
    /// transactions are skipped since the settlement entry already covers
    /// them.
    ///
    /// Running balances start from zero and are folded in ascending
    /// `(date, sequence, accrual-before-settlement)` order.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if a running balance is out of range.
    pub fn build(
        party: &Party,
        invoices: &[Invoice],
        transactions: &[Transaction],
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let mut pending: Vec<Pending> = Vec::new();

        for invoice in invoices.iter().filter(|i| i.party_id() == Some(party.id)) {
            pending.push(Pending {
                key: (invoice.date, invoice.sequence, 0),
                direction: invoice.kind.accrual_direction(),
                amount: invoice.totals.grand_total,
                description: format!("{} Invoice {}", invoice.kind.label(), invoice.invoice_no),
                reference: invoice.invoice_no.clone(),
                source: EntrySource::InvoiceAccrual,
            });
            if invoice.amount_paid > Decimal::ZERO {
                pending.push(Pending {
                    key: (invoice.date, invoice.sequence, 1),
                    direction: invoice.kind.settlement_direction(),
                    amount: invoice.amount_paid,
                    description: format!(
                        "Paid on {} {} [{}]",
                        invoice.kind.label(),
                        invoice.invoice_no,
                        invoice.payment_mode
                    ),
                    reference: invoice.invoice_no.clone(),
                    source: EntrySource::InvoiceSettlement,
                });
            }
        }

        for transaction in transactions
            .iter()
            .filter(|t| t.party_id == Some(party.id) && !t.is_companion())
        {
            pending.push(Pending {
                key: (transaction.date, transaction.sequence, 0),
                direction: transaction.direction,
                amount: transaction.amount,
                description: transaction.description.clone(),
                reference: format!("TX-{:05}", transaction.sequence),
                source: EntrySource::Transaction,
            });
        }

        pending.sort_by_key(|p| p.key);
        let balances = RunningBalance::fold(
            pending
                .iter()
                .map(|p| party.role.signed_amount(p.direction, p.amount)),
        )?;

        let mut entries: Vec<LedgerEntry> = pending
            .into_iter()
            .zip(balances)
            .map(|(p, balance)| LedgerEntry {
                date: p.key.0,
                direction: p.direction,
                amount: p.amount,
                description: p.description,
                reference: p.reference,
                running_balance: balance.current_balance,
                source: p.source,
            })
            .collect();
        entries.reverse();

        debug!(party_id = %party.id, entries = entries.len(), "Statement built");
        Ok(entries)
    }

    /// Builds the statement of the party with `party_id` in `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownParty` if the party does not exist, or the errors of
    /// [`Self::build`].
    pub fn for_party(
        snapshot: &Snapshot,
        party_id: PartyId,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        let party = snapshot
            .party(party_id)
            .ok_or(LedgerError::UnknownParty(party_id))?;
        Self::build(party, &snapshot.invoices, &snapshot.transactions)
    }
}
