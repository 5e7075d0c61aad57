//! Engine boundary.

use chrono::NaiveDate;
use khata_shared::EngineConfig;
use khata_shared::types::{InvoiceId, PartyId, TransactionId};
use tracing::{info, warn};

use super::command::{Command, CommandEnvelope, Outcome};
use crate::invoice::{InvoiceInput, InvoiceService, next_invoice_no};
use crate::ledger::LedgerError;
use crate::linkage::{LinkReport, LinkService};
use crate::model::{Invoice, InvoiceKind, Snapshot, Transaction};
use crate::payment::{PaymentInput, PaymentService};
use crate::payroll::{AttendanceRecord, PayrollService};
use crate::reports::{AccountSummary, ReportService};
use crate::statement::{LedgerEntry, StatementService};

/// The reconciliation engine.
///
/// Every operation takes the current snapshot by reference and returns a new
/// one; on error the caller's snapshot is the only state there is.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    config: EngineConfig,
}

impl Engine {
    /// Creates an engine with the given policy.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Active policy.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Posts a new invoice.
    pub fn create_invoice(
        &self,
        snapshot: &Snapshot,
        input: &InvoiceInput,
    ) -> Result<(Snapshot, Invoice), LedgerError> {
        InvoiceService::create(snapshot, input, &self.config)
    }

    /// Replaces a posted invoice.
    pub fn edit_invoice(
        &self,
        snapshot: &Snapshot,
        invoice_id: InvoiceId,
        input: &InvoiceInput,
    ) -> Result<(Snapshot, Invoice), LedgerError> {
        InvoiceService::edit(snapshot, invoice_id, input, &self.config)
    }

    /// Deletes a posted invoice.
    pub fn delete_invoice(
        &self,
        snapshot: &Snapshot,
        invoice_id: InvoiceId,
    ) -> Result<Snapshot, LedgerError> {
        InvoiceService::delete(snapshot, invoice_id, &self.config)
    }

    /// Posts a direct transaction.
    pub fn post_transaction(
        &self,
        snapshot: &Snapshot,
        input: &PaymentInput,
    ) -> Result<(Snapshot, Transaction), LedgerError> {
        PaymentService::post(snapshot, input)
    }

    /// Replaces a direct transaction.
    pub fn edit_transaction(
        &self,
        snapshot: &Snapshot,
        transaction_id: TransactionId,
        input: &PaymentInput,
    ) -> Result<(Snapshot, Transaction), LedgerError> {
        PaymentService::edit(snapshot, transaction_id, input)
    }

    /// Deletes a direct transaction.
    pub fn delete_transaction(
        &self,
        snapshot: &Snapshot,
        transaction_id: TransactionId,
    ) -> Result<Snapshot, LedgerError> {
        PaymentService::delete(snapshot, transaction_id)
    }

    /// Rebuilds a party's statement, newest entry first.
    pub fn build_statement(
        &self,
        snapshot: &Snapshot,
        party_id: PartyId,
    ) -> Result<Vec<LedgerEntry>, LedgerError> {
        StatementService::for_party(snapshot, party_id)
    }

    /// Accrues one month of staff salaries.
    pub fn accrue_payroll(
        &self,
        snapshot: &Snapshot,
        attendance: &[AttendanceRecord],
        year: i32,
        month: u32,
        posting_date: NaiveDate,
    ) -> Result<(Snapshot, Vec<Transaction>), LedgerError> {
        PayrollService::accrue(snapshot, attendance, year, month, posting_date)
    }

    /// Accounting summary of a snapshot.
    pub fn summarize(&self, snapshot: &Snapshot) -> Result<AccountSummary, LedgerError> {
        ReportService::summarize(snapshot)
    }

    /// Backfills links on legacy transactions.
    #[must_use]
    pub fn relink_legacy(&self, snapshot: &Snapshot) -> (Snapshot, LinkReport) {
        LinkService::relink_legacy(snapshot)
    }

    /// Next free invoice number for `kind` under the configured prefix.
    #[must_use]
    pub fn next_invoice_no(&self, snapshot: &Snapshot, kind: InvoiceKind) -> String {
        let prefix = match kind {
            InvoiceKind::Sale => &self.config.invoice_prefix_sale,
            InvoiceKind::Purchase => &self.config.invoice_prefix_purchase,
        };
        next_invoice_no(snapshot, kind, prefix)
    }

    /// Runs a command under optimistic concurrency control.
    ///
    /// # Errors
    ///
    /// `ConcurrentModification` if `expected_version` is set and differs from
    /// the snapshot's version; otherwise any error of the command itself.
    pub fn execute(
        &self,
        snapshot: &Snapshot,
        envelope: &CommandEnvelope,
    ) -> Result<(Snapshot, Outcome), LedgerError> {
        if let Some(expected) = envelope.expected_version
            && expected != snapshot.version
        {
            warn!(
                expected,
                actual = snapshot.version,
                command = envelope.command.name(),
                "Rejected stale command"
            );
            return Err(LedgerError::ConcurrentModification {
                expected,
                actual: snapshot.version,
            });
        }

        let result = match &envelope.command {
            Command::CreateInvoice { input } => self
                .create_invoice(snapshot, input)
                .map(|(s, invoice)| (s, Outcome::Invoice(invoice))),
            Command::EditInvoice { invoice_id, input } => self
                .edit_invoice(snapshot, *invoice_id, input)
                .map(|(s, invoice)| (s, Outcome::Invoice(invoice))),
            Command::DeleteInvoice { invoice_id } => self
                .delete_invoice(snapshot, *invoice_id)
                .map(|s| (s, Outcome::Deleted)),
            Command::PostTransaction { input } => self
                .post_transaction(snapshot, input)
                .map(|(s, transaction)| (s, Outcome::Transaction(transaction))),
            Command::EditTransaction {
                transaction_id,
                input,
            } => self
                .edit_transaction(snapshot, *transaction_id, input)
                .map(|(s, transaction)| (s, Outcome::Transaction(transaction))),
            Command::DeleteTransaction { transaction_id } => self
                .delete_transaction(snapshot, *transaction_id)
                .map(|s| (s, Outcome::Deleted)),
            Command::AccruePayroll {
                attendance,
                year,
                month,
                posting_date,
            } => self
                .accrue_payroll(snapshot, attendance, *year, *month, *posting_date)
                .map(|(s, posted)| (s, Outcome::Transactions(posted))),
            Command::RelinkLegacy => {
                let (s, report) = self.relink_legacy(snapshot);
                Ok((s, Outcome::Relinked(report)))
            }
        };

        let (next, outcome) = result?;
        info!(
            command = envelope.command.name(),
            version = next.version,
            "Command committed"
        );
        Ok((next, outcome))
    }
}
