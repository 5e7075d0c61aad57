//! Serializable engine commands.

use chrono::NaiveDate;
use khata_shared::types::{InvoiceId, TransactionId};
use serde::{Deserialize, Serialize};

use crate::invoice::InvoiceInput;
use crate::linkage::LinkReport;
use crate::model::{Invoice, Transaction};
use crate::payment::PaymentInput;
use crate::payroll::AttendanceRecord;

/// A state-changing engine command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Post a new invoice.
    CreateInvoice {
        /// Invoice content.
        input: InvoiceInput,
    },
    /// Replace a posted invoice.
    EditInvoice {
        /// Invoice to replace.
        invoice_id: InvoiceId,
        /// New content.
        input: InvoiceInput,
    },
    /// Delete a posted invoice.
    DeleteInvoice {
        /// Invoice to delete.
        invoice_id: InvoiceId,
    },
    /// Post a direct transaction.
    PostTransaction {
        /// Transaction content.
        input: PaymentInput,
    },
    /// Replace a direct transaction.
    EditTransaction {
        /// Transaction to replace.
        transaction_id: TransactionId,
        /// New content.
        input: PaymentInput,
    },
    /// Delete a direct transaction.
    DeleteTransaction {
        /// Transaction to delete.
        transaction_id: TransactionId,
    },
    /// Accrue one month of staff salaries.
    AccruePayroll {
        /// Attendance marks to compute from.
        attendance: Vec<AttendanceRecord>,
        /// Payroll year.
        year: i32,
        /// Payroll month (1-12).
        month: u32,
        /// Date of the accrual transactions.
        posting_date: NaiveDate,
    },
    /// Backfill links on legacy transactions.
    RelinkLegacy,
}

impl Command {
    /// Snake-case command name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateInvoice { .. } => "create_invoice",
            Self::EditInvoice { .. } => "edit_invoice",
            Self::DeleteInvoice { .. } => "delete_invoice",
            Self::PostTransaction { .. } => "post_transaction",
            Self::EditTransaction { .. } => "edit_transaction",
            Self::DeleteTransaction { .. } => "delete_transaction",
            Self::AccruePayroll { .. } => "accrue_payroll",
            Self::RelinkLegacy => "relink_legacy",
        }
    }
}

/// A command plus the snapshot version it was prepared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEnvelope {
    /// Version the caller last read; `None` skips the check.
    #[serde(default)]
    pub expected_version: Option<u64>,
    /// The command.
    #[serde(flatten)]
    pub command: Command,
}

impl CommandEnvelope {
    /// Wraps a command without a version check.
    #[must_use]
    pub fn unchecked(command: Command) -> Self {
        Self {
            expected_version: None,
            command,
        }
    }

    /// Wraps a command expecting `version`.
    #[must_use]
    pub fn at_version(version: u64, command: Command) -> Self {
        Self {
            expected_version: Some(version),
            command,
        }
    }
}

/// Record produced by a committed command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum Outcome {
    /// The created or edited invoice.
    Invoice(Invoice),
    /// The posted or edited transaction.
    Transaction(Transaction),
    /// Transactions posted by a batch command.
    Transactions(Vec<Transaction>),
    /// The entity was deleted.
    Deleted,
    /// Legacy relink results.
    Relinked(LinkReport),
}
