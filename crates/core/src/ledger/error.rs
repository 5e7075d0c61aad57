//! Ledger error types.
//!
//! Every engine failure is returned, never panicked: bad input is routine for
//! business logic. Each variant belongs to one [`ErrorKind`], and every kind
//! aborts the whole command with zero mutation.

use chrono::NaiveDate;
use khata_shared::AppError;
use khata_shared::types::{InvoiceId, PartyId, ProductId, TransactionId};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::model::PartyRole;

/// Error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or disallowed command.
    Validation,
    /// A referenced product, party, invoice, or transaction does not exist.
    UnknownReference,
    /// A stored record points at a party that no longer resolves.
    DanglingReference,
    /// The command would break a data-model invariant.
    Invariant,
    /// The snapshot changed since the caller read it.
    Conflict,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Neither a registered party nor a manual name was given.
    #[error("Invoice needs a registered party or a manual party name")]
    MissingPartyIdentity,

    /// Invoice has no line items.
    #[error("Invoice must have at least one line item")]
    EmptyLineItems,

    /// Line quantity is zero.
    #[error("Line {line}: quantity must be positive")]
    NonPositiveQuantity {
        /// Zero-based line index.
        line: usize,
    },

    /// Line rate is negative.
    #[error("Line {line}: rate cannot be negative")]
    NegativeRate {
        /// Zero-based line index.
        line: usize,
    },

    /// Line tax rate is outside 0..=100.
    #[error("Line {line}: tax rate {rate} must be between 0 and 100")]
    InvalidTaxRate {
        /// Zero-based line index.
        line: usize,
        /// The rejected rate.
        rate: Decimal,
    },

    /// Invoice number is blank.
    #[error("Invoice number cannot be empty")]
    EmptyInvoiceNumber,

    /// Invoice number already used by another invoice of the same kind.
    #[error("Invoice number {0} is already in use")]
    DuplicateInvoiceNumber(String),

    /// Amount paid is negative.
    #[error("Amount paid cannot be negative")]
    NegativeAmountPaid,

    /// Amount paid exceeds the grand total and overpayment is disabled.
    #[error("Amount paid {paid} exceeds grand total {total}")]
    Overpayment {
        /// Requested amount paid.
        paid: Decimal,
        /// Invoice grand total.
        total: Decimal,
    },

    /// Transaction amount is zero or negative.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Party role does not fit the invoice kind.
    #[error("Party {party_id} is a {actual}, expected a {expected}")]
    PartyRoleMismatch {
        /// The referenced party.
        party_id: PartyId,
        /// Role the invoice kind requires.
        expected: PartyRole,
        /// Role the party has.
        actual: PartyRole,
    },

    /// Companion transactions change only through their invoice.
    #[error("Transaction {transaction_id} belongs to invoice {invoice_id}; edit the invoice instead")]
    InvoiceManagedTransaction {
        /// The companion transaction.
        transaction_id: TransactionId,
        /// Its owning invoice.
        invoice_id: InvoiceId,
    },

    /// Payroll year/month do not form a valid month.
    #[error("Invalid payroll period {year}-{month}")]
    InvalidPayrollPeriod {
        /// Requested year.
        year: i32,
        /// Requested month (1-12).
        month: u32,
    },

    /// No employee accrued a positive salary for the period.
    #[error("No payroll to post for {0}")]
    NoPayrollToPost(NaiveDate),

    /// An amount or balance left the representable decimal range.
    #[error("Amount is outside the supported range")]
    AmountOverflow,

    /// A stock level left the representable range.
    #[error("Stock of product {0} is outside the supported range")]
    StockOverflow(ProductId),

    // ========== Reference Errors ==========
    /// Product not found.
    #[error("Product not found: {0}")]
    UnknownProduct(ProductId),

    /// Party not found.
    #[error("Party not found: {0}")]
    UnknownParty(PartyId),

    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    // ========== Dangling References ==========
    /// A stored transaction references a party that no longer exists.
    #[error("Transaction {transaction_id} references missing party {party_id}")]
    DanglingTransactionParty {
        /// The transaction being edited or deleted.
        transaction_id: TransactionId,
        /// The unresolvable party.
        party_id: PartyId,
    },

    /// A stored invoice references a party that no longer exists.
    #[error("Invoice {invoice_id} references missing party {party_id}")]
    DanglingInvoiceParty {
        /// The invoice being edited or deleted.
        invoice_id: InvoiceId,
        /// The unresolvable party.
        party_id: PartyId,
    },

    // ========== Invariant Errors ==========
    /// Stock would go negative while non-negative stock is enforced.
    #[error("Stock of product {product_id} would become {stock}")]
    NegativeStock {
        /// The product.
        product_id: ProductId,
        /// The resulting stock.
        stock: i64,
    },

    // ========== Concurrency Errors ==========
    /// Snapshot version mismatch.
    #[error("Snapshot version mismatch: expected {expected}, found {actual}")]
    ConcurrentModification {
        /// Version the caller based its command on.
        expected: u64,
        /// Version of the snapshot it was applied to.
        actual: u64,
    },
}

impl LedgerError {
    /// Returns the taxonomy bucket of this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingPartyIdentity
            | Self::EmptyLineItems
            | Self::NonPositiveQuantity { .. }
            | Self::NegativeRate { .. }
            | Self::InvalidTaxRate { .. }
            | Self::EmptyInvoiceNumber
            | Self::DuplicateInvoiceNumber(_)
            | Self::NegativeAmountPaid
            | Self::Overpayment { .. }
            | Self::NonPositiveAmount
            | Self::PartyRoleMismatch { .. }
            | Self::InvoiceManagedTransaction { .. }
            | Self::InvalidPayrollPeriod { .. }
            | Self::NoPayrollToPost(_)
            | Self::AmountOverflow
            | Self::StockOverflow(_) => ErrorKind::Validation,

            Self::UnknownProduct(_)
            | Self::UnknownParty(_)
            | Self::InvoiceNotFound(_)
            | Self::TransactionNotFound(_) => ErrorKind::UnknownReference,

            Self::DanglingTransactionParty { .. } | Self::DanglingInvoiceParty { .. } => {
                ErrorKind::DanglingReference
            }

            Self::NegativeStock { .. } => ErrorKind::Invariant,

            Self::ConcurrentModification { .. } => ErrorKind::Conflict,
        }
    }

    /// Returns the stable error code for machine-readable output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingPartyIdentity => "MISSING_PARTY_IDENTITY",
            Self::EmptyLineItems => "EMPTY_LINE_ITEMS",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::NegativeRate { .. } => "NEGATIVE_RATE",
            Self::InvalidTaxRate { .. } => "INVALID_TAX_RATE",
            Self::EmptyInvoiceNumber => "EMPTY_INVOICE_NUMBER",
            Self::DuplicateInvoiceNumber(_) => "DUPLICATE_INVOICE_NUMBER",
            Self::NegativeAmountPaid => "NEGATIVE_AMOUNT_PAID",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::PartyRoleMismatch { .. } => "PARTY_ROLE_MISMATCH",
            Self::InvoiceManagedTransaction { .. } => "INVOICE_MANAGED_TRANSACTION",
            Self::InvalidPayrollPeriod { .. } => "INVALID_PAYROLL_PERIOD",
            Self::NoPayrollToPost(_) => "NO_PAYROLL_TO_POST",
            Self::AmountOverflow => "AMOUNT_OVERFLOW",
            Self::StockOverflow(_) => "STOCK_OVERFLOW",
            Self::UnknownProduct(_) => "UNKNOWN_PRODUCT",
            Self::UnknownParty(_) => "UNKNOWN_PARTY",
            Self::InvoiceNotFound(_) => "INVOICE_NOT_FOUND",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::DanglingTransactionParty { .. } => "DANGLING_TRANSACTION_PARTY",
            Self::DanglingInvoiceParty { .. } => "DANGLING_INVOICE_PARTY",
            Self::NegativeStock { .. } => "NEGATIVE_STOCK",
            Self::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
        }
    }

    /// Returns true if this error is retryable against a fresh snapshot.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Validation => Self::Validation(message),
            ErrorKind::UnknownReference => Self::NotFound(message),
            ErrorKind::DanglingReference | ErrorKind::Invariant => Self::BusinessRule(message),
            ErrorKind::Conflict => Self::Conflict(message),
        }
    }
}
