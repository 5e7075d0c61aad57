//! Invoice number generation.

use crate::model::{InvoiceKind, Snapshot};

/// Returns the next free invoice number `{prefix}-{n:06}` for `kind`.
///
/// `n` is one above the highest numeric suffix among existing invoices of the
/// same kind that carry the same prefix.
#[must_use]
pub fn next_invoice_no(snapshot: &Snapshot, kind: InvoiceKind, prefix: &str) -> String {
    let stem = format!("{prefix}-");
    let highest = snapshot
        .invoices
        .iter()
        .filter(|i| i.kind == kind)
        .filter_map(|i| i.invoice_no.strip_prefix(&stem))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);

    format!("{stem}{:06}", highest + 1)
}
