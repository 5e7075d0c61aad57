//! Invoice total computation.

use khata_shared::types::round_money_whole;
use rust_decimal::Decimal;

use crate::ledger::LedgerError;
use crate::model::{InvoiceLine, InvoiceTotals};

/// Computes invoice totals.
///
/// - `sub_total = Σ quantity × rate`
/// - `tax = Σ round(quantity × rate × tax_rate / 100)` when tax is enabled
/// - `grand_total = round(sub_total + tax)` to whole units
/// - `round_off = grand_total - (sub_total + tax)`
///
/// # Errors
///
/// Returns `AmountOverflow` if any product or sum leaves the decimal range.
pub fn compute_totals(
    lines: &[InvoiceLine],
    tax_enabled: bool,
) -> Result<InvoiceTotals, LedgerError> {
    let mut sub_total = Decimal::ZERO;
    let mut tax = Decimal::ZERO;
    for line in lines {
        sub_total = line
            .taxable()
            .and_then(|amount| sub_total.checked_add(amount))
            .ok_or(LedgerError::AmountOverflow)?;
        tax = line
            .tax_amount(tax_enabled)
            .and_then(|amount| tax.checked_add(amount))
            .ok_or(LedgerError::AmountOverflow)?;
    }
    let exact = sub_total
        .checked_add(tax)
        .ok_or(LedgerError::AmountOverflow)?;
    let grand_total = round_money_whole(exact);

    Ok(InvoiceTotals {
        sub_total,
        tax,
        round_off: grand_total - exact,
        grand_total,
    })
}
