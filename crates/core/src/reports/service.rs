//! Report generation service.

use rust_decimal::Decimal;

use super::types::{AccountSummary, LowStockItem};
use crate::ledger::LedgerError;
use crate::model::{Direction, InvoiceKind, PartyRole, Snapshot};

fn add(total: &mut Decimal, amount: Decimal) -> Result<(), LedgerError> {
    *total = total
        .checked_add(amount)
        .ok_or(LedgerError::AmountOverflow)?;
    Ok(())
}

/// Service for generating business reports.
pub struct ReportService;

impl ReportService {
    /// Generates the accounting summary of a snapshot.
    ///
    /// # Errors
    ///
    /// Returns `AmountOverflow` if any total is out of range.
    pub fn summarize(snapshot: &Snapshot) -> Result<AccountSummary, LedgerError> {
        let mut summary = AccountSummary::default();

        for invoice in &snapshot.invoices {
            match invoice.kind {
                InvoiceKind::Sale => {
                    add(&mut summary.revenue, invoice.totals.grand_total)?;
                    add(&mut summary.collected, invoice.amount_paid)?;
                }
                InvoiceKind::Purchase => {
                    add(&mut summary.purchases, invoice.totals.grand_total)?;
                    add(&mut summary.given, invoice.amount_paid)?;
                }
            }
        }

        for transaction in snapshot.transactions.iter().filter(|t| !t.is_companion()) {
            let role = transaction
                .party_id
                .and_then(|id| snapshot.party(id))
                .map(|p| p.role);
            match transaction.direction {
                Direction::Credit => {
                    if role == Some(PartyRole::Customer) {
                        add(&mut summary.collected, transaction.amount)?;
                    }
                }
                Direction::Debit => {
                    add(&mut summary.given, transaction.amount)?;
                    if role != Some(PartyRole::Supplier) {
                        add(&mut summary.expenses, transaction.amount)?;
                    }
                }
            }
        }

        summary.profit = summary
            .revenue
            .checked_sub(summary.purchases)
            .and_then(|net| net.checked_sub(summary.expenses))
            .ok_or(LedgerError::AmountOverflow)?;
        summary.receivables = Self::positive_balances(snapshot, PartyRole::Customer)?;
        summary.payables = Self::positive_balances(snapshot, PartyRole::Supplier)?;
        summary.low_stock = snapshot
            .products
            .iter()
            .filter(|p| p.is_low_stock())
            .map(|p| LowStockItem {
                product_id: p.id,
                name: p.name.clone(),
                stock: p.stock,
                min_stock_alert: p.min_stock_alert,
            })
            .collect();
        Ok(summary)
    }

    fn positive_balances(snapshot: &Snapshot, role: PartyRole) -> Result<Decimal, LedgerError> {
        let mut total = Decimal::ZERO;
        for party in snapshot
            .parties
            .iter()
            .filter(|p| p.role == role && p.outstanding_balance > Decimal::ZERO)
        {
            add(&mut total, party.outstanding_balance)?;
        }
        Ok(total)
    }
}
