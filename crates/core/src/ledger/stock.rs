//! Stock mutations implied by invoice lines.

use std::collections::BTreeSet;

use khata_shared::types::ProductId;
use tracing::debug;

use super::error::LedgerError;
use crate::model::{Invoice, InvoiceKind, Product};

/// Direction of a mutation.
///
/// Reversal is the same mutation applied with the sign flipped; there is no
/// separately written inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    /// Apply the effect (+1).
    Apply,
    /// Undo the effect (-1).
    Reverse,
}

impl Sign {
    /// Returns +1 or -1.
    #[must_use]
    pub const fn factor(self) -> i64 {
        match self {
            Self::Apply => 1,
            Self::Reverse => -1,
        }
    }
}

/// Applies and reverses stock deltas for invoice lines.
pub struct StockMutator;

impl StockMutator {
    /// Returns the product set after applying `invoice` with `sign`.
    ///
    /// Each catalogue line moves `product.stock` by
    /// `sign * (Sale ? -quantity : +quantity)`. Free-text lines are skipped.
    /// Applying a purchase stamps `last_restocked` with the invoice date.
    ///
    /// # Errors
    ///
    /// Returns `UnknownProduct` if any line references a product that is not
    /// in `products`, or `StockOverflow` if a stock level leaves the `i64`
    /// range; in either case `products` is not changed.
    pub fn apply_invoice(
        products: &[Product],
        invoice: &Invoice,
        sign: Sign,
    ) -> Result<Vec<Product>, LedgerError> {
        for product_id in invoice.lines.iter().filter_map(|l| l.product_id) {
            if !products.iter().any(|p| p.id == product_id) {
                return Err(LedgerError::UnknownProduct(product_id));
            }
        }

        let mut updated = products.to_vec();
        for line in &invoice.lines {
            let Some(product_id) = line.product_id else {
                continue;
            };
            let Some(product) = updated.iter_mut().find(|p| p.id == product_id) else {
                return Err(LedgerError::UnknownProduct(product_id));
            };
            let delta = sign.factor() * invoice.kind.stock_factor() * i64::from(line.quantity);
            product.stock = product
                .stock
                .checked_add(delta)
                .ok_or(LedgerError::StockOverflow(product_id))?;
            if invoice.kind == InvoiceKind::Purchase && sign == Sign::Apply {
                product.last_restocked = Some(invoice.date);
            }
            debug!(
                product_id = %product_id,
                delta,
                stock = product.stock,
                "Stock adjusted"
            );
        }
        Ok(updated)
    }

    /// Product IDs referenced by an invoice's catalogue lines.
    #[must_use]
    pub fn touched(invoice: &Invoice) -> BTreeSet<ProductId> {
        invoice.lines.iter().filter_map(|l| l.product_id).collect()
    }

    /// Fails if any of `touched` has negative stock in `products`.
    ///
    /// # Errors
    ///
    /// Returns `NegativeStock` for the first offending product.
    pub fn ensure_non_negative(
        products: &[Product],
        touched: &BTreeSet<ProductId>,
    ) -> Result<(), LedgerError> {
        match products
            .iter()
            .find(|p| touched.contains(&p.id) && p.stock < 0)
        {
            Some(product) => Err(LedgerError::NegativeStock {
                product_id: product.id,
                stock: product.stock,
            }),
            None => Ok(()),
        }
    }
}
