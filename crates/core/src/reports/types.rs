//! Report data types.

use khata_shared::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Business-wide totals over a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AccountSummary {
    /// Σ sale grand totals.
    pub revenue: Decimal,
    /// Σ purchase grand totals.
    pub purchases: Decimal,
    /// Σ direct debits not paid to suppliers.
    pub expenses: Decimal,
    /// revenue - purchases - expenses.
    pub profit: Decimal,
    /// Money received: sale settlements plus direct credits from customers.
    pub collected: Decimal,
    /// Money paid out: purchase settlements plus every direct debit.
    pub given: Decimal,
    /// Σ positive customer balances.
    pub receivables: Decimal,
    /// Σ positive supplier balances.
    pub payables: Decimal,
    /// Products at or below their alert level.
    pub low_stock: Vec<LowStockItem>,
}

/// A product that needs restocking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockItem {
    /// Product ID.
    pub product_id: ProductId,
    /// Product name.
    pub name: String,
    /// Quantity on hand.
    pub stock: i64,
    /// Alert threshold.
    pub min_stock_alert: i64,
}
