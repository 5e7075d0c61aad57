//! Inventory products.

use chrono::NaiveDate;
use khata_shared::types::ProductId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An inventory item whose `stock` is an incrementally mutated running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// HSN classification code.
    #[serde(default)]
    pub hsn: Option<String>,
    /// Catalogue category.
    #[serde(default)]
    pub category: Option<String>,
    /// Quantity on hand.
    pub stock: i64,
    /// Quantity on hand when the product was first recorded.
    #[serde(default)]
    pub opening_stock: i64,
    /// Default purchase rate.
    #[serde(default)]
    pub purchase_price: Decimal,
    /// Default sale rate.
    #[serde(default)]
    pub sale_price: Decimal,
    /// Default tax rate in percent.
    #[serde(default)]
    pub tax_rate: Decimal,
    /// Stock level at or below which the product is flagged.
    #[serde(default)]
    pub min_stock_alert: i64,
    /// Date of the latest posted purchase.
    #[serde(default)]
    pub last_restocked: Option<NaiveDate>,
}

impl Product {
    /// Creates a product whose opening and current stock are both `stock`.
    #[must_use]
    pub fn new(name: impl Into<String>, stock: i64) -> Self {
        Self {
            id: ProductId::new(),
            name: name.into(),
            hsn: None,
            category: None,
            stock,
            opening_stock: stock,
            purchase_price: Decimal::ZERO,
            sale_price: Decimal::ZERO,
            tax_rate: Decimal::ZERO,
            min_stock_alert: 0,
            last_restocked: None,
        }
    }

    /// Returns true if stock is at or below the alert threshold.
    #[must_use]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock_alert
    }
}
