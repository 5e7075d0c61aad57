//! Invoice command inputs.

use chrono::NaiveDate;
use khata_shared::types::{PartyId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::model::{InvoiceKind, InvoiceSubType, PaymentMode};

/// Walk-in party identity typed on the invoice form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualParty {
    /// Name (required, non-blank).
    pub name: String,
    /// Phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Address.
    #[serde(default)]
    pub address: Option<String>,
    /// Area.
    #[serde(default)]
    pub area: Option<String>,
    /// Sub-area.
    #[serde(default)]
    pub sub_area: Option<String>,
}

/// Which party an invoice is raised against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartySelection {
    /// A registered customer or supplier; its balance is updated.
    Existing(PartyId),
    /// A walk-in party; no balance is kept.
    Manual(ManualParty),
}

/// One line as entered.
///
/// Unset fields fall back to the catalogue product: description to the product
/// name, rate to its sale or purchase price, tax rate to its default rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineInput {
    /// Catalogue product; `None` for a free-text line.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Line description.
    #[serde(default)]
    pub description: Option<String>,
    /// HSN code.
    #[serde(default)]
    pub hsn: Option<String>,
    /// Quantity (must be positive).
    pub quantity: u32,
    /// Unit rate before tax.
    #[serde(default)]
    pub rate: Option<Decimal>,
    /// Tax rate in percent.
    #[serde(default)]
    pub tax_rate: Option<Decimal>,
}

impl InvoiceLineInput {
    /// A catalogue line using the product's defaults.
    #[must_use]
    pub fn product(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id: Some(product_id),
            description: None,
            hsn: None,
            quantity,
            rate: None,
            tax_rate: None,
        }
    }

    /// Overrides the unit rate.
    #[must_use]
    pub fn at_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    /// Overrides the tax rate.
    #[must_use]
    pub fn taxed_at(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = Some(tax_rate);
        self
    }
}

/// Input for creating or editing an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceInput {
    /// Invoice number; generated on create and kept on edit when unset.
    #[serde(default)]
    pub invoice_no: Option<String>,
    /// Sale or purchase.
    pub kind: InvoiceKind,
    /// Document sub-type (ignored for purchases).
    #[serde(default)]
    pub sub_type: Option<InvoiceSubType>,
    /// Invoice date.
    pub date: NaiveDate,
    /// Party.
    pub party: PartySelection,
    /// Line items.
    pub lines: Vec<InvoiceLineInput>,
    /// Apply line tax rates.
    #[serde(default = "default_tax_enabled")]
    pub tax_enabled: bool,
    /// Amount settled at posting time.
    #[serde(default)]
    pub amount_paid: Decimal,
    /// How it was paid.
    #[serde(default)]
    pub payment_mode: PaymentMode,
    /// Payment remarks.
    #[serde(default)]
    pub remarks: Option<String>,
}

fn default_tax_enabled() -> bool {
    true
}
