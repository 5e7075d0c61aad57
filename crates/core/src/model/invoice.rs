//! Sale and purchase invoices.

use chrono::NaiveDate;
use khata_shared::types::{InvoiceId, PartyId, ProductId, round_money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::party::PartyRole;
use super::transaction::Direction;

/// Invoice kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceKind {
    /// Goods leave stock; the customer owes the unsettled portion.
    Sale,
    /// Goods enter stock; the business owes the supplier the unsettled portion.
    Purchase,
}

impl InvoiceKind {
    /// The only party role an invoice of this kind may reference.
    #[must_use]
    pub const fn party_role(self) -> PartyRole {
        match self {
            Self::Sale => PartyRole::Customer,
            Self::Purchase => PartyRole::Supplier,
        }
    }

    /// Direction of the accrual entry for the full invoice value.
    #[must_use]
    pub const fn accrual_direction(self) -> Direction {
        match self {
            Self::Sale => Direction::Debit,
            Self::Purchase => Direction::Credit,
        }
    }

    /// Direction of the payment settled at posting time.
    #[must_use]
    pub const fn settlement_direction(self) -> Direction {
        self.accrual_direction().opposite()
    }

    /// Stock movement per unit when the invoice is applied.
    #[must_use]
    pub const fn stock_factor(self) -> i64 {
        match self {
            Self::Sale => -1,
            Self::Purchase => 1,
        }
    }

    /// Title-case label, also used as the companion transaction category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sale => "Sale",
            Self::Purchase => "Purchase",
        }
    }
}

/// Document sub-type of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceSubType {
    /// Regular tax invoice.
    TaxInvoice,
    /// Bill of supply (no tax charged).
    BillOfSupply,
    /// Goods sent without sale; never carries a payment.
    DeliveryChallan,
    /// Quotation-style invoice; never carries a payment.
    ProformaInvoice,
}

impl InvoiceSubType {
    /// Returns true if documents of this sub-type are always posted unpaid.
    #[must_use]
    pub const fn forbids_payment(self) -> bool {
        matches!(self, Self::DeliveryChallan | Self::ProformaInvoice)
    }
}

/// How money changed hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Cash.
    #[default]
    Cash,
    /// Bank transfer.
    Bank,
    /// UPI transfer.
    Upi,
    /// Cheque.
    Cheque,
}

impl std::fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Cash => "CASH",
            Self::Bank => "BANK",
            Self::Upi => "UPI",
            Self::Cheque => "CHEQUE",
        })
    }
}

/// Party identity captured on the invoice at posting time.
///
/// `party_id` is `None` for walk-in/manual parties, which carry no balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceParty {
    /// Registered party, if any.
    #[serde(default)]
    pub party_id: Option<PartyId>,
    /// Name printed on the invoice.
    pub name: String,
    /// Phone printed on the invoice.
    #[serde(default)]
    pub phone: Option<String>,
    /// Address printed on the invoice.
    #[serde(default)]
    pub address: Option<String>,
    /// Area printed on the invoice.
    #[serde(default)]
    pub area: Option<String>,
    /// Sub-area printed on the invoice.
    #[serde(default)]
    pub sub_area: Option<String>,
}

/// A single invoice line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLine {
    /// Catalogue product; `None` for free-text lines with no stock effect.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Line description.
    pub description: String,
    /// HSN code.
    #[serde(default)]
    pub hsn: Option<String>,
    /// Quantity (always positive).
    pub quantity: u32,
    /// Unit rate before tax.
    pub rate: Decimal,
    /// Tax rate in percent.
    #[serde(default)]
    pub tax_rate: Decimal,
}

impl InvoiceLine {
    /// Quantity × rate; `None` on overflow.
    #[must_use]
    pub fn taxable(&self) -> Option<Decimal> {
        Decimal::from(self.quantity).checked_mul(self.rate)
    }

    /// Tax on this line rounded to paise; zero when tax is disabled for the
    /// invoice, `None` on overflow.
    #[must_use]
    pub fn tax_amount(&self, tax_enabled: bool) -> Option<Decimal> {
        if !tax_enabled {
            return Some(Decimal::ZERO);
        }
        let rate = self.tax_rate.checked_div(Decimal::ONE_HUNDRED)?;
        self.taxable()?.checked_mul(rate).map(round_money)
    }
}

/// Computed invoice totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Σ quantity × rate.
    pub sub_total: Decimal,
    /// Σ line tax.
    pub tax: Decimal,
    /// `grand_total - (sub_total + tax)`, kept for display.
    pub round_off: Decimal,
    /// `sub_total + tax` rounded to whole units.
    pub grand_total: Decimal,
}

/// A posted sale or purchase invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Human invoice number, unique per kind.
    pub invoice_no: String,
    /// Sale or purchase.
    pub kind: InvoiceKind,
    /// Document sub-type (sales only).
    #[serde(default)]
    pub sub_type: Option<InvoiceSubType>,
    /// Invoice date.
    pub date: NaiveDate,
    /// Party identity.
    pub party: InvoiceParty,
    /// Line items (never empty).
    pub lines: Vec<InvoiceLine>,
    /// Whether line tax rates were applied.
    pub tax_enabled: bool,
    /// Computed totals.
    pub totals: InvoiceTotals,
    /// Amount settled at posting time.
    pub amount_paid: Decimal,
    /// How the settled amount was paid.
    #[serde(default)]
    pub payment_mode: PaymentMode,
    /// Payment remarks.
    #[serde(default)]
    pub remarks: Option<String>,
    /// Snapshot-wide insertion sequence, used as a deterministic tie-break.
    #[serde(default)]
    pub sequence: u64,
}

impl Invoice {
    /// Unsettled portion: `grand_total - amount_paid`.
    ///
    /// This is the amount added to the referenced party's balance when the
    /// invoice is posted (negative for an overpayment/advance).
    #[must_use]
    pub fn unsettled(&self) -> Decimal {
        self.totals.grand_total - self.amount_paid
    }

    /// Registered party, if any.
    #[must_use]
    pub fn party_id(&self) -> Option<PartyId> {
        self.party.party_id
    }
}
