//! Parties: customers, suppliers, and staff.

use khata_shared::types::PartyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transaction::Direction;

/// The role a party plays, which fixes its balance sign convention.
///
/// - Customer: positive balance = the party owes the business (receivable)
/// - Supplier: positive balance = the business owes the party (payable)
/// - Other/Staff: positive balance = the business owes the person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartyRole {
    /// Customer (receivable side).
    Customer,
    /// Supplier (payable side).
    Supplier,
    /// Staff or any other party the business settles with.
    Other,
}

impl PartyRole {
    /// Returns the balance change caused by `amount` moving in `direction`.
    ///
    /// Customer: debit increases, credit decreases.
    /// Supplier and Other: credit increases, debit decreases.
    #[must_use]
    pub fn signed_amount(self, direction: Direction, amount: Decimal) -> Decimal {
        match (self, direction) {
            (Self::Customer, Direction::Debit)
            | (Self::Supplier | Self::Other, Direction::Credit) => amount,
            (Self::Customer, Direction::Credit)
            | (Self::Supplier | Self::Other, Direction::Debit) => -amount,
        }
    }

    /// Upper-case label used in descriptions.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Customer => "CUSTOMER",
            Self::Supplier => "SUPPLIER",
            Self::Other => "STAFF",
        }
    }
}

impl std::fmt::Display for PartyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A customer, supplier, or staff member with a signed running balance.
///
/// `outstanding_balance` is mutated incrementally by every posting and is
/// never recomputed from history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    /// Unique identifier.
    pub id: PartyId,
    /// Role and sign convention.
    pub role: PartyRole,
    /// Display name.
    pub name: String,
    /// Contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Area or locality.
    #[serde(default)]
    pub area: Option<String>,
    /// Sub-area within the locality.
    #[serde(default)]
    pub sub_area: Option<String>,
    /// GST registration number.
    #[serde(default)]
    pub gstin: Option<String>,
    /// Signed running balance, see [`PartyRole`].
    #[serde(default)]
    pub outstanding_balance: Decimal,
    /// Monthly salary; set only for staff on payroll.
    #[serde(default)]
    pub monthly_salary: Option<Decimal>,
}

impl Party {
    /// Creates a party with a zero balance and no contact details.
    #[must_use]
    pub fn new(role: PartyRole, name: impl Into<String>) -> Self {
        Self {
            id: PartyId::new(),
            role,
            name: name.into(),
            phone: None,
            address: None,
            area: None,
            sub_area: None,
            gstin: None,
            outstanding_balance: Decimal::ZERO,
            monthly_salary: None,
        }
    }

    /// Returns true if this party is staff on payroll.
    #[must_use]
    pub fn is_employee(&self) -> bool {
        self.role == PartyRole::Other
            && self.monthly_salary.is_some_and(|salary| salary > Decimal::ZERO)
    }
}
