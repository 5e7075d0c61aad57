//! Attendance and payroll types.

use chrono::NaiveDate;
use khata_shared::types::PartyId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Daily attendance mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    /// Full paid day.
    Present,
    /// Half a paid day.
    HalfDay,
    /// Unpaid day.
    Absent,
}

impl AttendanceStatus {
    /// Paid fraction of the day.
    #[must_use]
    pub fn paid_fraction(self) -> Decimal {
        match self {
            Self::Present => Decimal::ONE,
            Self::HalfDay => Decimal::new(5, 1),
            Self::Absent => Decimal::ZERO,
        }
    }
}

/// Attendance of one employee on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee (a staff party).
    pub employee_id: PartyId,
    /// Day.
    pub date: NaiveDate,
    /// Mark.
    pub status: AttendanceStatus,
}

/// Salary payable to one employee for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollLine {
    /// The employee.
    pub employee_id: PartyId,
    /// Days in the month.
    pub days_in_month: u32,
    /// Present days plus half of the half days.
    pub effective_days: Decimal,
    /// `monthly_salary / days_in_month * effective_days`, rounded to whole units.
    pub calculated_salary: Decimal,
}
