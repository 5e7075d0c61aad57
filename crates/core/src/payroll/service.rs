//! Monthly payroll accrual from attendance.

use std::collections::BTreeMap;

use chrono::{Datelike, Month, NaiveDate};
use khata_shared::types::{TransactionId, round_money_whole};
use rust_decimal::Decimal;
use tracing::{debug, info};

use super::types::{AttendanceRecord, AttendanceStatus, PayrollLine};
use crate::ledger::{BalanceMutator, LedgerError, Sign};
use crate::model::{Direction, Party, Snapshot, Transaction};

/// Category of payroll transactions.
pub const SALARY_CATEGORY: &str = "Salary";

/// Computes and posts staff salaries.
pub struct PayrollService;

impl PayrollService {
    /// Computes the salary `employee` earned in `year`/`month`.
    ///
    /// Only records of this employee dated inside the month count; when a day
    /// is marked more than once the last mark wins.
    ///
    /// # Errors
    ///
    /// `InvalidPayrollPeriod` if `month` is not 1-12 or the year is out of
    /// range, `AmountOverflow` if the salary is too large to prorate.
    pub fn monthly_payable(
        employee: &Party,
        attendance: &[AttendanceRecord],
        year: i32,
        month: u32,
    ) -> Result<PayrollLine, LedgerError> {
        let (first, days_in_month) = Self::period(year, month)?;

        let mut marks: BTreeMap<NaiveDate, AttendanceStatus> = BTreeMap::new();
        for record in attendance.iter().filter(|r| {
            r.employee_id == employee.id && r.date.year() == first.year() && r.date.month() == month
        }) {
            marks.insert(record.date, record.status);
        }
        let effective_days: Decimal = marks.values().map(|s| s.paid_fraction()).sum();

        let salary = employee.monthly_salary.unwrap_or(Decimal::ZERO);
        let calculated_salary = salary
            .checked_mul(effective_days)
            .and_then(|earned| earned.checked_div(Decimal::from(days_in_month)))
            .map(round_money_whole)
            .ok_or(LedgerError::AmountOverflow)?;

        Ok(PayrollLine {
            employee_id: employee.id,
            days_in_month,
            effective_days: effective_days.normalize(),
            calculated_salary,
        })
    }

    /// Accrues one month of salary for every employee.
    ///
    /// Each employee with a positive payable gets it added to their balance
    /// (the business owes them more) and a Credit transaction in the `Salary`
    /// category dated `posting_date`.
    ///
    /// # Errors
    ///
    /// `InvalidPayrollPeriod`, `AmountOverflow`, or `NoPayrollToPost` when no
    /// employee accrued anything.
    pub fn accrue(
        snapshot: &Snapshot,
        attendance: &[AttendanceRecord],
        year: i32,
        month: u32,
        posting_date: NaiveDate,
    ) -> Result<(Snapshot, Vec<Transaction>), LedgerError> {
        let (first, _) = Self::period(year, month)?;
        let month_name = u8::try_from(month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map_or("", |m| m.name());

        let mut work = snapshot.clone();
        let mut posted = Vec::new();
        for employee in snapshot.parties.iter().filter(|p| p.is_employee()) {
            let line = Self::monthly_payable(employee, attendance, year, month)?;
            if line.calculated_salary <= Decimal::ZERO {
                debug!(party_id = %employee.id, "No salary accrued");
                continue;
            }

            let transaction = Transaction {
                id: TransactionId::new(),
                date: posting_date,
                description: format!(
                    "Batch Payroll Accrual: {} [{} {}] ({} Days)",
                    employee.name,
                    month_name,
                    first.year(),
                    line.effective_days
                ),
                amount: line.calculated_salary,
                direction: Direction::Credit,
                category: SALARY_CATEGORY.to_string(),
                party_id: Some(employee.id),
                invoice_id: None,
                payment_mode: None,
                sequence: work.take_sequence(),
            };
            if let Some(party) = work.party_mut(employee.id) {
                let delta = BalanceMutator::transaction_delta(
                    party.role,
                    transaction.direction,
                    transaction.amount,
                );
                *party = BalanceMutator::apply_balance(party, delta, Sign::Apply)?;
            }
            work.transactions.push(transaction.clone());
            posted.push(transaction);
        }

        if posted.is_empty() {
            return Err(LedgerError::NoPayrollToPost(first));
        }

        let total = posted
            .iter()
            .try_fold(Decimal::ZERO, |sum, t| sum.checked_add(t.amount))
            .ok_or(LedgerError::AmountOverflow)?;
        info!(
            year,
            month,
            employees = posted.len(),
            total = %total,
            "Payroll accrued"
        );
        Ok((work.commit(), posted))
    }

    /// First day and length of a month.
    fn period(year: i32, month: u32) -> Result<(NaiveDate, u32), LedgerError> {
        let invalid = LedgerError::InvalidPayrollPeriod { year, month };
        let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(invalid.clone())?;
        let next = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or(invalid.clone())?;
        let days = u32::try_from((next - first).num_days()).map_err(|_| invalid)?;
        Ok((first, days))
    }
}
