//! Staff payroll.
//!
//! Attendance-based monthly salary computation and batch accrual onto staff
//! balances.

pub mod service;
pub mod types;

pub use service::{PayrollService, SALARY_CATEGORY};
pub use types::{AttendanceRecord, AttendanceStatus, PayrollLine};
