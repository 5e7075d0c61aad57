//! Direct transaction poster.
//!
//! Collections, payments, salary settlements, and general expenses that are
//! not generated by an invoice.

pub mod service;
pub mod types;

pub use service::PaymentService;
pub use types::PaymentInput;
