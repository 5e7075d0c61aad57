//! Property-based tests for StatementService.
//!
//! - Property 1: Re-folding a statement reproduces its running balances
//! - Property 2: The newest running balance equals the party balance

use chrono::NaiveDate;
use khata_shared::EngineConfig;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::StatementService;
use crate::invoice::{InvoiceInput, InvoiceLineInput, InvoiceService, PartySelection};
use crate::ledger::RunningBalance;
use crate::model::{Direction, InvoiceKind, Party, PartyRole, PaymentMode, Snapshot};
use crate::payment::{PaymentInput, PaymentService};

/// One posting against the party under test.
#[derive(Debug, Clone)]
enum Posting {
    /// Invoice of (day, rate, percent paid); a salary accrual for staff.
    Invoice(u32, Decimal, u32),
    /// Direct transaction of (day, amount, direction).
    Direct(u32, Decimal, Direction),
}

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate direction.
fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Credit), Just(Direction::Debit)]
}

/// Strategy to generate party role.
fn role() -> impl Strategy<Value = PartyRole> {
    prop_oneof![
        Just(PartyRole::Customer),
        Just(PartyRole::Supplier),
        Just(PartyRole::Other),
    ]
}

fn posting() -> impl Strategy<Value = Posting> {
    prop_oneof![
        (1u32..28, positive_amount(), 0u32..=100)
            .prop_map(|(day, rate, percent)| Posting::Invoice(day, rate, percent)),
        (1u32..28, positive_amount(), direction())
            .prop_map(|(day, amount, direction)| Posting::Direct(day, amount, direction)),
    ]
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, day).unwrap()
}

/// Posts every posting against a fresh party of `role`.
fn post_all(role: PartyRole, postings: &[Posting]) -> (Snapshot, Party) {
    let party = Party::new(role, "Meena Traders");
    let kind = match role {
        PartyRole::Supplier => InvoiceKind::Purchase,
        _ => InvoiceKind::Sale,
    };
    let config = EngineConfig::default();
    let mut snapshot = Snapshot::new().with_party(party.clone());

    for posting in postings {
        snapshot = match posting {
            Posting::Invoice(day, rate, _) if role == PartyRole::Other => {
                let mut input =
                    PaymentInput::for_party(party.id, date(*day), *rate, Direction::Credit);
                input.salary = true;
                PaymentService::post(&snapshot, &input).unwrap().0
            }
            Posting::Invoice(day, rate, percent) => {
                let total = rate.round();
                let paid = (total * Decimal::from(*percent) / Decimal::ONE_HUNDRED).round_dp(2);
                let input = InvoiceInput {
                    invoice_no: None,
                    kind,
                    sub_type: None,
                    date: date(*day),
                    party: PartySelection::Existing(party.id),
                    lines: vec![InvoiceLineInput {
                        product_id: None,
                        description: Some("Service".to_string()),
                        hsn: None,
                        quantity: 1,
                        rate: Some(total),
                        tax_rate: None,
                    }],
                    tax_enabled: false,
                    amount_paid: paid,
                    payment_mode: PaymentMode::Bank,
                    remarks: None,
                };
                InvoiceService::create(&snapshot, &input, &config).unwrap().0
            }
            Posting::Direct(day, amount, direction) => {
                let input = PaymentInput::for_party(party.id, date(*day), *amount, *direction);
                PaymentService::post(&snapshot, &input).unwrap().0
            }
        };
    }
    (snapshot, party)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Re-folding a statement reproduces its running balances**
    ///
    /// *For any* postings, sorting the statement back to ascending order and
    /// folding the signed amounts again yields the same running balances.
    #[test]
    fn prop_refold_is_deterministic(
        role in role(),
        postings in prop::collection::vec(posting(), 0..12),
    ) {
        let (snapshot, party) = post_all(role, &postings);
        let entries = StatementService::for_party(&snapshot, party.id).unwrap();

        let ascending: Vec<_> = entries.iter().rev().collect();
        let refolded = RunningBalance::fold(
            ascending.iter().map(|e| role.signed_amount(e.direction, e.amount)),
        )
        .unwrap();

        prop_assert_eq!(refolded.len(), entries.len());
        for (entry, balance) in ascending.iter().zip(&refolded) {
            prop_assert_eq!(entry.running_balance, balance.current_balance);
        }
        prop_assert_eq!(
            StatementService::for_party(&snapshot, party.id).unwrap(),
            entries
        );
    }

    /// **Property 2: The newest running balance equals the party balance**
    ///
    /// *For any* postings against a party opened at zero, the statement's
    /// latest running balance equals the incrementally maintained balance.
    #[test]
    fn prop_statement_agrees_with_balance(
        role in role(),
        postings in prop::collection::vec(posting(), 1..12),
    ) {
        let (snapshot, party) = post_all(role, &postings);
        let entries = StatementService::for_party(&snapshot, party.id).unwrap();
        let balance = snapshot.party(party.id).unwrap().outstanding_balance;

        prop_assert_eq!(entries.first().map(|e| e.running_balance), Some(balance));
    }
}
