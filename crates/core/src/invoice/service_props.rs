//! Property-based tests for InvoiceService.
//!
//! - Property 1: Delete after create restores parties and products
//! - Property 2: Editing an invoice to its own content changes only the version
//! - Property 3: A party balance equals the sum of its invoices' unsettled amounts
//! - Property 4: Stock moves by exactly the net posted quantity

use chrono::NaiveDate;
use khata_shared::EngineConfig;
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::service::InvoiceService;
use super::types::{InvoiceInput, InvoiceLineInput, PartySelection};
use crate::model::{InvoiceKind, Party, PartyRole, PaymentMode, Product, Snapshot};

/// Strategy to generate unit rates (0.01 to 5,000.00).
fn rate() -> impl Strategy<Value = Decimal> {
    (1i64..500_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a tax rate from the usual GST slabs.
fn tax_rate() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        Just(Decimal::ZERO),
        Just(Decimal::new(5, 0)),
        Just(Decimal::new(12, 0)),
        Just(Decimal::new(18, 0)),
        Just(Decimal::new(28, 0)),
    ]
}

/// Strategy to generate invoice kind.
fn kind() -> impl Strategy<Value = InvoiceKind> {
    prop_oneof![Just(InvoiceKind::Sale), Just(InvoiceKind::Purchase)]
}

/// Strategy to generate (quantity, rate, tax rate) lines.
fn lines() -> impl Strategy<Value = Vec<(u32, Decimal, Decimal)>> {
    prop::collection::vec((1u32..50, rate(), tax_rate()), 1..5)
}

/// Share of the grand total paid at posting, in percent.
fn paid_percent() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(100u32), 0u32..=100]
}

struct Books {
    snapshot: Snapshot,
    customer: Party,
    supplier: Party,
    product: Product,
}

fn books() -> Books {
    let customer = Party::new(PartyRole::Customer, "Meena Traders");
    let supplier = Party::new(PartyRole::Supplier, "Steel Hub");
    let product = Product::new("Gate Valve", 1_000);
    let snapshot = Snapshot::new()
        .with_party(customer.clone())
        .with_party(supplier.clone())
        .with_product(product.clone());
    Books {
        snapshot,
        customer,
        supplier,
        product,
    }
}

fn make_input(
    books: &Books,
    kind: InvoiceKind,
    lines: &[(u32, Decimal, Decimal)],
    paid: Decimal,
) -> InvoiceInput {
    let party = match kind {
        InvoiceKind::Sale => books.customer.id,
        InvoiceKind::Purchase => books.supplier.id,
    };
    InvoiceInput {
        invoice_no: None,
        kind,
        sub_type: None,
        date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        party: PartySelection::Existing(party),
        lines: lines
            .iter()
            .map(|(quantity, rate, tax)| {
                InvoiceLineInput::product(books.product.id, *quantity)
                    .at_rate(*rate)
                    .taxed_at(*tax)
            })
            .collect(),
        tax_enabled: true,
        amount_paid: paid,
        payment_mode: PaymentMode::Cash,
        remarks: None,
    }
}

/// Grand total the service will compute for these lines.
fn grand_total(books: &Books, kind: InvoiceKind, lines: &[(u32, Decimal, Decimal)]) -> Decimal {
    let unpaid = make_input(books, kind, lines, Decimal::ZERO);
    let (_, invoice) =
        InvoiceService::create(&books.snapshot, &unpaid, &EngineConfig::default()).unwrap();
    invoice.totals.grand_total
}

fn paid_share(total: Decimal, percent: u32) -> Decimal {
    (total * Decimal::from(percent) / Decimal::ONE_HUNDRED).round_dp(2)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// **Property 1: Delete after create restores parties and products**
    ///
    /// *For any* invoice, posting it and deleting it leaves every balance and
    /// stock level where it started, with no invoice or transaction left behind.
    #[test]
    fn prop_delete_reverses_create(
        kind in kind(),
        lines in lines(),
        percent in paid_percent(),
    ) {
        let books = books();
        let config = EngineConfig::default();
        let paid = paid_share(grand_total(&books, kind, &lines), percent);
        let input = make_input(&books, kind, &lines, paid);

        let (posted, invoice) = InvoiceService::create(&books.snapshot, &input, &config).unwrap();
        let deleted = InvoiceService::delete(&posted, invoice.id, &config).unwrap();

        prop_assert_eq!(&deleted.parties, &books.snapshot.parties);
        prop_assert_eq!(
            deleted.product(books.product.id).unwrap().stock,
            books.product.stock
        );
        prop_assert!(deleted.invoices.is_empty());
        prop_assert!(deleted.transactions.is_empty());
    }

    /// **Property 2: Editing an invoice to its own content changes only the version**
    ///
    /// *For any* posted invoice, re-submitting the same input as an edit yields
    /// a snapshot equal to the posted one apart from the version counter.
    #[test]
    fn prop_identity_edit_is_noop(
        kind in kind(),
        lines in lines(),
        percent in paid_percent(),
    ) {
        let books = books();
        let config = EngineConfig::default();
        let paid = paid_share(grand_total(&books, kind, &lines), percent);
        let input = make_input(&books, kind, &lines, paid);

        let (posted, invoice) = InvoiceService::create(&books.snapshot, &input, &config).unwrap();
        let (edited, _) = InvoiceService::edit(&posted, invoice.id, &input, &config).unwrap();

        let mut expected = posted.clone();
        expected.version += 1;
        prop_assert_eq!(edited, expected);
    }

    /// **Property 3: A party balance equals the sum of its invoices' unsettled amounts**
    ///
    /// *For any* sequence of sales, the customer's balance is
    /// Σ (grand_total - amount_paid).
    #[test]
    fn prop_balance_conservation(
        invoices in prop::collection::vec((lines(), paid_percent()), 1..6),
    ) {
        let books = books();
        let config = EngineConfig::default();
        let mut snapshot = books.snapshot.clone();
        let mut expected = Decimal::ZERO;

        for (lines, percent) in &invoices {
            let paid = paid_share(grand_total(&books, InvoiceKind::Sale, lines), *percent);
            let input = make_input(&books, InvoiceKind::Sale, lines, paid);
            let (next, invoice) = InvoiceService::create(&snapshot, &input, &config).unwrap();
            expected += invoice.unsettled();
            snapshot = next;
        }

        prop_assert_eq!(
            snapshot.party(books.customer.id).unwrap().outstanding_balance,
            expected
        );
    }

    /// **Property 4: Stock moves by exactly the net posted quantity**
    ///
    /// *For any* create followed by an edit with different quantities, the final
    /// stock reflects only the edited quantities.
    #[test]
    fn prop_edit_moves_stock_by_new_quantity(
        kind in kind(),
        before in lines(),
        after in lines(),
    ) {
        let books = books();
        let config = EngineConfig::default();
        let (posted, invoice) = InvoiceService::create(
            &books.snapshot,
            &make_input(&books, kind, &before, Decimal::ZERO),
            &config,
        )
        .unwrap();
        let (edited, _) = InvoiceService::edit(
            &posted,
            invoice.id,
            &make_input(&books, kind, &after, Decimal::ZERO),
            &config,
        )
        .unwrap();

        let moved: i64 = after.iter().map(|(quantity, _, _)| i64::from(*quantity)).sum();
        prop_assert_eq!(
            edited.product(books.product.id).unwrap().stock,
            books.product.stock + kind.stock_factor() * moved
        );
    }
}
