//! Tests for the reports module.

use chrono::NaiveDate;
use khata_shared::EngineConfig;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::service::ReportService;
use crate::invoice::{InvoiceInput, InvoiceLineInput, InvoiceService, PartySelection};
use crate::model::{Direction, InvoiceKind, Party, PartyRole, PaymentMode, Product, Snapshot};
use crate::payment::{PaymentInput, PaymentService};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 14).unwrap()
}

fn invoice(
    kind: InvoiceKind,
    party: &Party,
    lines: Vec<InvoiceLineInput>,
    paid: Decimal,
) -> InvoiceInput {
    InvoiceInput {
        invoice_no: None,
        kind,
        sub_type: None,
        date: date(),
        party: PartySelection::Existing(party.id),
        lines,
        tax_enabled: false,
        amount_paid: paid,
        payment_mode: PaymentMode::Cash,
        remarks: None,
    }
}

fn service_line(rate: Decimal) -> InvoiceLineInput {
    InvoiceLineInput {
        product_id: None,
        description: Some("Labour".to_string()),
        hsn: None,
        quantity: 1,
        rate: Some(rate),
        tax_rate: None,
    }
}

#[test]
fn test_summary_of_a_trading_month() {
    let customer = Party::new(PartyRole::Customer, "Meena Traders");
    let supplier = Party::new(PartyRole::Supplier, "Steel Hub");
    let mut staff = Party::new(PartyRole::Other, "Ravi");
    staff.monthly_salary = Some(dec!(10000));
    let mut valve = Product::new("Gate Valve", 10);
    valve.min_stock_alert = 5;
    let mut pipe = Product::new("PVC Pipe", 100);
    pipe.min_stock_alert = 5;

    let config = EngineConfig::default();
    let snapshot = Snapshot::new()
        .with_party(customer.clone())
        .with_party(supplier.clone())
        .with_party(staff.clone())
        .with_product(valve.clone())
        .with_product(pipe);

    let sale = invoice(
        InvoiceKind::Sale,
        &customer,
        vec![
            InvoiceLineInput::product(valve.id, 6)
                .at_rate(dec!(100))
                .taxed_at(Decimal::ZERO),
            service_line(dec!(400)),
        ],
        dec!(400),
    );
    let (snapshot, sale) = InvoiceService::create(&snapshot, &sale, &config).unwrap();
    assert_eq!(sale.totals.grand_total, dec!(1000));

    let purchase = invoice(
        InvoiceKind::Purchase,
        &supplier,
        vec![service_line(dec!(600))],
        dec!(100),
    );
    let (snapshot, _) = InvoiceService::create(&snapshot, &purchase, &config).unwrap();

    let postings = [
        PaymentInput::for_party(customer.id, date(), dec!(200), Direction::Credit),
        PaymentInput::for_party(supplier.id, date(), dec!(300), Direction::Debit),
        PaymentInput::expense(date(), dec!(150), "Rent"),
        PaymentInput::for_party(staff.id, date(), dec!(2000), Direction::Debit),
    ];
    let snapshot = postings.iter().fold(snapshot, |snapshot, input| {
        PaymentService::post(&snapshot, input).unwrap().0
    });

    let summary = ReportService::summarize(&snapshot).unwrap();
    assert_eq!(summary.revenue, dec!(1000));
    assert_eq!(summary.purchases, dec!(600));
    assert_eq!(summary.expenses, dec!(2150));
    assert_eq!(summary.profit, dec!(-1750));
    assert_eq!(summary.collected, dec!(600));
    assert_eq!(summary.given, dec!(2550));
    assert_eq!(summary.receivables, dec!(400));
    assert_eq!(summary.payables, dec!(200));
    assert_eq!(summary.low_stock.len(), 1);
    assert_eq!(summary.low_stock[0].product_id, valve.id);
    assert_eq!(summary.low_stock[0].stock, 4);
}

#[test]
fn test_empty_snapshot_summary() {
    let summary = ReportService::summarize(&Snapshot::new()).unwrap();
    assert_eq!(summary.profit, Decimal::ZERO);
    assert!(summary.low_stock.is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Profit always equals revenue less purchases less expenses, and
    /// receivables are never negative.
    #[test]
    fn prop_profit_identity(
        sales in prop::collection::vec(1i64..100_000, 0..5),
        collections in prop::collection::vec(1i64..100_000, 0..5),
    ) {
        let customer = Party::new(PartyRole::Customer, "Meena Traders");
        let config = EngineConfig::default();
        let mut snapshot = Snapshot::new().with_party(customer.clone());
        for rate in &sales {
            let input = invoice(
                InvoiceKind::Sale,
                &customer,
                vec![service_line(Decimal::from(*rate))],
                Decimal::ZERO,
            );
            snapshot = InvoiceService::create(&snapshot, &input, &config).unwrap().0;
        }
        for amount in &collections {
            let input = PaymentInput::for_party(
                customer.id,
                date(),
                Decimal::from(*amount),
                Direction::Credit,
            );
            snapshot = PaymentService::post(&snapshot, &input).unwrap().0;
        }

        let summary = ReportService::summarize(&snapshot).unwrap();
        prop_assert_eq!(summary.profit, summary.revenue - summary.purchases - summary.expenses);
        prop_assert!(summary.receivables >= Decimal::ZERO);
        prop_assert_eq!(summary.revenue, Decimal::from(sales.iter().sum::<i64>()));
    }
}
