//! End-to-end reconciliation scenarios through the engine boundary.
//!
//! These tests verify that:
//! - A settled-then-deleted sale leaves no trace on the customer or statement
//! - Editing a purchase re-bases stock from the reversed state, not the opening one
//! - Stock always equals opening stock plus the net quantity of live invoices
//! - Commands submitted as JSON produce the same snapshot as direct calls

#![allow(clippy::items_after_statements)]

use chrono::NaiveDate;
use khata_core::engine::{Command, CommandEnvelope, Engine, Outcome};
use khata_core::invoice::{InvoiceInput, InvoiceLineInput, PartySelection};
use khata_core::model::{InvoiceKind, Party, PartyRole, PaymentMode, Product, Snapshot};
use khata_shared::EngineConfig;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn line_for(product: Option<&Product>, quantity: u32, rate: Decimal) -> InvoiceLineInput {
    InvoiceLineInput {
        product_id: product.map(|p| p.id),
        description: Some("Goods".to_string()),
        hsn: None,
        quantity,
        rate: Some(rate),
        tax_rate: Some(Decimal::ZERO),
    }
}

fn input(
    kind: InvoiceKind,
    party: &Party,
    lines: Vec<InvoiceLineInput>,
    paid: Decimal,
) -> InvoiceInput {
    InvoiceInput {
        invoice_no: None,
        kind,
        sub_type: None,
        date: day(12),
        party: PartySelection::Existing(party.id),
        lines,
        tax_enabled: true,
        amount_paid: paid,
        payment_mode: PaymentMode::Cash,
        remarks: None,
    }
}

fn balance(snapshot: &Snapshot, party: &Party) -> Decimal {
    snapshot.party(party.id).unwrap().outstanding_balance
}

#[test]
fn customer_settles_then_invoice_is_deleted() {
    let engine = Engine::default();
    let customer = Party::new(PartyRole::Customer, "Meena Traders");
    let snapshot = Snapshot::new().with_party(customer.clone());

    let sale = input(
        InvoiceKind::Sale,
        &customer,
        vec![line_for(None, 1, dec!(1000))],
        dec!(400),
    );
    let (snapshot, invoice) = engine.create_invoice(&snapshot, &sale).unwrap();
    assert_eq!(invoice.totals.grand_total, dec!(1000));
    assert_eq!(balance(&snapshot, &customer), dec!(600));

    let settled = InvoiceInput {
        amount_paid: dec!(1000),
        ..sale
    };
    let (snapshot, _) = engine.edit_invoice(&snapshot, invoice.id, &settled).unwrap();
    assert_eq!(balance(&snapshot, &customer), Decimal::ZERO);
    assert_eq!(snapshot.companion_of(invoice.id).unwrap().amount, dec!(1000));

    let snapshot = engine.delete_invoice(&snapshot, invoice.id).unwrap();
    assert_eq!(balance(&snapshot, &customer), Decimal::ZERO);
    assert!(snapshot.transactions.is_empty());
    assert!(engine.build_statement(&snapshot, customer.id).unwrap().is_empty());
    assert_eq!(snapshot.version, 3);
}

#[test]
fn purchase_edit_rebases_stock() {
    let engine = Engine::default();
    let supplier = Party::new(PartyRole::Supplier, "Steel Hub");
    let product = Product::new("Gate Valve", 50);
    let snapshot = Snapshot::new()
        .with_party(supplier.clone())
        .with_product(product.clone());

    let purchase = input(
        InvoiceKind::Purchase,
        &supplier,
        vec![line_for(Some(&product), 20, dec!(80))],
        Decimal::ZERO,
    );
    let (snapshot, invoice) = engine.create_invoice(&snapshot, &purchase).unwrap();
    assert_eq!(snapshot.product(product.id).unwrap().stock, 70);
    assert_eq!(balance(&snapshot, &supplier), dec!(1600));

    let smaller = input(
        InvoiceKind::Purchase,
        &supplier,
        vec![line_for(Some(&product), 5, dec!(80))],
        Decimal::ZERO,
    );
    let (snapshot, _) = engine.edit_invoice(&snapshot, invoice.id, &smaller).unwrap();
    assert_eq!(snapshot.product(product.id).unwrap().stock, 55);
    assert_eq!(balance(&snapshot, &supplier), dec!(400));
    assert_eq!(
        snapshot.product(product.id).unwrap().last_restocked,
        Some(day(12))
    );
}

#[test]
fn stock_tracks_live_invoices_only() {
    let engine = Engine::default();
    let customer = Party::new(PartyRole::Customer, "Meena Traders");
    let supplier = Party::new(PartyRole::Supplier, "Steel Hub");
    let product = Product::new("Gate Valve", 30);
    let mut snapshot = Snapshot::new()
        .with_party(customer.clone())
        .with_party(supplier.clone())
        .with_product(product.clone());

    let plan = [
        (InvoiceKind::Purchase, 40u32),
        (InvoiceKind::Sale, 15),
        (InvoiceKind::Sale, 8),
        (InvoiceKind::Purchase, 12),
        (InvoiceKind::Sale, 3),
    ];
    let mut ids = Vec::new();
    for (kind, quantity) in plan {
        let party = match kind {
            InvoiceKind::Sale => &customer,
            InvoiceKind::Purchase => &supplier,
        };
        let invoice = input(
            kind,
            party,
            vec![line_for(Some(&product), quantity, dec!(10))],
            Decimal::ZERO,
        );
        let (next, posted) = engine.create_invoice(&snapshot, &invoice).unwrap();
        snapshot = next;
        ids.push(posted.id);
    }

    // delete the second sale, shrink the last purchase to 2
    snapshot = engine.delete_invoice(&snapshot, ids[2]).unwrap();
    let shrunk = input(
        InvoiceKind::Purchase,
        &supplier,
        vec![line_for(Some(&product), 2, dec!(10))],
        Decimal::ZERO,
    );
    snapshot = engine.edit_invoice(&snapshot, ids[3], &shrunk).unwrap().0;

    let live: i64 = snapshot
        .invoices
        .iter()
        .flat_map(|invoice| {
            invoice
                .lines
                .iter()
                .map(move |line| invoice.kind.stock_factor() * i64::from(line.quantity))
        })
        .sum();
    let stock = snapshot.product(product.id).unwrap().stock;
    assert_eq!(stock, product.opening_stock + live);
    assert_eq!(stock, 30 + 40 - 15 + 2 - 3);
}

#[test]
fn json_commands_match_direct_calls() {
    let engine = Engine::new(EngineConfig::default());
    let customer = Party::new(PartyRole::Customer, "Meena Traders");
    let snapshot = Snapshot::new().with_party(customer.clone());

    let sale = input(
        InvoiceKind::Sale,
        &customer,
        vec![line_for(None, 2, dec!(350))],
        dec!(200),
    );
    let envelope = CommandEnvelope::at_version(
        0,
        Command::CreateInvoice {
            input: sale.clone(),
        },
    );
    let wire = serde_json::to_string(&envelope).unwrap();
    let decoded: CommandEnvelope = serde_json::from_str(&wire).unwrap();

    let (via_command, outcome) = engine.execute(&snapshot, &decoded).unwrap();
    let Outcome::Invoice(invoice) = outcome else {
        panic!("expected an invoice outcome");
    };
    assert_eq!(balance(&via_command, &customer), dec!(500));
    assert_eq!(invoice.invoice_no, "SL-000001");

    let (direct, _) = engine.create_invoice(&snapshot, &sale).unwrap();
    assert_eq!(direct.parties, via_command.parties);
    assert_eq!(direct.version, via_command.version);

    let stored = serde_json::to_string(&via_command).unwrap();
    let reloaded: Snapshot = serde_json::from_str(&stored).unwrap();
    assert_eq!(reloaded, via_command);
}
